//! Command-line companion for a Ferrocam server.

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ferrocam_client::{
    ApiClient, ClientOptions, DEFAULT_POLL_INTERVAL, SyncOptions, Synchronizer,
};
use ferrocam_model::{Camera, ConfigPatch, Ident};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "ferrocam-watch")]
#[command(about = "Watch and configure cameras on a Ferrocam server")]
struct Cli {
    /// Base URL of the server
    #[arg(
        long,
        env = "FERROCAM_URL",
        default_value = "http://127.0.0.1:8080"
    )]
    server: String,

    /// Per-request timeout, e.g. `5s` (none by default)
    #[arg(long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Poll the camera list and log every snapshot until interrupted
    Watch {
        /// Delay between polls, e.g. `3s` or `500ms`
        #[arg(long, value_parser = humantime::parse_duration)]
        interval: Option<Duration>,
    },
    /// Print the current camera list as JSON
    List,
    /// Change the image format and/or quality of a camera
    Set {
        #[arg(long)]
        index: String,
        #[arg(long)]
        format: Option<String>,
        #[arg(long)]
        quality: Option<u32>,
    },
    /// Resolve a still image, or download the raw capture with `--raw`
    Capture {
        #[arg(long)]
        index: String,
        #[arg(long)]
        raw: bool,
        /// Output file for `--raw` (defaults to the server's filename)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client = ApiClient::with_options(
        &cli.server,
        ClientOptions {
            request_timeout: cli.timeout,
        },
    )
    .with_context(|| format!("invalid server URL {}", cli.server))?;

    match cli.command {
        Command::Watch { interval } => watch(client, interval).await,
        Command::List => {
            let cameras = client
                .fetch_cameras()
                .await
                .context("failed to fetch cameras")?;
            println!("{}", serde_json::to_string_pretty(&cameras)?);
            Ok(())
        }
        Command::Set {
            index,
            format,
            quality,
        } => {
            let patch = ConfigPatch {
                image_format: format.map(Ident::from),
                quality,
            };
            if patch.is_empty() {
                warn!("neither --format nor --quality given; patch is empty");
            }
            let response = client
                .set_camera_config(Ident::from(index.as_str()), patch)
                .await
                .with_context(|| {
                    format!("failed to configure camera {index}")
                })?;
            println!("{}", response.message);
            Ok(())
        }
        Command::Capture { index, raw, out } => {
            let ident = Ident::from(index.as_str());
            if raw {
                let download =
                    client.capture_binary(ident.clone()).await.with_context(
                        || format!("raw capture of camera {index} failed"),
                    )?;
                // The client already reduced the server's name to a bare
                // file name.
                let path = out.unwrap_or_else(|| {
                    PathBuf::from(download.filename.clone().unwrap_or_else(
                        || format!("camera_{ident}_raw.bin"),
                    ))
                });
                std::fs::write(&path, &download.bytes).with_context(|| {
                    format!("failed to write {}", path.display())
                })?;
                info!(
                    path = %path.display(),
                    bytes = download.bytes.len(),
                    frame_rate = ?download.frame_rate,
                    "raw capture saved"
                );
            } else {
                let location = client
                    .capture_image_location(ident)
                    .await
                    .with_context(|| {
                        format!("capture of camera {index} failed")
                    })?;
                println!("{location}");
            }
            Ok(())
        }
    }
}

async fn watch(client: ApiClient, interval: Option<Duration>) -> Result<()> {
    let options = SyncOptions {
        poll_interval: interval.unwrap_or(DEFAULT_POLL_INTERVAL),
    };
    info!(
        server = client.base_url(),
        interval = %humantime::format_duration(options.poll_interval),
        "watching cameras"
    );

    let mut ticker = tokio::time::interval(options.poll_interval);
    let handle = Synchronizer::start(client, options);
    let state = std::sync::Arc::clone(handle.state());
    let mut snapshots = state.subscribe();
    let mut error_reported = false;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let cameras = snapshots.borrow_and_update().clone();
                log_snapshot(&cameras);
            }
            _ = ticker.tick() => {}
        }

        if state.has_error() && !error_reported {
            warn!(
                "network error while polling; the camera list may be stale"
            );
            error_reported = true;
        }
    }

    handle.stop().await;
    Ok(())
}

fn log_snapshot(cameras: &[Camera]) {
    info!(count = cameras.len(), "camera snapshot");
    for camera in cameras {
        info!(
            index = %camera.index,
            name = camera.name.as_deref().unwrap_or("-"),
            format = camera
                .current_image_format_description
                .as_deref()
                .unwrap_or("?"),
            quality = ?camera.current_quality,
            fps = camera.current_frame_rate,
            resolution = %format!(
                "{}x{}",
                camera.current_resolution.width,
                camera.current_resolution.height
            ),
            "camera"
        );
    }
}
