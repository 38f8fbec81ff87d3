//! Client side of the Ferrocam camera API.
//!
//! [`ApiClient`] wraps the HTTP endpoints. [`Synchronizer`] runs a
//! cancellable polling task over any [`CameraFeed`] and mirrors the server's
//! camera list into a [`SyncState`].

pub mod api_client;
pub mod error;
pub mod feed;
pub mod sync;

pub use api_client::{ApiClient, ClientOptions, RawDownload};
pub use error::{ClientError, Result};
pub use feed::CameraFeed;
pub use sync::{
    DEFAULT_POLL_INTERVAL, SyncHandle, SyncOptions, SyncState, Synchronizer,
};
