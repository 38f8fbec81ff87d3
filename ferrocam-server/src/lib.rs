//! HTTP configuration API for Ferrocam cameras.
//!
//! The router exposes the device registry and capture gateway from
//! `ferrocam-core` under `/api`, plus a `/ping` liveness probe.

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::{
    app::create_app,
    app_state::AppState,
    errors::{AppError, AppResult},
};
