//! # ledger-api: HTTP surface of the Supply Ledger
//!
//! Thin axum layer over [`ledger_db`]: every handler calls one repository
//! method and maps [`ledger_db::DbError`] onto an HTTP status.
//!
//! ## Module Organization
//!
//! - [`config`] - Environment-driven settings
//! - [`error`] - `ApiError` and its JSON rendering
//! - [`extract`] - `Json`, `Path` and `Query` rejecting through `ApiError`
//! - [`routes`] - Route table and handlers

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

use axum::Router;
use ledger_db::Database;
use tower_http::trace::TraceLayer;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

/// Builds the application router over an open store.
pub fn router(db: Database) -> Router {
    routes::router(AppState { db }).layer(TraceLayer::new_for_http())
}
