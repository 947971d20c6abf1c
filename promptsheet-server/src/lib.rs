//! HTTP surface for promptsheet: a two-file upload endpoint that runs the
//! per-topic pipeline and publishes the result to Google Sheets.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

pub use config::AppConfig;
pub use server::{build_state, router, serve, AppState};
