//! Google Sheets/Drive result sink for promptsheet.
//!
//! Publishing a report is three short calls against the spreadsheet and
//! drive services: create a timestamped spreadsheet, write the grid at
//! `Output!A1`, and (when a destination folder is configured) reparent
//! the file. Auth goes through the [`TokenProvider`] seam so tests can
//! inject a static token.

mod auth;
mod client;
mod publisher;

pub use auth::{ServiceAccountAuth, ServiceAccountKey, TokenProvider};
pub use publisher::SheetsPublisher;
