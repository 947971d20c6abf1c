//! Google Gemini API client for promptsheet.
//!
//! One client covers both halves of the per-topic cycle: generating
//! content for a topic and asking the same API to judge that content.

mod client;
mod contract;

pub use client::GeminiClient;
pub use contract::extract_text;
