//! conceptquiz-client — ConceptNet HTTP access and configuration.
//!
//! Implements the `Fetcher` trait over `reqwest`, with every successful
//! response cached by URL, and loads the `conceptquiz.toml` configuration.

pub mod client;
pub mod config;

pub use client::ConceptNetClient;
pub use config::{load_config, load_config_from, QuizConfig};
