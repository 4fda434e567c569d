#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Configuration loading for the tarobot workspace.
//!
//! All configuration lives in `~/tarobot/config.json` and is resolved once
//! at startup into a typed [`Config`].

mod schema;

pub use schema::{CatalogConfig, Config, ProviderConfig, ProvidersConfig, TelegramConfig};
