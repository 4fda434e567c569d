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

//! Tarot card catalog: dataset model, cache-aware loader and random
//! selection.
//!
//! The catalog is loaded wholesale at startup from a local cache file that
//! is refetched from the remote dataset source when it is missing or older
//! than the configured number of days. After loading it is read-only and
//! shared by every request.

mod data;
mod error;
mod loader;

pub use data::{Card, Catalog, Formation, Meaning};
pub use error::{Error, Result};
pub use loader::CatalogLoader;
