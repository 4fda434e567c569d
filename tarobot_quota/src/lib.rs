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

//! Per-user daily draw quotas.
//!
//! Counters are kept per user and draw type for the current calendar date in
//! the reference timezone, and reset lazily on the first access after local
//! midnight. A check consumes quota in the same call that evaluates the
//! limit; exhaustion is a normal negative result carrying a wait message,
//! never an error.

mod tracker;

pub use tracker::{QuotaDecision, QuotaLimits, QuotaTracker};
