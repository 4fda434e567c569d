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

//! Telegram surface for the tarot bot.
//!
//! Routes prefixed text commands to the draw engine behind the quota gate,
//! retains the last draw for follow-up interpretation, and converts handler
//! failures into user-visible error replies.

mod bot;
mod command;
mod error;
mod handler;

pub use bot::TarotBot;
pub use command::{Command, help_text, welcome_text};
pub use error::{Error, Result};
pub use handler::{handle_command, handle_message};
