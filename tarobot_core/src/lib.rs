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

//! Shared domain types for the tarobot workspace.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod image_url;
pub mod prompt;

pub use image_url::{extract_image_url, strip_image_urls};
pub use prompt::build_interpret_prompt;

/// Which daily quota a draw consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawType {
    /// Full-spread divination.
    Divine,
    /// Single-card draw.
    Tarot,
}

impl DrawType {
    /// User-facing name of the draw kind.
    #[must_use]
    pub const fn label_cn(self) -> &'static str {
        match self {
            Self::Divine => "占卜",
            Self::Tarot => "塔罗牌",
        }
    }
}

/// Outbound reply produced by a command handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    ImageUrl(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// External text-generation collaborator that elaborates on a retained draw.
#[async_trait]
pub trait Interpreter: Send + Sync {
    async fn interpret(&self, prompt: &str) -> anyhow::Result<String>;
}
