pub mod client;
pub mod prompts;
pub mod types;

pub use client::*;
pub use prompts::*;
pub use types::*;

use crate::error::Result;
use async_trait::async_trait;

/// A text-generation backend that turns a rendered prompt into prose.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
