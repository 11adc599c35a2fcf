//! `claude-agent`: text completions from Claude behind one async trait.
//!
//! Two transports are provided:
//!
//! ```text
//! ClaudeCli     ← spawns `claude --print --output-format json`, prompt on stdin
//! AnthropicApi  ← POST {base_url}/v1/messages with x-api-key
//! ```
//!
//! [`ScriptedClient`] replays canned replies for tests.
//!
//! ```rust,ignore
//! use claude_agent::{ClaudeCli, LlmClient};
//!
//! let client = ClaudeCli::new().with_model("claude-sonnet-4-5");
//! let text = client.complete("You are terse.", "Say hi.").await?;
//! ```

pub mod api;
pub mod error;
pub mod mock;
pub mod process;
pub mod types;

use async_trait::async_trait;

pub use api::AnthropicApi;
pub use error::ClaudeAgentError;
pub use mock::ScriptedClient;
pub use process::ClaudeCli;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ClaudeAgentError>;

/// A single-turn text completion backend.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Send `prompt` with the given system prompt and return the reply text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}
