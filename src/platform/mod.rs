pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;

/// A text message received from the chat platform
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// Sender's display name, if the platform provided one
    pub sender_name: Option<String>,
    /// The message text, untrimmed
    pub text: String,
    /// Chat the reply goes to
    pub chat_id: i64,
}

/// Outbound side of a chat platform.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;

    /// Show a "typing…" indicator. Callers treat failures as non-fatal.
    async fn send_typing(&self, chat_id: i64) -> Result<()>;
}
