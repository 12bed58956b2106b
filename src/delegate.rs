use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::LlmConfig;
use crate::knowledge::KnowledgeBase;
use crate::llm::{CompletionClient, CompletionRequest};

/// Sent when the endpoint could not be reached or refused the request.
pub const CONNECTION_FALLBACK: &str = "Sorry, connection issue with the AI right now 😓\n\
                                       Please try again in a moment or ask about hosting plans directly!";

/// Sent when the endpoint answered without a usable completion.
pub const NO_ANSWER_FALLBACK: &str = "Sorry, couldn't generate a response right now 😅 Try again!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Generated(String),
    /// Fixed apology text; the failure has already been logged.
    Fallback(&'static str),
}

impl Answer {
    pub fn text(&self) -> &str {
        match self {
            Answer::Generated(text) => text.as_str(),
            Answer::Fallback(text) => *text,
        }
    }
}

/// Forwards free text to the completion endpoint, one turn at a time.
/// Holds no conversation state.
pub struct AiDelegate {
    client: Arc<dyn CompletionClient>,
    system_instruction: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl AiDelegate {
    pub fn new(client: Arc<dyn CompletionClient>, kb: &KnowledgeBase, config: &LlmConfig) -> Self {
        Self {
            client,
            system_instruction: kb.system_prompt(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    fn build_request(&self, text: &str) -> CompletionRequest {
        CompletionRequest {
            system_instruction: self.system_instruction.clone(),
            user_text: text.trim().to_string(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Ask the model once. Never fails: errors become a fallback answer.
    pub async fn answer(&self, text: &str) -> Answer {
        let request = self.build_request(text);

        match self.client.complete(&request).await {
            Ok(answer) => {
                info!("Completion succeeded ({} chars)", answer.len());
                Answer::Generated(answer)
            }
            Err(e) if e.is_malformed() => {
                warn!("Completion endpoint gave no usable answer: {}", e);
                Answer::Fallback(NO_ANSWER_FALLBACK)
            }
            Err(e) => {
                error!("Completion request failed: {}", e);
                Answer::Fallback(CONNECTION_FALLBACK)
            }
        }
    }
}
