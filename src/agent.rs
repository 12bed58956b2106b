use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::commands::{self, Command, Route};
use crate::delegate::{AiDelegate, Answer};
use crate::knowledge::KnowledgeBase;
use crate::platform::{ChatTransport, IncomingMessage};

/// Telegram rejects messages longer than this many UTF-16 code units.
const MAX_REPLY_LEN: usize = 4096;

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Command(Command),
    /// Unknown command; nothing was sent.
    Ignored,
    Answered,
    Fallback,
}

/// Routes each message to a static command reply or the AI delegate.
/// Platform-agnostic and stateless across messages.
pub struct Assistant {
    kb: &'static KnowledgeBase,
    delegate: AiDelegate,
    bot_username: Option<String>,
}

impl Assistant {
    pub fn new(
        kb: &'static KnowledgeBase,
        delegate: AiDelegate,
        bot_username: Option<String>,
    ) -> Self {
        Self {
            kb,
            delegate,
            bot_username,
        }
    }

    /// Handle one message, sending at most one reply. The only error is a
    /// failure to deliver that reply.
    pub async fn handle(
        &self,
        incoming: &IncomingMessage,
        transport: &dyn ChatTransport,
    ) -> Result<Outcome> {
        let chat_id = incoming.chat_id;

        match commands::route(&incoming.text, self.bot_username.as_deref()) {
            Route::Command(command) => {
                info!("Command /{} in chat {}", command.keyword(), chat_id);
                let reply = command.reply(self.kb, incoming.sender_name.as_deref(), Utc::now());
                transport
                    .send_text(chat_id, &reply)
                    .await
                    .with_context(|| format!("Failed to send /{} reply", command.keyword()))?;
                Ok(Outcome::Command(command))
            }
            Route::UnknownCommand(token) => {
                debug!("Ignoring unknown command /{} in chat {}", token, chat_id);
                Ok(Outcome::Ignored)
            }
            Route::Text(text) => {
                if let Err(e) = transport.send_typing(chat_id).await {
                    warn!("Failed to send typing indicator: {:#}", e);
                }

                let answer = self.delegate.answer(&text).await;
                let reply = fit_reply(answer.text(), MAX_REPLY_LEN);
                if reply.len() < answer.text().len() {
                    warn!(
                        "Truncated AI reply from {} to {} bytes",
                        answer.text().len(),
                        reply.len()
                    );
                }
                transport
                    .send_text(chat_id, reply)
                    .await
                    .context("Failed to send AI reply")?;

                Ok(match answer {
                    Answer::Generated(_) => Outcome::Answered,
                    Answer::Fallback(_) => Outcome::Fallback,
                })
            }
        }
    }
}

/// Cut `text` so it is at most `max_len` UTF-16 code units, on a char
/// boundary. The answer stays a single message.
fn fit_reply(text: &str, max_len: usize) -> &str {
    let mut units = 0;
    for (idx, ch) in text.char_indices() {
        units += ch.len_utf16();
        if units > max_len {
            return text[..idx].trim_end();
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;
    use crate::delegate::{CONNECTION_FALLBACK, NO_ANSWER_FALLBACK};
    use crate::knowledge::GOJO_HOST;
    use crate::llm::{CompletionClient, CompletionError, CompletionRequest};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<(i64, String)>>,
        typing: Mutex<Vec<i64>>,
        fail_typing: bool,
        /// Reject texts longer than this many chars, like Telegram does.
        max_len: Option<usize>,
    }

    #[async_trait]
    impl ChatTransport for RecordingTransport {
        async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
            if self.max_len.is_some_and(|max| text.chars().count() > max) {
                anyhow::bail!("Bad Request: message is too long");
            }
            self.sent.lock().unwrap().push((chat_id, text.to_string()));
            Ok(())
        }

        async fn send_typing(&self, chat_id: i64) -> Result<()> {
            if self.fail_typing {
                anyhow::bail!("chat action rejected");
            }
            self.typing.lock().unwrap().push(chat_id);
            Ok(())
        }
    }

    struct ScriptedClient {
        calls: Mutex<Vec<CompletionRequest>>,
        result: fn() -> Result<String, CompletionError>,
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
            self.calls.lock().unwrap().push(request.clone());
            (self.result)()
        }
    }

    fn assistant(
        result: fn() -> Result<String, CompletionError>,
    ) -> (Assistant, Arc<ScriptedClient>) {
        let client = Arc::new(ScriptedClient {
            calls: Mutex::new(Vec::new()),
            result,
        });
        let delegate = AiDelegate::new(client.clone(), &GOJO_HOST, &LlmConfig::default());
        (
            Assistant::new(&GOJO_HOST, delegate, Some("GojoHostBot".to_string())),
            client,
        )
    }

    fn message(text: &str) -> IncomingMessage {
        IncomingMessage {
            sender_name: Some("Abel".to_string()),
            text: text.to_string(),
            chat_id: 42,
        }
    }

    #[tokio::test]
    async fn test_command_replies_without_ai_call() {
        let (assistant, client) = assistant(|| Ok("unused".to_string()));
        let transport = RecordingTransport::default();

        let outcome = assistant.handle(&message("/start"), &transport).await.unwrap();
        assert_eq!(outcome, Outcome::Command(Command::Start));

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, 42);
        assert!(sent[0].1.contains("Abel"));
        assert!(sent[0].1.contains("/help"));
        assert!(client.calls.lock().unwrap().is_empty());
        assert!(transport.typing.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_command_is_identical() {
        let (assistant, _) = assistant(|| Ok("unused".to_string()));
        let transport = RecordingTransport::default();
        assistant.handle(&message("/plans"), &transport).await.unwrap();
        assistant.handle(&message("/plans"), &transport).await.unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent[0].1, sent[1].1);
        assert!(sent[0].1.contains("3,540 ETB/year"));
    }

    #[tokio::test]
    async fn test_free_text_goes_to_ai() {
        let (assistant, client) = assistant(|| Ok("We recommend cPanel Hosting.".to_string()));
        let transport = RecordingTransport::default();

        let outcome = assistant
            .handle(&message("  What plan is best for WordPress? "), &transport)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Answered);

        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].user_text, "What plan is best for WordPress?");
        assert!(calls[0].system_instruction.contains("Gojo Host"));

        assert_eq!(*transport.typing.lock().unwrap(), vec![42]);
        assert_eq!(
            *transport.sent.lock().unwrap(),
            vec![(42, "We recommend cPanel Hosting.".to_string())]
        );
    }

    #[tokio::test]
    async fn test_keyword_without_marker_goes_to_ai() {
        let (assistant, client) = assistant(|| Ok("Here are our plans.".to_string()));
        let transport = RecordingTransport::default();

        let outcome = assistant.handle(&message("plans"), &transport).await.unwrap();
        assert_eq!(outcome, Outcome::Answered);
        assert_eq!(client.calls.lock().unwrap()[0].user_text, "plans");
    }

    #[tokio::test]
    async fn test_unknown_command_is_ignored() {
        let (assistant, client) = assistant(|| Ok("unused".to_string()));
        let transport = RecordingTransport::default();

        for text in ["/pricing", "/Start", "/help@SomeOtherBot"] {
            let outcome = assistant.handle(&message(text), &transport).await.unwrap();
            assert_eq!(outcome, Outcome::Ignored, "{text}");
        }
        assert!(transport.sent.lock().unwrap().is_empty());
        assert!(client.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mention_of_this_bot_is_a_command() {
        let (assistant, _) = assistant(|| Ok("unused".to_string()));
        let transport = RecordingTransport::default();
        let outcome = assistant
            .handle(&message("/support@GojoHostBot"), &transport)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Command(Command::Support));
    }

    #[tokio::test]
    async fn test_ai_failure_sends_fallback() {
        let (assistant, _) = assistant(|| Err(CompletionError::Timeout));
        let transport = RecordingTransport::default();

        let outcome = assistant.handle(&message("hello"), &transport).await.unwrap();
        assert_eq!(outcome, Outcome::Fallback);
        assert_eq!(
            *transport.sent.lock().unwrap(),
            vec![(42, CONNECTION_FALLBACK.to_string())]
        );
    }

    #[tokio::test]
    async fn test_empty_answer_sends_no_answer_fallback() {
        let (assistant, _) = assistant(|| Err(CompletionError::EmptyAnswer));
        let transport = RecordingTransport::default();

        assistant.handle(&message("hello"), &transport).await.unwrap();
        assert_eq!(transport.sent.lock().unwrap()[0].1, NO_ANSWER_FALLBACK);
    }

    #[tokio::test]
    async fn test_typing_failure_does_not_block_reply() {
        let (assistant, _) = assistant(|| Ok("Sure!".to_string()));
        let transport = RecordingTransport {
            fail_typing: true,
            ..Default::default()
        };

        let outcome = assistant.handle(&message("hi"), &transport).await.unwrap();
        assert_eq!(outcome, Outcome::Answered);
        assert_eq!(transport.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_overlong_answer_is_cut_to_one_message() {
        let (assistant, _) = assistant(|| Ok("a".repeat(5000)));
        let transport = RecordingTransport {
            max_len: Some(4096),
            ..Default::default()
        };

        let outcome = assistant
            .handle(&message("tell me everything"), &transport)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Answered);

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1.chars().count(), 4096);
    }

    #[test]
    fn test_fit_reply_counts_utf16_units() {
        assert_eq!(fit_reply("short", 4096), "short");

        // Each emoji is two UTF-16 code units
        let emojis = "😀".repeat(3000);
        let cut = fit_reply(&emojis, 4096);
        assert_eq!(cut.chars().count(), 2048);
        assert!(emojis.starts_with(cut));

        assert_eq!(fit_reply("ab 😀", 4), "ab");
    }
}
