use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, BotCommandScope, ChatAction};
use tracing::{error, info, warn};

use crate::agent::Assistant;
use crate::commands::Command;
use crate::platform::{ChatTransport, IncomingMessage};

/// [`ChatTransport`] backed by the Telegram Bot API
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot.send_message(ChatId(chat_id), text).await?;
        Ok(())
    }

    async fn send_typing(&self, chat_id: i64) -> Result<()> {
        self.bot
            .send_chat_action(ChatId(chat_id), ChatAction::Typing)
            .await?;
        Ok(())
    }
}

/// The command menu shown in Telegram clients
pub fn menu() -> Vec<BotCommand> {
    Command::ALL
        .iter()
        .map(|c| BotCommand::new(c.keyword(), c.description()))
        .collect()
}

/// Advertise the command menu for private chats, the default scope and each
/// extra language. Failures are logged and otherwise ignored.
pub async fn register_commands(bot: &Bot, languages: &[String]) {
    match bot
        .set_my_commands(menu())
        .scope(BotCommandScope::AllPrivateChats)
        .await
    {
        Ok(_) => info!("Commands set for private chats"),
        Err(e) => error!("Private chat command registration failed: {}", e),
    }

    match bot.set_my_commands(menu()).await {
        Ok(_) => info!("Default commands set"),
        Err(e) => error!("Default command registration failed: {}", e),
    }

    for language in languages {
        match bot
            .set_my_commands(menu())
            .language_code(language.clone())
            .await
        {
            Ok(_) => info!("Commands set for language '{}'", language),
            Err(e) => error!("Command registration for '{}' failed: {}", language, e),
        }
    }
}

/// Username used to recognise `/command@username` in group chats
pub async fn fetch_username(bot: &Bot) -> Option<String> {
    match bot.get_me().await {
        Ok(me) => Some(me.username().to_string()),
        Err(e) => {
            warn!("Could not fetch bot identity: {}", e);
            None
        }
    }
}

/// Run the Telegram long-polling loop until shutdown
pub async fn run(assistant: Arc<Assistant>, bot: Bot) -> Result<()> {
    info!("Starting Telegram platform...");

    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![assistant])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, assistant: Arc<Assistant>) -> ResponseResult<()> {
    let text = match msg.text() {
        Some(t) => t.to_string(),
        None => return Ok(()),
    };

    let sender_name = msg.from.as_ref().map(|user| user.first_name.clone());

    info!(
        "Telegram message in chat {} from {}: {}",
        msg.chat.id,
        sender_name.as_deref().unwrap_or("unknown"),
        text
    );

    let incoming = IncomingMessage {
        sender_name,
        text,
        chat_id: msg.chat.id.0,
    };

    let transport = TelegramTransport::new(bot);
    if let Err(e) = assistant.handle(&incoming, &transport).await {
        error!("Error replying in chat {}: {:#}", incoming.chat_id, e);
    }

    Ok(())
}
