use chrono::{DateTime, SecondsFormat, Utc};

use crate::knowledge::KnowledgeBase;

/// Commands answered with static text, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Plans,
    Domain,
    Support,
    Date,
}

/// How an inbound text should be handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Command(Command),
    /// Starts with `/` but names no known command (or another bot).
    UnknownCommand(String),
    /// Free text for the AI delegate, already trimmed.
    Text(String),
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::Start,
        Command::Help,
        Command::Plans,
        Command::Domain,
        Command::Support,
        Command::Date,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Plans => "plans",
            Command::Domain => "domain",
            Command::Support => "support",
            Command::Date => "date",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Command::Start => "Start / Restart the Gojo Host assistant",
            Command::Help => "Get help & available commands",
            Command::Plans => "See our hosting plans & prices",
            Command::Domain => "Check domain availability",
            Command::Support => "Contact support team",
            Command::Date => "Show the current server time",
        }
    }

    fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.keyword() == keyword)
    }

    /// Render the reply for this command. `now` is only read by `/date`.
    pub fn reply(
        self,
        kb: &KnowledgeBase,
        sender_name: Option<&str>,
        now: DateTime<Utc>,
    ) -> String {
        match self {
            Command::Start => {
                let name = sender_name
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .unwrap_or("there");
                format!(
                    "Hello {}! 👋 Welcome to GojoHost assistant bot.\n\
                     How can I help you today?\n\n\
                     Type /help to see available commands.",
                    name
                )
            }
            Command::Help => help_text(),
            Command::Plans => kb.plans_text(),
            Command::Domain => kb.domain_text(),
            Command::Support => kb.support_text(),
            Command::Date => format!(
                "Current server time: {}",
                now.to_rfc3339_opts(SecondsFormat::Millis, true)
            ),
        }
    }
}

fn help_text() -> String {
    let commands = Command::ALL
        .iter()
        .map(|c| format!("/{} - {}", c.keyword(), c.description()))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Available commands:\n\n{}\n\n\
         Just type your question (e.g. \"What plan is best for WordPress?\")!\n\
         I'm here to assist you with any hosting-related queries. 😊",
        commands
    )
}

/// Classify raw message text. Matching is exact and case-sensitive on the
/// first token; `/cmd@name` is accepted only when `name` is this bot.
pub fn route(text: &str, bot_username: Option<&str>) -> Route {
    let text = text.trim();
    let Some(rest) = text.strip_prefix('/') else {
        return Route::Text(text.to_string());
    };

    let token = rest.split_whitespace().next().unwrap_or("");
    let (keyword, mention) = match token.split_once('@') {
        Some((keyword, mention)) => (keyword, Some(mention)),
        None => (token, None),
    };

    let addressed_to_us = match mention {
        None => true,
        Some(mention) => bot_username.is_some_and(|me| me.eq_ignore_ascii_case(mention)),
    };

    match Command::from_keyword(keyword) {
        Some(command) if addressed_to_us => Route::Command(command),
        _ => Route::UnknownCommand(token.to_string()),
    }
}
