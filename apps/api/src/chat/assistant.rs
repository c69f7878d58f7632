//! Chat turn orchestration.
//!
//! Flow: compose prompt → one completion call (prior turns as history) →
//! sanitize → friendly wrap. Any failure becomes the fixed apology; there is
//! no retry.

use rand::seq::SliceRandom;
use tracing::{info, warn};

use crate::chat::composer::{compose_chat_prompt, ChatContext};
use crate::chat::prompts::{APOLOGY, CLOSING_OFFER, FRIENDLY_OPENERS};
use crate::llm_client::{ChatTurn, CompletionClient, CompletionRequest, TurnRole};
use crate::sanitize::sanitize;
use crate::session::{ChatMessage, ChatRole};

#[derive(Debug, Clone, PartialEq)]
pub struct ChatOutcome {
    pub reply: String,
    /// False when the reply is the apology.
    pub answered: bool,
}

impl ChatOutcome {
    fn apology() -> Self {
        Self {
            reply: APOLOGY.to_string(),
            answered: false,
        }
    }
}

/// Converts session history into model turns. The greeting (and any other
/// assistant text before the first user message) is not part of the
/// conversation the model saw, so it is skipped.
pub fn history_turns(messages: &[ChatMessage]) -> Vec<ChatTurn> {
    messages
        .iter()
        .skip_while(|m| m.role == ChatRole::Assistant)
        .map(|m| ChatTurn {
            role: match m.role {
                ChatRole::User => TurnRole::User,
                ChatRole::Assistant => TurnRole::Model,
            },
            text: m.content.clone(),
        })
        .collect()
}

pub fn wrap_with_opener(opener: &str, answer: &str) -> String {
    format!("{opener}\n\n{}\n\n{CLOSING_OFFER}", answer.trim())
}

pub fn friendly_wrap(answer: &str) -> String {
    let opener = FRIENDLY_OPENERS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Great question!");
    wrap_with_opener(opener, answer)
}

pub async fn answer_question(
    llm: &dyn CompletionClient,
    history: Vec<ChatTurn>,
    question: &str,
    context: &ChatContext,
) -> ChatOutcome {
    let prompt = compose_chat_prompt(question, context);
    let request = CompletionRequest::new(prompt).with_history(history);

    let raw = match llm.complete(&request).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Chat completion failed: {e}");
            return ChatOutcome::apology();
        }
    };

    let cleaned = sanitize(&raw);
    if cleaned.is_empty() {
        warn!("Chat reply was empty after sanitizing");
        return ChatOutcome::apology();
    }

    info!("Chat answered ({} chars)", cleaned.len());
    ChatOutcome {
        reply: friendly_wrap(&cleaned),
        answered: true,
    }
}
