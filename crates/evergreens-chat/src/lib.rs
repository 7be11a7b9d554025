//! Chat gateway: forwards a visitor's message and transcript to a generative
//! text API under a fixed brand persona, and never fails the caller.

pub mod gemini;
pub mod prompt;

use std::sync::Arc;

use futures_util::future::BoxFuture;
use tracing::{debug, warn};

use evergreens_types::api::ChatTurn;

pub use gemini::GeminiClient;
pub use prompt::PromptRevision;

/// Returned whenever the external API cannot produce a reply.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I'm having trouble connecting right now. Please try again later.";

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat API key is not configured")]
    MissingApiKey,

    #[error("external service unavailable: {0}")]
    ExternalServiceUnavailable(#[from] reqwest::Error),

    #[error("external service returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("external service returned no text")]
    EmptyReply,
}

/// Seam to the external generative API.
pub trait TextGenerator: Send + Sync {
    fn generate<'a>(
        &'a self,
        system_instruction: &'a str,
        contents: &'a [ChatTurn],
    ) -> BoxFuture<'a, Result<String, ChatError>>;
}

#[derive(Clone)]
pub struct ChatGateway {
    generator: Arc<dyn TextGenerator>,
    instruction: Arc<str>,
    revision: PromptRevision,
}

impl ChatGateway {
    pub fn new(generator: Arc<dyn TextGenerator>, revision: PromptRevision) -> Self {
        Self {
            generator,
            instruction: revision.instruction().into(),
            revision,
        }
    }

    pub fn revision(&self) -> PromptRevision {
        self.revision
    }

    /// Append `message` to `history` as a user turn and return the model's
    /// reply, or [`FALLBACK_REPLY`] on any failure.
    pub async fn respond(&self, message: &str, history: &[ChatTurn]) -> String {
        let mut contents = Vec::with_capacity(history.len() + 1);
        contents.extend_from_slice(history);
        contents.push(ChatTurn::user(message));

        match self.generator.generate(&self.instruction, &contents).await {
            Ok(reply) => {
                debug!("Chat reply generated ({} turns in)", contents.len());
                reply
            }
            Err(e) => {
                warn!("Chat generation failed, sending fallback: {}", e);
                FALLBACK_REPLY.to_string()
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedGenerator;
    use super::*;

    #[tokio::test]
    async fn forwards_a_single_user_turn() {
        let generator = Arc::new(ScriptedGenerator::replying("Happy to help you book a slot!"));
        let gateway = ChatGateway::new(generator.clone(), PromptRevision::Guided);

        let reply = gateway.respond("I want to schedule a meeting", &[]).await;

        assert_eq!(reply, "Happy to help you book a slot!");
        let calls = generator.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (instruction, contents) = &calls[0];
        assert_eq!(instruction, &PromptRevision::Guided.instruction());
        assert_eq!(contents, &vec![ChatTurn::user("I want to schedule a meeting")]);
    }

    #[tokio::test]
    async fn history_precedes_the_new_message() {
        let generator = Arc::new(ScriptedGenerator::replying("Which date suits you?"));
        let gateway = ChatGateway::new(generator.clone(), PromptRevision::NoCommercialTerms);
        let history = vec![
            ChatTurn::model("Hi! Welcome to EVERGREENS. How can I help you today?"),
            ChatTurn::user("Tell me more about EVERGREENS."),
            ChatTurn::model("We craft modern bags in Mumbai."),
        ];

        gateway.respond("Zoom works for me", &history).await;

        let calls = generator.calls.lock().unwrap();
        let (instruction, contents) = &calls[0];
        assert!(instruction.contains("Never ask for the number of reels"));
        assert_eq!(contents.len(), 4);
        assert_eq!(&contents[..3], history.as_slice());
        assert_eq!(contents[3], ChatTurn::user("Zoom works for me"));
    }

    #[tokio::test]
    async fn failure_becomes_fallback_text() {
        let gateway = ChatGateway::new(Arc::new(ScriptedGenerator::failing()), PromptRevision::Guided);
        let reply = gateway.respond("Do you ship to Pune?", &[]).await;
        assert_eq!(reply, FALLBACK_REPLY);
    }
}
