//! The judging collaborator seam.
//!
//! The collaborator is an opaque oracle: text plus session context in,
//! structured verdict out. One production adapter talks to an LLM provider;
//! a scripted fake drives deterministic tests.

mod llm;
mod scripted;

pub use llm::LlmJudge;
pub use scripted::{ScriptedJudge, passing_payload};

use crate::verdict::TurnContext;
use async_trait::async_trait;
use derive_more::{Display, Error};
use serde_json::Value;

/// Error from one judge invocation.
///
/// The two kinds drive different recovery: malformed output is retried once
/// and then absorbed by the fallback policy; a transport failure aborts the
/// turn without consuming it.
#[derive(Debug, Clone, Display, Error)]
pub enum JudgeError {
    /// The collaborator could not be reached or errored at the wire level.
    #[display("judge transport failure: {message}")]
    Transport {
        /// What went wrong on the wire.
        message: String,
    },
    /// The collaborator answered, but the payload was not usable.
    #[display("malformed judge output: {message}")]
    Malformed {
        /// Why the payload was rejected.
        message: String,
    },
}

impl JudgeError {
    /// Wraps a wire-level failure.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Wraps a received-but-unusable payload.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// True for wire-level failures that must abort the turn.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Capability of the judging collaborator.
#[async_trait]
pub trait Judge: Send + Sync {
    /// Interprets one player phrase against the current session context.
    ///
    /// Returns the raw JSON payload; schema validation happens in the
    /// turn state machine so the retry/fallback policy stays in one place.
    async fn interpret(&self, context: &TurnContext) -> Result<Value, JudgeError>;
}

#[async_trait]
impl<J: Judge + ?Sized> Judge for std::sync::Arc<J> {
    async fn interpret(&self, context: &TurnContext) -> Result<Value, JudgeError> {
        (**self).interpret(context).await
    }
}
