//! Deterministic judge fake for tests and offline runs.

use super::{Judge, JudgeError};
use crate::verdict::TurnContext;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Judge that replays a scripted sequence of responses.
///
/// Each call to [`Judge::interpret`] consumes the next scripted response in
/// order. An exhausted script is reported as malformed output so misbehaving
/// tests fail loudly instead of hanging.
#[derive(Debug, Default)]
pub struct ScriptedJudge {
    responses: Mutex<VecDeque<Result<Value, JudgeError>>>,
    calls: AtomicUsize,
}

impl ScriptedJudge {
    /// Creates an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a script from a response sequence.
    pub fn with_responses(responses: Vec<Result<Value, JudgeError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queues a payload response.
    pub fn push_payload(&self, payload: Value) {
        self.responses
            .lock()
            .expect("scripted judge lock poisoned")
            .push_back(Ok(payload));
    }

    /// Queues an error response.
    pub fn push_error(&self, error: JudgeError) {
        self.responses
            .lock()
            .expect("scripted judge lock poisoned")
            .push_back(Err(error));
    }

    /// Number of interpret calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Judge for ScriptedJudge {
    async fn interpret(&self, context: &TurnContext) -> Result<Value, JudgeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        debug!(input = %context.input_text, "Scripted judge serving response");
        self.responses
            .lock()
            .expect("scripted judge lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(JudgeError::malformed("scripted judge exhausted")))
    }
}

/// Builds a minimal well-formed verdict payload for tests.
pub fn passing_payload(canonical_name: &str, weight_g: u64) -> Value {
    json!({
        "canonical_name": canonical_name,
        "interpreted_meaning": canonical_name,
        "estimated_weight_g": weight_g,
        "is_real": true,
        "needs_clarification": false,
        "used_explicit_measure": false,
        "used_trick_phrasing": false,
        "rule_checks": {},
        "reason_short": "scripted",
        "notes": null,
        "ui_answer": null,
        "progression_actions": []
    })
}
