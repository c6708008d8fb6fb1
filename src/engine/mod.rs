//! Deterministic turn resolution: session state, validation pipeline,
//! progression, scoring, and the turn state machine.

pub mod progression;
pub mod scoring;
pub mod session;
pub mod turn;
pub mod validate;

pub use session::{GameOverReason, GameSession, Phase, SessionSnapshot};
pub use turn::{SubmitOutcome, TurnError, TurnReport, TurnStateMachine};
pub use validate::{FailureReason, ValidationResult, validate};
