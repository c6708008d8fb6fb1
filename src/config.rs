//! Game and judge configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// LLM provider selection for the judging collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgeProvider {
    /// OpenAI (GPT models).
    OpenAI,
    /// Anthropic (Claude models).
    Anthropic,
}

/// Tuning knobs for one game session.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Wall-clock countdown for the whole run, in seconds.
    #[serde(default = "default_timer_seconds")]
    timer_seconds: u64,

    /// Lives at session start.
    #[serde(default = "default_start_lives")]
    start_lives: u32,

    /// Lower weight bound at session start, in grams.
    #[serde(default = "default_start_min_weight_g")]
    start_min_weight_g: u64,

    /// Upper weight bound at session start, in grams.
    #[serde(default = "default_start_max_weight_g")]
    start_max_weight_g: u64,

    /// Maximum simultaneously active rules.
    #[serde(default = "default_max_rules")]
    max_rules: usize,

    /// Earliest turn on which an add-rule action may apply.
    #[serde(default = "default_rule_add_min_turn")]
    rule_add_min_turn: u64,

    /// Factor applied to the upper bound by a shrink-max action.
    #[serde(default = "default_max_shrink_factor")]
    max_shrink_factor: f64,

    /// Factor applied to the lower bound by a raise-min action.
    #[serde(default = "default_minimum_enlarge_factor")]
    minimum_enlarge_factor: f64,

    /// Maximum progression actions applied per turn.
    #[serde(default = "default_max_progression_actions")]
    max_progression_actions: usize,

    /// Typed command that ends the run (trimmed, case-insensitive match).
    #[serde(default = "default_end_command")]
    end_command: String,

    /// Minimum seconds between entering evaluation and emitting a verdict.
    #[serde(default = "default_evaluation_min_seconds")]
    evaluation_min_seconds: f64,

    /// Judging collaborator settings.
    #[serde(default)]
    judge: JudgeSettings,
}

/// Settings for the LLM judging collaborator.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct JudgeSettings {
    /// Provider (openai or anthropic).
    #[serde(default = "default_provider")]
    provider: JudgeProvider,

    /// Model name (e.g. "gpt-4o-mini", "claude-3-5-haiku-20241022").
    #[serde(default = "default_model")]
    model: String,

    /// Maximum tokens for judge responses.
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
}

fn default_timer_seconds() -> u64 {
    60
}

fn default_start_lives() -> u32 {
    3
}

fn default_start_min_weight_g() -> u64 {
    1
}

fn default_start_max_weight_g() -> u64 {
    10_000_000
}

fn default_max_rules() -> usize {
    3
}

fn default_rule_add_min_turn() -> u64 {
    3
}

fn default_max_shrink_factor() -> f64 {
    0.2
}

fn default_minimum_enlarge_factor() -> f64 {
    5.0
}

fn default_max_progression_actions() -> usize {
    2
}

fn default_end_command() -> String {
    "time".to_string()
}

fn default_evaluation_min_seconds() -> f64 {
    3.0
}

fn default_provider() -> JudgeProvider {
    JudgeProvider::OpenAI
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    1800
}

impl Default for JudgeSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            timer_seconds: default_timer_seconds(),
            start_lives: default_start_lives(),
            start_min_weight_g: default_start_min_weight_g(),
            start_max_weight_g: default_start_max_weight_g(),
            max_rules: default_max_rules(),
            rule_add_min_turn: default_rule_add_min_turn(),
            max_shrink_factor: default_max_shrink_factor(),
            minimum_enlarge_factor: default_minimum_enlarge_factor(),
            max_progression_actions: default_max_progression_actions(),
            end_command: default_end_command(),
            evaluation_min_seconds: default_evaluation_min_seconds(),
            judge: JudgeSettings::default(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        if config.start_min_weight_g >= config.start_max_weight_g {
            return Err(ConfigError::new(format!(
                "start_min_weight_g ({}) must be below start_max_weight_g ({})",
                config.start_min_weight_g, config.start_max_weight_g
            )));
        }

        info!(model = %config.judge.model, "Config loaded successfully");
        Ok(config)
    }

    /// Override for fast tests: no pacing delay between evaluation and verdict.
    pub fn without_pacing_floor(mut self) -> Self {
        self.evaluation_min_seconds = 0.0;
        self
    }
}

impl JudgeSettings {
    /// Creates settings for a specific provider and model.
    pub fn new(provider: JudgeProvider, model: String, max_tokens: u32) -> Self {
        Self {
            provider,
            model,
            max_tokens,
        }
    }

    /// Reads the API key for the configured provider from the environment.
    /// Requires `OPENAI_API_KEY` or `ANTHROPIC_API_KEY`.
    #[instrument(skip(self), fields(provider = ?self.provider, model = %self.model))]
    pub fn api_key(&self) -> Result<String, ConfigError> {
        match self.provider {
            JudgeProvider::OpenAI => std::env::var("OPENAI_API_KEY").map_err(|_| {
                ConfigError::new("OPENAI_API_KEY environment variable not set".to_string())
            }),
            JudgeProvider::Anthropic => std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
                ConfigError::new("ANTHROPIC_API_KEY environment variable not set".to_string())
            }),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
