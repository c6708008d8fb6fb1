//! Tests for configuration defaults and TOML loading.

use bribe_the_scale::config::{GameConfig, JudgeProvider};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = GameConfig::default();
    assert_eq!(*config.timer_seconds(), 60);
    assert_eq!(*config.start_lives(), 3);
    assert_eq!(*config.start_min_weight_g(), 1);
    assert_eq!(*config.start_max_weight_g(), 10_000_000);
    assert_eq!(*config.max_rules(), 3);
    assert_eq!(*config.rule_add_min_turn(), 3);
    assert_eq!(*config.max_progression_actions(), 2);
    assert_eq!(config.end_command(), "time");
    assert_eq!(*config.evaluation_min_seconds(), 3.0);
    assert_eq!(*config.judge().provider(), JudgeProvider::OpenAI);
    assert_eq!(config.judge().model(), "gpt-4o-mini");
}

#[test]
fn test_load_partial_toml_fills_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("game.toml");
    fs::write(
        &path,
        r#"start_lives = 5
start_max_weight_g = 50000

[judge]
provider = "anthropic"
model = "claude-3-5-haiku-20241022"
"#,
    )
    .expect("Failed to write TOML");

    let config = GameConfig::from_file(&path).expect("Load failed");
    assert_eq!(*config.start_lives(), 5);
    assert_eq!(*config.start_max_weight_g(), 50_000);
    // Unspecified knobs keep their defaults.
    assert_eq!(*config.timer_seconds(), 60);
    assert_eq!(*config.judge().provider(), JudgeProvider::Anthropic);
    assert_eq!(config.judge().model(), "claude-3-5-haiku-20241022");
}

#[test]
fn test_inverted_bounds_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("game.toml");
    fs::write(
        &path,
        "start_min_weight_g = 5000\nstart_max_weight_g = 100\n",
    )
    .expect("Failed to write TOML");

    let error = GameConfig::from_file(&path).expect_err("expected an error");
    assert!(error.to_string().contains("start_min_weight_g"));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let result = GameConfig::from_file(dir.path().join("absent.toml"));
    assert!(result.is_err());
}

#[test]
fn test_malformed_toml_is_an_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("game.toml");
    fs::write(&path, "start_lives = \"three\"").expect("Failed to write TOML");
    assert!(GameConfig::from_file(&path).is_err());
}
