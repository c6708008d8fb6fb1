//! Live connectivity tests for the LLM judge. Ignored unless built with
//! the `api` feature and the matching API key in the environment.

use bribe_the_scale::config::{GameConfig, JudgeProvider, JudgeSettings};
use bribe_the_scale::judge::{Judge, LlmJudge};
use bribe_the_scale::verdict::{JudgeVerdict, TurnContext};
use tracing::instrument;

fn context(config: &GameConfig) -> TurnContext {
    TurnContext::new("a cast iron skillet", 1, 1, 10_000_000, &[], Vec::new(), config)
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_openai_judge_returns_valid_verdict() {
    dotenvy::dotenv().ok();

    let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set");
    let settings = JudgeSettings::new(JudgeProvider::OpenAI, "gpt-4o-mini".to_string(), 1800);
    let judge = LlmJudge::new(settings, api_key);

    let config = GameConfig::default();
    let payload = judge
        .interpret(&context(&config))
        .await
        .expect("Judge call failed");

    let verdict = JudgeVerdict::from_payload(&payload, "a cast iron skillet", &config)
        .expect("Payload failed schema validation");
    assert!(verdict.estimated_weight_g >= 1);
    eprintln!("Verdict: {} at {} g", verdict.canonical_name, verdict.estimated_weight_g);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_anthropic_judge_returns_valid_verdict() {
    dotenvy::dotenv().ok();

    let api_key = std::env::var("ANTHROPIC_API_KEY").expect("ANTHROPIC_API_KEY not set");
    let settings = JudgeSettings::new(
        JudgeProvider::Anthropic,
        "claude-3-5-haiku-20241022".to_string(),
        1800,
    );
    let judge = LlmJudge::new(settings, api_key);

    let config = GameConfig::default();
    let payload = judge
        .interpret(&context(&config))
        .await
        .expect("Judge call failed");

    let verdict = JudgeVerdict::from_payload(&payload, "a cast iron skillet", &config)
        .expect("Payload failed schema validation");
    assert!(verdict.estimated_weight_g >= 1);
    eprintln!("Verdict: {} at {} g", verdict.canonical_name, verdict.estimated_weight_g);
}
