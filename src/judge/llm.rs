//! Production judge adapter over OpenAI and Anthropic chat APIs.

use super::{Judge, JudgeError};
use crate::catalog;
use crate::config::{JudgeProvider, JudgeSettings};
use crate::verdict::TurnContext;
use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info, instrument};

/// LLM-backed judging collaborator.
#[derive(Debug, Clone)]
pub struct LlmJudge {
    settings: JudgeSettings,
    api_key: String,
}

impl LlmJudge {
    /// Creates a judge for the configured provider.
    #[instrument(skip(settings, api_key), fields(provider = ?settings.provider(), model = %settings.model()))]
    pub fn new(settings: JudgeSettings, api_key: String) -> Self {
        info!("Creating LLM judge");
        Self { settings, api_key }
    }

    fn system_prompt() -> String {
        let rules = catalog::all_definitions()
            .into_iter()
            .map(|def| format!("- {}: {}", def.id, def.semantic))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "You are the judge for a weight-window guessing game. \
             Return ONE strict JSON object only, no markdown.\n\n\
             Rules:\n\
             - Interpret one user noun phrase.\n\
             - If no quantity is specified, assume quantity 1.\n\
             - Plural without count means one item.\n\
             - Estimate weight by common-person intuition in grams.\n\
             - Canonicalize to a stable canonical_name for no-repeat checks: \
             strip quantities and units, collapse minor adjectives, keep \
             meaningful subtype distinctions.\n\
             - Set used_explicit_measure=true for explicit measure phrases \
             (kg, g, lbs, ml, liters, and so on).\n\
             - Set used_trick_phrasing=true for self-referential or \
             exact-target trick phrasings.\n\
             - Set is_real=false for gibberish or logically paradoxical \
             objects. Fictional but physically coherent objects are real \
             enough.\n\
             - Unknown items should still get a best estimate.\n\
             - ui_answer should be a short playful roast, max 2 lines.\n\
             - Do NOT output a final pass/fail ruling.\n\
             - Evaluate each active rule independently and output rule_checks \
             with exactly one boolean per active rule id.\n\
             - progression_actions can include up to 2 actions, types: \
             hold | shrink_max | raise_min | add_rule.\n\
             - add_rule must name one rule id from this catalog:\n{rules}\n\n\
             Output JSON keys:\n\
             canonical_name: string\n\
             interpreted_meaning: string\n\
             estimated_weight_g: integer\n\
             is_real: boolean\n\
             needs_clarification: boolean\n\
             used_explicit_measure: boolean\n\
             used_trick_phrasing: boolean\n\
             rule_checks: object mapping rule id to boolean\n\
             reason_short: string\n\
             notes: string or null\n\
             ui_answer: string or null\n\
             progression_actions: array (max 2) of objects with keys:\n\
               type: one of hold|shrink_max|raise_min|add_rule\n\
               rule: rule id (required only for add_rule)\n"
        )
    }

    #[instrument(skip(self, system_prompt, user_message))]
    async fn generate_openai(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, JudgeError> {
        debug!("Creating OpenAI client");
        let client = OpenAIClient::with_config(
            OpenAIConfig::new().with_api_key(self.api_key.clone()),
        );

        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_prompt)
                    .build()
                    .map_err(|e| {
                        JudgeError::malformed(format!("Failed to build system message: {}", e))
                    })?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_message)
                    .build()
                    .map_err(|e| {
                        JudgeError::malformed(format!("Failed to build user message: {}", e))
                    })?,
            ),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.settings.model())
            .messages(messages)
            .max_tokens(*self.settings.max_tokens())
            .build()
            .map_err(|e| JudgeError::malformed(format!("Failed to build request: {}", e)))?;

        debug!("Sending request to OpenAI");
        let response = client.chat().create(request).await.map_err(|e| {
            error!(error = ?e, "OpenAI API error");
            JudgeError::transport(format!("OpenAI API error: {}", e))
        })?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                error!("No content in OpenAI response");
                JudgeError::malformed("No content in OpenAI response")
            })
    }

    #[instrument(skip(self, system_prompt, user_message))]
    async fn generate_anthropic(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, JudgeError> {
        debug!("Building Anthropic API request");
        let client = reqwest::Client::new();
        let request_body = serde_json::json!({
            "model": self.settings.model(),
            "max_tokens": self.settings.max_tokens(),
            "system": system_prompt,
            "messages": [
                {
                    "role": "user",
                    "content": user_message
                }
            ]
        });

        let response = client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", self.api_key.clone())
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Anthropic API request failed");
                JudgeError::transport(format!("Anthropic API request failed: {}", e))
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read Anthropic response");
            JudgeError::transport(format!("Failed to read response: {}", e))
        })?;

        if !status.is_success() {
            error!(status = %status, response = %response_text, "Anthropic API error");
            return Err(JudgeError::transport(format!(
                "Anthropic API error {}: {}",
                status, response_text
            )));
        }

        let response_json: Value = serde_json::from_str(&response_text).map_err(|e| {
            error!(error = ?e, "Failed to parse Anthropic response");
            JudgeError::malformed(format!("Failed to parse response: {}", e))
        })?;

        response_json["content"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                error!("No text content in Anthropic response");
                JudgeError::malformed("No text content in Anthropic response")
            })
    }
}

/// Extracts the outermost JSON object from model text.
///
/// Models occasionally wrap the object in prose or fences; anything without
/// a parseable object is malformed output, not a transport failure.
fn extract_json_object(text: &str) -> Result<Value, JudgeError> {
    let start = text
        .find('{')
        .ok_or_else(|| JudgeError::malformed("No JSON object found in model output"))?;
    let end = text
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or_else(|| JudgeError::malformed("No JSON object found in model output"))?;

    serde_json::from_str(&text[start..=end])
        .map_err(|e| JudgeError::malformed(format!("Invalid JSON from model: {}", e)))
}

#[async_trait]
impl Judge for LlmJudge {
    #[instrument(skip(self, context), fields(model = %self.settings.model(), turn = context.turn))]
    async fn interpret(&self, context: &TurnContext) -> Result<Value, JudgeError> {
        let system_prompt = Self::system_prompt();
        let user_message = serde_json::to_string(context)
            .map_err(|e| JudgeError::malformed(format!("Failed to encode turn context: {}", e)))?;

        debug!(input_preview = %truncate(&context.input_text, 120), "Requesting judgment");
        let text = match self.settings.provider() {
            JudgeProvider::OpenAI => self.generate_openai(&system_prompt, &user_message).await?,
            JudgeProvider::Anthropic => {
                self.generate_anthropic(&system_prompt, &user_message).await?
            }
        };

        let payload = extract_json_object(&text)?;
        info!(output_chars = text.len(), "Judge responded");
        Ok(payload)
    }
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_object() {
        let payload = extract_json_object(r#"{"estimated_weight_g": 500}"#).expect("rejected");
        assert_eq!(payload["estimated_weight_g"], 500);
    }

    #[test]
    fn test_extract_object_wrapped_in_prose_and_fences() {
        let text = "Here you go:\n```json\n{\"is_real\": true}\n```\nEnjoy.";
        let payload = extract_json_object(text).expect("rejected");
        assert_eq!(payload["is_real"], true);
    }

    #[test]
    fn test_no_object_is_malformed() {
        let error = extract_json_object("I cannot answer that.").expect_err("accepted");
        assert!(!error.is_transport());
    }

    #[test]
    fn test_unbalanced_braces_are_malformed() {
        assert!(extract_json_object("{\"a\": ").is_err());
        assert!(extract_json_object("} {").is_err());
    }

    #[test]
    fn test_system_prompt_names_every_catalog_rule() {
        let prompt = LlmJudge::system_prompt();
        for definition in catalog::all_definitions() {
            assert!(
                prompt.contains(&definition.id.to_string()),
                "prompt missing rule {}",
                definition.id
            );
        }
    }
}
