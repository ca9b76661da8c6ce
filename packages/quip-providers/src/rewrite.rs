//! OpenAI-compatible chat completions client for caption rewriting and generation.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
	pub role: &'static str,
	pub content: String,
}
impl ChatMessage {
	pub fn system(content: impl Into<String>) -> Self {
		Self { role: "system", content: content.into() }
	}

	pub fn user(content: impl Into<String>) -> Self {
		Self { role: "user", content: content.into() }
	}
}

/// Sends one completion request and returns the trimmed text of the first choice.
pub async fn complete(
	cfg: &quip_config::LlmProviderConfig,
	messages: &[ChatMessage],
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base.trim_end_matches('/'), cfg.path);
	let body = request_body(cfg, messages);
	let res = client
		.post(&url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_completion_text(&json)
}

fn request_body(cfg: &quip_config::LlmProviderConfig, messages: &[ChatMessage]) -> Value {
	serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": messages,
	})
}

fn parse_completion_text(json: &Value) -> Result<String> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Completion response is missing choices[0].message.content.".to_string(),
		})?;
	let text = content.trim();

	if text.is_empty() {
		return Err(Error::InvalidResponse {
			message: "Completion response content is empty.".to_string(),
		});
	}

	Ok(text.to_string())
}

#[cfg(test)]
mod tests {
	use serde_json::Map;

	use super::*;

	fn cfg() -> quip_config::LlmProviderConfig {
		quip_config::LlmProviderConfig {
			provider_id: "test".to_string(),
			api_base: "http://127.0.0.1:1".to_string(),
			api_key: "key".to_string(),
			path: "/v1/chat/completions".to_string(),
			model: "m".to_string(),
			temperature: 0.5,
			timeout_ms: 1_000,
			default_headers: Map::new(),
		}
	}

	#[test]
	fn parses_and_trims_first_choice() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "  Sun's out, fun's out.\n" } },
				{ "message": { "content": "ignored" } }
			]
		});

		assert_eq!(parse_completion_text(&json).expect("parse failed"), "Sun's out, fun's out.");
	}

	#[test]
	fn rejects_missing_or_blank_content() {
		let missing = serde_json::json!({ "choices": [] });
		let blank = serde_json::json!({ "choices": [{ "message": { "content": "   " } }] });

		assert!(matches!(parse_completion_text(&missing), Err(Error::InvalidResponse { .. })));
		assert!(matches!(parse_completion_text(&blank), Err(Error::InvalidResponse { .. })));
	}

	#[test]
	fn request_body_carries_model_and_messages() {
		let body = request_body(&cfg(), &[ChatMessage::system("be brief"), ChatMessage::user("hi")]);

		assert_eq!(body["model"], "m");
		assert_eq!(body["messages"][0]["role"], "system");
		assert_eq!(body["messages"][1]["content"], "hi");
	}
}
