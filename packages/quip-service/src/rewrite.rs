//! Caption rewriting and generation through the text-transform backend.

use serde::{Deserialize, Serialize};

use quip_domain::Platform;
use quip_providers::rewrite::ChatMessage;
use quip_storage::models::NewHistoryEntry;

use crate::{Error, QuipService, Result, history::validate_session_id, non_blank};

const SYSTEM_PROMPT: &str = "You write short social media captions. Reply with the caption \
text only, without quotes, labels, or commentary.";

#[derive(Debug, Clone, Deserialize)]
pub struct RewriteRequest {
	pub content: String,
	#[serde(default)]
	pub platform: Option<String>,
	#[serde(default)]
	pub tone: Option<String>,
	#[serde(default)]
	pub instruction: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
	pub topic: String,
	pub platform: String,
	#[serde(default)]
	pub mood: Option<String>,
	#[serde(default)]
	pub tone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RewriteResponse {
	/// History entry id, or `null` when the entry could not be stored.
	pub id: Option<String>,
	pub output: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GenerationKind {
	Rewrite,
	Generate,
}
impl GenerationKind {
	fn as_str(self) -> &'static str {
		match self {
			Self::Rewrite => "rewrite",
			Self::Generate => "generate",
		}
	}
}

impl QuipService {
	pub async fn rewrite(&self, session_id: &str, req: RewriteRequest) -> Result<RewriteResponse> {
		let session_id = validate_session_id(session_id)?;
		let content = self.bounded_input("content", &req.content)?;
		let platform = non_blank(req.platform.as_deref()).map(strict_platform).transpose()?;
		let tone = non_blank(req.tone.as_deref());
		let instruction = non_blank(req.instruction.as_deref());
		let messages = rewrite_messages(content, platform, tone, instruction);
		let output = self.providers.rewrite.complete(&self.cfg.providers.rewrite, &messages).await?;
		let output = checked_output(&output)?;
		let id = self
			.record_history(NewHistoryEntry {
				session_id: session_id.to_string(),
				kind: GenerationKind::Rewrite.as_str().to_string(),
				input: content.to_string(),
				output: output.clone(),
				platform: platform.map(|platform| platform.as_str().to_string()),
				tone: tone.map(str::to_string),
			})
			.await;

		Ok(RewriteResponse { id, output })
	}

	pub async fn generate(&self, session_id: &str, req: GenerateRequest) -> Result<RewriteResponse> {
		let session_id = validate_session_id(session_id)?;
		let topic = self.bounded_input("topic", &req.topic)?;
		let platform = strict_platform(&req.platform)?;
		let mood = non_blank(req.mood.as_deref());
		let tone = non_blank(req.tone.as_deref());
		let messages = generate_messages(topic, platform, mood, tone);
		let output = self.providers.rewrite.complete(&self.cfg.providers.rewrite, &messages).await?;
		let output = checked_output(&output)?;
		let id = self
			.record_history(NewHistoryEntry {
				session_id: session_id.to_string(),
				kind: GenerationKind::Generate.as_str().to_string(),
				input: topic.to_string(),
				output: output.clone(),
				platform: Some(platform.as_str().to_string()),
				tone: tone.map(str::to_string),
			})
			.await;

		Ok(RewriteResponse { id, output })
	}

	fn bounded_input<'a>(&self, field: &str, raw: &'a str) -> Result<&'a str> {
		let value = raw.trim();
		let max = self.cfg.rewrite.max_input_chars as usize;

		if value.is_empty() {
			return Err(Error::invalid(format!("{field} is required.")));
		}
		if value.chars().count() > max {
			return Err(Error::invalid(format!("{field} must be at most {max} characters.")));
		}

		Ok(value)
	}
}

fn strict_platform(raw: &str) -> Result<Platform> {
	Ok(raw.parse::<Platform>()?)
}

fn checked_output(raw: &str) -> Result<String> {
	let output = raw.trim();

	if output.is_empty() {
		return Err(Error::Provider { message: "Rewrite backend returned empty text.".to_string() });
	}

	Ok(output.to_string())
}

fn rewrite_messages(
	content: &str,
	platform: Option<Platform>,
	tone: Option<&str>,
	instruction: Option<&str>,
) -> Vec<ChatMessage> {
	let mut prompt = String::from("Rewrite this caption.");

	if let Some(platform) = platform {
		prompt.push_str(&format!("\nPlatform: {}", platform.display_name()));
	}
	if let Some(tone) = tone {
		prompt.push_str(&format!("\nTone: {tone}"));
	}
	if let Some(instruction) = instruction {
		prompt.push_str(&format!("\nInstruction: {instruction}"));
	}

	prompt.push_str(&format!("\nCaption:\n{content}"));

	vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)]
}

fn generate_messages(
	topic: &str,
	platform: Platform,
	mood: Option<&str>,
	tone: Option<&str>,
) -> Vec<ChatMessage> {
	let mut prompt = format!("Write one caption.\nPlatform: {}", platform.display_name());

	if let Some(mood) = mood {
		prompt.push_str(&format!("\nMood: {mood}"));
	}
	if let Some(tone) = tone {
		prompt.push_str(&format!("\nTone: {tone}"));
	}

	prompt.push_str(&format!("\nTopic: {topic}"));

	vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rewrite_prompt_includes_only_given_hints() {
		let messages = rewrite_messages("Sun's out", Some(Platform::Tiktok), None, Some("shorter"));

		assert_eq!(messages.len(), 2);
		assert_eq!(messages[0].role, "system");
		assert_eq!(
			messages[1].content,
			"Rewrite this caption.\nPlatform: TikTok\nInstruction: shorter\nCaption:\nSun's out"
		);
	}

	#[test]
	fn generate_prompt_ends_with_topic() {
		let messages = generate_messages("coffee", Platform::Instagram, Some("cozy"), Some("warm"));

		assert_eq!(
			messages[1].content,
			"Write one caption.\nPlatform: Instagram\nMood: cozy\nTone: warm\nTopic: coffee"
		);
	}

	#[test]
	fn platform_is_strict_here() {
		assert_eq!(strict_platform(" LinkedIn ").expect("rejected"), Platform::Linkedin);
		assert!(matches!(strict_platform("myspace"), Err(Error::InvalidRequest { .. })));
	}

	#[test]
	fn blank_output_is_a_provider_error() {
		assert_eq!(checked_output("  done \n").expect("rejected"), "done");
		assert!(matches!(checked_output(" \n "), Err(Error::Provider { .. })));
	}
}
