use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub captions: Captions,
	pub providers: Providers,
	#[serde(default)]
	pub rewrite: Rewrite,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Caption catalog tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Captions {
	/// Inclusive upper bound of the `short` length bucket, in characters.
	pub short_max_chars: u32,
	/// Inclusive upper bound of the `medium` length bucket, in characters.
	pub medium_max_chars: u32,
	/// Pending view increments held before new ones are dropped.
	pub view_queue_capacity: usize,
}
impl Default for Captions {
	fn default() -> Self {
		Self { short_max_chars: 100, medium_max_chars: 250, view_queue_capacity: 1_024 }
	}
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub rewrite: LlmProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Rewrite {
	pub max_input_chars: u32,
	pub history_page_limit: u32,
}
impl Default for Rewrite {
	fn default() -> Self {
		Self { max_input_chars: 2_200, history_page_limit: 50 }
	}
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	/// Optional. When set, admin requests must carry `Authorization: Bearer <token>`.
	pub admin_auth_token: Option<String>,
}
