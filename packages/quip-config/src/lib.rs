mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Captions, Config, LlmProviderConfig, Postgres, Providers, Rewrite, Security, Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("service.admin_bind", &cfg.service.admin_bind),
		("storage.postgres.dsn", &cfg.storage.postgres.dsn),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.captions.short_max_chars == 0 {
		return Err(Error::Validation {
			message: "captions.short_max_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.captions.medium_max_chars <= cfg.captions.short_max_chars {
		return Err(Error::Validation {
			message: "captions.medium_max_chars must be greater than captions.short_max_chars."
				.to_string(),
		});
	}
	if cfg.captions.medium_max_chars > i32::MAX as u32 {
		return Err(Error::Validation {
			message: format!("captions.medium_max_chars must be at most {}.", i32::MAX),
		});
	}
	if cfg.captions.view_queue_capacity == 0 {
		return Err(Error::Validation {
			message: "captions.view_queue_capacity must be greater than zero.".to_string(),
		});
	}

	let rewrite = &cfg.providers.rewrite;

	if rewrite.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "Provider rewrite api_key must be non-empty.".to_string(),
		});
	}
	if !rewrite.temperature.is_finite() {
		return Err(Error::Validation {
			message: "providers.rewrite.temperature must be a finite number.".to_string(),
		});
	}
	if !(0.0..=2.0).contains(&rewrite.temperature) {
		return Err(Error::Validation {
			message: "providers.rewrite.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}
	if cfg.rewrite.max_input_chars == 0 {
		return Err(Error::Validation {
			message: "rewrite.max_input_chars must be greater than zero.".to_string(),
		});
	}
	if !(1..=100).contains(&cfg.rewrite.history_page_limit) {
		return Err(Error::Validation {
			message: "rewrite.history_page_limit must be in the range 1-100.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg
		.security
		.admin_auth_token
		.as_deref()
		.map(|token| token.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.security.admin_auth_token = None;
	}
}
