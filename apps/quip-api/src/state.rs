use std::sync::Arc;

use quip_service::{Providers, QuipService};
use quip_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<QuipService>,
}
impl AppState {
	pub async fn new(config: quip_config::Config) -> color_eyre::Result<Self> {
		Self::with_providers(config, Providers::default()).await
	}

	pub async fn with_providers(
		config: quip_config::Config,
		providers: Providers,
	) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = QuipService::with_providers(config, db, providers);

		Ok(Self { service: Arc::new(service) })
	}

	/// Bearer token the admin router requires, if one is configured.
	pub fn admin_token(&self) -> Option<&str> {
		self.service.cfg.security.admin_auth_token.as_deref()
	}
}
