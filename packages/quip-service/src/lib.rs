pub mod admin;
pub mod captions;
pub mod history;
pub mod list;
pub mod rewrite;
pub mod search;
pub mod stats;
pub mod taxonomy;
pub mod time_serde;
pub mod views;

mod error;

pub use admin::{CreateCaptionRequest, CreateTaxonomyRequest, SetActiveRequest};
pub use captions::CaptionItem;
pub use error::{Error, Result};
pub use history::{ClearHistoryResponse, DeleteHistoryResponse, HistoryItem, HistoryList};
pub use list::ListResponse;
pub use rewrite::{GenerateRequest, RewriteRequest, RewriteResponse};
pub use search::{SIDE_RESULT_LIMIT, SearchResponse};
pub use stats::{StatRequest, StatResponse};
pub use taxonomy::{PlatformItem, PlatformList, TaxonomyItem, TaxonomyList};
pub use views::ViewRecorder;

use std::{future::Future, pin::Pin, sync::Arc};

use quip_config::{Config, LlmProviderConfig};
use quip_domain::LengthBuckets;
use quip_providers::rewrite::ChatMessage;
use quip_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Opaque text-transform backend used by rewrite and generate.
pub trait RewriteProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [ChatMessage],
	) -> BoxFuture<'a, Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub rewrite: Arc<dyn RewriteProvider>,
}
impl Providers {
	pub fn new(rewrite: Arc<dyn RewriteProvider>) -> Self {
		Self { rewrite }
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self { rewrite: Arc::new(DefaultProviders) }
	}
}

pub struct QuipService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
	pub views: ViewRecorder,
}
impl QuipService {
	/// Must be called inside a Tokio runtime; the view recorder spawns its drain task here.
	pub fn new(cfg: Config, db: Db) -> Self {
		Self::with_providers(cfg, db, Providers::default())
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		let views = ViewRecorder::spawn(db.pool.clone(), cfg.captions.view_queue_capacity);

		Self { cfg, db, providers, views }
	}

	pub(crate) fn buckets(&self) -> LengthBuckets {
		LengthBuckets::from(&self.cfg.captions)
	}
}

struct DefaultProviders;
impl RewriteProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [ChatMessage],
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok(quip_providers::rewrite::complete(cfg, messages).await?) })
	}
}

/// Trimmed value, or `None` when absent or blank.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|value| !value.is_empty())
}
