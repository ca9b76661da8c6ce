use serde::Serialize;

use quip_domain::{CaptionFilter, ParamBag};
use quip_storage::captions;

use crate::{CaptionItem, QuipService, Result};

#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
	pub items: Vec<CaptionItem>,
	pub total: i64,
	pub limit: i64,
	pub offset: i64,
}

/// One page of captions plus the match count for the same predicates.
pub(crate) struct CaptionPage {
	pub(crate) items: Vec<CaptionItem>,
	pub(crate) total: i64,
}

impl QuipService {
	pub async fn list_captions(&self, params: &ParamBag) -> Result<ListResponse> {
		let filter = quip_domain::listing_filter(params);
		let page = self.query_captions(&filter).await?;

		Ok(ListResponse {
			items: page.items,
			total: page.total,
			limit: filter.page.limit,
			offset: filter.page.offset,
		})
	}

	/// Runs the page and count queries concurrently. Both are built from the same filter, so
	/// they agree on predicates even though they may observe different snapshots.
	pub(crate) async fn query_captions(&self, filter: &CaptionFilter) -> Result<CaptionPage> {
		let buckets = self.buckets();
		let (rows, total) = tokio::try_join!(
			captions::fetch_page(&self.db.pool, filter, buckets),
			captions::count(&self.db.pool, filter, buckets),
		)?;
		let items = rows.into_iter().map(|row| CaptionItem::from_row(row, buckets)).collect();

		Ok(CaptionPage { items, total })
	}
}
