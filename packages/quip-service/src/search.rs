//! Cross-entity search.
//!
//! The caption sub-query is essential and its failure fails the call. Category and mood
//! matches are auxiliary: they only run for a non-empty term, and a failure degrades to an
//! empty list.

use serde::Serialize;

use quip_domain::ParamBag;
use quip_storage::taxonomy;

use crate::{CaptionItem, QuipService, Result, TaxonomyItem, list::CaptionPage};

/// Upper bound on category and mood matches in one envelope.
pub const SIDE_RESULT_LIMIT: i64 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
	pub captions: Vec<CaptionItem>,
	pub categories: Vec<TaxonomyItem>,
	pub moods: Vec<TaxonomyItem>,
	pub total: i64,
	pub query: String,
}
impl SearchResponse {
	pub fn empty(query: String) -> Self {
		Self { captions: Vec::new(), categories: Vec::new(), moods: Vec::new(), total: 0, query }
	}
}

type SideResult<T> = Option<quip_storage::Result<Vec<T>>>;

impl QuipService {
	pub async fn search(&self, params: &ParamBag) -> Result<SearchResponse> {
		let search = quip_domain::search_query(params);

		if search.is_unconstrained() {
			return Ok(SearchResponse::empty(search.query));
		}

		let pool = &self.db.pool;
		let term = search.query.as_str();
		let with_side = !term.is_empty();
		let (captions, categories, moods) = tokio::join!(
			self.query_captions(&search.filter),
			async {
				if with_side {
					Some(taxonomy::search_categories(pool, term, SIDE_RESULT_LIMIT).await)
				} else {
					None
				}
			},
			async {
				if with_side {
					Some(taxonomy::search_moods(pool, term, SIDE_RESULT_LIMIT).await)
				} else {
					None
				}
			},
		);

		compose(search.query, captions, categories, moods)
	}
}

fn compose<C, M>(
	query: String,
	captions: Result<CaptionPage>,
	categories: SideResult<C>,
	moods: SideResult<M>,
) -> Result<SearchResponse>
where
	TaxonomyItem: From<C> + From<M>,
{
	let page = captions?;

	Ok(SearchResponse {
		captions: page.items,
		categories: side_items("categories", categories),
		moods: side_items("moods", moods),
		total: page.total,
		query,
	})
}

fn side_items<T>(collection: &'static str, result: SideResult<T>) -> Vec<TaxonomyItem>
where
	TaxonomyItem: From<T>,
{
	match result {
		None => Vec::new(),
		Some(Ok(rows)) =>
			rows.into_iter().take(SIDE_RESULT_LIMIT as usize).map(TaxonomyItem::from).collect(),
		Some(Err(err)) => {
			tracing::warn!(error = %err, collection, "Auxiliary search failed. Returning no matches.");

			Vec::new()
		},
	}
}

#[cfg(test)]
mod tests {
	use time::OffsetDateTime;

	use quip_storage::models::{Category, Mood};

	use super::*;
	use crate::Error;

	fn mood(id: &str, display_name: &str) -> Mood {
		Mood {
			id: id.to_string(),
			name: display_name.to_lowercase(),
			display_name: display_name.to_string(),
			slug: display_name.to_lowercase(),
			icon: None,
			is_active: true,
			created_at: OffsetDateTime::UNIX_EPOCH,
		}
	}

	fn page(total: i64) -> CaptionPage {
		CaptionPage { items: Vec::new(), total }
	}

	fn store_failure() -> quip_storage::Error {
		quip_storage::Error::Sqlx(sqlx::Error::PoolTimedOut)
	}

	#[test]
	fn side_failures_degrade_to_empty_lists() {
		let response = compose::<Category, Mood>(
			"happy".to_string(),
			Ok(page(3)),
			Some(Err(store_failure())),
			Some(Ok(vec![mood("m1", "Happy")])),
		)
		.expect("side failure must not fail the call");

		assert!(response.categories.is_empty());
		assert_eq!(response.moods.len(), 1);
		assert_eq!(response.moods[0].display_name, "Happy");
		assert_eq!(response.total, 3);
		assert_eq!(response.query, "happy");
	}

	#[test]
	fn caption_failure_fails_the_call() {
		let result = compose::<Category, Mood>(
			"happy".to_string(),
			Err(Error::Storage { message: "down".to_string() }),
			Some(Ok(Vec::new())),
			Some(Ok(Vec::new())),
		);

		assert!(matches!(result, Err(Error::Storage { .. })));
	}

	#[test]
	fn skipped_side_searches_yield_empty_lists() {
		let response = compose::<Category, Mood>("".to_string(), Ok(page(0)), None, None)
			.expect("compose failed");

		assert!(response.categories.is_empty());
		assert!(response.moods.is_empty());
	}

	#[test]
	fn side_results_are_bounded() {
		let moods = (0..15).map(|index| mood(&format!("m{index}"), "Happy")).collect();
		let response =
			compose::<Category, Mood>("happy".to_string(), Ok(page(0)), None, Some(Ok(moods)))
				.expect("compose failed");

		assert_eq!(response.moods.len(), SIDE_RESULT_LIMIT as usize);
	}

	#[test]
	fn empty_envelope_shape() {
		let json = serde_json::to_value(SearchResponse::empty(String::new()))
			.expect("serialize failed");

		assert_eq!(
			json,
			serde_json::json!({
				"captions": [],
				"categories": [],
				"moods": [],
				"total": 0,
				"query": "",
			})
		);
	}
}
