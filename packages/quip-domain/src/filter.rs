//! Translates untyped query parameters into typed caption filters.
//!
//! Every rule here is lenient: unknown platforms, sorts, and length types are dropped or
//! defaulted, and out-of-range paging values are clamped, so read requests never fail on
//! parameter shape.

use std::{collections::HashMap, num::IntErrorKind};

use crate::{LengthType, Platform, SortMode};

pub const DEFAULT_LIMIT: i64 = 20;
pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 100;

const PLATFORM_KEYS: &[&str] = &["platform"];
const CATEGORY_KEYS: &[&str] = &["category", "category_id", "categoryId"];
const MOOD_KEYS: &[&str] = &["mood_ids", "moodIds", "moods"];
const LENGTH_KEYS: &[&str] = &["length_type", "lengthType", "length"];
const LIST_TERM_KEYS: &[&str] = &["search", "search_term", "searchTerm"];
const SEARCH_TERM_KEYS: &[&str] = &["q", "query"];
const SORT_KEYS: &[&str] = &["sort_by", "sortBy", "sort"];
const LIMIT_KEYS: &[&str] = &["limit"];
const OFFSET_KEYS: &[&str] = &["offset"];

pub type ParamBag = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
	pub limit: i64,
	pub offset: i64,
}
impl Page {
	pub fn from_raw(limit: Option<&str>, offset: Option<&str>) -> Self {
		let limit = limit
			.and_then(parse_saturating)
			.map(|value| value.clamp(MIN_LIMIT, MAX_LIMIT))
			.unwrap_or(DEFAULT_LIMIT);
		let offset = offset.and_then(parse_saturating).unwrap_or(0).max(0);

		Self { limit, offset }
	}
}
impl Default for Page {
	fn default() -> Self {
		Self { limit: DEFAULT_LIMIT, offset: 0 }
	}
}

/// Platform predicate. Listing only ever produces `Known`; the search path passes values
/// outside the enumeration through as `Raw`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformMatch {
	Known(Platform),
	Raw(String),
}
impl PlatformMatch {
	pub fn as_str(&self) -> &str {
		match self {
			Self::Known(platform) => platform.as_str(),
			Self::Raw(value) => value.as_str(),
		}
	}
}

/// Validated caption predicates plus ordering and paging.
///
/// The active-only predicate is not represented here because it is not optional; the store
/// appends it to every caption query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptionFilter {
	pub platform: Option<PlatformMatch>,
	/// Category id or slug.
	pub category: Option<String>,
	pub mood_ids: Vec<String>,
	pub length: Option<LengthType>,
	/// Case-insensitive substring matched against caption content.
	pub term: Option<String>,
	pub sort: SortMode,
	pub page: Page,
}
impl CaptionFilter {
	pub fn has_structural_filter(&self) -> bool {
		self.platform.is_some() || self.category.is_some() || !self.mood_ids.is_empty()
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
	/// Trimmed query term, echoed back in the result envelope.
	pub query: String,
	pub filter: CaptionFilter,
}
impl SearchQuery {
	/// A search with neither a term nor a structural filter resolves to an empty envelope
	/// without touching the store.
	pub fn is_unconstrained(&self) -> bool {
		self.query.is_empty() && !self.filter.has_structural_filter()
	}
}

pub fn listing_filter(params: &ParamBag) -> CaptionFilter {
	CaptionFilter {
		platform: param(params, PLATFORM_KEYS)
			.and_then(|raw| raw.parse::<Platform>().ok())
			.map(PlatformMatch::Known),
		category: param(params, CATEGORY_KEYS).map(str::to_string),
		mood_ids: param(params, MOOD_KEYS).map(split_ids).unwrap_or_default(),
		length: param(params, LENGTH_KEYS).and_then(LengthType::parse),
		term: param(params, LIST_TERM_KEYS).map(str::to_string),
		sort: SortMode::parse_lenient(param(params, SORT_KEYS)),
		page: Page::from_raw(param(params, LIMIT_KEYS), param(params, OFFSET_KEYS)),
	}
}

/// Builds a search query. Unlike listing, an absent sort ranks by `popular`; an unrecognized
/// sort still falls back to `newest`.
pub fn search_query(params: &ParamBag) -> SearchQuery {
	let query = param(params, SEARCH_TERM_KEYS).unwrap_or_default().to_string();
	let platform = param(params, PLATFORM_KEYS).map(|raw| match raw.parse::<Platform>() {
		Ok(platform) => PlatformMatch::Known(platform),
		Err(_) => PlatformMatch::Raw(raw.to_string()),
	});
	let filter = CaptionFilter {
		platform,
		category: param(params, CATEGORY_KEYS).map(str::to_string),
		mood_ids: param(params, MOOD_KEYS).map(split_ids).unwrap_or_default(),
		length: param(params, LENGTH_KEYS).and_then(LengthType::parse),
		term: (!query.is_empty()).then(|| query.clone()),
		sort: match param(params, SORT_KEYS) {
			Some(raw) => SortMode::parse_lenient(Some(raw)),
			None => SortMode::Popular,
		},
		page: Page::from_raw(param(params, LIMIT_KEYS), param(params, OFFSET_KEYS)),
	};

	SearchQuery { query, filter }
}

fn param<'a>(params: &'a ParamBag, keys: &[&str]) -> Option<&'a str> {
	keys.iter()
		.filter_map(|key| params.get(*key))
		.map(|value| value.trim())
		.find(|value| !value.is_empty())
}

/// Integers beyond `i64` saturate so out-of-range values still clamp instead of defaulting.
fn parse_saturating(raw: &str) -> Option<i64> {
	match raw.trim().parse::<i64>() {
		Ok(value) => Some(value),
		Err(err) => match err.kind() {
			IntErrorKind::PosOverflow => Some(i64::MAX),
			IntErrorKind::NegOverflow => Some(i64::MIN),
			_ => None,
		},
	}
}

fn split_ids(raw: &str) -> Vec<String> {
	let mut ids: Vec<String> = Vec::new();

	for token in raw.split(',').map(str::trim).filter(|token| !token.is_empty()) {
		if !ids.iter().any(|id| id == token) {
			ids.push(token.to_string());
		}
	}

	ids
}
