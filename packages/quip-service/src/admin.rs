//! Catalog writes reachable only through the admin listener.

use serde::Deserialize;

use quip_domain::Platform;
use quip_storage::{
	captions,
	models::{NewCaption, NewTaxonomyEntry},
	taxonomy,
};

use crate::{CaptionItem, Error, QuipService, Result, TaxonomyItem, non_blank};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaxonomyRequest {
	pub name: String,
	pub display_name: String,
	pub slug: String,
	#[serde(default)]
	pub icon: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCaptionRequest {
	pub content: String,
	#[serde(default)]
	pub formatted_content: Option<String>,
	pub platform: String,
	#[serde(default)]
	pub category_id: Option<String>,
	#[serde(default)]
	pub mood_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetActiveRequest {
	pub is_active: bool,
}

impl QuipService {
	pub async fn create_category(&self, req: CreateTaxonomyRequest) -> Result<TaxonomyItem> {
		let entry = taxonomy_entry(&req)?;
		let row = taxonomy::insert_category(&self.db.pool, &entry).await?;

		tracing::info!(category_id = %row.id, slug = %row.slug, "Category created.");

		Ok(row.into())
	}

	pub async fn create_mood(&self, req: CreateTaxonomyRequest) -> Result<TaxonomyItem> {
		let entry = taxonomy_entry(&req)?;
		let row = taxonomy::insert_mood(&self.db.pool, &entry).await?;

		tracing::info!(mood_id = %row.id, slug = %row.slug, "Mood created.");

		Ok(row.into())
	}

	pub async fn create_caption(&self, req: CreateCaptionRequest) -> Result<CaptionItem> {
		let content = required("content", &req.content)?;
		let platform = req.platform.parse::<Platform>()?;
		let caption = NewCaption {
			content,
			formatted_content: non_blank(req.formatted_content.as_deref()).map(str::to_string),
			platform: platform.as_str().to_string(),
			category_id: non_blank(req.category_id.as_deref()).map(str::to_string),
			mood_id: non_blank(req.mood_id.as_deref()).map(str::to_string),
			created_at: None,
		};
		let row = captions::insert(&self.db.pool, &caption).await?;

		tracing::info!(caption_id = %row.id, platform = %row.platform, "Caption created.");

		Ok(CaptionItem::from_row(row, self.buckets()))
	}

	pub async fn set_caption_active(&self, id: &str, req: SetActiveRequest) -> Result<CaptionItem> {
		let id = id.trim();

		if id.is_empty() {
			return Err(Error::invalid("id is required."));
		}

		let row = captions::set_active(&self.db.pool, id, req.is_active).await?;

		tracing::info!(caption_id = %row.id, is_active = row.is_active, "Caption visibility changed.");

		Ok(CaptionItem::from_row(row, self.buckets()))
	}
}

fn taxonomy_entry(req: &CreateTaxonomyRequest) -> Result<NewTaxonomyEntry> {
	let name = required("name", &req.name)?;
	let display_name = required("display_name", &req.display_name)?;
	let slug = required("slug", &req.slug)?;

	if !is_valid_slug(&slug) {
		return Err(Error::invalid("slug must be lowercase ASCII words joined by single hyphens."));
	}

	Ok(NewTaxonomyEntry {
		name,
		display_name,
		slug,
		icon: non_blank(req.icon.as_deref()).map(str::to_string),
	})
}

fn required(field: &str, value: &str) -> Result<String> {
	non_blank(Some(value))
		.map(str::to_string)
		.ok_or_else(|| Error::invalid(format!("{field} is required.")))
}

fn is_valid_slug(slug: &str) -> bool {
	!slug.starts_with('-')
		&& !slug.ends_with('-')
		&& !slug.contains("--")
		&& slug.chars().all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

#[cfg(test)]
mod tests {
	use super::*;

	fn req(name: &str, display_name: &str, slug: &str) -> CreateTaxonomyRequest {
		CreateTaxonomyRequest {
			name: name.to_string(),
			display_name: display_name.to_string(),
			slug: slug.to_string(),
			icon: Some("  ".to_string()),
		}
	}

	#[test]
	fn taxonomy_entry_trims_fields_and_drops_blank_icon() {
		let entry = taxonomy_entry(&req(" travel ", " Travel ", "travel-tips")).expect("rejected");

		assert_eq!(entry.name, "travel");
		assert_eq!(entry.display_name, "Travel");
		assert_eq!(entry.slug, "travel-tips");
		assert_eq!(entry.icon, None);
	}

	#[test]
	fn taxonomy_entry_requires_every_name() {
		let err = taxonomy_entry(&req("travel", "  ", "travel")).expect_err("accepted");

		assert!(matches!(err, Error::InvalidRequest { message } if message.contains("display_name")));
	}

	#[test]
	fn slugs_are_lowercase_and_hyphenated() {
		assert!(is_valid_slug("good-vibes-2"));
		assert!(!is_valid_slug("Good"));
		assert!(!is_valid_slug("good vibes"));
		assert!(!is_valid_slug("-good"));
		assert!(!is_valid_slug("good--vibes"));
	}
}
