use serde::Serialize;
use time::OffsetDateTime;

use quip_domain::Platform;
use quip_storage::{
	models::{Category, Mood},
	taxonomy,
};

use crate::{QuipService, Result};

/// Category or mood as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct TaxonomyItem {
	pub id: String,
	pub name: String,
	pub display_name: String,
	pub slug: String,
	pub icon: Option<String>,
	pub is_active: bool,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}
impl From<Category> for TaxonomyItem {
	fn from(row: Category) -> Self {
		Self {
			id: row.id,
			name: row.name,
			display_name: row.display_name,
			slug: row.slug,
			icon: row.icon,
			is_active: row.is_active,
			created_at: row.created_at,
		}
	}
}
impl From<Mood> for TaxonomyItem {
	fn from(row: Mood) -> Self {
		Self {
			id: row.id,
			name: row.name,
			display_name: row.display_name,
			slug: row.slug,
			icon: row.icon,
			is_active: row.is_active,
			created_at: row.created_at,
		}
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxonomyList {
	pub items: Vec<TaxonomyItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformItem {
	pub id: Platform,
	pub display_name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformList {
	pub items: Vec<PlatformItem>,
}

impl QuipService {
	pub async fn list_categories(&self) -> Result<TaxonomyList> {
		let rows = taxonomy::list_categories(&self.db.pool).await?;

		Ok(TaxonomyList { items: rows.into_iter().map(TaxonomyItem::from).collect() })
	}

	pub async fn list_moods(&self) -> Result<TaxonomyList> {
		let rows = taxonomy::list_moods(&self.db.pool).await?;

		Ok(TaxonomyList { items: rows.into_iter().map(TaxonomyItem::from).collect() })
	}

	pub fn list_platforms(&self) -> PlatformList {
		platform_list()
	}
}

fn platform_list() -> PlatformList {
	let items = Platform::ALL
		.iter()
		.map(|platform| PlatformItem { id: *platform, display_name: platform.display_name() })
		.collect();

	PlatformList { items }
}
