use serde::Serialize;
use time::OffsetDateTime;

use quip_domain::{LengthBuckets, LengthType};
use quip_storage::models::Caption;

use crate::{Error, QuipService, Result};

#[derive(Debug, Clone, Serialize)]
pub struct CaptionItem {
	pub id: String,
	pub content: String,
	pub formatted_content: Option<String>,
	pub platform: String,
	pub category_id: Option<String>,
	pub mood_id: Option<String>,
	pub character_count: i32,
	pub length_type: LengthType,
	pub copy_count: i64,
	pub view_count: i64,
	pub is_active: bool,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}
impl CaptionItem {
	pub(crate) fn from_row(row: Caption, buckets: LengthBuckets) -> Self {
		Self {
			length_type: LengthType::classify(row.character_count, buckets),
			id: row.id,
			content: row.content,
			formatted_content: row.formatted_content,
			platform: row.platform,
			category_id: row.category_id,
			mood_id: row.mood_id,
			character_count: row.character_count,
			copy_count: row.copy_count,
			view_count: row.view_count,
			is_active: row.is_active,
			created_at: row.created_at,
		}
	}
}

impl QuipService {
	/// Direct lookup by id. Inactive captions are returned so admins can preview them.
	///
	/// A view increment is queued as a side effect and never affects the response.
	pub async fn get_caption(&self, id: &str) -> Result<CaptionItem> {
		let id = id.trim();

		if id.is_empty() {
			return Err(Error::invalid("id is required."));
		}

		let Some(row) = quip_storage::captions::get_by_id(&self.db.pool, id).await? else {
			return Err(Error::not_found(format!("Caption {id} does not exist.")));
		};

		self.views.record(&row.id);

		Ok(CaptionItem::from_row(row, self.buckets()))
	}
}
