use time::OffsetDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Caption {
	pub id: String,
	pub content: String,
	pub formatted_content: Option<String>,
	pub platform: String,
	pub category_id: Option<String>,
	pub mood_id: Option<String>,
	pub character_count: i32,
	pub copy_count: i64,
	pub view_count: i64,
	pub is_active: bool,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
	pub id: String,
	pub name: String,
	pub display_name: String,
	pub slug: String,
	pub icon: Option<String>,
	pub is_active: bool,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Mood {
	pub id: String,
	pub name: String,
	pub display_name: String,
	pub slug: String,
	pub icon: Option<String>,
	pub is_active: bool,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HistoryEntry {
	pub id: String,
	pub session_id: String,
	pub kind: String,
	pub input: String,
	pub output: String,
	pub platform: Option<String>,
	pub tone: Option<String>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug)]
pub struct NewCaption {
	pub content: String,
	pub formatted_content: Option<String>,
	pub platform: String,
	pub category_id: Option<String>,
	pub mood_id: Option<String>,
	/// Backdates the record; `None` uses the database clock.
	pub created_at: Option<OffsetDateTime>,
}

/// Insert payload shared by categories and moods.
#[derive(Debug)]
pub struct NewTaxonomyEntry {
	pub name: String,
	pub display_name: String,
	pub slug: String,
	pub icon: Option<String>,
}

#[derive(Debug)]
pub struct NewHistoryEntry {
	pub session_id: String,
	pub kind: String,
	pub input: String,
	pub output: String,
	pub platform: Option<String>,
	pub tone: Option<String>,
}
