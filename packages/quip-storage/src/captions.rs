use sqlx::{PgPool, Postgres, QueryBuilder};

use quip_domain::{CaptionFilter, LengthBuckets, SortMode, StatAction};

use crate::{
	Error, Result,
	models::{Caption, NewCaption},
};

const CAPTION_COLUMNS: &str = "\
c.id, c.content, c.formatted_content, c.platform, c.category_id, c.mood_id, \
c.character_count, c.copy_count, c.view_count, c.is_active, c.created_at";

/// Page of active captions matching `filter`, ordered by its sort mode with `id` as the
/// tie-breaker.
pub async fn fetch_page(
	pool: &PgPool,
	filter: &CaptionFilter,
	buckets: LengthBuckets,
) -> Result<Vec<Caption>> {
	let mut builder = page_query(filter, buckets);
	let rows = builder.build_query_as::<Caption>().fetch_all(pool).await?;

	Ok(rows)
}

/// Number of active captions matching `filter`, ignoring its page.
pub async fn count(pool: &PgPool, filter: &CaptionFilter, buckets: LengthBuckets) -> Result<i64> {
	let mut builder = count_query(filter, buckets);
	let total = builder.build_query_scalar::<i64>().fetch_one(pool).await?;

	Ok(total)
}

pub fn page_query(filter: &CaptionFilter, buckets: LengthBuckets) -> QueryBuilder<'static, Postgres> {
	let mut builder = QueryBuilder::new(format!("SELECT {CAPTION_COLUMNS} FROM captions c"));

	push_predicates(&mut builder, filter, buckets);
	push_order(&mut builder, filter.sort);

	builder.push(" LIMIT ");
	builder.push_bind(filter.page.limit);
	builder.push(" OFFSET ");
	builder.push_bind(filter.page.offset);

	builder
}

pub fn count_query(filter: &CaptionFilter, buckets: LengthBuckets) -> QueryBuilder<'static, Postgres> {
	let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM captions c");

	push_predicates(&mut builder, filter, buckets);

	builder
}

/// Writes the WHERE clause shared by the page and count queries.
fn push_predicates(
	builder: &mut QueryBuilder<'static, Postgres>,
	filter: &CaptionFilter,
	buckets: LengthBuckets,
) {
	builder.push(" WHERE c.is_active = TRUE");

	if let Some(platform) = &filter.platform {
		builder.push(" AND c.platform = ");
		builder.push_bind(platform.as_str().to_string());
	}
	if let Some(category) = &filter.category {
		builder.push(" AND c.category_id IN (SELECT cat.id FROM categories cat WHERE cat.id = ");
		builder.push_bind(category.clone());
		builder.push(" OR cat.slug = ");
		builder.push_bind(category.clone());
		builder.push(")");
	}
	if !filter.mood_ids.is_empty() {
		builder.push(" AND c.mood_id = ANY(");
		builder.push_bind(filter.mood_ids.clone());
		builder.push(")");
	}
	if let Some(length) = filter.length {
		let range = length.range(buckets);

		if let Some(min) = range.min {
			builder.push(" AND c.character_count >= ");
			builder.push_bind(min);
		}
		if let Some(max) = range.max {
			builder.push(" AND c.character_count <= ");
			builder.push_bind(max);
		}
	}
	if let Some(term) = &filter.term {
		builder.push(" AND c.content ILIKE ");
		builder.push_bind(crate::contains_pattern(term));
		builder.push(" ESCAPE '\\'");
	}
}

fn push_order(builder: &mut QueryBuilder<'static, Postgres>, sort: SortMode) {
	let order = match sort {
		SortMode::Newest => " ORDER BY c.created_at DESC, c.id ASC",
		SortMode::Popular => " ORDER BY c.copy_count DESC, c.id ASC",
		SortMode::Shortest => " ORDER BY c.character_count ASC, c.id ASC",
		SortMode::Longest => " ORDER BY c.character_count DESC, c.id ASC",
	};

	builder.push(order);
}

/// Direct lookup. Inactive captions are returned too.
pub async fn get_by_id(pool: &PgPool, id: &str) -> Result<Option<Caption>> {
	let row = sqlx::query_as::<_, Caption>(&format!(
		"SELECT {CAPTION_COLUMNS} FROM captions c WHERE c.id = $1"
	))
	.bind(id)
	.fetch_optional(pool)
	.await?;

	Ok(row)
}

/// Adds one to the counter selected by `action` in a single statement and returns the new
/// value, or `None` when no caption has this id.
pub async fn increment(pool: &PgPool, id: &str, action: StatAction) -> Result<Option<i64>> {
	let sql = match action {
		StatAction::View =>
			"UPDATE captions SET view_count = view_count + 1 WHERE id = $1 RETURNING view_count",
		StatAction::Copy =>
			"UPDATE captions SET copy_count = copy_count + 1 WHERE id = $1 RETURNING copy_count",
	};
	let value = sqlx::query_scalar::<_, i64>(sql).bind(id).fetch_optional(pool).await?;

	Ok(value)
}

pub async fn increment_view(pool: &PgPool, id: &str) -> Result<Option<i64>> {
	increment(pool, id, StatAction::View).await
}

pub async fn increment_copy(pool: &PgPool, id: &str) -> Result<Option<i64>> {
	increment(pool, id, StatAction::Copy).await
}

pub async fn insert(pool: &PgPool, caption: &NewCaption) -> Result<Caption> {
	let character_count = quip_domain::character_count(&caption.content);
	let row = sqlx::query_as::<_, Caption>(
		"\
INSERT INTO captions AS c (
	id,
	content,
	formatted_content,
	platform,
	category_id,
	mood_id,
	character_count,
	created_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, now()))
RETURNING c.id, c.content, c.formatted_content, c.platform, c.category_id, c.mood_id, \
c.character_count, c.copy_count, c.view_count, c.is_active, c.created_at",
	)
	.bind(crate::new_id())
	.bind(caption.content.as_str())
	.bind(caption.formatted_content.as_deref())
	.bind(caption.platform.as_str())
	.bind(caption.category_id.as_deref())
	.bind(caption.mood_id.as_deref())
	.bind(character_count)
	.bind(caption.created_at)
	.fetch_one(pool)
	.await
	.map_err(|err| Error::from_write(err, "Caption"))?;

	Ok(row)
}

pub async fn set_active(pool: &PgPool, id: &str, active: bool) -> Result<Caption> {
	let row = sqlx::query_as::<_, Caption>(&format!(
		"UPDATE captions AS c SET is_active = $2 WHERE c.id = $1 RETURNING {CAPTION_COLUMNS}"
	))
	.bind(id)
	.bind(active)
	.fetch_optional(pool)
	.await?;

	row.ok_or_else(|| Error::NotFound(format!("Caption {id} does not exist.")))
}
