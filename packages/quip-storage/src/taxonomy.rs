//! Category and mood collections. Both share a shape and are queried the same way; slugs are
//! unique within each collection only.

use sqlx::{PgPool, postgres::PgRow};

use crate::{
	Error, Result,
	models::{Category, Mood, NewTaxonomyEntry},
};

const TAXONOMY_COLUMNS: &str = "id, name, display_name, slug, icon, is_active, created_at";

#[derive(Debug, Clone, Copy)]
enum Collection {
	Categories,
	Moods,
}
impl Collection {
	fn table(self) -> &'static str {
		match self {
			Self::Categories => "categories",
			Self::Moods => "moods",
		}
	}

	fn label(self) -> &'static str {
		match self {
			Self::Categories => "Category",
			Self::Moods => "Mood",
		}
	}
}

pub async fn search_categories(pool: &PgPool, term: &str, limit: i64) -> Result<Vec<Category>> {
	search(pool, Collection::Categories, term, limit).await
}

pub async fn search_moods(pool: &PgPool, term: &str, limit: i64) -> Result<Vec<Mood>> {
	search(pool, Collection::Moods, term, limit).await
}

pub async fn list_categories(pool: &PgPool) -> Result<Vec<Category>> {
	list_active(pool, Collection::Categories).await
}

pub async fn list_moods(pool: &PgPool) -> Result<Vec<Mood>> {
	list_active(pool, Collection::Moods).await
}

pub async fn insert_category(pool: &PgPool, entry: &NewTaxonomyEntry) -> Result<Category> {
	insert(pool, Collection::Categories, entry).await
}

pub async fn insert_mood(pool: &PgPool, entry: &NewTaxonomyEntry) -> Result<Mood> {
	insert(pool, Collection::Moods, entry).await
}

/// Active records whose internal or display name contains `term`, case-insensitively.
async fn search<T>(pool: &PgPool, collection: Collection, term: &str, limit: i64) -> Result<Vec<T>>
where
	T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
{
	let sql = format!(
		"\
SELECT {TAXONOMY_COLUMNS}
FROM {table}
WHERE is_active = TRUE
	AND (name ILIKE $1 ESCAPE '\\' OR display_name ILIKE $1 ESCAPE '\\')
ORDER BY display_name ASC, id ASC
LIMIT $2",
		table = collection.table(),
	);
	let rows = sqlx::query_as::<_, T>(&sql)
		.bind(crate::contains_pattern(term))
		.bind(limit)
		.fetch_all(pool)
		.await?;

	Ok(rows)
}

async fn list_active<T>(pool: &PgPool, collection: Collection) -> Result<Vec<T>>
where
	T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
{
	let sql = format!(
		"SELECT {TAXONOMY_COLUMNS} FROM {table} WHERE is_active = TRUE ORDER BY display_name ASC, id ASC",
		table = collection.table(),
	);
	let rows = sqlx::query_as::<_, T>(&sql).fetch_all(pool).await?;

	Ok(rows)
}

async fn insert<T>(pool: &PgPool, collection: Collection, entry: &NewTaxonomyEntry) -> Result<T>
where
	T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
{
	let sql = format!(
		"\
INSERT INTO {table} (id, name, display_name, slug, icon)
VALUES ($1, $2, $3, $4, $5)
RETURNING {TAXONOMY_COLUMNS}",
		table = collection.table(),
	);
	let row = sqlx::query_as::<_, T>(&sql)
		.bind(crate::new_id())
		.bind(entry.name.as_str())
		.bind(entry.display_name.as_str())
		.bind(entry.slug.as_str())
		.bind(entry.icon.as_deref())
		.fetch_one(pool)
		.await
		.map_err(|err| Error::from_write(err, collection.label()))?;

	Ok(row)
}
