//! Generation history, keyed by caller session.

use sqlx::PgPool;

use crate::{
	Result,
	models::{HistoryEntry, NewHistoryEntry},
};

pub async fn insert(pool: &PgPool, entry: &NewHistoryEntry) -> Result<HistoryEntry> {
	let row = sqlx::query_as::<_, HistoryEntry>(
		"\
INSERT INTO generation_history (id, session_id, kind, input, output, platform, tone)
VALUES ($1, $2, $3, $4, $5, $6, $7)
RETURNING id, session_id, kind, input, output, platform, tone, created_at",
	)
	.bind(crate::new_id())
	.bind(entry.session_id.as_str())
	.bind(entry.kind.as_str())
	.bind(entry.input.as_str())
	.bind(entry.output.as_str())
	.bind(entry.platform.as_deref())
	.bind(entry.tone.as_deref())
	.fetch_one(pool)
	.await?;

	Ok(row)
}

/// Newest entries first.
pub async fn list_by_session(
	pool: &PgPool,
	session_id: &str,
	limit: i64,
) -> Result<Vec<HistoryEntry>> {
	let rows = sqlx::query_as::<_, HistoryEntry>(
		"\
SELECT id, session_id, kind, input, output, platform, tone, created_at
FROM generation_history
WHERE session_id = $1
ORDER BY created_at DESC, id DESC
LIMIT $2",
	)
	.bind(session_id)
	.bind(limit)
	.fetch_all(pool)
	.await?;

	Ok(rows)
}

pub async fn get(pool: &PgPool, session_id: &str, id: &str) -> Result<Option<HistoryEntry>> {
	let row = sqlx::query_as::<_, HistoryEntry>(
		"\
SELECT id, session_id, kind, input, output, platform, tone, created_at
FROM generation_history
WHERE session_id = $1 AND id = $2",
	)
	.bind(session_id)
	.bind(id)
	.fetch_optional(pool)
	.await?;

	Ok(row)
}

/// Returns whether an entry was removed.
pub async fn delete(pool: &PgPool, session_id: &str, id: &str) -> Result<bool> {
	let result = sqlx::query("DELETE FROM generation_history WHERE session_id = $1 AND id = $2")
		.bind(session_id)
		.bind(id)
		.execute(pool)
		.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn clear_session(pool: &PgPool, session_id: &str) -> Result<u64> {
	let result = sqlx::query("DELETE FROM generation_history WHERE session_id = $1")
		.bind(session_id)
		.execute(pool)
		.await?;

	Ok(result.rows_affected())
}
