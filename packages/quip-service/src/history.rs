//! Generation history, scoped by the caller-supplied session id.

use serde::Serialize;
use time::OffsetDateTime;

use quip_storage::{
	history,
	models::{HistoryEntry, NewHistoryEntry},
};

use crate::{Error, QuipService, Result};

pub const MAX_SESSION_ID_CHARS: usize = 128;

#[derive(Debug, Clone, Serialize)]
pub struct HistoryItem {
	pub id: String,
	pub kind: String,
	pub input: String,
	pub output: String,
	pub platform: Option<String>,
	pub tone: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}
impl From<HistoryEntry> for HistoryItem {
	fn from(row: HistoryEntry) -> Self {
		Self {
			id: row.id,
			kind: row.kind,
			input: row.input,
			output: row.output,
			platform: row.platform,
			tone: row.tone,
			created_at: row.created_at,
		}
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryList {
	pub items: Vec<HistoryItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteHistoryResponse {
	pub id: String,
	pub deleted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClearHistoryResponse {
	pub removed: u64,
}

impl QuipService {
	pub async fn list_history(&self, session_id: &str) -> Result<HistoryList> {
		let session_id = validate_session_id(session_id)?;
		let limit = i64::from(self.cfg.rewrite.history_page_limit);
		let rows = history::list_by_session(&self.db.pool, session_id, limit).await?;

		Ok(HistoryList { items: rows.into_iter().map(HistoryItem::from).collect() })
	}

	pub async fn get_history(&self, session_id: &str, id: &str) -> Result<HistoryItem> {
		let session_id = validate_session_id(session_id)?;
		let id = id.trim();
		let Some(row) = history::get(&self.db.pool, session_id, id).await? else {
			return Err(Error::not_found(format!("History entry {id} does not exist.")));
		};

		Ok(row.into())
	}

	pub async fn delete_history(&self, session_id: &str, id: &str) -> Result<DeleteHistoryResponse> {
		let session_id = validate_session_id(session_id)?;
		let id = id.trim();

		if !history::delete(&self.db.pool, session_id, id).await? {
			return Err(Error::not_found(format!("History entry {id} does not exist.")));
		}

		Ok(DeleteHistoryResponse { id: id.to_string(), deleted: true })
	}

	pub async fn clear_history(&self, session_id: &str) -> Result<ClearHistoryResponse> {
		let session_id = validate_session_id(session_id)?;
		let removed = history::clear_session(&self.db.pool, session_id).await?;

		Ok(ClearHistoryResponse { removed })
	}

	/// Stores a finished generation. Failures are logged and yield `None` so the generated
	/// text still reaches the caller.
	pub(crate) async fn record_history(&self, entry: NewHistoryEntry) -> Option<String> {
		match history::insert(&self.db.pool, &entry).await {
			Ok(row) => Some(row.id),
			Err(err) => {
				tracing::warn!(
					error = %err,
					session_id = %entry.session_id,
					kind = %entry.kind,
					"Failed to record generation history."
				);

				None
			},
		}
	}
}

pub fn validate_session_id(raw: &str) -> Result<&str> {
	let session_id = raw.trim();

	if session_id.is_empty() {
		return Err(Error::invalid("Session id is required."));
	}
	if session_id.chars().count() > MAX_SESSION_ID_CHARS {
		return Err(Error::invalid(format!(
			"Session id must be at most {MAX_SESSION_ID_CHARS} characters."
		)));
	}

	Ok(session_id)
}
