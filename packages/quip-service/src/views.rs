//! Best-effort view counting.
//!
//! Reads enqueue the caption id and return immediately. A single background task drains the
//! queue and applies each increment; a full queue or a failed increment only produces a warning.

use sqlx::PgPool;
use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};

#[derive(Clone)]
pub struct ViewRecorder {
	tx: Sender<String>,
}
impl ViewRecorder {
	pub fn spawn(pool: PgPool, capacity: usize) -> Self {
		let (tx, rx) = mpsc::channel(capacity.max(1));

		tokio::spawn(drain(pool, rx));

		Self { tx }
	}

	/// Queues one view increment. Returns `false` when the increment was dropped.
	pub fn record(&self, caption_id: &str) -> bool {
		match self.tx.try_send(caption_id.to_string()) {
			Ok(()) => true,
			Err(TrySendError::Full(caption_id)) => {
				tracing::warn!(%caption_id, "View queue is full. Dropping view increment.");

				false
			},
			Err(TrySendError::Closed(caption_id)) => {
				tracing::warn!(%caption_id, "View recorder has stopped. Dropping view increment.");

				false
			},
		}
	}
}

async fn drain(pool: PgPool, mut rx: Receiver<String>) {
	while let Some(caption_id) = rx.recv().await {
		match quip_storage::captions::increment_view(&pool, &caption_id).await {
			Ok(Some(_)) => {},
			Ok(None) => {
				tracing::warn!(%caption_id, "View increment skipped. Caption does not exist.");
			},
			Err(err) => {
				tracing::warn!(error = %err, %caption_id, "View increment failed.");
			},
		}
	}
}
