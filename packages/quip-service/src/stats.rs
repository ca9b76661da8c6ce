use serde::{Deserialize, Serialize};

use quip_domain::StatAction;
use quip_storage::captions;

use crate::{Error, QuipService, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatRequest {
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub action: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatResponse {
	pub success: bool,
	pub id: String,
	pub action: StatAction,
	/// Counter value after the increment.
	pub count: i64,
}

impl QuipService {
	pub async fn record_stat(&self, req: StatRequest) -> Result<StatResponse> {
		let (id, action) = parse_stat_request(&req)?;
		let count = match action {
			StatAction::View => self.increment_view(id).await?,
			StatAction::Copy => self.increment_copy(id).await?,
		};

		Ok(StatResponse { success: true, id: id.to_string(), action, count })
	}

	pub async fn increment_view(&self, id: &str) -> Result<i64> {
		let value = captions::increment_view(&self.db.pool, id).await?;

		value.ok_or_else(|| Error::not_found(format!("Caption {id} does not exist.")))
	}

	pub async fn increment_copy(&self, id: &str) -> Result<i64> {
		let value = captions::increment_copy(&self.db.pool, id).await?;

		value.ok_or_else(|| Error::not_found(format!("Caption {id} does not exist.")))
	}
}

fn parse_stat_request(req: &StatRequest) -> Result<(&str, StatAction)> {
	let Some(id) = crate::non_blank(req.id.as_deref()) else {
		return Err(Error::invalid("id is required."));
	};
	let Some(action) = crate::non_blank(req.action.as_deref()) else {
		return Err(Error::invalid("action is required."));
	};
	let action = action.parse::<StatAction>()?;

	Ok((id, action))
}
