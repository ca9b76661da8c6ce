use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Counter a stat mutation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatAction {
	View,
	Copy,
}
impl StatAction {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::View => "view",
			Self::Copy => "copy",
		}
	}
}
impl FromStr for StatAction {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		match raw.trim() {
			"view" => Ok(Self::View),
			"copy" => Ok(Self::Copy),
			_ => Err(Error::UnknownValue { field: "action", value: raw.to_string() }),
		}
	}
}
