use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Social networks a caption can be authored for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
	Instagram,
	Tiktok,
	Twitter,
	Facebook,
	Linkedin,
	Youtube,
	Threads,
	Pinterest,
}
impl Platform {
	pub const ALL: [Platform; 8] = [
		Self::Instagram,
		Self::Tiktok,
		Self::Twitter,
		Self::Facebook,
		Self::Linkedin,
		Self::Youtube,
		Self::Threads,
		Self::Pinterest,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Instagram => "instagram",
			Self::Tiktok => "tiktok",
			Self::Twitter => "twitter",
			Self::Facebook => "facebook",
			Self::Linkedin => "linkedin",
			Self::Youtube => "youtube",
			Self::Threads => "threads",
			Self::Pinterest => "pinterest",
		}
	}

	pub fn display_name(self) -> &'static str {
		match self {
			Self::Instagram => "Instagram",
			Self::Tiktok => "TikTok",
			Self::Twitter => "Twitter / X",
			Self::Facebook => "Facebook",
			Self::Linkedin => "LinkedIn",
			Self::Youtube => "YouTube",
			Self::Threads => "Threads",
			Self::Pinterest => "Pinterest",
		}
	}
}
impl FromStr for Platform {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		let needle = raw.trim();

		Self::ALL
			.into_iter()
			.find(|platform| platform.as_str().eq_ignore_ascii_case(needle))
			.ok_or_else(|| Error::UnknownValue { field: "platform", value: raw.to_string() })
	}
}
impl fmt::Display for Platform {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
