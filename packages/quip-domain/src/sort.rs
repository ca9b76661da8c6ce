use serde::{Deserialize, Serialize};

/// Caption ordering. Unrecognized input falls back to [`SortMode::Newest`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
	#[default]
	Newest,
	Popular,
	Shortest,
	Longest,
}
impl SortMode {
	pub fn parse_lenient(raw: Option<&str>) -> Self {
		Self::parse(raw).unwrap_or_default()
	}

	pub fn parse(raw: Option<&str>) -> Option<Self> {
		match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
			Some("newest") => Some(Self::Newest),
			Some("popular") => Some(Self::Popular),
			Some("shortest") => Some(Self::Shortest),
			Some("longest") => Some(Self::Longest),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Newest => "newest",
			Self::Popular => "popular",
			Self::Shortest => "shortest",
			Self::Longest => "longest",
		}
	}
}
