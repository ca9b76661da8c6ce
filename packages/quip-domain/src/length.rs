use serde::{Deserialize, Serialize};

/// Bucketed caption length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthType {
	Short,
	Medium,
	Long,
}
impl LengthType {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"short" => Some(Self::Short),
			"medium" => Some(Self::Medium),
			"long" => Some(Self::Long),
			_ => None,
		}
	}

	pub fn range(self, buckets: LengthBuckets) -> LengthRange {
		match self {
			Self::Short => LengthRange { min: None, max: Some(buckets.short_max) },
			Self::Medium => LengthRange {
				min: Some(buckets.short_max.saturating_add(1)),
				max: Some(buckets.medium_max),
			},
			Self::Long =>
				LengthRange { min: Some(buckets.medium_max.saturating_add(1)), max: None },
		}
	}

	pub fn classify(character_count: i32, buckets: LengthBuckets) -> Self {
		if character_count <= buckets.short_max {
			Self::Short
		} else if character_count <= buckets.medium_max {
			Self::Medium
		} else {
			Self::Long
		}
	}
}

/// Inclusive upper bounds of the short and medium buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBuckets {
	pub short_max: i32,
	pub medium_max: i32,
}
impl Default for LengthBuckets {
	fn default() -> Self {
		Self { short_max: 100, medium_max: 250 }
	}
}
impl From<&quip_config::Captions> for LengthBuckets {
	fn from(cfg: &quip_config::Captions) -> Self {
		Self {
			short_max: i32::try_from(cfg.short_max_chars).unwrap_or(i32::MAX),
			medium_max: i32::try_from(cfg.medium_max_chars).unwrap_or(i32::MAX),
		}
	}
}

/// Inclusive character-count bounds; `None` leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthRange {
	pub min: Option<i32>,
	pub max: Option<i32>,
}
impl LengthRange {
	pub fn contains(self, character_count: i32) -> bool {
		self.min.is_none_or(|min| character_count >= min)
			&& self.max.is_none_or(|max| character_count <= max)
	}
}
