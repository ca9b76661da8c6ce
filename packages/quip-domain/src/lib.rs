pub mod filter;
pub mod length;
pub mod platform;
pub mod sort;
pub mod stats;

mod error;

pub use error::{Error, Result};
pub use filter::{
	CaptionFilter, DEFAULT_LIMIT, MAX_LIMIT, Page, ParamBag, PlatformMatch, SearchQuery,
	listing_filter, search_query,
};
pub use length::{LengthBuckets, LengthRange, LengthType};
pub use platform::Platform;
pub use sort::SortMode;
pub use stats::StatAction;

/// Character count stored alongside a caption's content.
pub fn character_count(content: &str) -> i32 {
	i32::try_from(content.chars().count()).unwrap_or(i32::MAX)
}
