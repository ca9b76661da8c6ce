pub mod captions;
pub mod db;
pub mod history;
pub mod models;
pub mod schema;
pub mod taxonomy;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Builds a case-insensitive `ILIKE` pattern that matches `term` anywhere in a column.
///
/// `%`, `_`, and `\` in the term are matched literally; queries pair the pattern with
/// `ESCAPE '\'`.
pub fn contains_pattern(term: &str) -> String {
	let mut out = String::with_capacity(term.len() + 2);

	out.push('%');

	for ch in term.chars() {
		if matches!(ch, '%' | '_' | '\\') {
			out.push('\\');
		}

		out.push(ch);
	}

	out.push('%');

	out
}

pub(crate) fn new_id() -> String {
	uuid::Uuid::new_v4().to_string()
}
