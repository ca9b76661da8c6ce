#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Not found: {0}")]
	NotFound(String),
	#[error("Conflict: {0}")]
	Conflict(String),
}
impl Error {
	/// Maps constraint violations raised by admin writes onto caller-facing variants.
	pub(crate) fn from_write(err: sqlx::Error, what: &str) -> Self {
		if let sqlx::Error::Database(db_err) = &err {
			if db_err.is_unique_violation() {
				return Self::Conflict(format!("{what} already exists."));
			}
			if db_err.is_foreign_key_violation() {
				return Self::InvalidArgument(format!("{what} references an unknown record."));
			}
		}

		Self::Sqlx(err)
	}
}
