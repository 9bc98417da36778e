//! Error type for `moim-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored vocabulary string no longer matches any enum variant.
  #[error("unknown {column} value: {value:?}")]
  Vocabulary { column: &'static str, value: String },
}

impl From<Error> for moim_core::Error {
  fn from(err: Error) -> Self { moim_core::Error::Store(Box::new(err)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
