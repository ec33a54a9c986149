//! Error type for `haul-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("invalid coordinates for zip code {name}: ({latitude}, {longitude})")]
  InvalidCoordinates {
    name:      String,
    latitude:  f64,
    longitude: f64,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
