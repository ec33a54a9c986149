//! Error types for `haul-core`.

use thiserror::Error;

/// A boxed error raised by one of the external collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("event {index} is older than the event before it")]
  UnorderedEvents { index: usize },

  #[error("tracking payload carries no segment information")]
  NoSegmentInformation,

  #[error("event history cannot be read: {0}")]
  MalformedEvents(String),

  #[error("point resolution failed for {code:?}: {source}")]
  Resolution {
    code:   String,
    #[source]
    source: BoxError,
  },

  #[error("emission estimate failed: {0}")]
  Estimate(#[source] BoxError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
