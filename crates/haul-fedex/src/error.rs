//! Error types for the FedEx reply codec.

use std::path::PathBuf;

use haul_core::tracking::{LookupFailure, TrackingError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to find tracking information for {package_identifier}: {message}")]
  Failure {
    package_identifier: String,
    message:            String,
  },

  #[error("package {0} is an international shipment")]
  International(String),

  #[error("tracking reply carries no segment information")]
  NoSegmentInformation,

  #[error("malformed tracking reply: {0}")]
  Malformed(String),

  #[error("invalid timestamp: {0:?}")]
  InvalidTimestamp(String),

  #[error("invalid package identifier: {0:?}")]
  InvalidIdentifier(String),

  #[error("core error: {0}")]
  Core(#[from] haul_core::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("cannot read {path:?}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl TrackingError for Error {
  fn failure(&self) -> LookupFailure {
    match self {
      Error::Failure { .. } | Error::InvalidIdentifier(_) => {
        LookupFailure::NotFound
      }
      Error::International(_) => LookupFailure::International,
      _ => LookupFailure::Unavailable,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
