//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use haul_core::tracking::{LookupFailure, TrackingError};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// Well-formed input that cannot be assessed.
  #[error("unprocessable: {0}")]
  Unprocessable(String),

  /// A geocoder, estimator or carrier failed.
  #[error("upstream error: {0}")]
  Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a tracking lookup failure by its kind.
  pub fn tracking<E: TrackingError>(e: E) -> Self {
    match e.failure() {
      LookupFailure::NotFound => ApiError::NotFound(e.to_string()),
      LookupFailure::International => ApiError::Unprocessable(e.to_string()),
      LookupFailure::Unavailable => ApiError::Upstream(Box::new(e)),
    }
  }
}

impl From<haul_core::Error> for ApiError {
  fn from(e: haul_core::Error) -> Self {
    use haul_core::Error as E;
    match e {
      E::UnorderedEvents { .. }
      | E::NoSegmentInformation
      | E::MalformedEvents(_) => ApiError::Unprocessable(e.to_string()),
      E::Resolution { .. } | E::Estimate(_) => ApiError::Upstream(Box::new(e)),
    }
  }
}

/// Errors decoding a reply posted by the caller are the caller's fault.
impl From<haul_fedex::Error> for ApiError {
  fn from(e: haul_fedex::Error) -> Self {
    use haul_fedex::Error as E;
    match e {
      E::Core(core) => core.into(),
      E::Failure { .. } => ApiError::NotFound(e.to_string()),
      E::International(_) | E::NoSegmentInformation => {
        ApiError::Unprocessable(e.to_string())
      }
      E::Malformed(_)
      | E::InvalidTimestamp(_)
      | E::InvalidIdentifier(_)
      | E::Json(_) => ApiError::BadRequest(e.to_string()),
      E::Io { .. } => ApiError::Upstream(Box::new(e)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::Upstream(e) => {
        tracing::warn!(error = %e, "upstream failure");
        (StatusCode::BAD_GATEWAY, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
