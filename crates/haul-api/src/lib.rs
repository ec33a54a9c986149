//! JSON API for haul.
//!
//! Exposes an axum [`Router`] over any [`PointResolver`],
//! [`EmissionEstimator`] and [`TrackingSource`]. TLS and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", haul_api::api_router(services.clone()))
//! ```

pub mod error;
pub mod journeys;
pub mod replies;
pub mod trackings;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use haul_core::{
  assess::Assessor, emissions::EmissionEstimator, resolve::PointResolver,
  tracking::TrackingSource,
};

pub use error::ApiError;

/// The collaborators every handler works against.
pub struct Services<R, E, T> {
  pub resolver:  R,
  pub estimator: E,
  pub tracking:  T,
  /// Carrier name passed to the estimator, e.g. `"FedEx"`.
  pub carrier:   String,
}

impl<R, E, T> Services<R, E, T>
where
  R: PointResolver,
  E: EmissionEstimator,
{
  pub fn assessor(&self) -> Assessor<'_, R, E> {
    Assessor::new(&self.resolver, &self.estimator, &self.carrier)
  }
}

/// Build a fully-materialised API router over `services`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<R, E, T>(services: Arc<Services<R, E, T>>) -> Router<()>
where
  R: PointResolver + 'static,
  E: EmissionEstimator + 'static,
  T: TrackingSource + 'static,
{
  Router::new()
    // Event logs
    .route("/segments", post(journeys::segments::<R, E, T>))
    .route("/status", post(journeys::status::<R, E, T>))
    .route("/footprint", post(journeys::footprint::<R, E, T>))
    .route("/reports", post(journeys::report::<R, E, T>))
    // Carrier replies
    .route("/fedex/replies", post(replies::fedex::<R, E, T>))
    // Tracking lookups
    .route("/trackings/{id}", get(trackings::report::<R, E, T>))
    .route("/trackings/{id}/status", get(trackings::status::<R, E, T>))
    .with_state(services)
}

#[cfg(test)]
mod testing;
