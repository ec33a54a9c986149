//! Handlers for `/trackings` endpoints, backed by the configured
//! [`TrackingSource`].
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/trackings/{id}` | Full report; 422 when the event log is unusable |
//! | `GET`  | `/trackings/{id}/status` | Works without a usable event log |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use haul_core::{
  assess::Report,
  emissions::EmissionEstimator,
  event::Status,
  resolve::PointResolver,
  segment::Mode,
  tracking::{Shipment, TrackingSource},
};
use serde::Serialize;

use crate::{Services, error::ApiError};

#[derive(Debug, Serialize)]
pub struct TrackingStatus {
  pub package_identifier: String,
  pub status:             Status,
  pub reported_mode:      Option<Mode>,
}

async fn lookup<R, E, T>(
  services: &Services<R, E, T>,
  id: &str,
) -> Result<Shipment, ApiError>
where
  T: TrackingSource,
{
  tracing::debug!(package_identifier = id, "tracking lookup");
  services.tracking.track(id).await.map_err(ApiError::tracking)
}

/// `GET /trackings/{id}`
pub async fn report<R, E, T>(
  State(services): State<Arc<Services<R, E, T>>>,
  Path(id): Path<String>,
) -> Result<Json<Report>, ApiError>
where
  R: PointResolver,
  E: EmissionEstimator,
  T: TrackingSource,
{
  let shipment = lookup(&services, &id).await?;
  Ok(Json(services.assessor().shipment_report(&shipment).await?))
}

/// `GET /trackings/{id}/status`
pub async fn status<R, E, T>(
  State(services): State<Arc<Services<R, E, T>>>,
  Path(id): Path<String>,
) -> Result<Json<TrackingStatus>, ApiError>
where
  R: PointResolver,
  E: EmissionEstimator,
  T: TrackingSource,
{
  let shipment = lookup(&services, &id).await?;
  Ok(Json(TrackingStatus {
    package_identifier: shipment.package_identifier,
    status:             shipment.status,
    reported_mode:      shipment.reported_mode,
  }))
}

#[cfg(test)]
mod tests {
  use axum::http::StatusCode;
  use serde_json::Value;

  use crate::testing::{
    DELIVERED, NO_INFORMATION, failing_services, get_json, services,
    services_with_replies,
  };

  const PACKAGE: &str = "382544330058603";

  /// The delivered reply with its events collapsed into a single object.
  fn unlisted() -> String {
    let mut reply: Value = serde_json::from_str(DELIVERED).unwrap();
    let details = &mut reply["track_reply"]["track_details"];
    details["events"] = details["events"][0].clone();
    reply.to_string()
  }

  /// The delivered reply with two adjacent scans out of order.
  fn unordered() -> String {
    let mut reply: Value = serde_json::from_str(DELIVERED).unwrap();
    let events = &mut reply["track_reply"]["track_details"]["events"];
    let third = events[3]["timestamp"].take();
    events[3]["timestamp"] = events[4]["timestamp"].take();
    events[4]["timestamp"] = third;
    reply.to_string()
  }

  #[tokio::test]
  async fn tracked_package_is_reported() {
    let services = services_with_replies([(PACKAGE, DELIVERED)]);
    let (status, body) = get_json(services, "/trackings/382544330058603").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "delivered");
    assert_eq!(body["segments"].as_array().unwrap().len(), 4);
    assert_eq!(body["segments"][3]["final_destination"], "80528");
  }

  #[tokio::test]
  async fn unknown_package_is_not_found() {
    let (status, body) = get_json(services(), "/trackings/999999999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn carrier_error_is_not_found() {
    let services = services_with_replies([("123456789012", NO_INFORMATION)]);
    let (status, _) = get_json(services, "/trackings/123456789012/status").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn status_without_segment_information() {
    let services = services_with_replies([(PACKAGE, unlisted())]);

    let (status, body) =
      get_json(services.clone(), "/trackings/382544330058603/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "delivered");
    assert_eq!(body["reported_mode"], "ground");

    let (status, _) = get_json(services, "/trackings/382544330058603").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  }

  #[tokio::test]
  async fn status_of_unordered_events() {
    let services = services_with_replies([(PACKAGE, unordered())]);

    let (status, body) =
      get_json(services.clone(), "/trackings/382544330058603/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "delivered");
    assert_eq!(body["reported_mode"], "ground");

    let (status, body) = get_json(services, "/trackings/382544330058603").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("older than the event before it"));
  }

  #[tokio::test]
  async fn failing_estimator_is_a_bad_gateway() {
    let (status, body) =
      get_json(failing_services(), "/trackings/382544330058603").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("estimate"));
  }
}
