//! `POST /fedex/replies?package_identifier=...`
//!
//! Assess a raw FedEx Track reply supplied by the caller, e.g. one fetched
//! from the carrier by a separate integration.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use haul_core::{
  assess::Report, emissions::EmissionEstimator, resolve::PointResolver,
  tracking::TrackingSource,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{Services, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ReplyParams {
  pub package_identifier: String,
}

pub async fn fedex<R, E, T>(
  State(services): State<Arc<Services<R, E, T>>>,
  Query(params): Query<ReplyParams>,
  Json(reply): Json<Value>,
) -> Result<Json<Report>, ApiError>
where
  R: PointResolver,
  E: EmissionEstimator,
  T: TrackingSource,
{
  let shipment =
    haul_fedex::decode(&params.package_identifier, reply)?.into_shipment();
  Ok(Json(services.assessor().shipment_report(&shipment).await?))
}
