//! Emission estimates for individual legs and whole shipments.
//!
//! The estimator itself is external; this module fixes the request shape,
//! deduplicates identical requests and sums the results.

use std::{collections::HashMap, future::Future};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{
  Error, Result,
  resolve::ResolvedSegment,
  segment::Mode,
};

// ─── Request / response ──────────────────────────────────────────────────────

/// Everything the estimator is told about one leg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateRequest {
  /// Carrier name, e.g. `"FedEx"`; taken from configuration.
  pub carrier:       String,
  pub weight:        Option<f64>,
  pub package_count: u32,
  pub origin:        String,
  /// The leg's final destination; equal to `origin` for an open leg.
  pub destination:   String,
  pub mode:          Mode,
  /// Number of legs covered by the request; always one.
  pub segment_count: u32,
}

impl EstimateRequest {
  pub fn for_segment(carrier: &str, leg: &ResolvedSegment) -> Self {
    Self {
      carrier:       carrier.to_owned(),
      weight:        leg.segment.weight,
      package_count: leg.segment.package_count,
      origin:        leg.segment.origin.clone(),
      destination:   leg.segment.final_destination().to_owned(),
      mode:          leg.mode(),
      segment_count: 1,
    }
  }

  /// SHA-256 hex digest over every field. Equal requests share a digest.
  pub fn fingerprint(&self) -> String {
    let mut hasher = Sha256::new();
    for field in [
      self.carrier.as_str(),
      self.origin.as_str(),
      self.destination.as_str(),
      self.mode.name(),
    ] {
      hasher.update(field.as_bytes());
      hasher.update([0u8]);
    }
    match self.weight {
      Some(w) => hasher.update(w.to_bits().to_le_bytes()),
      None => hasher.update(b"none"),
    }
    hasher.update(self.package_count.to_le_bytes());
    hasher.update(self.segment_count.to_le_bytes());
    hex::encode(hasher.finalize())
  }
}

/// An estimator's answer for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
  /// Estimated emissions, in the estimator's unit (kilograms CO2e for CM1).
  pub value:       f64,
  /// Link to or identifier of the methodology behind `value`.
  pub methodology: Option<String>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an emissions-estimation service.
pub trait EmissionEstimator: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn estimate<'a>(
    &'a self,
    request: &'a EstimateRequest,
  ) -> impl Future<Output = Result<Estimate, Self::Error>> + Send + 'a;
}

// ─── Memo ────────────────────────────────────────────────────────────────────

/// Asks the estimator at most once per distinct request fingerprint.
pub struct EstimateCache<'e, E> {
  estimator: &'e E,
  estimates: HashMap<String, Estimate>,
}

impl<'e, E: EmissionEstimator> EstimateCache<'e, E> {
  pub fn new(estimator: &'e E) -> Self {
    Self {
      estimator,
      estimates: HashMap::new(),
    }
  }

  pub async fn get(&mut self, request: &EstimateRequest) -> Result<Estimate> {
    let key = request.fingerprint();
    if let Some(estimate) = self.estimates.get(&key) {
      return Ok(estimate.clone());
    }

    tracing::debug!(
      origin = %request.origin,
      destination = %request.destination,
      mode = request.mode.name(),
      "requesting emission estimate"
    );
    let estimate = self
      .estimator
      .estimate(request)
      .await
      .map_err(|e| Error::Estimate(Box::new(e)))?;
    self.estimates.insert(key, estimate.clone());
    Ok(estimate)
  }
}

// ─── Aggregate ───────────────────────────────────────────────────────────────

/// Sum of per-leg footprints rounded to the nearest whole unit; zero for a
/// shipment without legs.
pub fn total_footprint(footprints: impl IntoIterator<Item = f64>) -> i64 {
  footprints.into_iter().sum::<f64>().round() as i64
}
