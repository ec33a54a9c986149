//! [`EmissionEstimator`] over a CM1-style HTTP impact service.
//!
//! Each request is posted as a form; the answer is read from
//! `decisions.carbon.object.value` and `methodology` in the JSON reply.

use std::time::Duration;

use haul_core::emissions::{EmissionEstimator, Estimate, EstimateRequest};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::EstimatorConfig;

#[derive(Debug, Error)]
pub enum EstimatorError {
  #[error("estimator request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("estimator answered {status}: {body}")]
  Status {
    status: reqwest::StatusCode,
    body:   String,
  },
}

// ─── Reply ────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct Reply {
  decisions:   Decisions,
  #[serde(default)]
  methodology: Option<String>,
}

#[derive(Deserialize)]
struct Decisions {
  carbon: Decision,
}

#[derive(Deserialize)]
struct Decision {
  object: Quantity,
}

#[derive(Deserialize)]
struct Quantity {
  value: f64,
}

impl From<Reply> for Estimate {
  fn from(reply: Reply) -> Self {
    Estimate {
      value:       reply.decisions.carbon.object.value,
      methodology: reply.methodology,
    }
  }
}

// ─── Client ───────────────────────────────────────────────────────────────────

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct Cm1Estimator {
  client: Client,
  url:    String,
  key:    Option<String>,
}

impl Cm1Estimator {
  pub fn new(config: &EstimatorConfig) -> Result<Self, EstimatorError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    Ok(Self {
      client,
      url: config.url.clone(),
      key: config.key.clone(),
    })
  }

  /// Form parameters for `request`, named as the impact service expects.
  fn params(&self, request: &EstimateRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
      ("carrier[name]", request.carrier.clone()),
      ("package_count", request.package_count.to_string()),
      ("origin_zip_code", request.origin.clone()),
      ("destination_zip_code", request.destination.clone()),
      ("mode", request.mode.name().to_owned()),
      ("segment_count", request.segment_count.to_string()),
    ];
    if let Some(weight) = request.weight {
      params.push(("weight", weight.to_string()));
    }
    if let Some(key) = &self.key {
      params.push(("key", key.clone()));
    }
    params
  }

  async fn post(&self, request: &EstimateRequest) -> Result<Estimate, EstimatorError> {
    tracing::debug!(
      origin = %request.origin,
      destination = %request.destination,
      mode = request.mode.name(),
      "posting estimate form"
    );

    let resp = self
      .client
      .post(&self.url)
      .form(&self.params(request))
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(EstimatorError::Status { status, body });
    }

    let reply: Reply = resp.json().await?;
    Ok(reply.into())
  }
}

impl EmissionEstimator for Cm1Estimator {
  type Error = EstimatorError;

  async fn estimate<'a>(
    &'a self,
    request: &'a EstimateRequest,
  ) -> Result<Estimate, EstimatorError> {
    self.post(request).await
  }
}
