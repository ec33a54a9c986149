//! In-memory collaborators and request helpers for router tests.

use std::{collections::HashMap, sync::Arc};

use axum::{
  body::Body,
  http::{Request, StatusCode},
};
use haul_core::{
  emissions::{EmissionEstimator, Estimate, EstimateRequest},
  geo::{Place, Point},
  resolve::PointResolver,
  tracking::{Shipment, TrackingSource},
};
use serde_json::Value;
use tower::ServiceExt as _;

use crate::{Services, api_router};

pub const DELIVERED: &str =
  include_str!("../../haul-fedex/src/fixtures/delivered_ground.json");
pub const NO_INFORMATION: &str =
  include_str!("../../haul-fedex/src/fixtures/no_information.json");

#[derive(Debug, thiserror::Error)]
#[error("collaborator unavailable")]
pub struct Unavailable;

// ─── Resolver ────────────────────────────────────────────────────────────────

pub struct MapResolver(HashMap<&'static str, Place>);

impl MapResolver {
  pub fn journey() -> Self {
    let place = |locality: &str, latitude, longitude| Place {
      point:    Point::new(latitude, longitude),
      locality: locality.to_owned(),
    };
    Self(HashMap::from([
      ("66619", place("Topeka, KS", 39.0473, -95.6752)),
      ("66227", place("Lenexa, KS", 38.9536, -94.7336)),
      ("80640", place("Henderson, CO", 39.9219, -104.8653)),
      ("80534", place("Johnstown, CO", 40.3369, -104.9122)),
      ("80528", place("Fort Collins, CO", 40.4995, -105.0036)),
    ]))
  }
}

impl PointResolver for MapResolver {
  type Error = Unavailable;

  async fn resolve<'a>(&'a self, code: &'a str) -> Result<Option<Place>, Unavailable> {
    Ok(self.0.get(code).cloned())
  }
}

// ─── Estimator ───────────────────────────────────────────────────────────────

/// Prices every leg the same; `None` fails every request.
pub struct FlatEstimator(Option<f64>);

impl EmissionEstimator for FlatEstimator {
  type Error = Unavailable;

  async fn estimate<'a>(
    &'a self,
    _request: &'a EstimateRequest,
  ) -> Result<Estimate, Unavailable> {
    let value = self.0.ok_or(Unavailable)?;
    Ok(Estimate {
      value,
      methodology: Some("http://example.test/methodology".into()),
    })
  }
}

// ─── Tracking ────────────────────────────────────────────────────────────────

/// Serves saved FedEx replies by package identifier.
pub struct SavedReplies(HashMap<&'static str, String>);

impl TrackingSource for SavedReplies {
  type Error = haul_fedex::Error;

  async fn track<'a>(
    &'a self,
    package_identifier: &'a str,
  ) -> Result<Shipment, haul_fedex::Error> {
    let reply = self.0.get(package_identifier).ok_or_else(|| {
      haul_fedex::Error::Failure {
        package_identifier: package_identifier.to_owned(),
        message:            "no reply on file".to_owned(),
      }
    })?;
    Ok(haul_fedex::decode_str(package_identifier, reply)?.into_shipment())
  }
}

pub type TestServices = Services<MapResolver, FlatEstimator, SavedReplies>;

fn build(estimate: Option<f64>, replies: SavedReplies) -> Arc<TestServices> {
  Arc::new(Services {
    resolver:  MapResolver::journey(),
    estimator: FlatEstimator(estimate),
    tracking:  replies,
    carrier:   "FedEx".into(),
  })
}

pub fn services() -> Arc<TestServices> {
  build(Some(2.4), SavedReplies(HashMap::new()))
}

/// Every estimate fails; the delivered reply is on file.
pub fn failing_services() -> Arc<TestServices> {
  let replies = HashMap::from([("382544330058603", DELIVERED.to_owned())]);
  build(None, SavedReplies(replies))
}

pub fn services_with_replies<S: Into<String>>(
  replies: impl IntoIterator<Item = (&'static str, S)>,
) -> Arc<TestServices> {
  let replies = replies.into_iter().map(|(id, reply)| (id, reply.into()));
  build(Some(2.4), SavedReplies(replies.collect()))
}

// ─── Requests ────────────────────────────────────────────────────────────────

async fn send(services: Arc<TestServices>, req: Request<Body>) -> (StatusCode, Value) {
  let resp = api_router(services).oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
  (status, body)
}

pub async fn post_json(
  services: Arc<TestServices>,
  uri: &str,
  body: Value,
) -> (StatusCode, Value) {
  let req = Request::builder()
    .method("POST")
    .uri(uri)
    .header("content-type", "application/json")
    .body(Body::from(body.to_string()))
    .unwrap();
  send(services, req).await
}

pub async fn get_json(services: Arc<TestServices>, uri: &str) -> (StatusCode, Value) {
  let req = Request::builder()
    .method("GET")
    .uri(uri)
    .body(Body::empty())
    .unwrap();
  send(services, req).await
}
