//! In-memory collaborators for unit tests.

use std::{
  collections::{HashMap, VecDeque},
  sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  },
};

use thiserror::Error;

use crate::{
  emissions::{EmissionEstimator, Estimate, EstimateRequest},
  geo::{Place, Point},
  resolve::PointResolver,
};

#[derive(Debug, Error)]
#[error("collaborator unavailable")]
pub struct FakeError;

pub fn place(locality: &str, latitude: f64, longitude: f64) -> Place {
  Place {
    point:    Point::new(latitude, longitude),
    locality: locality.to_owned(),
  }
}

/// The stops of the Topeka to Fort Collins journey.
pub fn journey_places() -> Vec<(&'static str, Place)> {
  vec![
    ("66619", place("Topeka, KS", 38.9508, -95.6636)),
    ("66227", place("Lenexa, KS", 38.9725, -94.8028)),
    ("80640", place("Henderson, CO", 39.8837, -104.8851)),
    ("80534", place("Johnstown, CO", 40.3347, -104.9204)),
    ("80528", place("Fort Collins, CO", 40.4999, -105.0004)),
  ]
}

// ─── Resolver ────────────────────────────────────────────────────────────────

pub struct FakeResolver {
  places: HashMap<String, Place>,
  calls:  AtomicUsize,
  fail:   bool,
}

impl FakeResolver {
  pub fn with<'a>(places: impl IntoIterator<Item = (&'a str, Place)>) -> Self {
    Self {
      places: places
        .into_iter()
        .map(|(code, place)| (code.to_owned(), place))
        .collect(),
      calls:  AtomicUsize::new(0),
      fail:   false,
    }
  }

  pub fn empty() -> Self { Self::with(Vec::<(&str, Place)>::new()) }

  pub fn failing() -> Self {
    Self {
      fail: true,
      ..Self::empty()
    }
  }

  pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

impl PointResolver for FakeResolver {
  type Error = FakeError;

  async fn resolve<'a>(
    &'a self,
    code: &'a str,
  ) -> Result<Option<Place>, FakeError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    if self.fail {
      return Err(FakeError);
    }
    Ok(self.places.get(code).cloned())
  }
}

// ─── Estimator ───────────────────────────────────────────────────────────────

pub struct FakeEstimator {
  values:   Mutex<VecDeque<f64>>,
  fallback: Option<f64>,
  requests: Mutex<Vec<EstimateRequest>>,
}

impl FakeEstimator {
  /// Answers every request with `value`.
  pub fn constant(value: f64) -> Self {
    Self {
      values:   Mutex::new(VecDeque::new()),
      fallback: Some(value),
      requests: Mutex::new(Vec::new()),
    }
  }

  /// Answers successive requests with `values`, then fails.
  pub fn sequence(values: impl IntoIterator<Item = f64>) -> Self {
    Self {
      values:   Mutex::new(values.into_iter().collect()),
      fallback: None,
      requests: Mutex::new(Vec::new()),
    }
  }

  pub fn failing() -> Self { Self::sequence(Vec::<f64>::new()) }

  pub fn requests(&self) -> Vec<EstimateRequest> {
    self.requests.lock().unwrap().clone()
  }

  pub fn calls(&self) -> usize { self.requests.lock().unwrap().len() }
}

impl EmissionEstimator for FakeEstimator {
  type Error = FakeError;

  async fn estimate<'a>(
    &'a self,
    request: &'a EstimateRequest,
  ) -> Result<Estimate, FakeError> {
    self.requests.lock().unwrap().push(request.clone());
    let value = self
      .values
      .lock()
      .unwrap()
      .pop_front()
      .or(self.fallback)
      .ok_or(FakeError)?;
    Ok(Estimate {
      value,
      methodology: Some("fake".into()),
    })
  }
}
