//! HTTP server wiring for haul.
//!
//! Ties the SQLite gazetteer, the CM1 estimator client and the FedEx reply
//! archive to the [`haul_api`] router.

pub mod estimator;
pub mod import;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use haul_api::{Services, api_router};
use haul_core::{
  emissions::EmissionEstimator, resolve::PointResolver, tracking::TrackingSource,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `HAUL_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  /// Carrier name sent with every estimate request.
  pub carrier:        String,
  pub gazetteer_path: PathBuf,
  /// Directory of saved Track replies, one `{package_identifier}.json` each.
  pub replies_dir:    PathBuf,
  pub estimator:      EstimatorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EstimatorConfig {
  /// CM1-style endpoint, e.g. `http://impact.brighterplanet.com/shipments.json`.
  pub url:          String,
  #[serde(default)]
  pub key:          Option<String>,
  pub timeout_secs: u64,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API under `/api`, with request tracing.
pub fn router<R, E, T>(services: Arc<Services<R, E, T>>) -> Router
where
  R: PointResolver + 'static,
  E: EmissionEstimator + 'static,
  T: TrackingSource + 'static,
{
  Router::new()
    .nest("/api", api_router(services))
    .layer(TraceLayer::new_for_http())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
