//! Handlers for event logs posted by the caller.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/segments` | Legs with derived properties, unpriced |
//! | `POST` | `/status` | Body: `{"events":[...]}` |
//! | `POST` | `/footprint` | Rounded total |
//! | `POST` | `/reports` | Legs, per-leg footprints and total |

use std::sync::Arc;

use axum::{Json, extract::State};
use haul_core::{
  assess::{LegReport, Report},
  emissions::EmissionEstimator,
  event::{self, Event, EventLog, Status},
  resolve::PointResolver,
  tracking::TrackingSource,
};
use serde::{Deserialize, Serialize};

use crate::{Services, error::ApiError};

// ─── Bodies ──────────────────────────────────────────────────────────────────

/// Order in which the posted events are listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
  #[default]
  Chronological,
  /// As carriers report them. Reversed once before use.
  NewestFirst,
}

/// An event log as posted by the caller.
#[derive(Debug, Deserialize)]
pub struct EventLogBody {
  pub events:        Vec<Event>,
  #[serde(default)]
  pub weight:        Option<f64>,
  #[serde(default = "one")]
  pub package_count: u32,
  #[serde(default)]
  pub order:         Order,
}

fn one() -> u32 { 1 }

impl EventLogBody {
  pub fn into_log(self) -> haul_core::Result<EventLog> {
    match self.order {
      Order::Chronological => {
        EventLog::chronological(self.events, self.weight, self.package_count)
      }
      Order::NewestFirst => {
        EventLog::newest_first(self.events, self.weight, self.package_count)
      }
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub events: Vec<Event>,
}

#[derive(Debug, Serialize)]
pub struct StatusView {
  pub status: Status,
}

#[derive(Debug, Serialize)]
pub struct FootprintView {
  pub footprint: i64,
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// `POST /segments`
pub async fn segments<R, E, T>(
  State(services): State<Arc<Services<R, E, T>>>,
  Json(body): Json<EventLogBody>,
) -> Result<Json<Vec<LegReport>>, ApiError>
where
  R: PointResolver,
  E: EmissionEstimator,
  T: TrackingSource,
{
  let log = body.into_log()?;
  let legs = services.assessor().survey(log.segments()).await?;
  Ok(Json(legs.iter().map(|leg| LegReport::new(leg, None)).collect()))
}

/// `POST /status`
///
/// Order does not matter; only the presence of a delivery event does.
pub async fn status<R, E, T>(
  State(_services): State<Arc<Services<R, E, T>>>,
  Json(body): Json<StatusBody>,
) -> Json<StatusView>
where
  R: PointResolver,
  E: EmissionEstimator,
  T: TrackingSource,
{
  Json(StatusView {
    status: event::status(&body.events),
  })
}

/// `POST /footprint`
pub async fn footprint<R, E, T>(
  State(services): State<Arc<Services<R, E, T>>>,
  Json(body): Json<EventLogBody>,
) -> Result<Json<FootprintView>, ApiError>
where
  R: PointResolver,
  E: EmissionEstimator,
  T: TrackingSource,
{
  let log = body.into_log()?;
  let footprint = services.assessor().footprint(log.segments()).await?;
  Ok(Json(FootprintView { footprint }))
}

/// `POST /reports`
pub async fn report<R, E, T>(
  State(services): State<Arc<Services<R, E, T>>>,
  Json(body): Json<EventLogBody>,
) -> Result<Json<Report>, ApiError>
where
  R: PointResolver,
  E: EmissionEstimator,
  T: TrackingSource,
{
  let log = body.into_log()?;
  Ok(Json(services.assessor().report(&log).await?))
}
