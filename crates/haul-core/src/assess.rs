//! Assessment — from an event log to a priced journey.
//!
//! [`Assessor`] ties the pure parts of the crate (segment inference, derived
//! properties) to the external collaborators (point resolution, emissions
//! estimation). Every lookup is memoized for the duration of one call.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::{
  Result,
  emissions::{
    EmissionEstimator, Estimate, EstimateCache, EstimateRequest, total_footprint,
  },
  event::{EventLog, Status},
  resolve::{PointResolver, ResolvedSegment, survey},
  segment::{Mode, Segment},
  tracking::Shipment,
};

// ─── Views ───────────────────────────────────────────────────────────────────

/// One leg with all of its derived properties, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegReport {
  pub origin:              String,
  pub destination:         Option<String>,
  pub final_destination:   String,
  pub depart:              DateTime<FixedOffset>,
  pub arrive:              Option<DateTime<FixedOffset>>,
  pub weight:              Option<f64>,
  pub package_count:       u32,
  pub origin_city:         Option<String>,
  pub destination_city:    Option<String>,
  pub range:               String,
  pub in_town:             bool,
  /// Miles.
  pub length:              f64,
  pub duration_in_seconds: f64,
  pub duration_in_hours:   f64,
  /// Miles per hour.
  pub speed:               f64,
  pub mode:                Mode,
  pub mode_name:           &'static str,
  /// Absent until the leg has been priced.
  pub footprint:           Option<f64>,
  pub methodology:         Option<String>,
}

impl LegReport {
  pub fn new(leg: &ResolvedSegment, estimate: Option<&Estimate>) -> Self {
    let s = &leg.segment;
    Self {
      origin:              s.origin.clone(),
      destination:         s.destination.clone(),
      final_destination:   s.final_destination().to_owned(),
      depart:              s.depart,
      arrive:              s.arrive,
      weight:              s.weight,
      package_count:       s.package_count,
      origin_city:         leg.origin_city().map(str::to_owned),
      destination_city:    leg.destination_city().map(str::to_owned),
      range:               leg.range(),
      in_town:             leg.in_town(),
      length:              leg.length(),
      duration_in_seconds: s.duration_in_seconds(),
      duration_in_hours:   s.duration_in_hours(),
      speed:               leg.speed(),
      mode:                leg.mode(),
      mode_name:           leg.mode().name(),
      footprint:           estimate.map(|e| e.value),
      methodology:         estimate.and_then(|e| e.methodology.clone()),
    }
  }
}

/// Everything known about one package's journey.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
  pub status:        Status,
  /// Carrier-reported mode, shown next to the per-leg speed heuristic.
  pub reported_mode: Option<Mode>,
  pub segments:      Vec<LegReport>,
  /// Rounded sum of the per-leg footprints.
  pub footprint:     i64,
}

// ─── Assessor ────────────────────────────────────────────────────────────────

/// Prices journeys with a given resolver, estimator and carrier name.
pub struct Assessor<'a, R, E> {
  resolver:  &'a R,
  estimator: &'a E,
  carrier:   &'a str,
}

impl<'a, R, E> Assessor<'a, R, E>
where
  R: PointResolver,
  E: EmissionEstimator,
{
  pub fn new(resolver: &'a R, estimator: &'a E, carrier: &'a str) -> Self {
    Self {
      resolver,
      estimator,
      carrier,
    }
  }

  /// Resolve the endpoints of `segments`.
  pub async fn survey(&self, segments: Vec<Segment>) -> Result<Vec<ResolvedSegment>> {
    survey(self.resolver, segments).await
  }

  /// Estimate every leg, in order. Fails on the first failed estimate; a
  /// partial set of estimates is never returned.
  pub async fn price(&self, legs: &[ResolvedSegment]) -> Result<Vec<Estimate>> {
    let mut cache = EstimateCache::new(self.estimator);
    let mut estimates = Vec::with_capacity(legs.len());
    for leg in legs {
      let request = EstimateRequest::for_segment(self.carrier, leg);
      estimates.push(cache.get(&request).await?);
    }
    Ok(estimates)
  }

  /// Total footprint of `segments`; zero when there are none.
  pub async fn footprint(&self, segments: Vec<Segment>) -> Result<i64> {
    let legs = self.survey(segments).await?;
    let estimates = self.price(&legs).await?;
    Ok(total_footprint(estimates.iter().map(|e| e.value)))
  }

  /// Infer, resolve and price the journey recorded in `log`.
  pub async fn report(&self, log: &EventLog) -> Result<Report> {
    let legs = self.survey(log.segments()).await?;
    let estimates = self.price(&legs).await?;

    let footprint = total_footprint(estimates.iter().map(|e| e.value));
    let segments = legs
      .iter()
      .zip(&estimates)
      .map(|(leg, estimate)| LegReport::new(leg, Some(estimate)))
      .collect();

    tracing::info!(
      legs = legs.len(),
      footprint,
      status = ?log.status(),
      "assessed journey"
    );
    Ok(Report {
      status: log.status(),
      reported_mode: None,
      segments,
      footprint,
    })
  }

  /// [`Self::report`] for a looked-up shipment, carrying its status and
  /// reported mode. Fails with the shipment's
  /// [`MissingLog`](crate::tracking::MissingLog) reason, e.g.
  /// [`Error::NoSegmentInformation`](crate::Error::NoSegmentInformation), when
  /// it has no event log.
  pub async fn shipment_report(&self, shipment: &Shipment) -> Result<Report> {
    let log = shipment.event_log()?;
    let report = self.report(log).await?;
    Ok(Report {
      status: shipment.status,
      reported_mode: shipment.reported_mode,
      ..report
    })
  }
}
