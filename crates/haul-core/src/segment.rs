//! Segments — the inferred travel legs of a package.
//!
//! A segment only stores what was observed: where and when the leg started,
//! and where and when it ended if that is known yet. Everything else
//! (distance, speed, mode) is derived once the endpoints have been resolved to
//! places; see [`crate::resolve::ResolvedSegment`].

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

// ─── Mode ────────────────────────────────────────────────────────────────────

/// Speeds at or above this many miles per hour are classified as air travel.
pub const AIR_SPEED_THRESHOLD_MPH: f64 = 80.0;

/// Coarse transport mode of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
  Ground,
  Air,
}

impl Mode {
  /// Classify a leg by its average speed in miles per hour.
  ///
  /// A heuristic stand-in for a carrier-reported service type: a short
  /// overnight flight averages below the threshold and reads as ground, a
  /// fast highway run over a few minutes can read as air.
  pub fn from_speed(mph: f64) -> Self {
    if mph < AIR_SPEED_THRESHOLD_MPH {
      Self::Ground
    } else {
      Self::Air
    }
  }

  /// Human-readable name, e.g. `"Ground"`.
  pub fn name(self) -> &'static str {
    match self {
      Self::Ground => "Ground",
      Self::Air => "Air",
    }
  }

  /// Lowercase name with its indefinite article, e.g. `"an air"`.
  pub fn with_indefinite_article(self) -> &'static str {
    match self {
      Self::Ground => "a ground",
      Self::Air => "an air",
    }
  }
}

/// Average speed over `length` miles in `hours`; zero when no time elapsed.
pub fn speed(length: f64, hours: f64) -> f64 {
  if hours > 0.0 { length / hours } else { 0.0 }
}

// ─── Segment ─────────────────────────────────────────────────────────────────

/// One directed travel leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
  pub origin:        String,
  /// `None` while the leg is still open.
  pub destination:   Option<String>,
  pub depart:        DateTime<FixedOffset>,
  /// `None` while the leg is still open.
  pub arrive:        Option<DateTime<FixedOffset>>,
  pub weight:        Option<f64>,
  pub package_count: u32,
}

impl Segment {
  /// An open leg starting at `origin`.
  pub fn open(
    origin: impl Into<String>,
    depart: DateTime<FixedOffset>,
    weight: Option<f64>,
    package_count: u32,
  ) -> Self {
    Self {
      origin: origin.into(),
      destination: None,
      depart,
      arrive: None,
      weight,
      package_count,
    }
  }

  pub fn is_open(&self) -> bool { self.destination.is_none() }

  /// Where the leg ends; a leg without an observed destination never left
  /// its origin.
  pub fn final_destination(&self) -> &str {
    self.destination.as_deref().unwrap_or(&self.origin)
  }

  /// Elapsed seconds between departure and arrival; zero while open.
  pub fn duration_in_seconds(&self) -> f64 {
    self
      .arrive
      .map(|arrive| (arrive - self.depart).num_milliseconds() as f64 / 1000.0)
      .unwrap_or(0.0)
  }

  pub fn duration_in_minutes(&self) -> f64 { self.duration_in_seconds() / 60.0 }

  pub fn duration_in_hours(&self) -> f64 { self.duration_in_minutes() / 60.0 }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn at(ts: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(ts).unwrap()
  }

  fn leg(depart: &str, arrive: Option<&str>) -> Segment {
    Segment {
      origin:        "66619".into(),
      destination:   arrive.map(|_| "66227".into()),
      depart:        at(depart),
      arrive:        arrive.map(at),
      weight:        Some(19.0),
      package_count: 1,
    }
  }

  #[test]
  fn duration_spans_offsets() {
    let s = leg("2010-05-11T07:29:20-05:00", Some("2010-05-11T20:04:00-06:00"));
    assert_eq!(s.duration_in_seconds(), 48_880.0);
    assert!((s.duration_in_hours() - 13.577_778).abs() < 1e-5);
  }

  #[test]
  fn open_leg_has_no_duration() {
    let s = leg("2010-05-11T07:29:20-05:00", None);
    assert!(s.is_open());
    assert_eq!(s.duration_in_seconds(), 0.0);
    assert_eq!(s.duration_in_hours(), 0.0);
  }

  #[test]
  fn final_destination_falls_back_to_origin() {
    let open = leg("2010-05-11T07:29:20-05:00", None);
    assert_eq!(open.final_destination(), "66619");

    let closed =
      leg("2010-05-11T07:29:20-05:00", Some("2010-05-11T09:00:00-05:00"));
    assert_eq!(closed.final_destination(), "66227");
  }

  #[test]
  fn speed_is_zero_without_elapsed_time() {
    assert_eq!(speed(120.0, 0.0), 0.0);
    assert_eq!(speed(120.0, -1.0), 0.0);
    assert_eq!(Mode::from_speed(speed(120.0, 0.0)), Mode::Ground);
  }

  #[test]
  fn threshold_is_inclusive_for_air() {
    assert_eq!(speed(80.0, 1.0), 80.0);
    assert_eq!(Mode::from_speed(80.0), Mode::Air);
    assert_eq!(Mode::from_speed(79.99), Mode::Ground);
  }

  #[test]
  fn mode_names() {
    assert_eq!(Mode::Ground.name(), "Ground");
    assert_eq!(Mode::Air.with_indefinite_article(), "an air");
    assert_eq!(Mode::Ground.with_indefinite_article(), "a ground");
  }
}
