//! Tracking events and the per-package event log.
//!
//! An event is one timestamped observation reported by the carrier. Events
//! without a location (e.g. "shipment information sent") still count towards
//! delivery status but never influence the inferred journey.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::{Error, Result, builder::SegmentBuilder, segment::Segment};

// ─── Event type ──────────────────────────────────────────────────────────────

/// The kind of scan the carrier recorded. Parsed from the carrier's two-letter
/// event code; anything unrecognised is kept verbatim in [`EventType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
#[strum(ascii_case_insensitive)]
pub enum EventType {
  #[strum(serialize = "PU", serialize = "picked_up")]
  PickedUp,
  #[strum(serialize = "AR", serialize = "arrived")]
  ArrivedAtFacility,
  #[strum(serialize = "DP", serialize = "departed")]
  DepartedFacility,
  #[strum(serialize = "IT", serialize = "in_transit")]
  InTransit,
  #[strum(serialize = "OD", serialize = "out_for_delivery")]
  OnVehicleForDelivery,
  #[strum(serialize = "DL", serialize = "delivered")]
  Delivered,
  #[strum(serialize = "OC", serialize = "info_received")]
  InfoReceived,
  #[strum(default)]
  Other(String),
}

impl EventType {
  /// The carrier code this type is written as on the wire.
  pub fn code(&self) -> &str {
    match self {
      Self::PickedUp => "PU",
      Self::ArrivedAtFacility => "AR",
      Self::DepartedFacility => "DP",
      Self::InTransit => "IT",
      Self::OnVehicleForDelivery => "OD",
      Self::Delivered => "DL",
      Self::InfoReceived => "OC",
      Self::Other(code) => code,
    }
  }
}

impl From<String> for EventType {
  fn from(code: String) -> Self {
    code.parse().unwrap_or(Self::Other(code))
  }
}

impl From<EventType> for String {
  fn from(t: EventType) -> Self { t.code().to_owned() }
}

// ─── Event ───────────────────────────────────────────────────────────────────

/// A single observation from the tracking data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
  /// Postal code of the scan, absent for logical events.
  #[serde(default)]
  pub location_code: Option<String>,
  /// Carrier-local time of the scan; compared as an absolute instant.
  pub timestamp:     DateTime<FixedOffset>,
  pub event_type:    EventType,
}

impl Event {
  pub fn new(
    location_code: Option<String>,
    timestamp: DateTime<FixedOffset>,
    event_type: EventType,
  ) -> Self {
    Self {
      location_code,
      timestamp,
      event_type,
    }
  }

  pub fn is_delivery(&self) -> bool { self.event_type == EventType::Delivered }
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Coarse delivery status of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
  Delivered,
  EnRoute,
}

/// `Delivered` iff any event is a delivery scan.
///
/// Needs nothing but the events themselves, so it stays available when the
/// journey cannot be reconstructed.
pub fn status<'a>(events: impl IntoIterator<Item = &'a Event>) -> Status {
  if events.into_iter().any(Event::is_delivery) {
    Status::Delivered
  } else {
    Status::EnRoute
  }
}

// ─── EventLog ────────────────────────────────────────────────────────────────

/// The chronological (oldest-first) event history of one package together
/// with the package-level constants carried onto every segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventLog {
  events:            Vec<Event>,
  pub weight:        Option<f64>,
  pub package_count: u32,
}

impl EventLog {
  /// Build a log from events already in oldest-first order.
  ///
  /// Returns [`Error::UnorderedEvents`] if any event is older than its
  /// predecessor. A `package_count` of zero is read as a single package.
  pub fn chronological(
    events: Vec<Event>,
    weight: Option<f64>,
    package_count: u32,
  ) -> Result<Self> {
    if let Some(index) = events
      .windows(2)
      .position(|pair| pair[1].timestamp < pair[0].timestamp)
    {
      return Err(Error::UnorderedEvents { index: index + 1 });
    }

    Ok(Self {
      events,
      weight,
      package_count: package_count.max(1),
    })
  }

  /// Build a log from events in the carrier's newest-first order, reversing
  /// them once.
  pub fn newest_first(
    mut events: Vec<Event>,
    weight: Option<f64>,
    package_count: u32,
  ) -> Result<Self> {
    events.reverse();
    Self::chronological(events, weight, package_count)
  }

  /// Events, oldest first.
  pub fn events(&self) -> &[Event] { &self.events }

  pub fn is_empty(&self) -> bool { self.events.is_empty() }

  pub fn delivered(&self) -> bool { self.events.iter().any(Event::is_delivery) }

  pub fn status(&self) -> Status { status(&self.events) }

  /// Infer the travel legs described by this log.
  pub fn segments(&self) -> Vec<Segment> {
    SegmentBuilder::new(self.weight, self.package_count).build(&self.events)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn at(ts: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(ts).unwrap()
  }

  fn event(loc: Option<&str>, ts: &str, t: EventType) -> Event {
    Event::new(loc.map(str::to_owned), at(ts), t)
  }

  #[test]
  fn event_type_parses_carrier_codes() {
    assert_eq!("DL".parse::<EventType>().unwrap(), EventType::Delivered);
    assert_eq!("pu".parse::<EventType>().unwrap(), EventType::PickedUp);
    assert_eq!(
      EventType::from("delivered".to_owned()),
      EventType::Delivered
    );
    assert_eq!(
      EventType::from("HL".to_owned()),
      EventType::Other("HL".into())
    );
  }

  #[test]
  fn event_type_serializes_as_code() {
    let json = serde_json::to_string(&EventType::DepartedFacility).unwrap();
    assert_eq!(json, "\"DP\"");
    let back: EventType = serde_json::from_str("\"OD\"").unwrap();
    assert_eq!(back, EventType::OnVehicleForDelivery);
  }

  #[test]
  fn status_is_delivered_with_a_delivery_event() {
    let events = [
      event(Some("66619"), "2010-05-10T16:52:00-05:00", EventType::PickedUp),
      event(Some("80528"), "2010-05-12T08:59:14-06:00", EventType::Delivered),
    ];
    assert_eq!(status(&events), Status::Delivered);
  }

  #[test]
  fn status_is_en_route_without_a_delivery_event() {
    let events =
      [event(Some("66619"), "2010-05-10T16:52:00-05:00", EventType::PickedUp)];
    assert_eq!(status(&events), Status::EnRoute);
    assert_eq!(status(&Vec::<Event>::new()), Status::EnRoute);
  }

  #[test]
  fn status_ignores_missing_locations() {
    let events = [event(None, "2010-05-12T08:59:14-06:00", EventType::Delivered)];
    let log = EventLog::chronological(events.to_vec(), None, 1).unwrap();
    assert!(log.segments().is_empty());
    assert_eq!(log.status(), Status::Delivered);
  }

  #[test]
  fn newest_first_reverses_once() {
    let events = vec![
      event(Some("80528"), "2010-05-12T08:59:14-06:00", EventType::Delivered),
      event(Some("66619"), "2010-05-10T16:52:00-05:00", EventType::PickedUp),
    ];
    let log = EventLog::newest_first(events, Some(19.0), 1).unwrap();
    assert_eq!(log.events()[0].event_type, EventType::PickedUp);
    assert_eq!(log.events()[1].event_type, EventType::Delivered);
  }

  #[test]
  fn unordered_events_are_rejected() {
    let events = vec![
      event(Some("80528"), "2010-05-12T08:59:14-06:00", EventType::Delivered),
      event(Some("66619"), "2010-05-10T16:52:00-05:00", EventType::PickedUp),
    ];
    let err = EventLog::chronological(events, None, 1).unwrap_err();
    assert!(matches!(err, Error::UnorderedEvents { index: 1 }));
  }

  #[test]
  fn offsets_compare_as_instants() {
    // Later scans carry a different offset and a smaller wall-clock hour.
    let events = vec![
      event(Some("66619"), "2010-05-10T21:41:17-05:00", EventType::DepartedFacility),
      event(Some("66227"), "2010-05-11T01:43:00-05:00", EventType::ArrivedAtFacility),
      event(Some("80640"), "2010-05-11T20:04:00-06:00", EventType::ArrivedAtFacility),
    ];
    assert!(EventLog::chronological(events, None, 1).is_ok());
  }

  #[test]
  fn zero_package_count_means_one() {
    let log = EventLog::chronological(Vec::new(), None, 0).unwrap();
    assert_eq!(log.package_count, 1);
  }
}
