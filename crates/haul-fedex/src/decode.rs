//! FedEx Track v4 reply decoder.
//!
//! Pipeline:
//!   reply JSON
//!     └─ Envelope / RawReply      severity check → Failure
//!          └─ RawDetails          weight, count, service description
//!               └─ RawEvents      list or stray object
//!                    └─ international check → Tracking

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use haul_core::{
  event::{Event, EventLog, EventType, Status},
  segment::Mode,
  tracking::{MissingLog, Shipment},
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

// ─── Wire shapes ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct Envelope {
  track_reply: RawReply,
}

#[derive(Deserialize)]
struct RawReply {
  highest_severity: String,
  #[serde(default)]
  notifications:    Value,
  #[serde(default)]
  track_details:    Option<RawDetails>,
}

#[derive(Deserialize)]
struct RawDetails {
  #[serde(default, alias = "ServiceInfo")]
  service_info:   Option<String>,
  #[serde(default, alias = "ServiceType")]
  service_type:   Option<String>,
  #[serde(default)]
  package_weight: Option<RawWeight>,
  #[serde(default)]
  package_count:  Option<Scalar>,
  #[serde(default)]
  events:         Value,
}

#[derive(Deserialize)]
struct RawWeight {
  #[serde(default)]
  units: Option<String>,
  value: Scalar,
}

/// SOAP-to-JSON bridges emit numbers either bare or quoted.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
  Number(f64),
  Text(String),
}

impl Scalar {
  fn as_f64(&self) -> Option<f64> {
    match self {
      Scalar::Number(n) => Some(*n),
      Scalar::Text(s) => s.trim().parse().ok(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
struct RawEvent {
  timestamp:  String,
  event_type: String,
  #[serde(default)]
  address:    RawAddress,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawAddress {
  #[serde(default)]
  postal_code:  Option<String>,
  #[serde(default)]
  country_code: Option<String>,
}

impl RawEvent {
  fn is_delivery(&self) -> bool {
    EventType::from(self.event_type.clone()) == EventType::Delivered
  }

  /// A scan without a country code is not domestic.
  fn is_domestic(&self) -> bool {
    self
      .address
      .country_code
      .as_deref()
      .is_some_and(|c| c.eq_ignore_ascii_case("US"))
  }

  fn to_event(&self) -> Result<Event> {
    Ok(Event::new(
      self
        .address
        .postal_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_owned),
      parse_timestamp(&self.timestamp)?,
      EventType::from(self.event_type.clone()),
    ))
  }
}

/// The reply's `events` field. A single scan is sometimes collapsed into a
/// bare object by the SOAP bridge, and error payloads show up the same way;
/// neither can be folded into legs.
#[derive(Debug, Clone)]
enum RawEvents {
  List(Vec<RawEvent>),
  Unlisted(Option<RawEvent>),
}

impl RawEvents {
  fn from_value(value: Value) -> Result<Self> {
    Ok(match value {
      Value::Null => RawEvents::List(Vec::new()),
      Value::Array(_) => RawEvents::List(serde_json::from_value(value)?),
      other => RawEvents::Unlisted(serde_json::from_value(other).ok()),
    })
  }

  fn as_slice(&self) -> &[RawEvent] {
    match self {
      RawEvents::List(events) => events,
      RawEvents::Unlisted(Some(event)) => std::slice::from_ref(event),
      RawEvents::Unlisted(None) => &[],
    }
  }
}

// ─── Tracking ────────────────────────────────────────────────────────────────

/// A successfully decoded, domestic tracking reply.
#[derive(Debug, Clone)]
pub struct Tracking {
  pub package_identifier: String,
  /// Free-text service description, e.g. `"FedEx Ground-U.S."`.
  pub service_info:       Option<String>,
  /// Service code, e.g. `"FEDEX_GROUND"`.
  pub service_type:       Option<String>,
  /// Package weight as reported, in `weight_units`.
  pub weight:             Option<f64>,
  pub weight_units:       Option<String>,
  /// At least one.
  pub package_count:      u32,
  events:                 RawEvents,
}

impl Tracking {
  /// Delivery status. Looks only at event types, so a reply whose events
  /// cannot be folded into legs still reports it.
  pub fn status(&self) -> Status {
    if self.events.as_slice().iter().any(RawEvent::is_delivery) {
      Status::Delivered
    } else {
      Status::EnRoute
    }
  }

  /// Transport mode named by the service, if any. Ground services are
  /// checked first so "FedEx Ground Express" style names stay on the ground.
  pub fn reported_mode(&self) -> Option<Mode> {
    let service = [self.service_type.as_deref(), self.service_info.as_deref()]
      .into_iter()
      .flatten()
      .collect::<Vec<_>>()
      .join(" ")
      .to_ascii_uppercase();

    if service.contains("GROUND") || service.contains("HOME_DELIVERY") {
      Some(Mode::Ground)
    } else if ["OVERNIGHT", "2_DAY", "2DAY", "EXPRESS", "AIR", "PRIORITY"]
      .iter()
      .any(|needle| service.contains(needle))
    {
      Some(Mode::Air)
    } else {
      None
    }
  }

  /// The chronological event log.
  ///
  /// Fails with [`Error::NoSegmentInformation`] when the reply's events are
  /// not a list.
  pub fn event_log(&self) -> Result<EventLog> {
    let RawEvents::List(raw) = &self.events else {
      return Err(Error::NoSegmentInformation);
    };
    let newest_first = raw
      .iter()
      .map(RawEvent::to_event)
      .collect::<Result<Vec<_>>>()?;
    Ok(EventLog::newest_first(
      newest_first,
      self.weight,
      self.package_count,
    )?)
  }

  /// Convert into the carrier-neutral [`Shipment`]. Status and reported
  /// mode are always filled; an event log that cannot be built is kept as
  /// the reason it is missing.
  pub fn into_shipment(self) -> Shipment {
    let log = self.event_log().map_err(|e| match e {
      Error::NoSegmentInformation => MissingLog::NoSegmentInformation,
      Error::Core(core) => MissingLog::from(core),
      other => MissingLog::Malformed {
        message: other.to_string(),
      },
    });
    if let Err(missing) = &log {
      tracing::debug!(
        package_identifier = %self.package_identifier,
        ?missing,
        "shipment has no event log"
      );
    }
    Shipment {
      status: self.status(),
      reported_mode: self.reported_mode(),
      package_identifier: self.package_identifier,
      log,
    }
  }
}

// ─── Decoding ────────────────────────────────────────────────────────────────

/// Decode a reply held as text.
pub fn decode_str(package_identifier: &str, reply: &str) -> Result<Tracking> {
  decode(package_identifier, serde_json::from_str(reply)?)
}

/// Decode a Track reply for `package_identifier`.
///
/// Fails with [`Error::Failure`] when the carrier reports an error severity
/// and with [`Error::International`] for shipments that leave the US.
pub fn decode(package_identifier: &str, reply: Value) -> Result<Tracking> {
  let Envelope { track_reply } = serde_json::from_value(reply)?;

  if matches!(
    track_reply.highest_severity.to_ascii_uppercase().as_str(),
    "ERROR" | "FAILURE"
  ) {
    return Err(Error::Failure {
      package_identifier: package_identifier.to_owned(),
      message:            first_message(&track_reply.notifications)
        .unwrap_or_else(|| "no tracking information".to_owned()),
    });
  }

  let details = track_reply
    .track_details
    .ok_or_else(|| Error::Malformed("reply has no track_details".into()))?;
  let events = RawEvents::from_value(details.events)?;

  let international_service = details
    .service_info
    .as_deref()
    .is_some_and(|s| s.to_ascii_lowercase().contains("international"));
  if international_service || !events.as_slice().iter().all(RawEvent::is_domestic) {
    return Err(Error::International(package_identifier.to_owned()));
  }

  let (weight, weight_units) = match details.package_weight {
    Some(w) => (w.value.as_f64(), w.units),
    None => (None, None),
  };
  let package_count = details
    .package_count
    .and_then(|c| c.as_f64())
    .filter(|c| *c >= 1.0)
    .map_or(1, |c| c as u32);

  tracing::debug!(
    package_identifier,
    events = events.as_slice().len(),
    "decoded tracking reply"
  );

  Ok(Tracking {
    package_identifier: package_identifier.to_owned(),
    service_info: details.service_info,
    service_type: details.service_type,
    weight,
    weight_units,
    package_count,
    events,
  })
}

/// The first notification's message; `notifications` is an object or a list.
fn first_message(notifications: &Value) -> Option<String> {
  let first = match notifications {
    Value::Array(items) => items.first()?,
    other => other,
  };
  first.get("message")?.as_str().map(str::to_owned)
}

/// RFC 3339, or a bare local time read as UTC.
fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>> {
  DateTime::parse_from_rfc3339(s)
    .or_else(|_| {
      NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|naive| naive.and_utc().fixed_offset())
    })
    .map_err(|_| Error::InvalidTimestamp(s.to_owned()))
}
