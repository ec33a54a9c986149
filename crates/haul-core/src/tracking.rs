//! The tracking data source.

use std::future::Future;

use serde::Serialize;

use crate::{
  Error, Result,
  event::{EventLog, Status},
  segment::Mode,
};

/// What a tracking lookup yields for one package.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shipment {
  pub package_identifier: String,
  /// Derived from the raw events, so present even without `log`.
  pub status:             Status,
  /// Mode implied by the carrier's service description, if it names one.
  pub reported_mode:      Option<Mode>,
  /// The journey, or why it could not be read. Never affects `status`.
  pub log:                Result<EventLog, MissingLog>,
}

impl Shipment {
  /// The event log, or the error explaining its absence.
  pub fn event_log(&self) -> Result<&EventLog> {
    self.log.as_ref().map_err(|missing| missing.clone().into())
  }
}

/// Why a [`Shipment`] has no event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MissingLog {
  /// The payload has events, but not as a list.
  NoSegmentInformation,
  UnorderedEvents { index: usize },
  Malformed { message: String },
}

impl From<Error> for MissingLog {
  fn from(e: Error) -> Self {
    match e {
      Error::NoSegmentInformation => MissingLog::NoSegmentInformation,
      Error::UnorderedEvents { index } => MissingLog::UnorderedEvents { index },
      other => MissingLog::Malformed {
        message: other.to_string(),
      },
    }
  }
}

impl From<MissingLog> for Error {
  fn from(missing: MissingLog) -> Self {
    match missing {
      MissingLog::NoSegmentInformation => Error::NoSegmentInformation,
      MissingLog::UnorderedEvents { index } => Error::UnorderedEvents { index },
      MissingLog::Malformed { message } => Error::MalformedEvents(message),
    }
  }
}

// ─── Failures ────────────────────────────────────────────────────────────────

/// Why a tracking lookup could not produce a [`Shipment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupFailure {
  /// The carrier has no information for the package (yet).
  NotFound,
  /// The package crosses a border; only domestic shipments are assessed.
  International,
  /// Transport, decoding or any other failure.
  Unavailable,
}

/// Error type of a [`TrackingSource`]; callers branch on [`LookupFailure`].
pub trait TrackingError: std::error::Error + Send + Sync + 'static {
  fn failure(&self) -> LookupFailure;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a carrier tracking service.
///
/// Lookups that cannot be assessed fail as a whole; nothing is retried.
pub trait TrackingSource: Send + Sync {
  type Error: TrackingError;

  fn track<'a>(
    &'a self,
    package_identifier: &'a str,
  ) -> impl Future<Output = Result<Shipment, Self::Error>> + Send + 'a;
}
