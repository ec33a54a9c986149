//! Segment inference.
//!
//! Folds a chronological event history into travel legs. Only events that
//! carry a location take part. Each step pops the most recent leg off the
//! accumulator and pushes back either an updated copy of it, or the leg
//! followed by a new one:
//!
//! | most recent leg | event location            | result                         |
//! |-----------------|---------------------------|--------------------------------|
//! | none            | any                       | open a leg there               |
//! | open            | same as its origin        | move its departure forward     |
//! | open            | elsewhere                 | close it there                 |
//! | closed          | same as its destination   | open the next leg there        |
//! | closed          | elsewhere                 | bridge destination → location  |

use chrono::{DateTime, FixedOffset};

use crate::{event::Event, segment::Segment};

/// Builds the legs of one package. Weight and package count are copied onto
/// every leg unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentBuilder {
  weight:        Option<f64>,
  package_count: u32,
}

impl SegmentBuilder {
  pub fn new(weight: Option<f64>, package_count: u32) -> Self {
    Self {
      weight,
      package_count,
    }
  }

  /// Infer the legs described by `events`, which must be oldest first.
  ///
  /// The last leg is left open when the package has not been seen anywhere
  /// after leaving its origin.
  pub fn build<'a>(
    &self,
    events: impl IntoIterator<Item = &'a Event>,
  ) -> Vec<Segment> {
    events
      .into_iter()
      .filter_map(|e| e.location_code.as_deref().map(|loc| (loc, e.timestamp)))
      .fold(Vec::new(), |legs, (location, at)| {
        self.advance(legs, location, at)
      })
  }

  fn advance(
    &self,
    mut legs: Vec<Segment>,
    location: &str,
    at: DateTime<FixedOffset>,
  ) -> Vec<Segment> {
    let Some(last) = legs.pop() else {
      legs.push(self.open(location, at));
      return legs;
    };

    match last.destination.clone() {
      // Still waiting at the origin; the latest scan there is the departure.
      None if last.origin == location => {
        legs.push(Segment { depart: at, ..last });
      }
      None => {
        legs.push(Segment {
          destination: Some(location.to_owned()),
          arrive: Some(at),
          ..last
        });
      }
      Some(destination) if destination == location => {
        legs.push(last);
        legs.push(self.open(location, at));
      }
      Some(destination) => {
        tracing::debug!(
          from = %destination,
          to = %location,
          "no scan links consecutive legs, bridging"
        );
        // A new leg starts when the previous one ended.
        let depart = last.arrive.unwrap_or(last.depart);
        legs.push(last);
        legs.push(Segment {
          origin: destination,
          destination: Some(location.to_owned()),
          depart,
          arrive: Some(at),
          weight: self.weight,
          package_count: self.package_count,
        });
      }
    }
    legs
  }

  fn open(&self, location: &str, at: DateTime<FixedOffset>) -> Segment {
    Segment::open(location, at, self.weight, self.package_count)
  }
}
