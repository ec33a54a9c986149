//! Point resolution and the properties derived from it.
//!
//! Location codes are resolved to [`Place`]s by a [`PointResolver`]. A code
//! that resolves to nothing is normal (retired zip codes, typos in carrier
//! data) and degrades the affected legs to zero length rather than failing.

use std::{collections::HashMap, future::Future};

use serde::Serialize;

use crate::{
  Error, Result,
  geo::{Place, great_circle_miles},
  segment::{Mode, Segment, speed},
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a geocoder keyed by location code.
pub trait PointResolver: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Resolve `code` to a place. Returns `None` if the code is unknown.
  fn resolve<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<Place>, Self::Error>> + Send + 'a;
}

// ─── Memo ────────────────────────────────────────────────────────────────────

/// Resolves each distinct code at most once. Lives for a single assessment;
/// adjacent legs share an endpoint, so most codes are asked for twice.
pub struct PlaceCache<'r, R> {
  resolver: &'r R,
  places:   HashMap<String, Option<Place>>,
}

impl<'r, R: PointResolver> PlaceCache<'r, R> {
  pub fn new(resolver: &'r R) -> Self {
    Self {
      resolver,
      places: HashMap::new(),
    }
  }

  /// Resolve `code`, consulting the resolver only on first sight.
  pub async fn get(&mut self, code: &str) -> Result<Option<Place>> {
    if let Some(place) = self.places.get(code) {
      return Ok(place.clone());
    }

    tracing::trace!(code, "resolving location code");
    let place = self.resolver.resolve(code).await.map_err(|e| {
      Error::Resolution {
        code:   code.to_owned(),
        source: Box::new(e),
      }
    })?;
    if place.is_none() {
      tracing::debug!(code, "location code did not resolve");
    }
    self.places.insert(code.to_owned(), place.clone());
    Ok(place)
  }

  /// Resolve both endpoints of `segment`.
  pub async fn resolve_segment(
    &mut self,
    segment: Segment,
  ) -> Result<ResolvedSegment> {
    let origin_place = self.get(&segment.origin).await?;
    let destination_place = match segment.destination.as_deref() {
      Some(code) => self.get(code).await?,
      None => None,
    };
    Ok(ResolvedSegment {
      segment,
      origin_place,
      destination_place,
    })
  }

  /// Number of distinct codes looked up so far.
  pub fn len(&self) -> usize { self.places.len() }

  pub fn is_empty(&self) -> bool { self.places.is_empty() }
}

/// Resolve the endpoints of every segment, sharing lookups between them.
pub async fn survey<R: PointResolver>(
  resolver: &R,
  segments: impl IntoIterator<Item = Segment>,
) -> Result<Vec<ResolvedSegment>> {
  let mut cache = PlaceCache::new(resolver);
  let mut legs = Vec::new();
  for segment in segments {
    legs.push(cache.resolve_segment(segment).await?);
  }
  tracing::debug!(legs = legs.len(), codes = cache.len(), "surveyed segments");
  Ok(legs)
}

// ─── Resolved segment ────────────────────────────────────────────────────────

/// A segment together with the places its endpoints resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSegment {
  pub segment:           Segment,
  pub origin_place:      Option<Place>,
  /// Always `None` for an open segment.
  pub destination_place: Option<Place>,
}

impl ResolvedSegment {
  /// Great-circle miles between the endpoints; zero unless both resolved.
  pub fn length(&self) -> f64 {
    match (&self.origin_place, &self.destination_place) {
      (Some(a), Some(b)) => great_circle_miles(a.point, b.point),
      _ => 0.0,
    }
  }

  /// Average miles per hour; zero for legs without elapsed time.
  pub fn speed(&self) -> f64 {
    speed(self.length(), self.segment.duration_in_hours())
  }

  pub fn mode(&self) -> Mode { Mode::from_speed(self.speed()) }

  pub fn origin_city(&self) -> Option<&str> {
    self.origin_place.as_ref().map(|p| p.locality.as_str())
  }

  pub fn destination_city(&self) -> Option<&str> {
    self.destination_place.as_ref().map(|p| p.locality.as_str())
  }

  /// True for open legs and for legs whose endpoints share a locality.
  pub fn in_town(&self) -> bool {
    self.segment.destination.is_none()
      || self.origin_city() == self.destination_city()
  }

  /// Display range, e.g. `"Within Topeka, KS"` or `"Topeka, KS–Lenexa, KS"`.
  /// Unresolved endpoints are shown by their code.
  pub fn range(&self) -> String {
    let origin = self.origin_city().unwrap_or(&self.segment.origin);
    if self.in_town() {
      format!("Within {origin}")
    } else {
      let destination = self
        .destination_city()
        .unwrap_or(self.segment.final_destination());
      format!("{origin}\u{2013}{destination}")
    }
  }
}
