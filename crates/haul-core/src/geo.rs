//! Points, places and the distance between them.

use serde::{Deserialize, Serialize};

/// Mean radius of the Earth in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
  pub latitude:  f64,
  pub longitude: f64,
}

impl Point {
  pub fn new(latitude: f64, longitude: f64) -> Self {
    Self {
      latitude,
      longitude,
    }
  }
}

/// What a location code resolves to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
  pub point:    Point,
  /// Locality name, e.g. `"Topeka, KS"`. Two places in the same locality
  /// make an in-town leg.
  pub locality: String,
}

/// Haversine distance between `a` and `b` in miles.
pub fn great_circle_miles(a: Point, b: Point) -> f64 {
  let (lat_a, lat_b) = (a.latitude.to_radians(), b.latitude.to_radians());
  let d_lat = lat_b - lat_a;
  let d_lon = (b.longitude - a.longitude).to_radians();

  let h = (d_lat / 2.0).sin().powi(2)
    + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
  2.0 * EARTH_RADIUS_MILES * h.sqrt().min(1.0).asin()
}
