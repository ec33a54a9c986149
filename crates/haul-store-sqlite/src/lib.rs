//! SQLite gazetteer for haul.
//!
//! Maps zip codes to coordinates and locality names. Wraps
//! [`tokio_rusqlite`] so lookups run on a dedicated thread without blocking
//! the async runtime.

mod gazetteer;
mod schema;

pub mod error;

pub use error::{Error, Result};
pub use gazetteer::{SqliteGazetteer, ZipCode};
