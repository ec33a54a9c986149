//! FedEx Track reply codec for haul.
//!
//! Converts Track v4 replies (as JSON) into [`haul_core`] shipments. Decoding
//! is pure and synchronous; [`ReplyArchive`] serves saved replies as a
//! [`TrackingSource`](haul_core::tracking::TrackingSource).
//!
//! # Quick start
//!
//! ```no_run
//! use haul_fedex::decode_str;
//!
//! let reply = std::fs::read_to_string("382544330058603.json").unwrap();
//! let tracking = decode_str("382544330058603", &reply).unwrap();
//! let log = tracking.event_log().unwrap();
//! println!("{:?}, {} legs", tracking.status(), log.segments().len());
//! ```

pub mod archive;
mod decode;
pub mod error;

pub use archive::ReplyArchive;
pub use decode::{Tracking, decode, decode_str};
pub use error::{Error, Result};
