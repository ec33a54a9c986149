//! Core types and trait definitions for haul.
//!
//! Reconstructs the legs a package travelled from its carrier tracking events
//! and prices each leg through an emissions estimator. This crate is free of
//! HTTP and database dependencies; geocoding, emissions estimation and
//! tracking retrieval are expressed as traits implemented elsewhere.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod assess;
pub mod builder;
pub mod emissions;
pub mod error;
pub mod event;
pub mod geo;
pub mod resolve;
pub mod segment;
pub mod tracking;

pub use error::{Error, Result};

#[cfg(test)]
mod testing;
