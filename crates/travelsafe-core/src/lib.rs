//! Core types and scoring logic for TravelSafe.
//!
//! This crate has no HTTP or database dependencies. It owns
//! the incident data model, the [`store::IncidentStore`] abstraction, the
//! geospatial crime aggregator and the score fusion engine.

// Store impls use native `async fn` against the `Send`-bounded trait methods.
#![allow(async_fn_in_trait)]

pub mod assess;
pub mod crime;
pub mod error;
pub mod fusion;
pub mod hazard;
pub mod incident;
pub mod level;
pub mod location;
pub mod store;
pub mod weather;

pub use error::{Error, Result};
