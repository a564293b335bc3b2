//! Core types and pure transformations for the IBTrACS track store.
//!
//! This crate is deliberately free of HTTP and database dependencies. It holds
//! the [`TrackPoint`](track::TrackPoint) model, the row normalizer, genesis
//! resolution, incremental filtering, the storm reshaping fold, and the
//! [`TrackStore`](store::TrackStore) trait implemented by storage backends.

// Native `async fn` in traits; see `store`.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod filter;
pub mod genesis;
pub mod normalize;
pub mod storm;
pub mod store;
pub mod track;

pub use error::{Error, Result};
