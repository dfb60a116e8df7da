//! Catalog access: track model, per-surface result sets and the HTTP client.
//!
//! The result set is the only way the rest of the crate resolves a track
//! identifier; an id that is not in the currently loaded page is treated
//! as not found, never as an error.

mod client;
mod model;
mod result_set;

pub use client::{CatalogClient, ClientError, TrackQuery};
pub use model::{Order, Track};
pub use result_set::ResultSet;

#[cfg(test)]
mod tests;
