//! Read-only projections from playback and catalog state to row models.

mod list;

pub use list::*;
