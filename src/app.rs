//! Application module: exposes the surface state used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the two surfaces with
//! their result pages, cursors and query state.

mod model;

pub use model::*;
