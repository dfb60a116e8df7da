//! Playback: one session, one controller, at most one live audio resource.

mod backend;
mod controller;
mod session;
mod ticker;
mod types;

pub use backend::{AudioBackend, RodioBackend};
pub use controller::PlayerController;
pub use session::PlaybackSession;
pub use ticker::ProgressTicker;
pub use types::*;
