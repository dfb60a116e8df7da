//! Playback signal types and handles.
//!
//! This module defines the resource identity, the signal enum delivered to
//! the controller, and the callback types used for rendering and notices.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

/// Identity of one live audio resource. Identities are never reused within
/// a process, which is what makes stale-event discard safe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(pub u64);

/// Where the session is in its lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// No track loaded.
    Idle,
    /// A start request is pending.
    Loading,
    Playing,
    Paused,
}

impl Default for PlaybackPhase {
    fn default() -> Self {
        Self::Idle
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// A user-facing status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// What a backend can report about one resource.
#[derive(Debug, Clone)]
pub enum ResourceEventKind {
    /// The resource's duration became known.
    MetadataLoaded { duration: Duration },
    /// A start or resume request succeeded; audio is audible.
    Started,
    /// A start or resume request failed.
    StartFailed { reason: String },
    /// A pause request took effect.
    PauseAcked,
    /// The playhead moved.
    PositionChanged { position: Duration },
    /// The resource played to its natural end.
    Ended,
    /// The resource died mid-playback.
    Failed { reason: String },
}

/// One backend report, tagged with the resource it is about.
#[derive(Debug, Clone)]
pub struct ResourceEvent {
    pub resource: ResourceId,
    pub kind: ResourceEventKind,
}

/// Everything that wakes the controller between polls.
#[derive(Debug, Clone)]
pub enum PlayerSignal {
    Resource(ResourceEvent),
    Tick,
}

pub type SignalSender = Sender<PlayerSignal>;

pub fn signal_channel() -> (SignalSender, Receiver<PlayerSignal>) {
    mpsc::channel()
}

/// Callback fired whenever the session changed meaningfully.
pub type RenderHook = Box<dyn FnMut()>;

/// Callback receiving user-facing notices from the controller.
pub type NoticeSink = Box<dyn FnMut(Notice)>;
