use std::time::Duration;

use crate::catalog::Track;

use super::types::{PlaybackPhase, ResourceId};

/// The one playback aggregate. Every surface reads it through the getters;
/// only the player module writes it, so its fields stay private.
#[derive(Default)]
pub struct PlaybackSession {
    track: Option<Track>,
    resource: Option<ResourceId>,
    phase: PlaybackPhase,
    position: Duration,
    duration: Duration,
    ticker_running: bool,
}

impl PlaybackSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    pub fn track_id(&self) -> Option<&str> {
        self.track.as_ref().map(|t| t.id.as_str())
    }

    pub fn resource(&self) -> Option<ResourceId> {
        self.resource
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }

    /// True when `id` names the session's current track.
    pub fn is_current(&self, id: &str) -> bool {
        self.track_id() == Some(id)
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    /// Known duration, or `None` while the backend has not reported one.
    pub fn duration(&self) -> Option<Duration> {
        if self.duration.is_zero() {
            None
        } else {
            Some(self.duration)
        }
    }

    pub fn ticker_running(&self) -> bool {
        self.ticker_running
    }

    pub(super) fn begin_loading(&mut self, track: Track, resource: ResourceId) {
        self.track = Some(track);
        self.resource = Some(resource);
        self.phase = PlaybackPhase::Loading;
        self.position = Duration::ZERO;
        self.duration = Duration::ZERO;
    }

    pub(super) fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
        if !duration.is_zero() && self.position > duration {
            self.position = duration;
        }
    }

    pub(super) fn mark_playing(&mut self) {
        self.phase = PlaybackPhase::Playing;
    }

    pub(super) fn mark_paused(&mut self) {
        self.phase = PlaybackPhase::Paused;
    }

    /// Advance the playhead. Within one track the position never regresses
    /// and never passes a known duration.
    pub(super) fn set_position(&mut self, position: Duration) {
        if self.track.is_none() {
            return;
        }
        let mut next = self.position.max(position);
        if !self.duration.is_zero() {
            next = next.min(self.duration);
        }
        self.position = next;
    }

    pub(super) fn set_ticker_running(&mut self, running: bool) {
        self.ticker_running = running;
    }

    /// Drop the current track and return to idle with zeroed times. Hands
    /// back the resource that must be released, if one was held.
    pub(super) fn reset(&mut self) -> Option<ResourceId> {
        let released = self.resource.take();
        self.track = None;
        self.phase = PlaybackPhase::Idle;
        self.position = Duration::ZERO;
        self.duration = Duration::ZERO;
        released
    }
}
