use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::catalog::ResultSet;

use super::backend::AudioBackend;
use super::session::PlaybackSession;
use super::ticker::ProgressTicker;
use super::types::{
    Notice, NoticeSink, PlaybackPhase, PlayerSignal, RenderHook, ResourceEvent, ResourceEventKind,
    Severity, SignalSender,
};

/// The playback state machine. The controller is the only writer of the
/// session; every surface routes gestures through its operations and every
/// backend outcome arrives on its signal channel.
pub struct PlayerController<B: AudioBackend> {
    session: PlaybackSession,
    backend: B,
    ticker: ProgressTicker,
    signal_rx: Receiver<PlayerSignal>,
    render_hooks: Vec<RenderHook>,
    notices: NoticeSink,
}

impl<B: AudioBackend> PlayerController<B> {
    pub fn new(
        backend: B,
        signals: SignalSender,
        signal_rx: Receiver<PlayerSignal>,
        tick_interval: Duration,
        notices: NoticeSink,
    ) -> Self {
        Self {
            session: PlaybackSession::new(),
            backend,
            ticker: ProgressTicker::new(signals, tick_interval),
            signal_rx,
            render_hooks: Vec::new(),
            notices,
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    /// Register a callback fired whenever the session changed meaningfully.
    pub fn add_render_hook(&mut self, hook: RenderHook) {
        self.render_hooks.push(hook);
    }

    /// Play `track_id` out of `results`, or toggle when it already is the
    /// current track. An id that does not resolve within `results` only
    /// produces a warning.
    pub fn play(&mut self, results: &ResultSet, track_id: &str) {
        if self.session.is_current(track_id) {
            match self.session.phase() {
                PlaybackPhase::Playing => self.pause(),
                PlaybackPhase::Paused => self.resume(),
                // A start is already pending; let it land.
                PlaybackPhase::Loading | PlaybackPhase::Idle => {}
            }
            return;
        }

        let Some(track) = results.find(track_id) else {
            self.notify(
                Severity::Warning,
                format!("Track {track_id} is not in the current results"),
            );
            return;
        };
        let track = track.clone();

        // Switching: the previous resource goes away before the new one exists.
        if let Some(old) = self.session.reset() {
            self.backend.release(old);
        }
        self.stop_ticker();

        let resource = self.backend.create(&track.audio_url);
        self.session.begin_loading(track, resource);
        self.backend.start(resource);
        self.render();
    }

    /// Request a pause; the phase changes when the backend acknowledges.
    pub fn pause(&mut self) {
        if self.session.phase() != PlaybackPhase::Playing {
            return;
        }
        if let Some(id) = self.session.resource() {
            self.backend.pause(id);
        }
    }

    /// Request a resume; the outcome arrives as a start event.
    pub fn resume(&mut self) {
        if self.session.phase() != PlaybackPhase::Paused {
            return;
        }
        if let Some(id) = self.session.resource() {
            self.backend.resume(id);
        }
    }

    /// Drop whatever is loaded and return to idle. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(id) = self.session.reset() {
            self.backend.release(id);
        }
        self.stop_ticker();
        self.render();
    }

    /// Drain pending signals. Called once per event-loop turn; each signal
    /// runs to completion before the next is taken.
    pub fn poll(&mut self) {
        self.backend.pump();
        while let Ok(signal) = self.signal_rx.try_recv() {
            match signal {
                PlayerSignal::Resource(event) => self.dispatch(event),
                PlayerSignal::Tick => self.tick(),
            }
        }
    }

    fn dispatch(&mut self, event: ResourceEvent) {
        // Events from a resource that is no longer current are leftovers of
        // an abandoned start or a switched track; drop them unprocessed.
        if self.session.resource() != Some(event.resource) {
            return;
        }

        match event.kind {
            ResourceEventKind::MetadataLoaded { duration } => {
                self.session.set_duration(duration);
                self.render();
            }
            ResourceEventKind::Started => {
                let started_message = if self.session.phase() == PlaybackPhase::Loading {
                    self.session
                        .track()
                        .map(|track| format!("Playing: {}", track.display()))
                } else {
                    None
                };
                self.session.mark_playing();
                self.start_ticker();
                if let Some(message) = started_message {
                    self.notify(Severity::Success, message);
                }
                self.render();
            }
            ResourceEventKind::StartFailed { reason } => {
                if let Some(id) = self.session.reset() {
                    self.backend.release(id);
                }
                self.stop_ticker();
                self.notify(Severity::Error, format!("Could not start playback: {reason}"));
                self.render();
            }
            ResourceEventKind::PauseAcked => {
                self.session.mark_paused();
                self.stop_ticker();
                self.render();
            }
            ResourceEventKind::PositionChanged { position } => {
                self.session.set_position(position);
                self.render();
            }
            ResourceEventKind::Ended => {
                // The track ran out on its own: same cleanup as stop, no notice.
                if let Some(id) = self.session.reset() {
                    self.backend.release(id);
                }
                self.stop_ticker();
                self.render();
            }
            ResourceEventKind::Failed { reason } => {
                if let Some(id) = self.session.reset() {
                    self.backend.release(id);
                }
                self.stop_ticker();
                self.notify(Severity::Error, format!("Playback failed: {reason}"));
                self.render();
            }
        }
    }

    /// One ticker beat: sample the live position while playing.
    fn tick(&mut self) {
        if !self.session.is_playing() {
            // A beat that slipped through after a pause or stop.
            return;
        }
        let Some(id) = self.session.resource() else {
            return;
        };
        if let Some(position) = self.backend.position(id) {
            self.session.set_position(position);
        }
        self.render();
    }

    fn start_ticker(&mut self) {
        self.ticker.start();
        self.session.set_ticker_running(self.ticker.is_running());
    }

    fn stop_ticker(&mut self) {
        self.ticker.stop();
        self.session.set_ticker_running(self.ticker.is_running());
    }

    fn render(&mut self) {
        for hook in &mut self.render_hooks {
            hook();
        }
    }

    fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        (self.notices)(Notice::new(severity, message));
    }
}
