//! The audio seam and the bundled rodio implementation.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

use super::types::{PlayerSignal, ResourceEvent, ResourceEventKind, ResourceId, SignalSender};

/// Contract between the controller and whatever actually produces audio.
///
/// `create` hands back an identity for one playable resource; every later
/// call and every event refers to that identity. Outcomes of `start`,
/// `pause` and `resume` arrive asynchronously on the signal channel,
/// tagged with the originating resource.
pub trait AudioBackend {
    fn create(&mut self, locator: &str) -> ResourceId;
    fn start(&mut self, id: ResourceId);
    fn pause(&mut self, id: ResourceId);
    fn resume(&mut self, id: ResourceId);
    fn release(&mut self, id: ResourceId);
    fn position(&self, id: ResourceId) -> Option<Duration>;
    /// Give polling backends a chance to notice completed resources.
    /// Called once per controller poll; the default does nothing.
    fn pump(&mut self) {}
}

enum Resource {
    Ready { sink: Sink, started: bool },
    Broken { reason: String },
}

/// Plays resources through rodio sinks on the default output device.
pub struct RodioBackend {
    stream: OutputStream,
    signals: SignalSender,
    resources: HashMap<ResourceId, Resource>,
    next_id: u64,
    volume: f32,
}

impl RodioBackend {
    pub fn new(signals: SignalSender, volume: f32) -> Self {
        let mut stream =
            OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        Self {
            stream,
            signals,
            resources: HashMap::new(),
            next_id: 0,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    fn emit(&self, resource: ResourceId, kind: ResourceEventKind) {
        let _ = self
            .signals
            .send(PlayerSignal::Resource(ResourceEvent { resource, kind }));
    }
}

impl AudioBackend for RodioBackend {
    fn create(&mut self, locator: &str) -> ResourceId {
        self.next_id += 1;
        let id = ResourceId(self.next_id);

        let resource = match open_sink(&self.stream, locator, self.volume) {
            Ok((sink, duration)) => {
                if let Some(duration) = duration {
                    self.emit(id, ResourceEventKind::MetadataLoaded { duration });
                }
                Resource::Ready {
                    sink,
                    started: false,
                }
            }
            Err(reason) => Resource::Broken { reason },
        };

        self.resources.insert(id, resource);
        id
    }

    fn start(&mut self, id: ResourceId) {
        let outcome = match self.resources.get_mut(&id) {
            Some(Resource::Ready { sink, started }) => {
                sink.play();
                *started = true;
                ResourceEventKind::Started
            }
            Some(Resource::Broken { reason }) => ResourceEventKind::StartFailed {
                reason: reason.clone(),
            },
            None => return,
        };
        self.emit(id, outcome);
    }

    fn pause(&mut self, id: ResourceId) {
        if let Some(Resource::Ready { sink, .. }) = self.resources.get_mut(&id) {
            sink.pause();
            self.emit(id, ResourceEventKind::PauseAcked);
        }
    }

    fn resume(&mut self, id: ResourceId) {
        // A resume outcome is reported the same way as a fresh start.
        self.start(id);
    }

    fn release(&mut self, id: ResourceId) {
        if let Some(Resource::Ready { sink, .. }) = self.resources.remove(&id) {
            sink.stop();
        }
    }

    fn position(&self, id: ResourceId) -> Option<Duration> {
        match self.resources.get(&id) {
            Some(Resource::Ready { sink, .. }) => Some(sink.get_pos()),
            _ => None,
        }
    }

    fn pump(&mut self) {
        let mut ended: Vec<ResourceId> = Vec::new();
        for (id, resource) in self.resources.iter_mut() {
            if let Resource::Ready { sink, started } = resource {
                if *started && sink.empty() {
                    *started = false;
                    ended.push(*id);
                }
            }
        }
        for id in ended {
            self.emit(id, ResourceEventKind::Ended);
        }
    }
}

fn open_sink(
    stream: &OutputStream,
    locator: &str,
    volume: f32,
) -> Result<(Sink, Option<Duration>), String> {
    let file = File::open(locator).map_err(|e| format!("{locator}: {e}"))?;
    let source = Decoder::new(BufReader::new(file)).map_err(|e| format!("{locator}: {e}"))?;
    let duration = source.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();

    Ok((sink, duration))
}
