use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use super::types::{PlayerSignal, SignalSender};

/// Repeating timer feeding `Tick` signals into the player channel while it
/// runs. `start` and `stop` are idempotent; at most one timer thread is
/// live per ticker.
pub struct ProgressTicker {
    signals: SignalSender,
    interval: Duration,
    stop_flag: Option<Arc<AtomicBool>>,
}

impl ProgressTicker {
    pub fn new(signals: SignalSender, interval: Duration) -> Self {
        Self {
            signals,
            interval,
            stop_flag: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.stop_flag.is_some()
    }

    pub fn start(&mut self) {
        if self.stop_flag.is_some() {
            return;
        }

        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let signals = self.signals.clone();
        let interval = self.interval;

        thread::spawn(move || {
            loop {
                thread::sleep(interval);
                if thread_stop.load(Ordering::Relaxed) {
                    break;
                }
                // Nobody listening means the player is gone.
                if signals.send(PlayerSignal::Tick).is_err() {
                    break;
                }
            }
        });

        self.stop_flag = Some(stop);
    }

    pub fn stop(&mut self) {
        if let Some(stop) = self.stop_flag.take() {
            stop.store(true, Ordering::Relaxed);
        }
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
