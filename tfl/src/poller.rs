use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::{Client, LineStatus, Prediction};

/// What the background poller hands to the UI thread. The receiver
/// drains these from its event loop; the poller never touches anything
/// else.
pub enum FeedEvent {
    Arrivals(Vec<Prediction>),
    Status(Vec<LineStatus>),
    /// A failed arrivals fetch. The map keeps showing the previous
    /// positions; this is display material, not an abort.
    Error(String),
}

/// Owns a thread that polls arrivals and line status on independent
/// cadences. The two intervals are deliberately unrelated to how often
/// the map refreshes.
pub struct Poller {
    rx: Receiver<FeedEvent>,
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Poller {
    pub fn spawn(client: Client, arrivals_every: Duration, status_every: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let (tx, rx) = mpsc::channel();
        let handle =
            thread::spawn(move || run(client, arrivals_every, status_every, tx, thread_stop));
        Self {
            rx,
            stop,
            handle: Some(handle),
        }
    }

    /// Everything that arrived since the last call. Never blocks.
    pub fn drain(&self) -> Vec<FeedEvent> {
        self.rx.try_iter().collect()
    }

    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(
    client: Client,
    arrivals_every: Duration,
    status_every: Duration,
    tx: Sender<FeedEvent>,
    stop: Arc<AtomicBool>,
) {
    // Fire both fetches immediately on startup
    let mut next_arrivals = Instant::now();
    let mut next_status = Instant::now();

    while !stop.load(Ordering::Relaxed) {
        let now = Instant::now();
        if now >= next_arrivals {
            next_arrivals = now + arrivals_every;
            let event = match client.arrivals() {
                Ok(batch) => {
                    info!("Got {} predictions for {}", batch.len(), client.line());
                    FeedEvent::Arrivals(batch)
                }
                Err(err) => FeedEvent::Error(format!("{err:#}")),
            };
            if tx.send(event).is_err() {
                break;
            }
        }
        if now >= next_status {
            next_status = now + status_every;
            match client.line_status() {
                Ok(status) => {
                    if tx.send(FeedEvent::Status(status)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    // The map works fine without a status banner
                    warn!("Couldn't fetch line status: {err:#}");
                }
            }
        }
        // Sleep in small steps so stop() doesn't wait out a full poll
        // interval
        thread::sleep(Duration::from_millis(200));
    }
}
