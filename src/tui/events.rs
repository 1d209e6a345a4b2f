use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CEvent, KeyEvent};

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    /// Terminal was resized; the next draw picks up the new size
    Resize,
    Tick,
}

/// Terminal input plus a fixed-rate tick, delivered over one channel.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
    stop: Arc<AtomicBool>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let tick_rate = Duration::from_millis(tick_rate_ms);

        let stop_flag = Arc::clone(&stop);
        thread::spawn(move || {
            let mut last_tick = Instant::now();
            while !stop_flag.load(Ordering::Relaxed) {
                let timeout = tick_rate.saturating_sub(last_tick.elapsed());

                if event::poll(timeout).unwrap_or(false) {
                    let forwarded = match event::read() {
                        Ok(CEvent::Key(key)) => Some(Event::Key(key)),
                        Ok(CEvent::Resize(_, _)) => Some(Event::Resize),
                        Ok(_) => None,
                        Err(_) => break,
                    };
                    if let Some(ev) = forwarded {
                        if tx.send(ev).is_err() {
                            break;
                        }
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if tx.send(Event::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self { rx, stop }
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        // The reader thread exits after its current poll timeout
        self.stop.store(true, Ordering::Relaxed);
    }
}
