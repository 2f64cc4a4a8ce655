use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::sleep;
use std::time::{Duration, Instant};

/// Explicit scheduler handle for the tick loop.
///
/// Ticks run strictly sequentially: a tick must complete before the next one
/// fires, and the loop sleeps off whatever remains of the interval. The stop
/// flag can be flipped from another thread (e.g. a Ctrl+C handler).
pub struct TickLoop {
    interval: Duration,
    max_ticks: Option<u64>,
    running: Arc<AtomicBool>,
}

impl TickLoop {
    pub fn new(interval: Duration, max_ticks: Option<u64>) -> Self {
        Self {
            interval,
            max_ticks,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Shared flag for stopping the loop from another thread.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Runs `tick_fn` once per interval until stopped or `max_ticks` is
    /// reached. Blocks the calling thread.
    pub fn run(&self, mut tick_fn: impl FnMut(u64)) {
        let mut tick: u64 = 0;

        while self.running.load(Ordering::SeqCst) {
            if let Some(max) = self.max_ticks {
                if tick >= max {
                    break;
                }
            }

            let start = Instant::now();
            tick_fn(tick);
            tick += 1;

            let elapsed = start.elapsed();
            if elapsed < self.interval {
                sleep(self.interval - elapsed);
            } else {
                log::warn!("tick overran its interval: {:?} > {:?}", elapsed, self.interval);
            }
        }
    }
}
