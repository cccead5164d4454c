//! Leading-edge coalescing throttle
//!
//! Bounds how often a callback runs while guaranteeing the latest value is
//! never lost: the first call in a burst fires immediately, calls inside
//! the throttle window overwrite a single pending slot, and one trailing
//! fire at window expiry delivers whatever value arrived last. A scheduled
//! trailing fire cannot be cancelled; it always eventually executes.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Leading-edge, coalescing rate limiter
///
/// `call` never blocks; the trailing fire runs on the tokio runtime.
pub struct Throttle<T> {
    interval: Duration,
    apply: Arc<dyn Fn(T) + Send + Sync>,
    inner: Arc<Mutex<Inner<T>>>,
}

struct Inner<T> {
    last_fire: Option<Instant>,
    pending: Option<T>,
    trailing_scheduled: bool,
}

impl<T: Send + 'static> Throttle<T> {
    pub fn new(interval: Duration, apply: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            interval,
            apply: Arc::new(apply),
            inner: Arc::new(Mutex::new(Inner {
                last_fire: None,
                pending: None,
                trailing_scheduled: false,
            })),
        }
    }

    /// Submit a value.
    ///
    /// Fires the callback immediately when outside the throttle window,
    /// otherwise replaces the pending value and (once per window) schedules
    /// the trailing fire.
    pub fn call(&self, value: T) {
        let now = Instant::now();
        let mut inner = self.inner.lock().unwrap();

        let elapsed = inner.last_fire.map(|t| now.duration_since(t));
        let in_window = matches!(elapsed, Some(e) if e < self.interval);

        if !in_window && !inner.trailing_scheduled {
            inner.last_fire = Some(now);
            drop(inner);
            (self.apply)(value);
            return;
        }

        // Inside the window (or a trailing fire is already due): coalesce.
        inner.pending = Some(value);

        if !inner.trailing_scheduled {
            inner.trailing_scheduled = true;
            let remaining = self.interval.saturating_sub(elapsed.unwrap_or_default());
            let apply = Arc::clone(&self.apply);
            let shared = Arc::clone(&self.inner);

            tokio::spawn(async move {
                tokio::time::sleep(remaining).await;
                let value = {
                    let mut inner = shared.lock().unwrap();
                    inner.trailing_scheduled = false;
                    inner.last_fire = Some(Instant::now());
                    inner.pending.take()
                };
                if let Some(value) = value {
                    tracing::trace!("throttle trailing fire");
                    apply(value);
                }
            });
        }
    }
}
