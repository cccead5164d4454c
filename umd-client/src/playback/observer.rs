//! Playback time observer
//!
//! Shared playback-position state with a privileged write API. The owner
//! holds the [`TimeObserver`] and is the only party that can mutate; any
//! number of [`TimeReader`] clones observe the same state.
//!
//! Locking follows the shared-parameter pattern: std `RwLock` with
//! `.unwrap()` — a poisoned lock means a writer panicked mid-update and
//! fail-fast is the correct response.

use crate::playback::throttle::Throttle;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use umd_common::{Error, Result};

/// How often throttled time updates are applied at most
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_millis(100);

/// Current playback position and its watermarks
#[derive(Debug, Clone, Copy)]
pub struct TimeState {
    /// Current frame index
    pub frame: u64,
    /// Current position in flicks
    pub flick: i64,
    /// Frames per second; NaN until [`TimeObserver::initialize`] runs
    pub frame_rate: f64,
    /// Source-format frame rate, when known
    pub original_fps: Option<f64>,
    /// Highest frame seen (never decreases)
    pub max_frame: u64,
    /// Highest segment seen (never decreases, -1 before any segment)
    pub max_segment: i64,
}

impl TimeState {
    fn new() -> Self {
        Self {
            frame: 0,
            flick: 0,
            frame_rate: f64::NAN,
            original_fps: None,
            max_frame: 0,
            max_segment: -1,
        }
    }

    /// Whether `initialize` has been called yet
    pub fn is_initialized(&self) -> bool {
        !self.frame_rate.is_nan()
    }
}

/// One throttled position update
///
/// `frame`/`flick` overwrite the stored values wholesale; the optional
/// watermarks only ever raise theirs. No range validation is performed —
/// out-of-range numerics are accepted silently.
#[derive(Debug, Clone, Copy)]
pub struct TimeUpdate {
    pub frame: u64,
    pub flick: i64,
    pub max_frame: Option<u64>,
    pub max_segment: Option<i64>,
}

impl TimeUpdate {
    /// Position-only update, watermarks untouched
    pub fn position(frame: u64, flick: i64) -> Self {
        Self {
            frame,
            flick,
            max_frame: None,
            max_segment: None,
        }
    }
}

/// Read-only view of the observer's state
#[derive(Clone)]
pub struct TimeReader {
    shared: Arc<RwLock<TimeState>>,
}

impl TimeReader {
    pub fn snapshot(&self) -> TimeState {
        *self.shared.read().unwrap()
    }

    pub fn frame(&self) -> u64 {
        self.shared.read().unwrap().frame
    }

    pub fn flick(&self) -> i64 {
        self.shared.read().unwrap().flick
    }

    pub fn frame_rate(&self) -> f64 {
        self.shared.read().unwrap().frame_rate
    }

    pub fn original_fps(&self) -> Option<f64> {
        self.shared.read().unwrap().original_fps
    }

    pub fn max_frame(&self) -> u64 {
        self.shared.read().unwrap().max_frame
    }

    pub fn max_segment(&self) -> i64 {
        self.shared.read().unwrap().max_segment
    }
}

/// Owner of the playback time state
pub struct TimeObserver {
    shared: Arc<RwLock<TimeState>>,
    throttle: Throttle<TimeUpdate>,
}

impl TimeObserver {
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_UPDATE_INTERVAL)
    }

    pub fn with_interval(update_interval: Duration) -> Self {
        let shared = Arc::new(RwLock::new(TimeState::new()));
        let writer = Arc::clone(&shared);
        let throttle = Throttle::new(update_interval, move |update: TimeUpdate| {
            apply_update(&writer, update);
        });
        Self { shared, throttle }
    }

    /// Hand out a read-only view; cloning the reader is cheap
    pub fn reader(&self) -> TimeReader {
        TimeReader {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Set the frame rate and source-format rate
    ///
    /// Rejects a non-finite `frame_rate` before touching any state.
    /// Callable repeatedly; the last write wins.
    pub fn initialize(&self, frame_rate: f64, original_fps: Option<f64>) -> Result<()> {
        if !frame_rate.is_finite() {
            return Err(Error::InvalidInput(format!(
                "frame_rate={frame_rate} is not a number"
            )));
        }

        let mut state = self.shared.write().unwrap();
        state.frame_rate = frame_rate;
        state.original_fps = original_fps;
        Ok(())
    }

    /// Throttled position update
    ///
    /// The first call in a burst applies immediately; later calls within
    /// the throttle window collapse into at most one trailing application
    /// carrying the latest values.
    pub fn update_time(&self, update: TimeUpdate) {
        self.throttle.call(update);
    }

    /// Raise the segment watermark immediately, bypassing the throttle
    ///
    /// For callers that must not be coalesced. Values below the current
    /// watermark are ignored.
    pub fn set_max_segment(&self, segment: i64) {
        let mut state = self.shared.write().unwrap();
        state.max_segment = state.max_segment.max(segment);
    }
}

impl Default for TimeObserver {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_update(shared: &RwLock<TimeState>, update: TimeUpdate) {
    let mut state = shared.write().unwrap();
    state.frame = update.frame;
    state.flick = update.flick;
    if let Some(max_frame) = update.max_frame {
        state.max_frame = state.max_frame.max(max_frame);
    }
    if let Some(max_segment) = update.max_segment {
        state.max_segment = state.max_segment.max(max_segment);
    }
}
