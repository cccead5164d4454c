//! Playback position tracking
//!
//! The time observer is the single source of truth for the current
//! playback position. A privileged owner writes through a throttled API;
//! everything else reads through cheap cloned readers.

pub mod observer;
pub mod throttle;

pub use observer::{TimeObserver, TimeReader, TimeState, TimeUpdate};
pub use throttle::Throttle;
