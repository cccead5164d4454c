//! Flick-based timing for frame-accurate playback positions
//!
//! This module provides the core timing abstraction for the UMD client,
//! using the flick: 1/705,600,000 of a second. The flick rate was chosen
//! (by the wider media industry) because it divides evenly by all common
//! video frame rates, so frame boundaries land exactly on flick boundaries.
//!
//! # Architecture
//!
//! The client tracks playback position in two representations:
//!
//! 1. **Frames**: u64 frame index within the video
//! 2. **Flicks (internal)**: i64 values at 705,600,000 Hz - exchanged with
//!    the playback engine and stored in playback state
//!
//! ## Flick Rate Selection
//!
//! 705,600,000 divides evenly by the common integer frame rates:
//!
//! - 24 fps (film): 705,600,000 ÷ 24 = 29,400,000 flicks/frame
//! - 25 fps (PAL): 705,600,000 ÷ 25 = 28,224,000 flicks/frame
//! - 30 fps: 705,600,000 ÷ 30 = 23,520,000 flicks/frame
//! - 60 fps: 705,600,000 ÷ 60 = 11,760,000 flicks/frame
//!
//! NTSC rational rates (e.g. 30000/1001) also convert exactly; the lookup
//! table below avoids recomputing the division and, more importantly,
//! avoids the floating point error of treating 29.97 as the true rate.
//!
//! # Precision and Overflow
//!
//! - i64::MAX flicks ≈ 414 years of video
//! - Table and integer-rate conversions are exact (zero rounding error)
//! - Arbitrary float rates round to the nearest flick

// ============================================================================
// Constants
// ============================================================================

/// Flick rate: 705,600,000 per second
///
/// Divides evenly by all common video frame rates, so frame↔flick
/// conversions at those rates carry no rounding error.
pub const FLICK_RATE: i64 = 705_600_000;

/// Lookup table of exact flicks-per-frame for NTSC rational frame rates
///
/// Entries are `(rate_numerator, rate_denominator, flicks_per_frame)`:
///
/// | Rate (fps)  | Flicks/Frame | Calculation |
/// |-------------|--------------|-------------|
/// | 24000/1001  | 29,429,400   | 705,600,000 × 1001 ÷ 24,000 |
/// | 30000/1001  | 23,543,520   | 705,600,000 × 1001 ÷ 30,000 |
/// | 60000/1001  | 11,771,760   | 705,600,000 × 1001 ÷ 60,000 |
/// | 120000/1001 | 5,885,880    | 705,600,000 × 1001 ÷ 120,000 |
pub const NTSC_FLICK_TABLE: [(u32, u32, i64); 4] = [
    (24_000, 1001, 29_429_400),
    (30_000, 1001, 23_543_520),
    (60_000, 1001, 11_771_760),
    (120_000, 1001, 5_885_880),
];

// ============================================================================
// Core Conversion Functions
// ============================================================================

/// Exact flicks-per-frame for a rational frame rate, if one exists
///
/// Checks the NTSC table first, then falls back to exact division:
/// `flicks = (705,600,000 × denominator) ÷ numerator` when the division
/// leaves no remainder. Returns `None` for rates that do not divide the
/// flick rate evenly (callers needing an approximation should use
/// [`flicks_per_frame_rounded`]).
///
/// # Examples
///
/// ```rust
/// use umd_common::timing::flicks_per_frame;
///
/// assert_eq!(flicks_per_frame(30_000, 1001), Some(23_543_520)); // NTSC
/// assert_eq!(flicks_per_frame(24, 1), Some(29_400_000));        // film
/// assert_eq!(flicks_per_frame(23_976, 1000), None);             // inexact
/// ```
pub fn flicks_per_frame(numerator: u32, denominator: u32) -> Option<i64> {
    if numerator == 0 || denominator == 0 {
        return None;
    }

    for (num, den, flicks) in NTSC_FLICK_TABLE {
        if num == numerator && den == denominator {
            return Some(flicks);
        }
    }

    let scaled = FLICK_RATE * denominator as i64;
    if scaled % numerator as i64 == 0 {
        Some(scaled / numerator as i64)
    } else {
        None
    }
}

/// Flicks-per-frame for an arbitrary frame rate, rounded to the nearest flick
///
/// Only for rates with no exact representation (e.g. a float 23.976 read
/// from container metadata). Maximum error is half a flick per frame,
/// ≈ 0.7 ns.
///
/// # Panics
///
/// Panics if `frame_rate` is not a positive finite number.
pub fn flicks_per_frame_rounded(frame_rate: f64) -> i64 {
    assert!(
        frame_rate.is_finite() && frame_rate > 0.0,
        "frame_rate must be positive and finite"
    );
    (FLICK_RATE as f64 / frame_rate).round() as i64
}

/// Convert a frame index to flicks
///
/// Uses simple multiplication: `flicks = frame × flicks_per_frame`.
/// Exact whenever `flicks_per_frame` came from [`flicks_per_frame`].
///
/// # Panics
///
/// Panics if `flicks_per_frame` is not positive.
pub fn frames_to_flicks(frame: u64, flicks_per_frame: i64) -> i64 {
    assert!(flicks_per_frame > 0, "flicks_per_frame must be > 0");
    frame as i64 * flicks_per_frame
}

/// Convert flicks to a frame index using truncating division
///
/// Flick values inside a frame round down to that frame's index, matching
/// "the frame currently on screen" semantics.
///
/// # Panics
///
/// Panics if `flicks_per_frame` is not positive or `flicks` is negative.
pub fn flicks_to_frames(flicks: i64, flicks_per_frame: i64) -> u64 {
    assert!(flicks_per_frame > 0, "flicks_per_frame must be > 0");
    assert!(flicks >= 0, "flicks must be >= 0");
    (flicks / flicks_per_frame) as u64
}

/// Convert flicks to seconds
pub fn flicks_to_seconds(flicks: i64) -> f64 {
    flicks as f64 / FLICK_RATE as f64
}

/// Convert seconds to flicks, rounded to the nearest flick
///
/// # Panics
///
/// Panics if `seconds` is not finite.
pub fn seconds_to_flicks(seconds: f64) -> i64 {
    assert!(seconds.is_finite(), "seconds must be finite");
    (seconds * FLICK_RATE as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ntsc_table_matches_exact_division() {
        for (num, den, flicks) in NTSC_FLICK_TABLE {
            assert_eq!(FLICK_RATE * den as i64 % num as i64, 0);
            assert_eq!(FLICK_RATE * den as i64 / num as i64, flicks);
        }
    }

    #[test]
    fn integer_rates_divide_exactly() {
        assert_eq!(flicks_per_frame(24, 1), Some(29_400_000));
        assert_eq!(flicks_per_frame(25, 1), Some(28_224_000));
        assert_eq!(flicks_per_frame(30, 1), Some(23_520_000));
        assert_eq!(flicks_per_frame(50, 1), Some(14_112_000));
        assert_eq!(flicks_per_frame(60, 1), Some(11_760_000));
    }

    #[test]
    fn ntsc_rates_use_table_values() {
        assert_eq!(flicks_per_frame(24_000, 1001), Some(29_429_400));
        assert_eq!(flicks_per_frame(30_000, 1001), Some(23_543_520));
        assert_eq!(flicks_per_frame(60_000, 1001), Some(11_771_760));
        assert_eq!(flicks_per_frame(120_000, 1001), Some(5_885_880));
    }

    #[test]
    fn inexact_rates_return_none() {
        // 23.976 as a decimal rational is NOT 24000/1001 and does not
        // divide the flick rate (factor of 37 in 23976)
        assert_eq!(flicks_per_frame(23_976, 1000), None);
        assert_eq!(flicks_per_frame(11, 1), None);
    }

    #[test]
    fn zero_rate_returns_none() {
        assert_eq!(flicks_per_frame(0, 1), None);
        assert_eq!(flicks_per_frame(24, 0), None);
    }

    #[test]
    fn rounded_fallback_is_close_to_table() {
        // float 23.976 lands near, but not on, the true 24000/1001 value
        let rounded = flicks_per_frame_rounded(23.976);
        let exact = flicks_per_frame(24_000, 1001).unwrap();
        assert_eq!(rounded, 29_429_429);
        assert!((rounded - exact).abs() < 50);
    }

    #[test]
    fn frame_flick_roundtrip_is_exact_for_table_rates() {
        let fpf = flicks_per_frame(30_000, 1001).unwrap();
        for frame in [0u64, 1, 100, 86_400 * 30] {
            let flicks = frames_to_flicks(frame, fpf);
            assert_eq!(flicks_to_frames(flicks, fpf), frame);
        }
    }

    #[test]
    fn mid_frame_flicks_truncate_down() {
        let fpf = flicks_per_frame(24, 1).unwrap();
        assert_eq!(flicks_to_frames(fpf - 1, fpf), 0);
        assert_eq!(flicks_to_frames(fpf, fpf), 1);
        assert_eq!(flicks_to_frames(fpf + 1, fpf), 1);
    }

    #[test]
    fn seconds_conversions() {
        assert_eq!(seconds_to_flicks(1.0), FLICK_RATE);
        assert_eq!(seconds_to_flicks(0.0), 0);
        assert!((flicks_to_seconds(FLICK_RATE) - 1.0).abs() < f64::EPSILON);
        // one 24fps frame is 1/24 s
        let fpf = flicks_per_frame(24, 1).unwrap();
        assert!((flicks_to_seconds(fpf) - 1.0 / 24.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "frame_rate must be positive")]
    fn rounded_rejects_nan() {
        flicks_per_frame_rounded(f64::NAN);
    }
}
