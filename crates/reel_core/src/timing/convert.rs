//! Frame/second conversion and proportional rescaling.
//!
//! Pure functions, no side effects.

/// Tolerance for floating-point time comparisons (seconds).
pub const EPSILON: f64 = 1e-6;

/// Compare two times within [`EPSILON`].
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Rescale `value` proportionally from a `from` timeline onto a `to` timeline.
///
/// A point at `value` on a timeline of length `from` maps to
/// `value * to / from`. A zero-length source timeline has no meaningful
/// scale, so the value is returned unchanged.
///
/// # Examples
/// ```
/// use reel_core::timing::rescale;
///
/// assert!((rescale(10.0, 100.0, 120.0) - 12.0).abs() < 1e-9);
/// assert_eq!(rescale(5.0, 0.0, 50.0), 5.0);
/// ```
pub fn rescale(value: f64, from: f64, to: f64) -> f64 {
    if from == 0.0 {
        return value;
    }
    value * (to / from)
}

/// Convert a time in seconds to the frame displaying at that time.
///
/// Floors with epsilon protection so a time sitting a hair below a frame
/// boundary (float drift) still lands on the frame that starts there.
///
/// # Examples
/// ```
/// use reel_core::timing::seconds_to_frames;
///
/// assert_eq!(seconds_to_frames(0.0, 30.0), 0);
/// assert_eq!(seconds_to_frames(1.0, 30.0), 30);
/// assert_eq!(seconds_to_frames(0.9999999, 30.0), 30);
/// ```
pub fn seconds_to_frames(secs: f64, fps: f64) -> u64 {
    if fps <= 0.0 || secs <= 0.0 {
        return 0;
    }
    ((secs + EPSILON) * fps).floor() as u64
}

/// Convert a frame number to its start time in seconds.
pub fn frames_to_seconds(frames: u64, fps: f64) -> f64 {
    if fps <= 0.0 {
        return 0.0;
    }
    frames as f64 / fps
}
