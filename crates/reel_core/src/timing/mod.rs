//! Time unit utilities shared by the aligner and the rescuer.
//!
//! All values are seconds as `f64` unless a name says otherwise.
//!
//! - [`convert`]: frames ⇄ seconds, proportional rescale, float comparison
//! - [`timecode`]: `HH:MM:SS.mmm` / SRT timestamp formatting and parsing

pub mod convert;
pub mod timecode;

pub use convert::{approx_eq, frames_to_seconds, rescale, seconds_to_frames, EPSILON};
pub use timecode::{format_srt_timestamp, format_timecode, parse_timecode, TimecodeError};
