//! Timecode formatting and parsing.
//!
//! Two textual forms are produced:
//! - `HH:MM:SS.mmm` for logs and plan summaries
//! - `HH:MM:SS,mmm` for SRT cue timing
//!
//! Values are rounded to the nearest millisecond and negative times clamp
//! to zero.

/// Errors that can occur while parsing a timecode.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimecodeError {
    /// Input was empty or whitespace.
    #[error("Empty timecode")]
    Empty,

    /// A component is not a number.
    #[error("Invalid {component} in timecode: '{value}'")]
    InvalidComponent {
        component: &'static str,
        value: String,
    },

    /// A component is outside its allowed range.
    #[error("{component} out of range in timecode: '{value}'")]
    OutOfRange {
        component: &'static str,
        value: String,
    },
}

impl TimecodeError {
    fn invalid(component: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidComponent {
            component,
            value: value.into(),
        }
    }

    fn out_of_range(component: &'static str, value: impl Into<String>) -> Self {
        Self::OutOfRange {
            component,
            value: value.into(),
        }
    }
}

/// Split seconds into (hours, minutes, seconds, millis) after rounding.
fn split_millis(secs: f64) -> (u64, u64, u64, u64) {
    let total_ms = if secs.is_finite() && secs > 0.0 {
        (secs * 1000.0).round() as u64
    } else {
        0
    };

    let millis = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let s = total_secs % 60;
    let total_mins = total_secs / 60;
    let m = total_mins % 60;
    let h = total_mins / 60;
    (h, m, s, millis)
}

/// Format seconds as `HH:MM:SS.mmm`.
///
/// # Examples
/// ```
/// use reel_core::timing::format_timecode;
///
/// assert_eq!(format_timecode(0.0), "00:00:00.000");
/// assert_eq!(format_timecode(3725.5), "01:02:05.500");
/// ```
pub fn format_timecode(secs: f64) -> String {
    let (h, m, s, ms) = split_millis(secs);
    format!("{:02}:{:02}:{:02}.{:03}", h, m, s, ms)
}

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`).
pub fn format_srt_timestamp(secs: f64) -> String {
    let (h, m, s, ms) = split_millis(secs);
    format!("{:02}:{:02}:{:02},{:03}", h, m, s, ms)
}

/// Parse a timecode into seconds.
///
/// Accepted forms:
/// - `HH:MM:SS.mmm` / `HH:MM:SS,mmm`
/// - `MM:SS.mmm`
/// - bare seconds (`12.5`)
///
/// The fractional part may have any number of digits.
pub fn parse_timecode(text: &str) -> Result<f64, TimecodeError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TimecodeError::Empty);
    }

    // SRT uses a comma as the decimal separator
    let normalized = text.replace(',', ".");
    let parts: Vec<&str> = normalized.split(':').collect();

    let (hours, minutes, seconds) = match parts.as_slice() {
        [s] => (0u64, 0u64, *s),
        [m, s] => (0, parse_whole("minutes", m)?, *s),
        [h, m, s] => (parse_whole("hours", h)?, parse_whole("minutes", m)?, *s),
        _ => return Err(TimecodeError::invalid("format", text)),
    };

    let secs: f64 = seconds
        .parse()
        .map_err(|_| TimecodeError::invalid("seconds", seconds))?;

    if !secs.is_finite() || secs < 0.0 {
        return Err(TimecodeError::out_of_range("seconds", seconds));
    }
    if parts.len() > 1 {
        if secs >= 60.0 {
            return Err(TimecodeError::out_of_range("seconds", seconds));
        }
        if parts.len() == 3 && minutes >= 60 {
            return Err(TimecodeError::out_of_range("minutes", minutes.to_string()));
        }
    }

    let hour_secs = hours
        .checked_mul(3600)
        .ok_or_else(|| TimecodeError::out_of_range("hours", hours.to_string()))?;
    let minute_secs = minutes
        .checked_mul(60)
        .ok_or_else(|| TimecodeError::out_of_range("minutes", minutes.to_string()))?;
    let whole = hour_secs
        .checked_add(minute_secs)
        .ok_or_else(|| TimecodeError::out_of_range("hours", hours.to_string()))?;

    Ok(whole as f64 + secs)
}

fn parse_whole(component: &'static str, value: &str) -> Result<u64, TimecodeError> {
    value
        .parse::<u64>()
        .map_err(|_| TimecodeError::invalid(component, value))
}
