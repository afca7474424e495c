//! Video and overlay alignment.
//!
//! A stretch inside the safe band `[1/max, max]` is invisible enough to
//! apply directly. Outside it, the track is cropped when too long or
//! padded when too short instead.

use super::AlignStrategy;
use crate::align::ops::{crop_track, pad_track, retime_frame_rate, stretch_track};
use crate::align::AlignConfig;
use crate::models::Track;
use crate::timing::rescale;

/// Strategy for picture-carrying tracks.
pub struct VisualStrategy {
    /// Divide the frame rate by the stretch ratio so frame count is kept.
    adjust_frame_rate: bool,
}

impl VisualStrategy {
    /// Video tracks: frame rate follows the stretch.
    pub fn video() -> Self {
        Self {
            adjust_frame_rate: true,
        }
    }

    /// Effects and other overlays: same policy, no frame rate.
    pub fn overlay() -> Self {
        Self {
            adjust_frame_rate: false,
        }
    }
}

impl AlignStrategy for VisualStrategy {
    fn name(&self) -> &'static str {
        if self.adjust_frame_rate {
            "video"
        } else {
            "overlay"
        }
    }

    fn align(&self, track: Track, target_duration: f64, config: &AlignConfig) -> Track {
        let ratio = rescale(1.0, track.duration, target_duration);

        if !config.is_safe_stretch(ratio) {
            tracing::warn!(
                "Stretch x{:.4} for '{}' is outside the safe band, {} instead",
                ratio,
                track.id,
                if track.duration > target_duration { "cropping" } else { "padding" }
            );
            return if track.duration > target_duration {
                crop_track(track, target_duration)
            } else {
                pad_track(track, target_duration)
            };
        }

        let mut aligned = stretch_track(track, ratio);
        aligned.duration = target_duration;
        if self.adjust_frame_rate {
            retime_frame_rate(&mut aligned, ratio);
        }
        aligned
    }
}
