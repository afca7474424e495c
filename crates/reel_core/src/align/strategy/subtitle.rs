//! Subtitle alignment: cues always follow the target timeline.

use super::AlignStrategy;
use crate::align::ops::rescale_track;
use crate::align::AlignConfig;
use crate::models::Track;

/// Subtitle strategy: proportional rescale of every cue.
pub struct SubtitleStrategy;

impl AlignStrategy for SubtitleStrategy {
    fn name(&self) -> &'static str {
        "subtitle"
    }

    fn align(&self, track: Track, target_duration: f64, _config: &AlignConfig) -> Track {
        rescale_track(track, target_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SubtitleCue, TrackKind};

    #[test]
    fn cues_scale_with_the_track() {
        let cues = vec![
            SubtitleCue::new(1, 0.5, 2.0, "first"),
            SubtitleCue::new(2, 30.0, 33.5, "second"),
        ];
        let track = Track::new("sub", TrackKind::Subtitle, 40.0).with_subtitles(cues.clone());
        let aligned = SubtitleStrategy.align(track, 50.0, &AlignConfig::default());

        let factor = 50.0 / 40.0;
        for (before, after) in cues.iter().zip(&aligned.subtitles) {
            assert!((after.start_time - before.start_time * factor).abs() < 1e-9);
            assert!((after.end_time - before.end_time * factor).abs() < 1e-9);
            assert_eq!(after.text, before.text);
        }
        assert_eq!(aligned.duration, 50.0);
    }
}
