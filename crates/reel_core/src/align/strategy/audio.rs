//! Audio alignment.
//!
//! Short audio is stretched to fill the target. Long audio is shifted
//! earlier when the excess fits inside the shift budget, keeping its
//! samples intact, and stretched otherwise.

use super::AlignStrategy;
use crate::align::ops::{shift_track, stretch_track};
use crate::align::AlignConfig;
use crate::models::Track;
use crate::timing::rescale;

/// Audio strategy: prefer a pure shift over resampling.
pub struct AudioStrategy;

impl AlignStrategy for AudioStrategy {
    fn name(&self) -> &'static str {
        "audio"
    }

    fn align(&self, track: Track, target_duration: f64, config: &AlignConfig) -> Track {
        let duration = track.duration;
        let excess = duration - target_duration;

        let mut aligned = if excess > 0.0
            && config.prefer_audio_intact
            && excess <= config.max_shift_secs()
        {
            shift_track(track, target_duration - duration)
        } else {
            stretch_track(track, rescale(1.0, duration, target_duration))
        };
        aligned.duration = target_duration;
        aligned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlignMethod, TrackKind};

    fn audio(duration: f64) -> Track {
        Track::new("a", TrackKind::Audio, duration).with_keyframes(vec![10.0])
    }

    #[test]
    fn short_audio_is_stretched() {
        let aligned = AudioStrategy.align(audio(90.0), 100.0, &AlignConfig::default());
        let alignment = aligned.alignment.as_ref().unwrap();
        assert_eq!(alignment.method, AlignMethod::Stretch);
        assert!((aligned.stretch_ratio() - 100.0 / 90.0).abs() < 1e-12);
        assert_eq!(aligned.duration, 100.0);
    }

    #[test]
    fn small_excess_is_shifted() {
        let aligned = AudioStrategy.align(audio(103.0), 100.0, &AlignConfig::default());
        let alignment = aligned.alignment.as_ref().unwrap();
        assert_eq!(alignment.method, AlignMethod::Shift);
        assert!((aligned.time_shift() + 3.0).abs() < 1e-12);
        assert!((aligned.keyframes[0] - 7.0).abs() < 1e-12);
        assert_eq!(aligned.duration, 100.0);
    }

    #[test]
    fn large_excess_falls_back_to_stretch() {
        let aligned = AudioStrategy.align(audio(110.0), 100.0, &AlignConfig::default());
        assert_eq!(aligned.alignment.unwrap().method, AlignMethod::Stretch);
    }

    #[test]
    fn resampling_allowed_when_audio_need_not_stay_intact() {
        let config = AlignConfig {
            prefer_audio_intact: false,
            ..Default::default()
        };
        let aligned = AudioStrategy.align(audio(103.0), 100.0, &config);
        let alignment = aligned.alignment.unwrap();
        assert_eq!(alignment.method, AlignMethod::Stretch);
        assert!((alignment.stretch_ratio.unwrap() - 100.0 / 103.0).abs() < 1e-12);
    }
}
