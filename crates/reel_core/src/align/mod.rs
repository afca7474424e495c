//! Multi-track alignment.
//!
//! Brings video, audio, subtitle and effects tracks to one common
//! duration. One track is chosen as the base; every other track is
//! stretched, shifted, cropped, padded or rescaled onto the base's
//! duration by the [`AlignStrategy`] for its kind.
//!
//! The aligner only annotates tracks. The [`Alignment`](crate::models::Alignment)
//! on each output track tells the export stage what to render.
//!
//! # Usage
//!
//! ```
//! use reel_core::align::{AlignConfig, TrackAligner};
//! use reel_core::models::{Track, TrackKind, TrackMap};
//!
//! let tracks: TrackMap = vec![
//!     Track::new("main", TrackKind::Video, 120.0).with_frame_rate(30.0).as_main(),
//!     Track::new("voice", TrackKind::Audio, 123.0),
//!     Track::new("subs", TrackKind::Subtitle, 118.0),
//! ]
//! .into_iter()
//! .collect();
//!
//! let aligner = TrackAligner::new(AlignConfig::default());
//! let aligned = aligner.align_tracks(&tracks);
//! for track in &aligned {
//!     assert!((track.duration - 120.0).abs() < 1e-6);
//! }
//! ```

pub mod ops;
mod pair;
pub mod strategy;

pub use pair::{align_audio_video, align_multiple_tracks, stretch_video, time_shift_audio};
pub use strategy::{strategy_for, AlignStrategy};

use crate::config::AlignmentSettings;
use crate::models::{Track, TrackKind, TrackMap};
use crate::timing::{format_timecode, EPSILON};

/// Configuration for track alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignConfig {
    /// Gaps below this many seconds are left alone.
    pub alignment_threshold: f64,
    /// Upper edge of the safe stretch band `[1/max, max]` for video-like tracks.
    pub max_stretch_ratio: f64,
    /// Largest excess audio may lose by shifting instead of resampling.
    pub max_shift_ms: u32,
    /// Shift long audio rather than resample it when the excess allows.
    pub prefer_audio_intact: bool,
    /// Bounded shift used by [`time_shift_audio`] in audio/video pairing.
    pub sync_interval_ms: u32,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            alignment_threshold: 1.0,
            max_stretch_ratio: 1.2,
            max_shift_ms: 5000,
            prefer_audio_intact: true,
            sync_interval_ms: 50,
        }
    }
}

impl From<&AlignmentSettings> for AlignConfig {
    fn from(settings: &AlignmentSettings) -> Self {
        Self {
            alignment_threshold: settings.alignment_threshold,
            max_stretch_ratio: settings.max_stretch_ratio,
            max_shift_ms: settings.max_shift_ms,
            prefer_audio_intact: settings.prefer_audio_intact,
            sync_interval_ms: settings.sync_interval_ms,
        }
    }
}

impl AlignConfig {
    /// Shift budget in seconds.
    pub fn max_shift_secs(&self) -> f64 {
        f64::from(self.max_shift_ms) / 1000.0
    }

    /// Whether a stretch by `ratio` stays inside the safe band.
    ///
    /// A `max_stretch_ratio` below 1 is read as its reciprocal.
    pub fn is_safe_stretch(&self, ratio: f64) -> bool {
        if !ratio.is_finite() || ratio <= 0.0 {
            return false;
        }
        let max = self.max_stretch_ratio.max(1.0 / self.max_stretch_ratio);
        ratio <= max + EPSILON && ratio >= 1.0 / max - EPSILON
    }
}

/// Aligns a set of tracks to a common duration.
#[derive(Debug, Clone, Default)]
pub struct TrackAligner {
    config: AlignConfig,
}

impl TrackAligner {
    /// Create an aligner with an explicit configuration.
    pub fn new(config: AlignConfig) -> Self {
        Self { config }
    }

    /// Get the active configuration.
    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    /// Pick the track everything else is aligned to.
    ///
    /// Exactly one `is_base` track wins. Otherwise the first `is_main`
    /// track is used, preferring video. Otherwise the longest track, with
    /// the first one winning ties. `None` only for an empty map.
    pub fn find_base_track<'a>(&self, tracks: &'a TrackMap) -> Option<&'a str> {
        let flagged: Vec<&Track> = tracks.iter().filter(|t| t.is_base).collect();
        match flagged.as_slice() {
            [only] => return Some(only.id.as_str()),
            [] => {}
            many => warn_many_bases(many),
        }

        let main = tracks
            .iter()
            .find(|t| t.is_main && t.kind == TrackKind::Video)
            .or_else(|| tracks.iter().find(|t| t.is_main));
        if let Some(track) = main {
            return Some(track.id.as_str());
        }

        let longest = pair::longest_index(tracks)?;
        tracks.iter().nth(longest).map(|t| t.id.as_str())
    }

    /// Align every non-base track to the base track's duration.
    ///
    /// Returns a new map with the same ids in the same order. The base
    /// track is copied unchanged; every other track carries an
    /// [`Alignment`](crate::models::Alignment). Maps with fewer than two
    /// tracks are returned as they are.
    pub fn align_tracks(&self, tracks: &TrackMap) -> TrackMap {
        if tracks.len() < 2 {
            return tracks.clone();
        }
        let Some(base_id) = self.find_base_track(tracks) else {
            return tracks.clone();
        };
        let Some(target) = tracks.get(base_id).map(|t| t.duration) else {
            return tracks.clone();
        };

        tracing::info!(
            "Aligning {} tracks to base '{}' ({})",
            tracks.len() - 1,
            base_id,
            format_timecode(target)
        );

        tracks
            .iter()
            .map(|track| {
                if track.id == base_id {
                    track.clone()
                } else {
                    self.align_track(track.clone(), target)
                }
            })
            .collect()
    }

    /// Align a single track to `target_duration`.
    pub fn align_track(&self, track: Track, target_duration: f64) -> Track {
        let gap = (track.duration - target_duration).abs();

        let aligned = if gap < self.config.alignment_threshold {
            ops::keep_track(track)
        } else if track.duration <= EPSILON {
            ops::pad_track(track, target_duration)
        } else {
            strategy_for(track.kind).align(track, target_duration, &self.config)
        };

        if let Some(alignment) = &aligned.alignment {
            tracing::debug!("{}: {}", aligned.display_name(), alignment.summary());
        }
        aligned
    }

    /// Align an audio/video pair with this aligner's configuration.
    pub fn align_audio_video(&self, audio: Track, video: Track) -> (Track, Track) {
        align_audio_video(audio, video, &self.config)
    }

    /// Align a plain list to its longest track with this aligner's configuration.
    pub fn align_multiple_tracks(&self, tracks: Vec<Track>) -> Vec<Track> {
        align_multiple_tracks(tracks, &self.config)
    }
}

fn warn_many_bases(flagged: &[&Track]) {
    let ids: Vec<&str> = flagged.iter().map(|t| t.id.as_str()).collect();
    tracing::warn!(
        "{} tracks marked as base ({}), falling back to main/longest",
        ids.len(),
        ids.join(", ")
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlignMethod, SceneSpan, SubtitleCue};

    fn map(tracks: Vec<Track>) -> TrackMap {
        tracks.into_iter().collect()
    }

    fn mixed_tracks() -> TrackMap {
        map(vec![
            Track::new("video", TrackKind::Video, 100.0)
                .with_frame_rate(30.0)
                .with_scenes(vec![SceneSpan::new(0.0, 40.0), SceneSpan::new(40.0, 100.0)])
                .as_main(),
            Track::new("voice", TrackKind::Audio, 103.0),
            Track::new("music", TrackKind::Audio, 90.0),
            Track::new("subs", TrackKind::Subtitle, 95.0).with_subtitles(vec![
                SubtitleCue::new(1, 1.0, 4.0, "line one"),
                SubtitleCue::new(2, 90.0, 95.0, "line two"),
            ]),
            Track::new("fx", TrackKind::Effects, 92.0).with_keyframes(vec![0.0, 46.0, 92.0]),
            Track::new("broll", TrackKind::Video, 60.0).with_frame_rate(24.0),
        ])
    }

    #[test]
    fn base_flag_wins() {
        let tracks = map(vec![
            Track::new("a", TrackKind::Audio, 200.0),
            Track::new("v", TrackKind::Video, 100.0).as_main(),
            Track::new("s", TrackKind::Subtitle, 50.0).as_base(),
        ]);
        assert_eq!(TrackAligner::default().find_base_track(&tracks), Some("s"));
    }

    #[test]
    fn main_video_preferred_over_other_main() {
        let tracks = map(vec![
            Track::new("a", TrackKind::Audio, 200.0).as_main(),
            Track::new("v", TrackKind::Video, 100.0).as_main(),
        ]);
        assert_eq!(TrackAligner::default().find_base_track(&tracks), Some("v"));
    }

    #[test]
    fn several_base_flags_fall_back() {
        let tracks = map(vec![
            Track::new("a", TrackKind::Audio, 80.0).as_base(),
            Track::new("b", TrackKind::Audio, 120.0).as_base(),
            Track::new("c", TrackKind::Audio, 120.0),
        ]);
        assert_eq!(TrackAligner::default().find_base_track(&tracks), Some("b"));
    }

    #[test]
    fn longest_wins_first_seen_on_tie() {
        let tracks = map(vec![
            Track::new("a", TrackKind::Audio, 80.0),
            Track::new("b", TrackKind::Effects, 120.0),
            Track::new("c", TrackKind::Video, 120.0),
        ]);
        assert_eq!(TrackAligner::default().find_base_track(&tracks), Some("b"));
        assert_eq!(TrackAligner::default().find_base_track(&TrackMap::new()), None);
    }

    #[test]
    fn every_non_base_track_converges() {
        let tracks = mixed_tracks();
        let aligned = TrackAligner::default().align_tracks(&tracks);

        let ids: Vec<&str> = aligned.ids().collect();
        let original_ids: Vec<&str> = tracks.ids().collect();
        assert_eq!(ids, original_ids);

        assert_eq!(aligned.get("video"), tracks.get("video"));
        for track in aligned.iter().filter(|t| t.id != "video") {
            assert!(track.is_aligned(), "{} not annotated", track.id);
            assert!((track.duration - 100.0).abs() < 1e-6, "{}", track.display_name());
            let before = tracks.get(&track.id).unwrap();
            assert_eq!(track.original_duration(), before.duration);
        }
    }

    #[test]
    fn mixed_tracks_take_expected_branches() {
        let aligned = TrackAligner::default().align_tracks(&mixed_tracks());
        let method = |id: &str| aligned.get(id).unwrap().alignment.as_ref().unwrap().method;

        assert_eq!(method("voice"), AlignMethod::Shift);
        assert!((aligned.get("voice").unwrap().time_shift() + 3.0).abs() < 1e-9);
        assert_eq!(method("music"), AlignMethod::Stretch);
        assert_eq!(method("subs"), AlignMethod::Rescale);
        assert_eq!(method("fx"), AlignMethod::Stretch);
        assert_eq!(method("broll"), AlignMethod::Pad);

        let fx = aligned.get("fx").unwrap();
        assert!((fx.keyframes[2] - 100.0).abs() < 1e-9);
        let subs = aligned.get("subs").unwrap();
        assert!((subs.subtitles[1].end_time - 100.0).abs() < 1e-9);
    }

    #[test]
    fn uniform_tracks_are_only_annotated() {
        let tracks = map(vec![
            Track::new("v", TrackKind::Video, 60.0).with_frame_rate(25.0),
            Track::new("a", TrackKind::Audio, 60.0),
            Track::new("s", TrackKind::Subtitle, 60.0)
                .with_subtitles(vec![SubtitleCue::new(1, 5.0, 7.0, "hi")]),
        ]);
        let aligned = TrackAligner::default().align_tracks(&tracks);

        for (before, after) in tracks.iter().zip(&aligned).skip(1) {
            assert!(after.is_aligned());
            assert_eq!(after.duration, before.duration);
            assert_eq!(after.subtitles, before.subtitles);
            assert!((after.stretch_ratio() - 1.0).abs() < 1e-12);
            assert!(after.time_shift().abs() < 1e-12);
        }
    }

    #[test]
    fn small_gap_is_left_unmodified() {
        let tracks = map(vec![
            Track::new("v", TrackKind::Video, 60.0).as_main(),
            Track::new("a", TrackKind::Audio, 60.6).with_keyframes(vec![30.0]),
        ]);
        let aligned = TrackAligner::default().align_tracks(&tracks);
        let audio = aligned.get("a").unwrap();
        assert_eq!(audio.duration, 60.6);
        assert_eq!(audio.keyframes, vec![30.0]);
        assert_eq!(
            audio.alignment.as_ref().unwrap().method,
            AlignMethod::WithinThreshold
        );
    }

    #[test]
    fn stretch_scales_scene_durations() {
        let tracks = map(vec![
            Track::new("a", TrackKind::Audio, 110.0).as_base(),
            Track::new("v", TrackKind::Video, 100.0)
                .with_frame_rate(30.0)
                .with_scenes(vec![SceneSpan::new(0.0, 40.0), SceneSpan::new(50.0, 100.0)]),
        ]);
        let aligned = TrackAligner::default().align_tracks(&tracks);
        let video = aligned.get("v").unwrap();
        let ratio = video.stretch_ratio();
        assert!((ratio - 1.1).abs() < 1e-12);

        let before = &tracks.get("v").unwrap().scenes;
        for (old, new) in before.iter().zip(&video.scenes) {
            assert!((new.duration - old.duration * ratio).abs() < 1e-9);
        }
        assert!((video.frame_rate.unwrap() - 30.0 / 1.1).abs() < 1e-9);
    }

    #[test]
    fn zero_length_track_is_padded() {
        let tracks = map(vec![
            Track::new("v", TrackKind::Video, 30.0),
            Track::new("a", TrackKind::Audio, 0.0),
        ]);
        let aligned = TrackAligner::default().align_tracks(&tracks);
        let audio = aligned.get("a").unwrap();
        assert_eq!(audio.duration, 30.0);
        assert_eq!(audio.alignment.as_ref().unwrap().method, AlignMethod::Pad);
    }

    #[test]
    fn single_track_is_returned_as_is() {
        let tracks = map(vec![Track::new("v", TrackKind::Video, 30.0)]);
        assert_eq!(TrackAligner::default().align_tracks(&tracks), tracks);
        assert!(TrackAligner::default().align_tracks(&TrackMap::new()).is_empty());
    }

    #[test]
    fn safe_band_is_symmetric() {
        let config = AlignConfig::default();
        assert!(config.is_safe_stretch(1.2));
        assert!(config.is_safe_stretch(1.0 / 1.2));
        assert!(!config.is_safe_stretch(1.25));
        assert!(!config.is_safe_stretch(0.8));
        assert!(!config.is_safe_stretch(f64::INFINITY));
    }
}
