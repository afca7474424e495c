//! Two-track and list helpers.
//!
//! These cover the common case of one voice-over against one clip, and
//! callers that hold tracks in a plain list rather than a
//! [`TrackMap`](crate::models::TrackMap).

use super::ops::{pad_track, retime_frame_rate, shift_track, stretch_track};
use super::{AlignConfig, TrackAligner};
use crate::models::Track;
use crate::timing::rescale;

/// Align an audio track and a video track to each other.
///
/// Within the threshold both are returned untouched. Longer audio
/// stretches the video to match; shorter audio is shifted onto the video
/// with [`time_shift_audio`].
pub fn align_audio_video(audio: Track, video: Track, config: &AlignConfig) -> (Track, Track) {
    let gap = audio.duration - video.duration;
    if gap.abs() < config.alignment_threshold {
        return (audio, video);
    }

    if gap > 0.0 {
        let target = audio.duration;
        (audio, stretch_video(video, target))
    } else {
        let target = video.duration;
        (time_shift_audio(audio, target, config.sync_interval_ms), video)
    }
}

/// Stretch a video to `target_duration`, keeping its frame count.
///
/// No safe-band check is applied; a zero-length video is padded instead.
pub fn stretch_video(video: Track, target_duration: f64) -> Track {
    if video.duration <= 0.0 {
        return pad_track(video, target_duration);
    }

    let ratio = rescale(1.0, video.duration, target_duration);
    if !AlignConfig::default().is_safe_stretch(ratio) {
        tracing::warn!(
            "Stretching video '{}' by x{:.4}, outside the safe band",
            video.id,
            ratio
        );
    }
    let mut stretched = stretch_track(video, ratio);
    stretched.duration = target_duration;
    retime_frame_rate(&mut stretched, ratio);
    tracing::debug!(
        "Stretched video '{}' by x{:.4} to {:.3}s",
        stretched.id,
        ratio,
        target_duration
    );
    stretched
}

/// Bring audio to `target_duration` with a bounded shift.
///
/// A gap within `offset_ms` is covered entirely by a shift. A larger gap
/// uses the full `offset_ms` shift and records a `rate_adjust` for the
/// remainder, so the final duration always matches.
pub fn time_shift_audio(audio: Track, target_duration: f64, offset_ms: u32) -> Track {
    let original = audio.duration;
    let diff = target_duration - original;
    let offset = f64::from(offset_ms) / 1000.0;

    if diff.abs() <= offset || original <= 0.0 {
        let mut shifted = shift_track(audio, diff);
        shifted.duration = target_duration;
        return shifted;
    }

    let shift = offset.copysign(diff);
    let residual = diff - shift;
    let rate = (original + residual) / original;

    let mut shifted = shift_track(audio, shift);
    shifted.duration = target_duration;
    if let Some(alignment) = shifted.alignment.as_mut() {
        alignment.rate_adjust = Some(rate);
    }
    tracing::debug!(
        "Audio '{}' shifted {:+.3}s with rate x{:.4}",
        shifted.id,
        shift,
        rate
    );
    shifted
}

/// Align a list of tracks to the longest one.
///
/// The first of several equally long tracks is the base and is returned
/// untouched. Output order matches input order.
pub fn align_multiple_tracks(tracks: Vec<Track>, config: &AlignConfig) -> Vec<Track> {
    let Some(base) = longest_index(&tracks) else {
        return tracks;
    };
    let target = tracks[base].duration;
    let aligner = TrackAligner::new(config.clone());

    tracks
        .into_iter()
        .enumerate()
        .map(|(i, track)| {
            if i == base {
                track
            } else {
                aligner.align_track(track, target)
            }
        })
        .collect()
}

/// Index of the longest track; the first one wins ties.
pub(crate) fn longest_index<'a>(tracks: impl IntoIterator<Item = &'a Track>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, track) in tracks.into_iter().enumerate() {
        if best.map_or(true, |(_, longest)| track.duration > longest) {
            best = Some((i, track.duration));
        }
    }
    best.map(|(i, _)| i)
}
