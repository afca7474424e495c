//! Track timing operations.
//!
//! Each operation moves every time reference a track owns (scene spans,
//! subtitle cues, keyframes) consistently and records what it did in the
//! track's [`Alignment`] annotation, replacing any earlier one.

use crate::models::{AlignMethod, Alignment, CropInfo, PadInfo, Track};
use crate::timing::rescale;

/// Scale the track and all its content by `ratio`.
pub fn stretch_track(mut track: Track, ratio: f64) -> Track {
    let mut alignment = Alignment::new(AlignMethod::Stretch, track.duration);
    alignment.stretch_ratio = Some(ratio);

    scale_content(&mut track, ratio);
    track.duration *= ratio;
    track.alignment = Some(alignment);
    track
}

/// Translate the track's start and content by `offset` seconds.
///
/// Duration is unchanged.
pub fn shift_track(mut track: Track, offset: f64) -> Track {
    let mut alignment = Alignment::new(AlignMethod::Shift, track.duration);
    alignment.time_shift = Some(offset);

    if let Some(start) = track.start_time.as_mut() {
        *start += offset;
    }
    offset_content(&mut track, offset);
    track.alignment = Some(alignment);
    track
}

/// Cut the reported duration down to `target_duration`.
///
/// Content past the cut point is left for the export stage to drop.
pub fn crop_track(mut track: Track, target_duration: f64) -> Track {
    let mut alignment = Alignment::new(AlignMethod::Crop, track.duration);
    alignment.crop_info = Some(CropInfo {
        original_duration: track.duration,
        target_duration,
    });

    track.duration = target_duration;
    track.alignment = Some(alignment);
    track
}

/// Extend to `target_duration` with blank time before the content.
pub fn pad_track(mut track: Track, target_duration: f64) -> Track {
    let original = track.duration;
    let start_pad = target_duration - original;

    let mut alignment = Alignment::new(AlignMethod::Pad, original);
    alignment.pad_info = Some(PadInfo {
        original_duration: original,
        target_duration,
        start_pad,
    });

    offset_content(&mut track, start_pad);
    track.duration = target_duration;
    track.alignment = Some(alignment);
    track
}

/// Scale subtitle cues (and any other content) onto a new duration.
pub fn rescale_track(mut track: Track, target_duration: f64) -> Track {
    let original = track.duration;
    // Where one second of the source lands on the target timeline
    let factor = rescale(1.0, original, target_duration);

    let mut alignment = Alignment::new(AlignMethod::Rescale, original);
    alignment.stretch_ratio = Some(factor);

    scale_content(&mut track, factor);
    track.duration = target_duration;
    track.alignment = Some(alignment);
    track
}

/// Mark the track as already aligned without touching it.
pub fn keep_track(mut track: Track) -> Track {
    track.alignment = Some(Alignment::new(AlignMethod::WithinThreshold, track.duration));
    track
}

/// Divide the frame rate by a stretch ratio so the frame count is kept.
pub fn retime_frame_rate(track: &mut Track, ratio: f64) {
    let Some(fps) = track.frame_rate else {
        return;
    };
    track.frame_rate = Some(fps / ratio);
    if let Some(alignment) = track.alignment.as_mut() {
        alignment.original_frame_rate = Some(fps);
    }
}

fn scale_content(track: &mut Track, ratio: f64) {
    for span in &mut track.scenes {
        span.scale(ratio);
    }
    for cue in &mut track.subtitles {
        cue.start_time *= ratio;
        cue.end_time *= ratio;
    }
    for keyframe in &mut track.keyframes {
        *keyframe *= ratio;
    }
}

fn offset_content(track: &mut Track, offset: f64) {
    for span in &mut track.scenes {
        span.offset(offset);
    }
    for cue in &mut track.subtitles {
        cue.start_time += offset;
        cue.end_time += offset;
    }
    for keyframe in &mut track.keyframes {
        *keyframe += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SceneSpan, SubtitleCue, TrackKind};

    fn effects_track() -> Track {
        Track::new("fx", TrackKind::Effects, 80.0)
            .with_start_time(2.0)
            .with_scenes(vec![SceneSpan::new(0.0, 40.0), SceneSpan::new(40.0, 80.0)])
            .with_keyframes(vec![0.0, 10.0, 55.5])
    }

    #[test]
    fn stretch_scales_every_reference() {
        let track = stretch_track(effects_track(), 1.25);
        assert!((track.duration - 100.0).abs() < 1e-9);
        assert!((track.scenes[1].start_time - 50.0).abs() < 1e-9);
        assert!((track.scenes[1].duration - 50.0).abs() < 1e-9);
        assert!((track.keyframes[2] - 69.375).abs() < 1e-9);
        assert_eq!(track.stretch_ratio(), 1.25);
        assert_eq!(track.original_duration(), 80.0);
    }

    #[test]
    fn shift_moves_start_and_content_only() {
        let track = shift_track(effects_track(), -3.0);
        assert_eq!(track.duration, 80.0);
        assert_eq!(track.start_time, Some(-1.0));
        assert_eq!(track.scenes[0].start_time, -3.0);
        assert_eq!(track.keyframes[1], 7.0);
        assert_eq!(track.time_shift(), -3.0);
    }

    #[test]
    fn crop_only_records_bookkeeping() {
        let track = crop_track(effects_track(), 60.0);
        assert_eq!(track.duration, 60.0);
        assert_eq!(track.scenes[1].end_time, 80.0);
        let crop = track.alignment.unwrap().crop_info.unwrap();
        assert_eq!(crop.trimmed(), 20.0);
    }

    #[test]
    fn pad_delays_all_content() {
        let track = pad_track(effects_track(), 100.0);
        assert_eq!(track.duration, 100.0);
        assert_eq!(track.scenes[0].start_time, 20.0);
        assert_eq!(track.keyframes[0], 20.0);
        let pad = track.alignment.unwrap().pad_info.unwrap();
        assert_eq!(pad.start_pad, 20.0);
        assert_eq!(pad.original_duration, 80.0);
    }

    #[test]
    fn rescale_scales_cues() {
        let track = Track::new("sub", TrackKind::Subtitle, 50.0).with_subtitles(vec![
            SubtitleCue::new(1, 1.0, 3.0, "hello"),
            SubtitleCue::new(2, 40.0, 50.0, "bye"),
        ]);
        let track = rescale_track(track, 60.0);
        assert_eq!(track.duration, 60.0);
        assert!((track.subtitles[0].start_time - 1.2).abs() < 1e-9);
        assert!((track.subtitles[1].end_time - 60.0).abs() < 1e-9);
        assert!((track.stretch_ratio() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn rescale_of_empty_timeline_keeps_cue_times() {
        let track = Track::new("sub", TrackKind::Subtitle, 0.0)
            .with_subtitles(vec![SubtitleCue::new(1, 0.0, 0.0, "")]);
        let track = rescale_track(track, 30.0);
        assert_eq!(track.duration, 30.0);
        assert_eq!(track.subtitles[0].end_time, 0.0);
        assert_eq!(track.stretch_ratio(), 1.0);
    }
}
