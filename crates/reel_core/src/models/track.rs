//! Track data structures (tracks, timed spans, subtitle cues, alignment notes).

use serde::{Deserialize, Serialize};

use super::enums::{AlignMethod, TrackKind};

/// A time interval inside a track (e.g., a scene cut on a video track).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSpan {
    /// Start time in seconds.
    pub start_time: f64,
    /// End time in seconds.
    pub end_time: f64,
    /// Length in seconds (kept in step with start/end).
    pub duration: f64,
}

impl SceneSpan {
    /// Create a span; duration is derived from the bounds.
    pub fn new(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time,
            end_time,
            duration: end_time - start_time,
        }
    }

    /// Scale both bounds by `ratio` and recompute the duration.
    pub(crate) fn scale(&mut self, ratio: f64) {
        self.start_time *= ratio;
        self.end_time *= ratio;
        self.duration = self.end_time - self.start_time;
    }

    /// Translate both bounds by `offset` seconds.
    pub(crate) fn offset(&mut self, offset: f64) {
        self.start_time += offset;
        self.end_time += offset;
    }
}

/// A single subtitle cue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleCue {
    /// Cue identifier (SRT index or similar).
    pub id: u32,
    /// Start time in seconds.
    pub start_time: f64,
    /// End time in seconds.
    pub end_time: f64,
    /// Cue text.
    #[serde(default)]
    pub text: String,
}

impl SubtitleCue {
    /// Create a new cue.
    pub fn new(id: u32, start_time: f64, end_time: f64, text: impl Into<String>) -> Self {
        Self {
            id,
            start_time,
            end_time,
            text: text.into(),
        }
    }

    /// Cue length in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Record of a crop: the tail beyond `target_duration` is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropInfo {
    pub original_duration: f64,
    pub target_duration: f64,
}

impl CropInfo {
    /// Seconds removed from the tail.
    pub fn trimmed(&self) -> f64 {
        self.original_duration - self.target_duration
    }
}

/// Record of a pad: `start_pad` seconds of blank time precede the content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PadInfo {
    pub original_duration: f64,
    pub target_duration: f64,
    pub start_pad: f64,
}

/// Alignment annotation attached to every non-base track by the aligner.
///
/// These fields are the instructions the export stage turns into real
/// media operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    /// Branch that produced the final timing.
    pub method: AlignMethod,
    /// Duration before alignment.
    pub original_duration: f64,
    /// Ratio applied to every time reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stretch_ratio: Option<f64>,
    /// Constant offset in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_shift: Option<f64>,
    /// Secondary playback-rate change after a bounded shift.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_adjust: Option<f64>,
    /// Frame rate before it was recomputed for a stretch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_frame_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_info: Option<CropInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pad_info: Option<PadInfo>,
}

impl Alignment {
    /// Create an annotation with only the method and original duration set.
    pub fn new(method: AlignMethod, original_duration: f64) -> Self {
        Self {
            method,
            original_duration,
            stretch_ratio: None,
            time_shift: None,
            rate_adjust: None,
            original_frame_rate: None,
            crop_info: None,
            pad_info: None,
        }
    }

    /// One-line description of what the export stage has to do.
    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "{} (from {:.3}s)",
            self.method, self.original_duration
        )];
        if let Some(ratio) = self.stretch_ratio {
            parts.push(format!("ratio x{:.4}", ratio));
        }
        if let Some(shift) = self.time_shift {
            parts.push(format!("shift {:+.3}s", shift));
        }
        if let Some(rate) = self.rate_adjust {
            parts.push(format!("rate x{:.4}", rate));
        }
        if let Some(crop) = &self.crop_info {
            parts.push(format!("trim tail {:.3}s", crop.trimmed()));
        }
        if let Some(pad) = &self.pad_info {
            parts.push(format!("lead pad {:.3}s", pad.start_pad));
        }
        parts.join(", ")
    }
}

/// A single media track on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique identifier.
    pub id: String,
    /// Type of track.
    #[serde(rename = "type", default)]
    pub kind: TrackKind,
    /// Total length in seconds.
    pub duration: f64,
    /// Caller hint: align everything else to this track.
    #[serde(default)]
    pub is_base: bool,
    /// Caller hint: this is the primary track (usually the main video).
    #[serde(default)]
    pub is_main: bool,
    /// Frames per second (video tracks).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<f64>,
    /// Offset of the track on the output timeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scenes: Vec<SceneSpan>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtitles: Vec<SubtitleCue>,
    /// Keyframe times in seconds, non-decreasing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keyframes: Vec<f64>,
    /// Set by the aligner on every non-base track.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

impl Track {
    /// Create a new track with no timed content.
    pub fn new(id: impl Into<String>, kind: TrackKind, duration: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            duration,
            is_base: false,
            is_main: false,
            frame_rate: None,
            start_time: None,
            scenes: Vec::new(),
            subtitles: Vec::new(),
            keyframes: Vec::new(),
            alignment: None,
        }
    }

    /// Mark as the base track.
    pub fn as_base(mut self) -> Self {
        self.is_base = true;
        self
    }

    /// Mark as the main track.
    pub fn as_main(mut self) -> Self {
        self.is_main = true;
        self
    }

    /// Set the frame rate.
    pub fn with_frame_rate(mut self, fps: f64) -> Self {
        self.frame_rate = Some(fps);
        self
    }

    /// Set the track's own start offset.
    pub fn with_start_time(mut self, start: f64) -> Self {
        self.start_time = Some(start);
        self
    }

    /// Set the scene spans.
    pub fn with_scenes(mut self, scenes: Vec<SceneSpan>) -> Self {
        self.scenes = scenes;
        self
    }

    /// Set the subtitle cues.
    pub fn with_subtitles(mut self, subtitles: Vec<SubtitleCue>) -> Self {
        self.subtitles = subtitles;
        self
    }

    /// Set the keyframe times.
    pub fn with_keyframes(mut self, keyframes: Vec<f64>) -> Self {
        self.keyframes = keyframes;
        self
    }

    /// Whether the aligner has processed this track.
    pub fn is_aligned(&self) -> bool {
        self.alignment.is_some()
    }

    /// Stretch ratio applied by alignment (1.0 when none).
    pub fn stretch_ratio(&self) -> f64 {
        self.alignment
            .as_ref()
            .and_then(|a| a.stretch_ratio)
            .unwrap_or(1.0)
    }

    /// Time shift applied by alignment (0.0 when none).
    pub fn time_shift(&self) -> f64 {
        self.alignment
            .as_ref()
            .and_then(|a| a.time_shift)
            .unwrap_or(0.0)
    }

    /// Duration before alignment, or the current duration if unaligned.
    pub fn original_duration(&self) -> f64 {
        self.alignment
            .as_ref()
            .map(|a| a.original_duration)
            .unwrap_or(self.duration)
    }

    /// Get a display string for this track.
    pub fn display_name(&self) -> String {
        format!("{} track '{}' ({:.3}s)", self.kind, self.id, self.duration)
    }
}

/// Insertion-ordered collection of tracks keyed by [`Track::id`].
///
/// Order matters: it is the first-seen order used to break ties when the
/// base track is chosen by duration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackMap {
    tracks: Vec<Track>,
}

impl TrackMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a track. An existing track with the same id is replaced in
    /// place and returned.
    pub fn insert(&mut self, track: Track) -> Option<Track> {
        match self.tracks.iter_mut().find(|t| t.id == track.id) {
            Some(slot) => Some(std::mem::replace(slot, track)),
            None => {
                self.tracks.push(track);
                None
            }
        }
    }

    /// Look up a track by id.
    pub fn get(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Number of tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Track ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tracks.iter().map(|t| t.id.as_str())
    }

    /// Consume into the ordered track list.
    pub fn into_vec(self) -> Vec<Track> {
        self.tracks
    }
}

impl FromIterator<Track> for TrackMap {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        let mut map = TrackMap::new();
        for track in iter {
            map.insert(track);
        }
        map
    }
}

impl<'a> IntoIterator for &'a TrackMap {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}

impl IntoIterator for TrackMap {
    type Item = Track;
    type IntoIter = std::vec::IntoIter<Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_map_keeps_insertion_order() {
        let map: TrackMap = vec![
            Track::new("v", TrackKind::Video, 10.0),
            Track::new("a", TrackKind::Audio, 12.0),
            Track::new("s", TrackKind::Subtitle, 9.0),
        ]
        .into_iter()
        .collect();

        let ids: Vec<&str> = map.ids().collect();
        assert_eq!(ids, vec!["v", "a", "s"]);
    }

    #[test]
    fn insert_replaces_same_id_in_place() {
        let mut map = TrackMap::new();
        map.insert(Track::new("v", TrackKind::Video, 10.0));
        map.insert(Track::new("a", TrackKind::Audio, 12.0));
        let old = map.insert(Track::new("v", TrackKind::Video, 20.0));

        assert_eq!(old.map(|t| t.duration), Some(10.0));
        assert_eq!(map.len(), 2);
        assert_eq!(map.ids().next(), Some("v"));
        assert_eq!(map.get("v").map(|t| t.duration), Some(20.0));
    }

    #[test]
    fn unaligned_accessors_have_neutral_defaults() {
        let track = Track::new("a", TrackKind::Audio, 7.5);
        assert!(!track.is_aligned());
        assert_eq!(track.stretch_ratio(), 1.0);
        assert_eq!(track.time_shift(), 0.0);
        assert_eq!(track.original_duration(), 7.5);
    }

    #[test]
    fn track_deserializes_from_probe_json() {
        let json = r#"{
            "id": "main",
            "type": "video",
            "duration": 100.0,
            "is_main": true,
            "frame_rate": 30.0,
            "scenes": [{"start_time": 0.0, "end_time": 40.0, "duration": 40.0}]
        }"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.kind, TrackKind::Video);
        assert!(track.is_main);
        assert!(!track.is_base);
        assert_eq!(track.frame_rate, Some(30.0));
        assert_eq!(track.scenes.len(), 1);
        assert!(track.subtitles.is_empty());
        assert!(track.alignment.is_none());
    }

    #[test]
    fn unaligned_track_omits_annotation_fields() {
        let track = Track::new("fx", TrackKind::Effects, 3.0).with_keyframes(vec![0.5, 1.0]);
        let json = serde_json::to_string(&track).unwrap();
        assert!(json.contains("\"type\":\"effects\""));
        assert!(json.contains("\"keyframes\""));
        assert!(!json.contains("alignment"));
        assert!(!json.contains("scenes"));
    }

    #[test]
    fn alignment_summary_lists_instructions() {
        let mut note = Alignment::new(AlignMethod::Pad, 80.0);
        note.pad_info = Some(PadInfo {
            original_duration: 80.0,
            target_duration: 100.0,
            start_pad: 20.0,
        });
        assert_eq!(note.summary(), "pad (from 80.000s), lead pad 20.000s");
    }

    #[test]
    fn span_scaling_recomputes_duration() {
        let mut span = SceneSpan::new(10.0, 20.0);
        span.scale(1.5);
        assert!((span.start_time - 15.0).abs() < 1e-9);
        assert!((span.duration - 15.0).abs() < 1e-9);
    }
}
