//! Scene data structures consumed and produced by overflow rescue.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::enums::{ImportanceLevel, RescueMode};

/// Record of how much rescue shortened a scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentInfo {
    pub original_duration: f64,
    pub adjusted_duration: f64,
    /// `adjusted / original` (1.0 for zero-length scenes).
    pub compression_ratio: f64,
    /// Mode that produced the final durations.
    pub mode: RescueMode,
}

/// A candidate scene in a screenplay cut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene identifier.
    pub id: String,
    /// Free-form role tag (opening, development, climax, ending, ...).
    #[serde(rename = "type", default)]
    pub scene_type: String,
    /// Source start time in seconds.
    #[serde(default)]
    pub start: f64,
    /// Source end time in seconds.
    #[serde(default)]
    pub end: f64,
    /// Length in the cut, in seconds.
    pub duration: f64,
    /// Importance, typically 0..1, higher is more critical.
    #[serde(default)]
    pub importance_score: f64,
    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Duration before rescue.
    #[serde(
        rename = "_original_duration",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub original_duration: Option<f64>,
    /// Tier assigned during rescue.
    #[serde(
        rename = "_importance_level",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub importance_level: Option<ImportanceLevel>,
    /// Present on every scene of a list that rescue had to compress.
    #[serde(
        rename = "_adjustment_info",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub adjustment: Option<AdjustmentInfo>,
}

impl Scene {
    /// Create a scene spanning `start..end`; duration is derived.
    pub fn new(id: impl Into<String>, start: f64, end: f64, importance_score: f64) -> Self {
        Self {
            id: id.into(),
            scene_type: String::new(),
            start,
            end,
            duration: end - start,
            importance_score,
            tags: BTreeSet::new(),
            original_duration: None,
            importance_level: None,
            adjustment: None,
        }
    }

    /// Create a scene from a bare duration (start at 0).
    pub fn with_duration(id: impl Into<String>, duration: f64, importance_score: f64) -> Self {
        Self::new(id, 0.0, duration, importance_score)
    }

    /// Set the role tag.
    pub fn with_type(mut self, scene_type: impl Into<String>) -> Self {
        self.scene_type = scene_type.into();
        self
    }

    /// Add a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Fraction of the pre-rescue duration this scene kept.
    ///
    /// 1.0 when the scene has not been through rescue or had zero length.
    pub fn retained_fraction(&self) -> f64 {
        match self.original_duration {
            Some(original) if original > 0.0 => self.duration / original,
            _ => 1.0,
        }
    }
}

/// Total duration of a scene sequence; `0.0` for an empty slice.
pub fn sum_duration(scenes: &[Scene]) -> f64 {
    scenes.iter().map(|s| s.duration).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_duration_of_empty_is_zero() {
        assert_eq!(sum_duration(&[]), 0.0);
    }

    #[test]
    fn sum_duration_adds_all_scenes() {
        let scenes = vec![
            Scene::with_duration("a", 12.5, 0.3),
            Scene::with_duration("b", 7.5, 0.9),
        ];
        assert!((sum_duration(&scenes) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn scene_deserializes_with_defaults() {
        let json = r#"{"id": "s1", "type": "climax", "duration": 30.0,
                       "importance_score": 0.9, "tags": ["critical"]}"#;
        let scene: Scene = serde_json::from_str(json).unwrap();
        assert_eq!(scene.scene_type, "climax");
        assert!(scene.tags.contains("critical"));
        assert_eq!(scene.start, 0.0);
        assert!(scene.original_duration.is_none());
    }

    #[test]
    fn derived_fields_use_underscore_names() {
        let mut scene = Scene::with_duration("s1", 10.0, 0.5);
        scene.original_duration = Some(10.0);
        scene.importance_level = Some(ImportanceLevel::Medium);
        let json = serde_json::to_string(&scene).unwrap();
        assert!(json.contains("\"_original_duration\":10.0"));
        assert!(json.contains("\"_importance_level\":\"medium\""));
        assert!(!json.contains("_adjustment_info"));
    }

    #[test]
    fn retained_fraction_defaults_to_one() {
        let mut scene = Scene::with_duration("s1", 8.0, 0.5);
        assert_eq!(scene.retained_fraction(), 1.0);
        scene.original_duration = Some(10.0);
        assert!((scene.retained_fraction() - 0.8).abs() < 1e-9);
    }
}
