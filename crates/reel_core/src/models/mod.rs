//! Data models for timeline fitting.
//!
//! This module contains the core data structures shared by both components:
//! - Enums for track kinds, alignment methods, importance levels, rescue modes
//! - Track structures (tracks, spans, subtitle cues, alignment annotations)
//! - Scene structures (screenplay scenes and rescue annotations)

mod enums;
mod scene;
mod track;

// Re-export all public types
pub use enums::{AlignMethod, ImportanceLevel, RescueMode, TrackKind};
pub use scene::{sum_duration, AdjustmentInfo, Scene};
pub use track::{Alignment, CropInfo, PadInfo, SceneSpan, SubtitleCue, Track, TrackMap};
