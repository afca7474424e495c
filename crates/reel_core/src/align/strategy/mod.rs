//! Per-kind alignment strategies.
//!
//! Each track kind tolerates timing changes differently: audio can be
//! shifted without audible damage, video shows a stretch once it leaves a
//! narrow band, subtitles follow whatever timeline they are put on. A
//! strategy encodes one such policy.

mod audio;
mod subtitle;
mod visual;

pub use audio::AudioStrategy;
pub use subtitle::SubtitleStrategy;
pub use visual::VisualStrategy;

use super::AlignConfig;
use crate::models::{Track, TrackKind};

/// Trait for per-kind alignment policies.
///
/// Implementations receive a non-base track with positive duration whose
/// gap to the target is at least the alignment threshold, and must return
/// it annotated with `duration == target_duration`.
pub trait AlignStrategy: Send + Sync {
    /// Get the name of this strategy.
    fn name(&self) -> &'static str;

    /// Bring `track` to `target_duration`.
    fn align(&self, track: Track, target_duration: f64, config: &AlignConfig) -> Track;
}

/// Create the alignment strategy for a track kind.
pub fn strategy_for(kind: TrackKind) -> Box<dyn AlignStrategy> {
    match kind {
        TrackKind::Audio => Box::new(AudioStrategy),
        TrackKind::Subtitle => Box::new(SubtitleStrategy),
        TrackKind::Video => Box::new(VisualStrategy::video()),
        TrackKind::Effects | TrackKind::Other => Box::new(VisualStrategy::overlay()),
    }
}
