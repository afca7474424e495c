//! Importance classification.

use crate::models::{ImportanceLevel, Scene};

use super::profile::RescueConfig;

/// Stamp every scene with its pre-rescue duration and importance level.
///
/// A scene carrying any protected tag is critical regardless of score.
/// Annotations from an earlier rescue are reset, so a rescued list can be
/// fed back in with a new target.
pub fn classify(scenes: &mut [Scene], config: &RescueConfig) {
    for scene in scenes.iter_mut() {
        if let Some(original) = scene.original_duration {
            scene.duration = original;
        }
        scene.original_duration = Some(scene.duration);
        scene.adjustment = None;
        scene.importance_level = Some(level_of(scene, config));
    }
}

fn level_of(scene: &Scene, config: &RescueConfig) -> ImportanceLevel {
    let protected = config
        .protected_tags
        .iter()
        .any(|tag| scene.tags.contains(tag));

    if protected {
        ImportanceLevel::Critical
    } else {
        config.thresholds.level_for(scene.importance_score)
    }
}

/// Fraction of scenes at the critical level.
pub fn critical_share(scenes: &[Scene]) -> f64 {
    if scenes.is_empty() {
        return 0.0;
    }
    let critical = scenes
        .iter()
        .filter(|s| s.importance_level == Some(ImportanceLevel::Critical))
        .count();
    critical as f64 / scenes.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_tag_promotes_to_critical() {
        let config = RescueConfig::default();
        let mut scenes = vec![
            Scene::with_duration("a", 10.0, 0.1).with_tag("critical"),
            Scene::with_duration("b", 10.0, 0.1),
        ];
        classify(&mut scenes, &config);
        assert_eq!(scenes[0].importance_level, Some(ImportanceLevel::Critical));
        assert_eq!(scenes[1].importance_level, Some(ImportanceLevel::Low));
        assert_eq!(critical_share(&scenes), 0.5);
    }

    #[test]
    fn reclassify_restores_original_duration() {
        let config = RescueConfig::default();
        let mut scene = Scene::with_duration("a", 6.0, 0.5);
        scene.original_duration = Some(10.0);
        let mut scenes = vec![scene];
        classify(&mut scenes, &config);
        assert_eq!(scenes[0].duration, 10.0);
        assert_eq!(scenes[0].original_duration, Some(10.0));
        assert!(scenes[0].adjustment.is_none());
    }

    #[test]
    fn critical_share_of_empty_is_zero() {
        assert_eq!(critical_share(&[]), 0.0);
    }
}
