//! Importance-weighted compression for a single mode.
//!
//! Every scene keeps a ratio of its original duration. The base ratio is
//! `max(1 - k * w, floor)`, where `w` is its level's cut weight and `floor`
//! its level's minimum ratio. A single cut depth `k` is shared by all
//! scenes and solved so the total lands on the aim.
//!
//! Two adjustments sit on top of the base ratio:
//! - a short scene is lifted toward `min_scene_duration`, but never above
//!   the ratio of any more important scene
//! - a ceiling (the ratios a weaker mode chose for the same list) caps
//!   every scene, so a stronger mode never keeps more of a scene
//!
//! Scenes are ranked by importance level, then by raw score. A scene never
//! keeps a smaller fraction than a lower-ranked one.

use std::cmp::Ordering;

use crate::models::{ImportanceLevel, Scene};

use super::profile::ModeProfile;

const SOLVER_ITERATIONS: usize = 100;

/// Result of compressing a scene list under one mode.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionPlan {
    /// New duration for each scene, in input order.
    pub durations: Vec<f64>,
    /// Retained fraction for each scene, in input order.
    pub ratios: Vec<f64>,
    /// Sum of `durations`.
    pub total: f64,
    /// Whether `total` is within the aim.
    pub reached: bool,
}

struct Term {
    duration: f64,
    weight: f64,
    floor: f64,
    /// Ratio that keeps `min_scene_duration` seconds.
    keep: f64,
    ceiling: f64,
}

impl Term {
    fn base(&self, depth: f64) -> f64 {
        if self.weight <= 0.0 {
            return 1.0;
        }
        (1.0 - depth * self.weight).max(self.floor)
    }
}

struct Solver {
    terms: Vec<Term>,
    /// Term indices grouped by rank, most important group first.
    groups: Vec<Vec<usize>>,
}

impl Solver {
    fn new(
        scenes: &[Scene],
        profile: &ModeProfile,
        min_scene_duration: f64,
        ceiling: Option<&[f64]>,
    ) -> Self {
        let terms: Vec<Term> = scenes
            .iter()
            .enumerate()
            .map(|(i, scene)| {
                let cap = ceiling.and_then(|c| c.get(i)).copied().unwrap_or(1.0);
                term_for(scene, profile, min_scene_duration, cap)
            })
            .collect();

        let rank = |scene: &Scene| (level_of(scene), scene.importance_score);
        let mut order: Vec<usize> = (0..scenes.len()).collect();
        order.sort_by(|&a, &b| compare_rank(rank(&scenes[b]), rank(&scenes[a])));

        let mut groups: Vec<Vec<usize>> = Vec::new();
        for i in order {
            match groups.last_mut() {
                Some(group)
                    if compare_rank(rank(&scenes[group[0]]), rank(&scenes[i]))
                        == Ordering::Equal =>
                {
                    group.push(i)
                }
                _ => groups.push(vec![i]),
            }
        }

        Self { terms, groups }
    }

    /// Ratios at a cut depth. Non-increasing in `depth` for every scene.
    fn ratios_at(&self, depth: f64) -> Vec<f64> {
        let mut ratios = vec![1.0; self.terms.len()];
        // Smallest ratio among more important scenes
        let mut cap = 1.0_f64;

        for group in &self.groups {
            let mut group_min = cap;
            for &i in group {
                let term = &self.terms[i];
                let ratio = term
                    .base(depth)
                    .max(term.keep.min(cap))
                    .min(term.ceiling);
                ratios[i] = ratio;
                group_min = group_min.min(ratio);
            }
            cap = group_min;
        }
        ratios
    }

    fn total_at(&self, depth: f64) -> f64 {
        self.terms
            .iter()
            .zip(self.ratios_at(depth))
            .map(|(term, ratio)| term.duration * ratio)
            .sum()
    }

    /// Depth at which every base ratio sits on its floor.
    fn max_depth(&self) -> f64 {
        self.terms
            .iter()
            .filter(|t| t.weight > 0.0)
            .map(|t| (1.0 - t.floor) / t.weight)
            .fold(0.0_f64, f64::max)
    }

    fn plan(&self, depth: f64, aim: f64) -> CompressionPlan {
        let ratios = self.ratios_at(depth);
        let durations: Vec<f64> = self
            .terms
            .iter()
            .zip(&ratios)
            .map(|(term, ratio)| term.duration * ratio)
            .collect();
        let total = durations.iter().sum();
        CompressionPlan {
            durations,
            ratios,
            total,
            reached: total <= aim,
        }
    }
}

/// Compress classified scenes toward `aim` seconds.
///
/// Durations are always computed from each scene's `original_duration`, so
/// the plan does not depend on earlier passes. `ceiling` holds per-scene
/// upper bounds on the retained fraction, in input order. When even the
/// floors overshoot `aim`, the fully compressed plan is returned with
/// `reached == false`.
pub fn compress(
    scenes: &[Scene],
    profile: &ModeProfile,
    min_scene_duration: f64,
    aim: f64,
    ceiling: Option<&[f64]>,
) -> CompressionPlan {
    let solver = Solver::new(scenes, profile, min_scene_duration, ceiling);

    if solver.total_at(0.0) <= aim {
        return solver.plan(0.0, aim);
    }

    let max_depth = solver.max_depth();
    if solver.total_at(max_depth) > aim {
        return solver.plan(max_depth, aim);
    }

    // total_at is non-increasing in depth; keep `hi` on the feasible side
    let (mut lo, mut hi) = (0.0_f64, max_depth);
    for _ in 0..SOLVER_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if solver.total_at(mid) <= aim {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    solver.plan(hi, aim)
}

fn level_of(scene: &Scene) -> ImportanceLevel {
    scene.importance_level.unwrap_or(ImportanceLevel::Low)
}

fn compare_rank(a: (ImportanceLevel, f64), b: (ImportanceLevel, f64)) -> Ordering {
    a.0.cmp(&b.0).then(a.1.total_cmp(&b.1))
}

fn term_for(scene: &Scene, profile: &ModeProfile, min_scene_duration: f64, ceiling: f64) -> Term {
    let duration = scene.original_duration.unwrap_or(scene.duration).max(0.0);
    let level = level_of(scene);

    let keep = if duration > 0.0 {
        (min_scene_duration.min(duration) / duration).min(1.0)
    } else {
        1.0
    };

    Term {
        duration,
        weight: profile.cut_weight.get(level),
        floor: profile.min_ratio.get(level),
        keep,
        ceiling,
    }
}
