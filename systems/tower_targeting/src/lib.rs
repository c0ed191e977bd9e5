#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks tower targets from enemy snapshots.
//!
//! Towers prefer the enemy that is furthest along the path. Progress is
//! approximated as the index of the waypoint an enemy is heading for plus its
//! horizontal position normalised by the field width.

use glam::Vec2;
use waypoint_defence_core::{distance, EnemyId, EnemyView, Rules, TowerId, TowerView};

/// Enemy considered by the targeting policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetCandidate {
    /// Identifier of the enemy.
    pub enemy: EnemyId,
    /// Position in field coordinates.
    pub position: Vec2,
    /// Index of the waypoint the enemy is heading for.
    pub waypoint: usize,
}

/// Target chosen for a tower, expressed for presentation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that would fire.
    pub tower: TowerId,
    /// Enemy selected by the tower.
    pub enemy: EnemyId,
    /// Centre of the tower.
    pub from: Vec2,
    /// Position of the enemy.
    pub to: Vec2,
}

/// Tower targeting system that reuses a candidate buffer across towers.
#[derive(Debug)]
pub struct TowerTargeting {
    field_width: f32,
    candidates: Vec<TargetCandidate>,
}

impl Default for TowerTargeting {
    fn default() -> Self {
        Self::new(Rules::default().field_width)
    }
}

impl TowerTargeting {
    /// Creates a targeting system for a field of the provided width.
    ///
    /// Non-positive widths are treated as one unit wide.
    #[must_use]
    pub fn new(field_width: f32) -> Self {
        let field_width = if field_width > 0.0 { field_width } else { 1.0 };
        Self {
            field_width,
            candidates: Vec::new(),
        }
    }

    /// Replaces the candidate set considered by [`TowerTargeting::select`].
    ///
    /// Candidates keep the provided order; earlier candidates win ties.
    pub fn prepare<I>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = TargetCandidate>,
    {
        self.candidates.clear();
        self.candidates.extend(candidates);
    }

    /// Selects the furthest-progressed candidate within `range` of `tower`.
    #[must_use]
    pub fn select(&self, tower: Vec2, range: f32) -> Option<EnemyId> {
        self.select_candidate(tower, range)
            .map(|candidate| candidate.enemy)
    }

    /// Computes the current target of every tower from read-only views.
    ///
    /// The output buffer is cleared before populating it; towers without a
    /// target in range are omitted.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        out.clear();
        self.prepare(enemies.iter().map(|snapshot| TargetCandidate {
            enemy: snapshot.id,
            position: snapshot.position,
            waypoint: snapshot.waypoint,
        }));

        if self.candidates.is_empty() {
            return;
        }

        for tower in towers.iter() {
            if let Some(candidate) = self.select_candidate(tower.position, tower.range) {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: candidate.enemy,
                    from: tower.position,
                    to: candidate.position,
                });
            }
        }
    }

    fn select_candidate(&self, tower: Vec2, range: f32) -> Option<&TargetCandidate> {
        let mut best: Option<(&TargetCandidate, f32)> = None;

        for candidate in &self.candidates {
            if distance(tower, candidate.position) > range {
                continue;
            }

            let progress = self.progress(candidate);
            let is_further = best.map_or(true, |(_, furthest)| progress > furthest);
            if is_further {
                best = Some((candidate, progress));
            }
        }

        best.map(|(candidate, _)| candidate)
    }

    fn progress(&self, candidate: &TargetCandidate) -> f32 {
        candidate.waypoint as f32 + candidate.position.x / self.field_width
    }
}
