//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use glam::Vec2;
use waypoint_defence_core::{distance, TowerId, TowerRules, TowerSnapshot};

/// Tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Centre of the tower.
    pub(crate) position: Vec2,
    range: f32,
    fire_rate_ticks: u32,
    damage: u32,
    cooldown_ticks: u32,
}

impl TowerState {
    fn new(id: TowerId, position: Vec2, rules: &TowerRules) -> Self {
        Self {
            id,
            position,
            range: rules.range,
            fire_rate_ticks: rules.fire_rate_ticks,
            damage: rules.damage,
            cooldown_ticks: 0,
        }
    }

    pub(crate) fn range(&self) -> f32 {
        self.range
    }

    pub(crate) fn damage(&self) -> u32 {
        self.damage
    }

    /// Counts the cooldown down by one tick and reports readiness to fire.
    pub(crate) fn cool_down(&mut self) -> bool {
        self.cooldown_ticks = self.cooldown_ticks.saturating_sub(1);
        self.cooldown_ticks == 0
    }

    /// Restarts the cooldown after a shot.
    pub(crate) fn rearm(&mut self) {
        self.cooldown_ticks = self.fire_rate_ticks;
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            position: self.position,
            range: self.range,
            damage: self.damage,
            fire_rate_ticks: self.fire_rate_ticks,
            cooldown_ticks: self.cooldown_ticks,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    pub(crate) next_tower_id: u32,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: 0,
        }
    }

    /// Builds a tower at `position` and returns its identifier.
    ///
    /// Returns `None` without storing anything once identifiers run out.
    pub(crate) fn insert(&mut self, position: Vec2, rules: &TowerRules) -> Option<TowerId> {
        let id = crate::next_id(&mut self.next_tower_id).map(TowerId::new)?;
        let _ = self.entries.insert(id, TowerState::new(id, position, rules));
        Some(id)
    }

    /// First tower whose centre lies strictly closer than `clearance` to `position`.
    pub(crate) fn crowding(&self, position: Vec2, clearance: f32) -> Option<TowerId> {
        self.entries
            .values()
            .find(|tower| distance(tower.position, position) < clearance)
            .map(|tower| tower.id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }
}
