//! Fixed balancing constants and the formulas derived from them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::WaveNumber;

/// Complete set of balancing constants governing a session.
///
/// [`Rules::default`] reproduces the standard game. Every field is public so
/// tests can pin down randomness or shrink waves, but players never change
/// these at runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    /// Gold available when a session starts.
    pub starting_gold: u32,
    /// Lives available when a session starts.
    pub starting_lives: i32,
    /// Number of waves that must be cleared to win.
    pub wave_count: u32,
    /// Flat gold credited per defeated enemy before the wave bonus is added.
    pub kill_bounty_base: u32,
    /// Minimum distance between a new tower and any path segment.
    pub path_clearance: f32,
    /// Minimum distance between a new tower and any existing tower.
    pub tower_clearance: f32,
    /// Width of the playing field; normalises the targeting progress term.
    pub field_width: f32,
    /// Height of the playing field.
    pub field_height: f32,
    /// Tower statistics.
    pub tower: TowerRules,
    /// Enemy statistics and their per-wave scaling.
    pub enemy: EnemyRules,
    /// Wave size and spawn cadence.
    pub waves: WaveRules,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            starting_gold: 150,
            starting_lives: 20,
            wave_count: 8,
            kill_bounty_base: 8,
            path_clearance: 40.0,
            tower_clearance: 42.0,
            field_width: 900.0,
            field_height: 520.0,
            tower: TowerRules::default(),
            enemy: EnemyRules::default(),
            waves: WaveRules::default(),
        }
    }
}

impl Rules {
    /// Gold credited for an enemy defeated while `wave` is the current wave.
    #[must_use]
    pub fn kill_bounty(&self, wave: WaveNumber) -> u32 {
        self.kill_bounty_base.saturating_add(wave.get())
    }
}

/// Statistics shared by every tower.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerRules {
    /// Gold deducted when a tower is placed.
    pub cost: u32,
    /// Targeting radius in field units.
    pub range: f32,
    /// Ticks a tower waits between shots.
    pub fire_rate_ticks: u32,
    /// Damage carried by each projectile.
    pub damage: u32,
    /// Distance a projectile travels per tick.
    pub projectile_speed: f32,
}

impl Default for TowerRules {
    fn default() -> Self {
        Self {
            cost: 50,
            range: 135.0,
            fire_rate_ticks: 35,
            damage: 16,
            projectile_speed: 5.2,
        }
    }
}

/// Enemy statistics expressed as `base + wave * increment`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyRules {
    /// Speed of a wave-zero enemy in field units per tick.
    pub base_speed: f32,
    /// Speed gained per wave.
    pub speed_per_wave: f32,
    /// Upper bound (exclusive) of the random speed bonus.
    pub speed_jitter: f32,
    /// Hit points of a wave-zero enemy.
    pub base_health: u32,
    /// Hit points gained per wave.
    pub health_per_wave: u32,
    /// Reward of a wave-zero enemy.
    pub base_reward: u32,
    /// Collision radius used by projectiles.
    pub radius: f32,
}

impl Default for EnemyRules {
    fn default() -> Self {
        Self {
            base_speed: 0.8,
            speed_per_wave: 0.14,
            speed_jitter: 0.2,
            base_health: 24,
            health_per_wave: 10,
            base_reward: 10,
            radius: 12.0,
        }
    }
}

impl EnemyRules {
    /// Speed for an enemy of `wave`, where `jitter_sample` lies in `[0, 1)`.
    #[must_use]
    pub fn speed(&self, wave: WaveNumber, jitter_sample: f32) -> f32 {
        self.base_speed
            + wave.get() as f32 * self.speed_per_wave
            + jitter_sample.clamp(0.0, 1.0) * self.speed_jitter
    }

    /// Maximum hit points for an enemy of `wave`.
    #[must_use]
    pub fn health(&self, wave: WaveNumber) -> u32 {
        self.base_health
            .saturating_add(wave.get().saturating_mul(self.health_per_wave))
    }

    /// Reward recorded on an enemy of `wave`.
    #[must_use]
    pub fn reward(&self, wave: WaveNumber) -> u32 {
        self.base_reward.saturating_add(wave.get())
    }
}

/// Wave size and spawn cadence.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveRules {
    /// Enemies in a wave-zero wave.
    pub base_enemies: u32,
    /// Additional enemies per wave.
    pub enemies_per_wave: u32,
    /// Spawn interval of a wave-zero wave.
    pub base_spawn_interval: Duration,
    /// Reduction of the spawn interval per wave.
    pub spawn_interval_step: Duration,
    /// Shortest spawn interval regardless of wave.
    pub min_spawn_interval: Duration,
}

impl Default for WaveRules {
    fn default() -> Self {
        Self {
            base_enemies: 5,
            enemies_per_wave: 2,
            base_spawn_interval: Duration::from_millis(560),
            spawn_interval_step: Duration::from_millis(40),
            min_spawn_interval: Duration::from_millis(260),
        }
    }
}

impl WaveRules {
    /// Number of enemies spawned during `wave`.
    #[must_use]
    pub fn enemies_in_wave(&self, wave: WaveNumber) -> u32 {
        self.base_enemies
            .saturating_add(wave.get().saturating_mul(self.enemies_per_wave))
    }

    /// Delay between consecutive spawns during `wave`.
    ///
    /// Later waves spawn faster until the interval reaches its floor.
    #[must_use]
    pub fn spawn_interval(&self, wave: WaveNumber) -> Duration {
        let reduction = self.spawn_interval_step.saturating_mul(wave.get());
        self.base_spawn_interval
            .saturating_sub(reduction)
            .max(self.min_spawn_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_wave_spawns_seven_enemies() {
        let waves = WaveRules::default();
        assert_eq!(waves.enemies_in_wave(WaveNumber::new(1)), 7);
        assert_eq!(waves.enemies_in_wave(WaveNumber::new(8)), 21);
    }

    #[test]
    fn spawn_interval_shrinks_until_floor() {
        let waves = WaveRules::default();
        assert_eq!(
            waves.spawn_interval(WaveNumber::new(1)),
            Duration::from_millis(520)
        );
        assert_eq!(
            waves.spawn_interval(WaveNumber::new(7)),
            Duration::from_millis(280)
        );
        assert_eq!(
            waves.spawn_interval(WaveNumber::new(8)),
            Duration::from_millis(260)
        );
        assert_eq!(
            waves.spawn_interval(WaveNumber::new(30)),
            Duration::from_millis(260)
        );
    }

    #[test]
    fn enemy_stats_scale_with_wave() {
        let enemy = EnemyRules::default();
        let wave = WaveNumber::new(3);
        assert_eq!(enemy.health(wave), 54);
        assert_eq!(enemy.reward(wave), 13);

        let slowest = enemy.speed(wave, 0.0);
        let fastest = enemy.speed(wave, 0.999);
        assert!((slowest - 1.22).abs() < 1e-5);
        assert!(fastest > slowest);
        assert!(fastest < slowest + enemy.speed_jitter);
    }

    #[test]
    fn kill_bounty_includes_current_wave() {
        let rules = Rules::default();
        assert_eq!(rules.kill_bounty(WaveNumber::new(1)), 9);
        assert_eq!(rules.kill_bounty(WaveNumber::new(6)), 14);
    }

    #[test]
    fn rules_round_trip_through_bincode() {
        let rules = Rules::default();
        let bytes = bincode::serialize(&rules).expect("serialize");
        let restored: Rules = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, rules);
    }
}
