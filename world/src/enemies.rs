//! Enemy construction and waypoint movement.

use glam::Vec2;
use rand::Rng;
use waypoint_defence_core::{EnemyId, EnemyRules, EnemySnapshot, Health, Path, WaveNumber};

/// Outcome of advancing an enemy by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Stride {
    /// The enemy is still travelling along the path.
    Travelling,
    /// No waypoint remains; the enemy has broken through.
    ReachedEnd,
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) position: Vec2,
    pub(crate) health: Health,
    pub(crate) waypoint: usize,
    pub(crate) radius: f32,
    pub(crate) reached_end: bool,
    speed: f32,
    reward: u32,
}

impl Enemy {
    /// Creates an enemy of `wave` at the start of `path`, heading for waypoint one.
    pub(crate) fn spawn<R: Rng>(
        id: EnemyId,
        wave: WaveNumber,
        rules: &EnemyRules,
        path: &Path,
        rng: &mut R,
    ) -> Self {
        let jitter: f32 = rng.gen();
        Self {
            id,
            position: path.start(),
            health: Health::new(rules.health(wave)),
            waypoint: 1,
            radius: rules.radius,
            reached_end: false,
            speed: rules.speed(wave, jitter),
            reward: rules.reward(wave),
        }
    }

    /// Moves toward the current waypoint, snapping onto it when within one stride.
    pub(crate) fn advance(&mut self, path: &Path) -> Stride {
        let Some(waypoint) = path.waypoint(self.waypoint) else {
            self.reached_end = true;
            return Stride::ReachedEnd;
        };

        let delta = waypoint - self.position;
        if delta.length() < self.speed {
            self.position = waypoint;
            self.waypoint += 1;
            return Stride::Travelling;
        }

        self.position += delta.normalize_or_zero() * self.speed;
        Stride::Travelling
    }

    pub(crate) fn is_defeated(&self) -> bool {
        self.health.is_depleted()
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            position: self.position,
            speed: self.speed,
            health: self.health,
            reward: self.reward,
            waypoint: self.waypoint,
            radius: self.radius,
        }
    }
}

/// Locates an enemy in a slice kept sorted by identifier.
pub(crate) fn enemy_index(enemies: &[Enemy], id: EnemyId) -> Option<usize> {
    enemies.binary_search_by_key(&id, |enemy| enemy.id).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn straight_path() -> Path {
        Path::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
        ])
        .expect("valid path")
    }

    fn enemy_with_speed(speed: f32) -> Enemy {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let rules = EnemyRules {
            base_speed: speed,
            speed_per_wave: 0.0,
            speed_jitter: 0.0,
            ..EnemyRules::default()
        };
        Enemy::spawn(
            EnemyId::new(0),
            WaveNumber::new(1),
            &rules,
            &straight_path(),
            &mut rng,
        )
    }

    #[test]
    fn spawned_enemy_heads_for_second_waypoint() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rules = EnemyRules::default();
        let enemy = Enemy::spawn(
            EnemyId::new(4),
            WaveNumber::new(2),
            &rules,
            &Path::standard(),
            &mut rng,
        );

        assert_eq!(enemy.position, Vec2::new(-40.0, 110.0));
        assert_eq!(enemy.waypoint, 1);
        assert_eq!(enemy.health, Health::new(44));
        let snapshot = enemy.snapshot();
        assert_eq!(snapshot.reward, 12);
        assert!(snapshot.speed >= 1.08 && snapshot.speed < 1.28);
    }

    #[test]
    fn enemy_moves_by_its_speed() {
        let mut enemy = enemy_with_speed(4.0);

        assert_eq!(enemy.advance(&straight_path()), Stride::Travelling);
        assert_eq!(enemy.position, Vec2::new(4.0, 0.0));
        assert_eq!(enemy.waypoint, 1);
    }

    #[test]
    fn overshoot_snaps_to_waypoint() {
        let path = straight_path();
        let mut enemy = enemy_with_speed(4.0);
        let _ = enemy.advance(&path);
        let _ = enemy.advance(&path);
        let _ = enemy.advance(&path);

        assert_eq!(enemy.position, Vec2::new(10.0, 0.0));
        assert_eq!(enemy.waypoint, 2);
    }

    #[test]
    fn passing_the_last_waypoint_reaches_end() {
        let path = straight_path();
        let mut enemy = enemy_with_speed(50.0);

        assert_eq!(enemy.advance(&path), Stride::Travelling);
        assert_eq!(enemy.advance(&path), Stride::Travelling);
        assert!(!enemy.reached_end);
        assert_eq!(enemy.advance(&path), Stride::ReachedEnd);
        assert!(enemy.reached_end);
        assert_eq!(enemy.position, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn enemy_index_uses_identifier_order() {
        let enemies: Vec<Enemy> = [2, 5, 9]
            .into_iter()
            .map(|id| {
                let mut enemy = enemy_with_speed(1.0);
                enemy.id = EnemyId::new(id);
                enemy
            })
            .collect();

        assert_eq!(enemy_index(&enemies, EnemyId::new(5)), Some(1));
        assert_eq!(enemy_index(&enemies, EnemyId::new(4)), None);
    }
}
