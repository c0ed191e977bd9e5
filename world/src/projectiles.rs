//! Homing projectiles fired by towers.

use glam::Vec2;
use waypoint_defence_core::{distance, EnemyId, ProjectileId, ProjectileSnapshot};

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) target: EnemyId,
    pub(crate) damage: u32,
    pub(crate) spent: bool,
    position: Vec2,
    speed: f32,
}

impl Projectile {
    pub(crate) fn fire(
        id: ProjectileId,
        origin: Vec2,
        target: EnemyId,
        speed: f32,
        damage: u32,
    ) -> Self {
        Self {
            id,
            target,
            damage,
            spent: false,
            position: origin,
            speed,
        }
    }

    /// Steps toward the target's current position and reports whether it connected.
    ///
    /// A connecting projectile is marked spent; it never connects twice.
    pub(crate) fn home_on(&mut self, target: Vec2, target_radius: f32) -> bool {
        if self.spent {
            return false;
        }

        let delta = target - self.position;
        let length = delta.length();
        let length = if length > 0.0 { length } else { 1.0 };
        self.position += delta / length * self.speed;

        if distance(self.position, target) < target_radius {
            self.spent = true;
            return true;
        }
        false
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            position: self.position,
            target: self.target,
            damage: self.damage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projectile() -> Projectile {
        Projectile::fire(
            ProjectileId::new(0),
            Vec2::ZERO,
            EnemyId::new(3),
            5.2,
            16,
        )
    }

    #[test]
    fn projectile_homes_toward_target() {
        let mut projectile = projectile();

        assert!(!projectile.home_on(Vec2::new(100.0, 0.0), 12.0));
        let snapshot = projectile.snapshot();
        assert!((snapshot.position.x - 5.2).abs() < 1e-5);
        assert_eq!(snapshot.position.y, 0.0);
    }

    #[test]
    fn projectile_follows_a_moving_target() {
        let mut projectile = projectile();
        let _ = projectile.home_on(Vec2::new(100.0, 0.0), 12.0);
        let _ = projectile.home_on(Vec2::new(5.2, 100.0), 12.0);

        let position = projectile.snapshot().position;
        assert!((position.x - 5.2).abs() < 1e-4);
        assert!((position.y - 5.2).abs() < 1e-4);
    }

    #[test]
    fn projectile_connects_within_radius_once() {
        let mut projectile = projectile();

        assert!(projectile.home_on(Vec2::new(15.0, 0.0), 12.0));
        assert!(projectile.spent);
        assert!(!projectile.home_on(Vec2::new(15.0, 0.0), 12.0));
    }

    #[test]
    fn coincident_target_does_not_produce_nan() {
        let mut projectile = projectile();

        assert!(projectile.home_on(Vec2::ZERO, 12.0));
        assert!(projectile.snapshot().position.is_finite());
    }
}
