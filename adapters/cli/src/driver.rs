//! Frame loop wiring the world, the wave controller and a rendering backend.

use std::time::Duration;

use anyhow::Result;
use glam::Vec2;
use log::trace;
use waypoint_defence_core::{Command, Event, Outcome, PlacementError, TowerId};
use waypoint_defence_rendering::{RenderingBackend, Scene};
use waypoint_defence_system_spawning::WaveController;
use waypoint_defence_system_tower_targeting::{TowerTarget, TowerTargeting};
use waypoint_defence_world::{self as world, query, World, WorldConfig};

/// Owns a session and advances it one fixed frame at a time.
#[derive(Debug)]
pub(crate) struct Driver {
    world: World,
    controller: WaveController,
    targeting: TowerTargeting,
    targets: Vec<TowerTarget>,
    frame_dt: Duration,
    frames: u64,
}

impl Driver {
    pub(crate) fn new(config: WorldConfig, frame_dt: Duration) -> Self {
        let controller = WaveController::new(config.rules.waves);
        let targeting = TowerTargeting::new(config.rules.field_width);
        Self {
            world: World::with_config(config),
            controller,
            targeting,
            targets: Vec::new(),
            frame_dt,
            frames: 0,
        }
    }

    /// Requests a tower at `position`, reporting the world's verdict.
    ///
    /// Returns `None` when the world answered with neither a placement nor a
    /// rejection.
    pub(crate) fn place_tower(
        &mut self,
        position: Vec2,
    ) -> Option<Result<TowerId, PlacementError>> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::PlaceTower { position }, &mut events);

        events.into_iter().find_map(|event| match event {
            Event::TowerPlaced { tower, .. } => Some(Ok(tower)),
            Event::TowerPlacementRejected { reason, .. } => Some(Err(reason)),
            _ => None,
        })
    }

    /// Advances the session by one frame and returns every event it produced.
    pub(crate) fn frame(&mut self) -> Vec<Event> {
        self.frames += 1;
        self.dispatch(Command::Tick { dt: self.frame_dt })
    }

    /// Restarts the session from wave one, keeping no towers.
    pub(crate) fn restart(&mut self) -> Vec<Event> {
        self.dispatch(Command::Restart)
    }

    fn dispatch(&mut self, command: Command) -> Vec<Event> {
        let mut log = Vec::new();
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);

        while !events.is_empty() {
            let mut commands = Vec::new();
            self.controller.handle(&events, &mut commands);
            log.append(&mut events);

            for command in commands {
                trace!("frame {}: {command:?}", self.frames);
                world::apply(&mut self.world, command, &mut events);
            }
        }

        log
    }

    /// Builds a scene from the current world views.
    pub(crate) fn scene(&mut self) -> Scene {
        let rules = query::rules(&self.world);
        let size = Vec2::new(rules.field_width, rules.field_height);
        let towers = query::tower_view(&self.world);
        let enemies = query::enemy_view(&self.world);
        self.targeting.handle(&towers, &enemies, &mut self.targets);

        Scene::from_views(
            size,
            query::path(&self.world),
            &towers,
            &enemies,
            &query::projectile_view(&self.world),
            query::hud(&self.world),
            query::outcome(&self.world),
        )
        .with_tower_targets(self.targets.iter().copied())
    }

    /// Runs up to `frames` frames, stopping early once the session ends.
    pub(crate) fn run<B>(&mut self, frames: u64, backend: &mut B) -> Result<Option<Outcome>>
    where
        B: RenderingBackend,
    {
        for _ in 0..frames {
            let _ = self.frame();
            backend.present(&self.scene())?;
            if query::is_game_over(&self.world) {
                break;
            }
        }

        backend.finish(&self.scene())?;
        Ok(query::outcome(&self.world))
    }

    pub(crate) fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_defence_core::WaveNumber;

    struct Recorder {
        presented: usize,
        finished: Option<Scene>,
    }

    impl RenderingBackend for Recorder {
        fn present(&mut self, _scene: &Scene) -> Result<()> {
            self.presented += 1;
            Ok(())
        }

        fn finish(&mut self, scene: &Scene) -> Result<()> {
            self.finished = Some(scene.clone());
            Ok(())
        }
    }

    fn driver() -> Driver {
        Driver::new(WorldConfig::default(), Duration::from_millis(16))
    }

    #[test]
    fn first_frame_starts_wave_one() {
        let mut driver = driver();

        let events = driver.frame();

        assert!(events.contains(&Event::WaveStarted {
            wave: WaveNumber::new(1)
        }));
        assert_eq!(driver.frames(), 1);
    }

    #[test]
    fn frames_feed_the_wave_controller() {
        let mut driver = driver();

        let spawned: usize = (0..400)
            .map(|_| {
                driver
                    .frame()
                    .iter()
                    .filter(|event| matches!(event, Event::EnemySpawned { .. }))
                    .count()
            })
            .sum();

        assert_eq!(spawned, 7);
        assert_eq!(driver.scene().enemies.len(), 7);
    }

    #[test]
    fn placement_reports_rejections() {
        let mut driver = driver();

        assert_eq!(
            driver.place_tower(Vec2::new(300.0, 170.0)),
            Some(Ok(TowerId::new(0)))
        );
        assert_eq!(
            driver.place_tower(Vec2::new(240.0, 170.0)),
            Some(Err(PlacementError::OnPath))
        );
        assert_eq!(driver.scene().hud.gold, 100);
    }

    #[test]
    fn placement_after_defeat_reports_game_over() {
        let mut driver = driver();
        let mut backend = Recorder {
            presented: 0,
            finished: None,
        };
        let _ = driver.run(20_000, &mut backend).expect("run");

        assert_eq!(
            driver.place_tower(Vec2::new(300.0, 170.0)),
            Some(Err(PlacementError::GameOver))
        );
    }

    #[test]
    fn scene_carries_tower_aim() {
        let mut driver = driver();
        let _ = driver.place_tower(Vec2::new(100.0, 170.0));

        let aimed = (0..200).any(|_| {
            let _ = driver.frame();
            !driver.scene().tower_targets.is_empty()
        });

        assert!(aimed, "tower beside the entrance should acquire a target");
    }

    #[test]
    fn run_stops_at_frame_budget() {
        let mut driver = driver();
        let mut backend = Recorder {
            presented: 0,
            finished: None,
        };

        let outcome = driver.run(50, &mut backend).expect("run");

        assert_eq!(outcome, None);
        assert_eq!(backend.presented, 50);
        let finished = backend.finished.expect("final scene");
        assert_eq!(finished.hud.wave, WaveNumber::new(1));
        assert!(finished.overlay.is_none());
    }

    #[test]
    fn run_stops_when_the_base_falls() {
        let mut driver = driver();
        let mut backend = Recorder {
            presented: 0,
            finished: None,
        };

        let outcome = driver.run(20_000, &mut backend).expect("run");

        assert_eq!(outcome, Some(Outcome::Defeat));
        assert!(backend.presented < 20_000);
        let overlay = backend
            .finished
            .and_then(|scene| scene.overlay)
            .expect("overlay");
        assert_eq!(overlay.title, "Game Over");
    }

    #[test]
    fn restart_returns_to_wave_one() {
        let mut driver = driver();
        let _ = driver.place_tower(Vec2::new(300.0, 170.0));
        for _ in 0..100 {
            let _ = driver.frame();
        }

        let events = driver.restart();

        assert_eq!(events.first(), Some(&Event::SessionReset));
        let scene = driver.scene();
        assert!(scene.towers.is_empty());
        assert_eq!(scene.hud.gold, 150);
        assert_eq!(scene.hud.wave, WaveNumber::new(1));
    }
}
