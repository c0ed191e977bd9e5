#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Waypoint Defence.
//!
//! The [`World`] owns every mutable value of a session. Adapters and systems
//! mutate it exclusively through [`apply`] and observe it through [`query`].

use std::time::Duration;

use glam::Vec2;
use log::{debug, info, trace, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use waypoint_defence_core::{
    Command, EnemyId, Event, HudSnapshot, Outcome, Path, PlacementError, ProjectileId, Rules,
    WaveNumber,
};
use waypoint_defence_system_tower_targeting::{TargetCandidate, TowerTargeting};

mod enemies;
mod projectiles;
mod towers;

use enemies::{enemy_index, Enemy, Stride};
use projectiles::Projectile;
use towers::TowerRegistry;

const DEFAULT_SEED: u64 = 0x5eed_d3fe_ace0_0001;

/// Takes the next identifier from `counter`, or `None` once it is exhausted.
///
/// The counter never wraps, so the largest identifier handed out is
/// `u32::MAX - 1` and identifiers stay unique and ascending for a session.
pub(crate) fn next_id(counter: &mut u32) -> Option<u32> {
    let id = *counter;
    *counter = id.checked_add(1)?;
    Some(id)
}

/// Parameters fixed for the lifetime of a world.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Balancing constants.
    pub rules: Rules,
    /// Route enemies follow.
    pub path: Path,
    /// Seed of the generator that jitters enemy speed.
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            path: Path::standard(),
            seed: DEFAULT_SEED,
        }
    }
}

/// Represents the authoritative Waypoint Defence session state.
#[derive(Debug)]
pub struct World {
    rules: Rules,
    path: Path,
    rng: ChaCha8Rng,
    gold: u32,
    lives: i32,
    wave: WaveNumber,
    enemies: Vec<Enemy>,
    towers: TowerRegistry,
    projectiles: Vec<Projectile>,
    spawning: bool,
    outcome: Option<Outcome>,
    next_enemy_id: u32,
    next_projectile_id: u32,
    targeting: TowerTargeting,
}

impl World {
    /// Creates a world for the standard game, waiting for its first tick.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a world using the provided configuration.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        let WorldConfig { rules, path, seed } = config;
        Self {
            gold: rules.starting_gold,
            lives: rules.starting_lives,
            wave: WaveNumber::default(),
            enemies: Vec::new(),
            towers: TowerRegistry::new(),
            projectiles: Vec::new(),
            spawning: false,
            outcome: None,
            next_enemy_id: 0,
            next_projectile_id: 0,
            targeting: TowerTargeting::new(rules.field_width),
            rng: ChaCha8Rng::seed_from_u64(seed),
            rules,
            path,
        }
    }

    fn reset(&mut self) {
        self.gold = self.rules.starting_gold;
        self.lives = self.rules.starting_lives;
        self.wave = WaveNumber::default();
        self.enemies.clear();
        self.towers = TowerRegistry::new();
        self.projectiles.clear();
        self.spawning = false;
        self.outcome = None;
        self.next_enemy_id = 0;
        self.next_projectile_id = 0;
    }

    fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            gold: self.gold,
            lives: self.lives,
            wave: self.wave,
            wave_count: self.rules.wave_count,
        }
    }

    fn check_placement(&self, position: Vec2) -> Result<(), PlacementError> {
        if self.is_over() {
            return Err(PlacementError::GameOver);
        }

        let cost = self.rules.tower.cost;
        if self.gold < cost {
            return Err(PlacementError::InsufficientGold {
                required: cost,
                available: self.gold,
            });
        }

        if self.path.is_near(position, self.rules.path_clearance) {
            return Err(PlacementError::OnPath);
        }

        if let Some(tower) = self.towers.crowding(position, self.rules.tower_clearance) {
            return Err(PlacementError::TooCloseToTower { tower });
        }

        Ok(())
    }

    fn place_tower(&mut self, position: Vec2, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.check_placement(position) {
            debug!("tower placement at {position} rejected: {reason}");
            out_events.push(Event::TowerPlacementRejected { position, reason });
            return;
        }

        let Some(tower) = self.towers.insert(position, &self.rules.tower) else {
            warn!("tower placement at {position} rejected: tower identifiers exhausted");
            out_events.push(Event::TowerPlacementRejected {
                position,
                reason: PlacementError::TowerLimitReached,
            });
            return;
        };
        self.gold -= self.rules.tower.cost;
        debug!("tower {tower} placed at {position}, {} gold left", self.gold);
        out_events.push(Event::TowerPlaced { tower, position });
    }

    fn spawn_enemy(&mut self, wave: WaveNumber, out_events: &mut Vec<Event>) {
        if !self.spawning || self.is_over() || wave != self.wave {
            trace!("ignoring spawn request for wave {wave}");
            return;
        }

        let Some(id) = next_id(&mut self.next_enemy_id).map(EnemyId::new) else {
            warn!("enemy identifiers exhausted, dropping spawn for wave {wave}");
            return;
        };
        let enemy = Enemy::spawn(id, wave, &self.rules.enemy, &self.path, &mut self.rng);
        self.enemies.push(enemy);
        out_events.push(Event::EnemySpawned { enemy: id, wave });
    }

    fn complete_spawning(&mut self, wave: WaveNumber, out_events: &mut Vec<Event>) {
        if !self.spawning || wave != self.wave {
            return;
        }

        self.spawning = false;
        debug!("wave {wave} finished spawning");
        out_events.push(Event::SpawningCompleted { wave });
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) {
        self.reset();
        info!("session restarted");
        out_events.push(Event::SessionReset);
        self.advance_wave(out_events);
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.is_over() {
            return;
        }

        out_events.push(Event::TimeAdvanced { dt });
        self.move_enemies(out_events);
        self.update_towers(out_events);
        self.move_projectiles(out_events);
        self.clean_up(out_events);

        if self.lives <= 0 {
            self.finish(Outcome::Defeat, out_events);
        }

        if !self.spawning && self.enemies.is_empty() && !self.is_over() {
            self.advance_wave(out_events);
        }

        out_events.push(Event::HudSynced { hud: self.hud() });
    }

    fn move_enemies(&mut self, out_events: &mut Vec<Event>) {
        for enemy in &mut self.enemies {
            if enemy.advance(&self.path) == Stride::ReachedEnd {
                self.lives -= 1;
                out_events.push(Event::EnemyReachedEnd {
                    enemy: enemy.id,
                    lives_remaining: self.lives,
                });
            }
        }
    }

    fn update_towers(&mut self, out_events: &mut Vec<Event>) {
        self.targeting
            .prepare(self.enemies.iter().map(|enemy| TargetCandidate {
                enemy: enemy.id,
                position: enemy.position,
                waypoint: enemy.waypoint,
            }));

        let speed = self.rules.tower.projectile_speed;
        for tower in self.towers.iter_mut() {
            if !tower.cool_down() {
                continue;
            }

            let Some(target) = self.targeting.select(tower.position, tower.range()) else {
                continue;
            };

            // Out of projectile identifiers: towers stay loaded and hold fire.
            let Some(projectile) = next_id(&mut self.next_projectile_id).map(ProjectileId::new)
            else {
                trace!("tower {} holds fire, projectile identifiers exhausted", tower.id);
                continue;
            };

            tower.rearm();
            self.projectiles.push(Projectile::fire(
                projectile,
                tower.position,
                target,
                speed,
                tower.damage(),
            ));
            out_events.push(Event::ProjectileFired {
                projectile,
                tower: tower.id,
                target,
            });
        }
    }

    fn move_projectiles(&mut self, out_events: &mut Vec<Event>) {
        for projectile in &mut self.projectiles {
            let Some(index) = enemy_index(&self.enemies, projectile.target) else {
                continue;
            };

            let enemy = &mut self.enemies[index];
            if projectile.home_on(enemy.position, enemy.radius) {
                enemy.health.damage(projectile.damage);
                out_events.push(Event::ProjectileHit {
                    projectile: projectile.id,
                    target: enemy.id,
                    damage: projectile.damage,
                });
            }
        }
    }

    fn clean_up(&mut self, out_events: &mut Vec<Event>) {
        let enemies = &self.enemies;
        self.projectiles.retain(|projectile| {
            !projectile.spent && enemy_index(enemies, projectile.target).is_some()
        });

        let mut defeated = Vec::new();
        self.enemies.retain(|enemy| {
            if enemy.reached_end {
                return false;
            }
            if enemy.is_defeated() {
                defeated.push(enemy.id);
                return false;
            }
            true
        });

        let bounty = self.rules.kill_bounty(self.wave);
        for enemy in defeated {
            self.gold = self.gold.saturating_add(bounty);
            out_events.push(Event::EnemyDefeated { enemy, bounty });
        }
    }

    fn advance_wave(&mut self, out_events: &mut Vec<Event>) {
        if self.wave.get() >= self.rules.wave_count {
            self.finish(Outcome::Victory, out_events);
            return;
        }

        self.wave = self.wave.next();
        self.spawning = true;
        debug!("wave {} of {} started", self.wave, self.rules.wave_count);
        out_events.push(Event::WaveStarted { wave: self.wave });
    }

    fn finish(&mut self, outcome: Outcome, out_events: &mut Vec<Event>) {
        self.outcome = Some(outcome);
        info!("{}: {}", outcome.title(), outcome.message());
        out_events.push(Event::GameOver { outcome });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::PlaceTower { position } => world.place_tower(position, out_events),
        Command::SpawnEnemy { wave } => world.spawn_enemy(wave, out_events),
        Command::CompleteSpawning { wave } => world.complete_spawning(wave, out_events),
        Command::Restart => world.restart(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use waypoint_defence_core::{
        EnemyView, HudSnapshot, Outcome, Path, ProjectileView, Rules, TowerView,
    };

    use super::World;

    /// Summary values for HUD collaborators.
    #[must_use]
    pub fn hud(world: &World) -> HudSnapshot {
        world.hud()
    }

    /// Provides read-only access to the route enemies follow.
    #[must_use]
    pub fn path(world: &World) -> &Path {
        &world.path
    }

    /// Provides read-only access to the balancing constants.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// Captures a read-only view of the enemies on the path.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures a read-only view of the towers on the field.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }

    /// Reports whether the current wave is still spawning enemies.
    #[must_use]
    pub fn is_spawning(world: &World) -> bool {
        world.spawning
    }

    /// Reports whether the session reached a terminal outcome.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.is_over()
    }

    /// Terminal outcome of the session, if one was reached.
    #[must_use]
    pub fn outcome(world: &World) -> Option<Outcome> {
        world.outcome
    }
}
