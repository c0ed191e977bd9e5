#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Waypoint Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{fmt, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod geometry;
mod rules;

pub use geometry::{distance, project_to_segment, Path, PathError};
pub use rules::{EnemyRules, Rules, TowerRules, WaveRules};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one discrete step.
    Tick {
        /// Wall-clock time represented by the step; drives the spawn cadence.
        dt: Duration,
    },
    /// Requests placement of a tower at a point in field coordinates.
    PlaceTower {
        /// Centre of the requested tower.
        position: Vec2,
    },
    /// Requests that one enemy of the provided wave enter the path.
    SpawnEnemy {
        /// Wave the spawn belongs to; stale waves are ignored.
        wave: WaveNumber,
    },
    /// Signals that every enemy of the wave has been spawned.
    CompleteSpawning {
        /// Wave whose spawning finished.
        wave: WaveNumber,
    },
    /// Tears the session down and starts again from wave one.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation advanced by one step.
    TimeAdvanced {
        /// Wall-clock time represented by the step.
        dt: Duration,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Wave the enemy belongs to.
        wave: WaveNumber,
    },
    /// Reports that an enemy walked past the final waypoint.
    EnemyReachedEnd {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
        /// Lives left after the penalty was applied.
        lives_remaining: i32,
    },
    /// Reports that an enemy was destroyed by tower fire.
    EnemyDefeated {
        /// Identifier of the defeated enemy.
        enemy: EnemyId,
        /// Gold credited for the defeat.
        bounty: u32,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Centre of the tower.
        position: Vec2,
    },
    /// Reports that a tower placement request was rejected without changes.
    TowerPlacementRejected {
        /// Position provided in the placement request.
        position: Vec2,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy the projectile homes on.
        target: EnemyId,
    },
    /// Confirms that a projectile connected with its target.
    ProjectileHit {
        /// Identifier of the spent projectile.
        projectile: ProjectileId,
        /// Enemy that absorbed the damage.
        target: EnemyId,
        /// Damage applied.
        damage: u32,
    },
    /// Announces that a new wave began spawning.
    WaveStarted {
        /// Wave that started.
        wave: WaveNumber,
    },
    /// Announces that every enemy of the wave has entered the path.
    SpawningCompleted {
        /// Wave whose spawning finished.
        wave: WaveNumber,
    },
    /// Announces that the session reached a terminal outcome.
    GameOver {
        /// Whether the player won or lost.
        outcome: Outcome,
    },
    /// Announces that the session was reinitialised.
    SessionReset,
    /// Summary state published at the end of every step for HUD consumers.
    HudSynced {
        /// Latest summary values.
        hud: HudSnapshot,
    },
}

/// Terminal outcome of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Every wave was cleared.
    Victory,
    /// Lives ran out.
    Defeat,
}

impl Outcome {
    /// Headline shown by overlays announcing the outcome.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Victory => "You Win!",
            Self::Defeat => "Game Over",
        }
    }

    /// Body text shown by overlays announcing the outcome.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Victory => "All waves defeated. Great defense!",
            Self::Defeat => "Your base was overrun. Try a new strategy.",
        }
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The session already ended.
    #[error("the game is over")]
    GameOver,
    /// The player cannot afford another tower.
    #[error("a tower costs {required} gold but only {available} is available")]
    InsufficientGold {
        /// Cost of a tower.
        required: u32,
        /// Gold held when the request was made.
        available: u32,
    },
    /// The requested point lies within the clearance around the path.
    #[error("towers cannot be placed on the path")]
    OnPath,
    /// The requested point crowds an existing tower.
    #[error("too close to tower {tower}")]
    TooCloseToTower {
        /// Tower violating the clearance.
        tower: TowerId,
    },
    /// Every tower identifier of the session has been handed out.
    #[error("no tower identifiers left")]
    TowerLimitReached,
}

/// Sequential number of a wave; zero before the first wave starts.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct WaveNumber(u32);

impl WaveNumber {
    /// Creates a wave number from its numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the wave.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// The wave following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for WaveNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TowerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Current and maximum hit points of an enemy.
///
/// The current value never exceeds the maximum and saturates at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Health {
    current: u32,
    maximum: u32,
}

impl Health {
    /// Creates full health with the provided maximum.
    #[must_use]
    pub const fn new(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Hit points at full health.
    #[must_use]
    pub const fn maximum(&self) -> u32 {
        self.maximum
    }

    /// Removes `amount` hit points, stopping at zero.
    pub fn damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Remaining fraction of hit points in `0.0..=1.0`.
    #[must_use]
    pub fn ratio(&self) -> f32 {
        if self.maximum == 0 {
            return 0.0;
        }
        self.current as f32 / self.maximum as f32
    }
}

/// Summary values displayed by HUD collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HudSnapshot {
    /// Gold available for towers.
    pub gold: u32,
    /// Lives left before the base is overrun.
    pub lives: i32,
    /// Wave currently in play.
    pub wave: WaveNumber,
    /// Number of waves in the session.
    pub wave_count: u32,
}

impl fmt::Display for HudSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gold {} | lives {} | wave {}/{}",
            self.gold, self.lives, self.wave, self.wave_count
        )
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Position in field coordinates.
    pub position: Vec2,
    /// Distance covered per tick.
    pub speed: f32,
    /// Current and maximum hit points.
    pub health: Health,
    /// Reward recorded when the enemy was created.
    pub reward: u32,
    /// Index of the waypoint the enemy is heading for.
    pub waypoint: usize,
    /// Collision radius.
    pub radius: f32,
}

impl EnemySnapshot {
    /// Remaining health fraction, used to size health bars.
    #[must_use]
    pub fn hp_ratio(&self) -> f32 {
        self.health.ratio()
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Centre of the tower.
    pub position: Vec2,
    /// Targeting radius.
    pub range: f32,
    /// Damage per projectile.
    pub damage: u32,
    /// Ticks between shots.
    pub fire_rate_ticks: u32,
    /// Ticks left before the tower may fire again.
    pub cooldown_ticks: u32,
}

/// Immutable representation of a single projectile's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile by the world.
    pub id: ProjectileId,
    /// Position in field coordinates.
    pub position: Vec2,
    /// Enemy the projectile homes on; it may already be gone.
    pub target: EnemyId,
    /// Damage applied on impact.
    pub damage: u32,
}

/// Read-only snapshot describing all enemies on the path.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all towers placed on the field.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured towers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no towers were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured projectiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no projectiles were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}
