#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Waypoint Defence adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use waypoint_defence_core::{
    EnemyId, EnemyView, HudSnapshot, Outcome, Path, ProjectileId, ProjectileView, TowerId,
    TowerView,
};
use waypoint_defence_system_tower_targeting::TowerTarget;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Creates an opaque color from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_hex(rgb: u32) -> Self {
        Self::from_rgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Returns the same color with the provided alpha.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Colors used for every element of the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Fill behind the tiles.
    pub background: Color,
    /// Decorative ground tiles.
    pub tile: Color,
    /// Wide road the enemies walk along.
    pub path: Color,
    /// Thin centre line drawn over the road.
    pub path_centre: Color,
    /// Outer disc of a tower.
    pub tower_base: Color,
    /// Inner disc of a tower.
    pub tower_core: Color,
    /// Enemy body.
    pub enemy: Color,
    /// Empty part of a health bar.
    pub health_track: Color,
    /// Filled part of a health bar.
    pub health_fill: Color,
    /// Projectile body.
    pub projectile: Color,
    /// Dimming layer behind the outcome overlay.
    pub overlay: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_hex(0x19_25_36),
            tile: Color::from_hex(0x22_30_48),
            path: Color::from_hex(0x6f_62_51),
            path_centre: Color::from_hex(0x93_81_6b),
            tower_base: Color::from_hex(0xa2_d7_ff),
            tower_core: Color::from_hex(0x14_41_66),
            enemy: Color::from_hex(0xf6_76_76),
            health_track: Color::from_hex(0x2f_2f_38),
            health_fill: Color::from_hex(0x6d_ff_8d),
            projectile: Color::from_hex(0xff_e0_7c),
            overlay: Color::from_hex(0x0b_11_1a).with_alpha(0.75),
        }
    }
}

/// Decorative tile grid drawn behind the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Distance between consecutive tile origins.
    pub pitch: f32,
    /// Side length of a tile.
    pub size: f32,
}

impl TilePresentation {
    /// Tile spacing used by the standard field.
    pub const STANDARD: Self = Self {
        pitch: 52.0,
        size: 50.0,
    };

    /// Top-left corners of every tile covering a field of `size`.
    pub fn origins(&self, size: Vec2) -> impl Iterator<Item = Vec2> + '_ {
        let pitch = self.pitch.max(1.0);
        let columns = (size.x / pitch).ceil().max(0.0) as u32;
        let rows = (size.y / pitch).ceil().max(0.0) as u32;
        let inset = (pitch - self.size) / 2.0;
        (0..rows).flat_map(move |row| {
            (0..columns).map(move |column| {
                Vec2::new(column as f32 * pitch + inset, row as f32 * pitch + inset)
            })
        })
    }
}

/// Road drawn beneath every other element.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPresentation {
    /// Polyline through the waypoints.
    pub waypoints: Vec<Vec2>,
    /// Stroke width of the road.
    pub width: f32,
    /// Stroke width of the centre line.
    pub centre_width: f32,
}

impl PathPresentation {
    /// Describes the provided path with the standard road widths.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            waypoints: path.waypoints().to_vec(),
            width: 34.0,
            centre_width: 3.0,
        }
    }
}

/// Tower drawn as two concentric discs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerPresentation {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Centre of the tower.
    pub position: Vec2,
    /// Radius of the outer disc.
    pub base_radius: f32,
    /// Radius of the inner disc.
    pub core_radius: f32,
    /// Firing range, for adapters that visualise coverage.
    pub range: f32,
}

/// Bar drawn above an enemy showing its remaining health.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealthBar {
    /// Top-left corner of the bar.
    pub origin: Vec2,
    /// Width of the full bar.
    pub width: f32,
    /// Height of the bar.
    pub height: f32,
    /// Remaining health fraction in `0.0..=1.0`.
    pub ratio: f32,
}

impl HealthBar {
    const WIDTH: f32 = 24.0;
    const HEIGHT: f32 = 4.0;
    const OFFSET: f32 = 18.0;

    /// Places a bar above an enemy centred at `centre`.
    #[must_use]
    pub fn above(centre: Vec2, ratio: f32) -> Self {
        Self {
            origin: Vec2::new(centre.x - Self::WIDTH / 2.0, centre.y - Self::OFFSET),
            width: Self::WIDTH,
            height: Self::HEIGHT,
            ratio: ratio.clamp(0.0, 1.0),
        }
    }

    /// Width of the filled portion.
    #[must_use]
    pub fn fill_width(&self) -> f32 {
        self.width * self.ratio
    }
}

/// Enemy drawn as a disc with a health bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Identifier allocated to the enemy by the world.
    pub id: EnemyId,
    /// Centre of the enemy.
    pub position: Vec2,
    /// Radius of the enemy body.
    pub radius: f32,
    /// Health bar drawn above the enemy.
    pub health_bar: HealthBar,
}

/// Projectile drawn as a small disc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Identifier allocated to the projectile by the world.
    pub id: ProjectileId,
    /// Centre of the projectile.
    pub position: Vec2,
    /// Radius of the projectile body.
    pub radius: f32,
}

/// Line from a tower to the enemy it is aiming at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTargetLine {
    /// Tower that is aiming.
    pub tower: TowerId,
    /// Enemy being aimed at.
    pub enemy: EnemyId,
    /// Start of the line at the tower centre.
    pub from: Vec2,
    /// End of the line at the enemy centre.
    pub to: Vec2,
}

impl From<TowerTarget> for TowerTargetLine {
    fn from(target: TowerTarget) -> Self {
        Self {
            tower: target.tower,
            enemy: target.enemy,
            from: target.from,
            to: target.to,
        }
    }
}

/// Banner shown once the session reached an outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayPresentation {
    /// Outcome being announced.
    pub outcome: Outcome,
    /// Headline of the banner.
    pub title: &'static str,
    /// Body text of the banner.
    pub message: &'static str,
}

impl From<Outcome> for OverlayPresentation {
    fn from(outcome: Outcome) -> Self {
        Self {
            outcome,
            title: outcome.title(),
            message: outcome.message(),
        }
    }
}

/// Scene description combining the field, its inhabitants and the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Width and height of the field.
    pub size: Vec2,
    /// Colors used to draw the scene.
    pub palette: Palette,
    /// Decorative tiles behind the field.
    pub tiles: TilePresentation,
    /// Road enemies follow.
    pub path: PathPresentation,
    /// Towers placed on the field.
    pub towers: Vec<TowerPresentation>,
    /// Enemies walking the path.
    pub enemies: Vec<EnemyPresentation>,
    /// Projectiles in flight.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Current aim of every tower with a target in range.
    pub tower_targets: Vec<TowerTargetLine>,
    /// Gold, lives and wave counters.
    pub hud: HudSnapshot,
    /// Outcome banner, present once the session ended.
    pub overlay: Option<OverlayPresentation>,
}

impl Scene {
    const TOWER_BASE_RADIUS: f32 = 14.0;
    const TOWER_CORE_RADIUS: f32 = 6.0;
    const PROJECTILE_RADIUS: f32 = 4.0;

    /// Builds a scene from read-only world views.
    #[must_use]
    pub fn from_views(
        size: Vec2,
        path: &Path,
        towers: &TowerView,
        enemies: &EnemyView,
        projectiles: &ProjectileView,
        hud: HudSnapshot,
        outcome: Option<Outcome>,
    ) -> Self {
        Self {
            size,
            palette: Palette::default(),
            tiles: TilePresentation::STANDARD,
            path: PathPresentation::new(path),
            towers: towers
                .iter()
                .map(|tower| TowerPresentation {
                    id: tower.id,
                    position: tower.position,
                    base_radius: Self::TOWER_BASE_RADIUS,
                    core_radius: Self::TOWER_CORE_RADIUS,
                    range: tower.range,
                })
                .collect(),
            enemies: enemies
                .iter()
                .map(|enemy| EnemyPresentation {
                    id: enemy.id,
                    position: enemy.position,
                    radius: enemy.radius,
                    health_bar: HealthBar::above(enemy.position, enemy.hp_ratio()),
                })
                .collect(),
            projectiles: projectiles
                .iter()
                .map(|projectile| ProjectilePresentation {
                    id: projectile.id,
                    position: projectile.position,
                    radius: Self::PROJECTILE_RADIUS,
                })
                .collect(),
            tower_targets: Vec::new(),
            hud,
            overlay: outcome.map(OverlayPresentation::from),
        }
    }

    /// Replaces the aim lines drawn between towers and their targets.
    #[must_use]
    pub fn with_tower_targets<I>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = TowerTarget>,
    {
        self.tower_targets = targets.into_iter().map(TowerTargetLine::from).collect();
        self
    }

    /// Single-line HUD text, including the outcome title once the session ended.
    #[must_use]
    pub fn hud_line(&self) -> String {
        match self.overlay {
            Some(overlay) => format!("{} | {}", self.hud, overlay.title),
            None => self.hud.to_string(),
        }
    }
}

/// Rendering backend capable of presenting Waypoint Defence scenes.
pub trait RenderingBackend {
    /// Presents a single frame.
    ///
    /// Backends are called once per simulated frame with a scene built from
    /// the latest world snapshots.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;

    /// Presents the final scene once the frame loop ended.
    fn finish(&mut self, scene: &Scene) -> AnyResult<()> {
        self.present(scene)
    }
}
