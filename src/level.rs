//! Level descriptors
//!
//! Levels are authored outside the simulation and arrive as camelCase JSON.
//! The descriptor is read-only input: the simulation copies what it needs into
//! a fresh context on every attempt and never writes back.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::geom::Rect;

/// Error type for level loading.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed level data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Terrain kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    #[default]
    Ground,
    Hazard,
    Goal,
    Gate,
}

/// Sinusoidal motion around the platform's authored position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MotionDesc {
    /// Horizontal amplitude
    pub range_x: f32,
    /// Vertical amplitude
    pub range_y: f32,
    /// Angular speed (radians per unit of simulation time)
    pub speed: f32,
    /// Phase offset (radians)
    pub phase: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformDesc {
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(default)]
    pub kind: PlatformKind,
    #[serde(default)]
    pub motion: Option<MotionDesc>,
    #[serde(default)]
    pub gate_id: Option<u32>,
    #[serde(default)]
    pub open: bool,
}

/// Crate variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrateKind {
    /// Pushable obstacle, heavy friction
    #[default]
    Wood,
    /// Rolling projectile, destroyed on boss contact
    Bomb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrateDesc {
    pub id: u32,
    #[serde(default)]
    pub kind: CrateKind,
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(default)]
    pub vel: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonDesc {
    pub id: u32,
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(default)]
    pub target_gate: Option<u32>,
    #[serde(default)]
    pub target_spawner: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonsterDesc {
    pub id: u32,
    #[serde(flatten)]
    pub rect: Rect,
    pub vel: Vec2,
    /// Patrol bounds on the x-axis, `[start, end]`
    pub patrol: [f32; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossDesc {
    #[serde(flatten)]
    pub rect: Rect,
    pub hp: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnerDesc {
    pub id: u32,
    pub pos: Vec2,
    #[serde(default = "default_spawner_item")]
    pub item: CrateKind,
    /// Ticks before the first spawn
    #[serde(default)]
    pub cooldown: u32,
}

fn default_spawner_item() -> CrateKind {
    CrateKind::Bomb
}

/// Complete, immutable description of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDescriptor {
    pub id: u32,
    pub name: String,
    pub guide_start: Vec2,
    pub companion_start: Vec2,
    pub platforms: Vec<PlatformDesc>,
    #[serde(default)]
    pub crates: Vec<CrateDesc>,
    #[serde(default)]
    pub buttons: Vec<ButtonDesc>,
    #[serde(default)]
    pub monsters: Vec<MonsterDesc>,
    #[serde(default)]
    pub boss: Option<BossDesc>,
    #[serde(default)]
    pub spawners: Vec<SpawnerDesc>,
    /// Total ink available for bridges this attempt
    pub ink: u32,
    #[serde(default)]
    pub no_ink_zones: Vec<Rect>,
    /// Camera advance per tick; `None` means the camera follows the characters
    #[serde(default)]
    pub auto_scroll: Option<f32>,
    /// Overrides the default Guide health and switches the level to HP damage
    #[serde(default)]
    pub max_health: Option<u32>,
}

impl LevelDescriptor {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let level = Self::from_json(&json)?;
        log::info!("Loaded level {} '{}' from {}", level.id, level.name, path.as_ref().display());
        Ok(level)
    }

    /// Damage drains health instead of ending the attempt outright
    pub fn uses_health(&self) -> bool {
        self.boss.is_some() || self.max_health.is_some()
    }
}
