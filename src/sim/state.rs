//! Simulation context and core simulation types
//!
//! Everything mutable about one level attempt lives in [`SimContext`]. A new
//! attempt always builds a fresh context from the level descriptor; nothing is
//! patched in place between attempts.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::consts::MAX_PARTICLES;
use crate::level::{CrateKind, LevelDescriptor, MotionDesc, PlatformKind};
use crate::tuning::Tuning;
use crate::unit_from_angle;

/// Current phase of an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Level won; terminal
    Complete,
    /// Attempt lost; terminal
    GameOver,
}

/// Which of the two characters a body belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Player-controlled lead
    Guide,
    /// Passive follower moved only by the tether and collisions
    Companion,
}

/// Signals produced during a tick, drained into the tick output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelComplete { bridges_drawn: usize },
    GameOver,
    GuideDamaged { hp: u32 },
    BossDamaged { hp: u32 },
    BossPhaseTwo,
    BridgeCommitted,
    TetherChanged { linked: bool },
    CrateSpawned { id: u32 },
}

/// A dynamic AABB body affected by gravity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub grounded: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            grounded: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Bottom-center point
    pub fn feet(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x * 0.5, self.pos.y + self.size.y)
    }

    /// Place the body so its feet rest at height `y`
    pub fn rest_on(&mut self, y: f32) {
        self.pos.y = y - self.size.y;
        self.vel.y = 0.0;
        self.grounded = true;
    }
}

/// A playable character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub role: Role,
    pub body: Body,
    pub hp: u32,
    pub max_hp: u32,
    /// Ticks of remaining damage immunity
    pub invuln: u32,
    /// A jump was requested this tick while grounded
    #[serde(default)]
    pub jump_queued: bool,
}

impl Character {
    pub fn new(role: Role, pos: Vec2, size: Vec2, max_hp: u32) -> Self {
        Self {
            role,
            body: Body::new(pos, size),
            hp: max_hp,
            max_hp,
            invuln: 0,
            jump_queued: false,
        }
    }
}

/// Sinusoidal platform motion around an anchor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub range: Vec2,
    pub speed: f32,
    pub phase: f32,
}

impl Motion {
    /// Offset from the anchor at simulation time `t`
    pub fn offset_at(&self, t: f32) -> Vec2 {
        self.range * (t * self.speed + self.phase).sin()
    }

    pub fn is_lateral(&self) -> bool {
        self.range.x != 0.0
    }
}

impl From<MotionDesc> for Motion {
    fn from(desc: MotionDesc) -> Self {
        Self {
            range: Vec2::new(desc.range_x, desc.range_y),
            speed: desc.speed,
            phase: desc.phase,
        }
    }
}

/// Terrain piece; `rect` is derived from `anchor` and `motion` every tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub kind: PlatformKind,
    /// Authored rectangle (motion anchor)
    pub anchor: Rect,
    /// Current rectangle
    pub rect: Rect,
    pub motion: Option<Motion>,
    pub gate_id: Option<u32>,
    /// Gates only; an open gate does not collide
    pub open: bool,
}

impl Platform {
    /// Whether bodies collide with this platform right now
    pub fn is_solid(&self) -> bool {
        !(self.kind == PlatformKind::Gate && self.open)
    }

    /// Recompute the current rectangle for simulation time `t`
    pub fn sync_to_time(&mut self, t: f32) {
        self.rect = match self.motion {
            Some(motion) => self.anchor.translated(motion.offset_at(t)),
            None => self.anchor,
        };
    }

    /// Horizontal displacement between time `t` and the next tick, for carrying riders
    pub fn carry_delta(&self, t: f32, step: f32) -> f32 {
        match self.motion {
            Some(motion) if motion.is_lateral() => {
                motion.offset_at(t + step).x - motion.offset_at(t).x
            }
            _ => 0.0,
        }
    }
}

/// A drawn line segment acting as one-sided ground
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bridge {
    pub a: Vec2,
    pub b: Vec2,
}

impl Bridge {
    pub fn min_x(&self) -> f32 {
        self.a.x.min(self.b.x)
    }

    pub fn max_x(&self) -> f32 {
        self.a.x.max(self.b.x)
    }

    /// Interpolated surface height at `x` (clamped to the segment); `None` for vertical strokes
    pub fn surface_y(&self, x: f32) -> Option<f32> {
        let dx = self.b.x - self.a.x;
        if dx.abs() < 1e-3 {
            return None;
        }
        let t = ((x - self.a.x) / dx).clamp(0.0, 1.0);
        Some(self.a.y + (self.b.y - self.a.y) * t)
    }

    /// Slope angle in radians measured left-to-right (positive descends to the right)
    pub fn slope_angle(&self) -> f32 {
        let (left, right) = if self.a.x <= self.b.x {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        };
        (right.y - left.y).atan2(right.x - left.x)
    }
}

/// A pushable crate or rolling bomb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crate {
    pub id: u32,
    pub kind: CrateKind,
    pub body: Body,
}

/// Pressure plate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Button {
    pub id: u32,
    pub rect: Rect,
    pub pressed: bool,
    pub target_gate: Option<u32>,
    pub target_spawner: Option<u32>,
}

/// Patrolling hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub id: u32,
    pub rect: Rect,
    pub vel: Vec2,
    pub patrol_start: f32,
    pub patrol_end: f32,
}

/// Cooldown-gated crate factory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    pub id: u32,
    pub pos: Vec2,
    pub item: CrateKind,
    pub cooldown: u32,
}

/// Boss difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    One,
    Two,
}

/// Boss behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossState {
    /// Resting; the attack timer counts down to the next attack
    Cooldown,
    /// Firing; the attack timer counts down to the next shot or volley
    Attack,
}

/// Boss encounter state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    /// Authored rectangle, before the floating offset
    pub anchor: Rect,
    /// Current vertical float offset
    pub float_offset: f32,
    pub hp: u32,
    pub max_hp: u32,
    pub phase: BossPhase,
    pub state: BossState,
    pub attack_timer: u32,
    /// Shots fired in the current phase-one volley
    pub shots_fired: u32,
    pub invuln: u32,
}

impl Boss {
    pub fn new(anchor: Rect, hp: u32, first_attack_delay: u32) -> Self {
        Self {
            anchor,
            float_offset: 0.0,
            hp,
            max_hp: hp,
            phase: BossPhase::One,
            state: BossState::Cooldown,
            attack_timer: first_attack_delay,
            shots_fired: 0,
            invuln: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        self.anchor.translated(Vec2::new(0.0, self.float_offset))
    }
}

/// Boss projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Remaining lifetime in ticks
    pub life: u32,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub life: f32, // 0-1, decreases over time
    pub size: f32,
}

/// Particle color tags for the renderer
pub mod particle_color {
    pub const BOSS_HIT: u32 = 1;
    pub const BOMB: u32 = 2;
    pub const GUIDE_HIT: u32 = 3;
    pub const SPAWN: u32 = 4;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CameraMode {
    /// Ease toward the characters
    Follow,
    /// Advance at a fixed rate per tick
    AutoScroll { rate: f32 },
}

/// Horizontal camera (left edge of the view in world units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
    pub mode: CameraMode,
}

/// Tether link state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tether {
    pub linked: bool,
    /// Toggle key is still held from the last accepted press
    pub toggle_latch: bool,
}

/// Ink budget and in-progress stroke
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub ink: f32,
    pub last_point: Option<Vec2>,
}

/// All mutable state of one level attempt
#[derive(Debug, Clone)]
pub struct SimContext {
    pub tuning: Tuning,
    pub level_id: u32,
    pub phase: GamePhase,
    /// Ticks elapsed in this attempt
    pub ticks: u64,
    pub guide: Character,
    pub companion: Character,
    pub platforms: Vec<Platform>,
    pub bridges: Vec<Bridge>,
    pub crates: Vec<Crate>,
    pub buttons: Vec<Button>,
    pub monsters: Vec<Monster>,
    pub spawners: Vec<Spawner>,
    pub boss: Option<Boss>,
    pub projectiles: Vec<Projectile>,
    pub no_ink_zones: Vec<Rect>,
    pub particles: Vec<Particle>,
    pub camera: Camera,
    pub tether: Tether,
    pub drawing: Drawing,
    /// Damage drains hp instead of ending the attempt
    pub health_mode: bool,
    /// The level had a boss encounter (win is decided by the boss, not the goal)
    pub boss_level: bool,
    pub rng: Pcg32,
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl SimContext {
    /// Build a fresh attempt from an immutable level descriptor
    pub fn new(level: &LevelDescriptor, tuning: &Tuning, seed: u64) -> Self {
        let max_hp = level.max_health.unwrap_or(tuning.default_max_hp);
        let guide = Character::new(Role::Guide, level.guide_start, tuning.guide_size, max_hp);
        let companion = Character::new(
            Role::Companion,
            level.companion_start,
            tuning.companion_size,
            max_hp,
        );

        let mut platforms: Vec<Platform> = level
            .platforms
            .iter()
            .map(|p| Platform {
                kind: p.kind,
                anchor: p.rect,
                rect: p.rect,
                motion: p.motion.map(Motion::from),
                gate_id: p.gate_id,
                open: p.open,
            })
            .collect();
        for platform in &mut platforms {
            platform.sync_to_time(0.0);
        }
        if !platforms.iter().any(|p| p.kind == PlatformKind::Goal) && level.boss.is_none() {
            log::warn!("Level {} has no goal platform; it cannot be won", level.id);
        }

        let crates = level
            .crates
            .iter()
            .map(|c| Crate {
                id: c.id,
                kind: c.kind,
                body: Body {
                    pos: c.rect.pos(),
                    vel: c.vel,
                    size: Vec2::new(c.rect.w, c.rect.h),
                    grounded: false,
                },
            })
            .collect::<Vec<_>>();

        let buttons = level
            .buttons
            .iter()
            .map(|b| Button {
                id: b.id,
                rect: b.rect,
                pressed: false,
                target_gate: b.target_gate,
                target_spawner: b.target_spawner,
            })
            .collect();

        let monsters = level
            .monsters
            .iter()
            .map(|m| Monster {
                id: m.id,
                rect: m.rect,
                vel: m.vel,
                patrol_start: m.patrol[0].min(m.patrol[1]),
                patrol_end: m.patrol[0].max(m.patrol[1]),
            })
            .collect();

        let spawners = level
            .spawners
            .iter()
            .map(|s| Spawner {
                id: s.id,
                pos: s.pos,
                item: s.item,
                cooldown: s.cooldown,
            })
            .collect();

        let boss = level
            .boss
            .as_ref()
            .map(|b| Boss::new(b.rect, b.hp, tuning.boss_rest_ticks));

        let camera = match level.auto_scroll {
            Some(rate) => Camera {
                x: 0.0,
                mode: CameraMode::AutoScroll { rate },
            },
            None => Camera {
                x: guide.body.center().x - tuning.viewport_width * 0.5,
                mode: CameraMode::Follow,
            },
        };

        // Authored ids are kept; spawned crates get ids past the largest one
        let next_id = crates.iter().map(|c| c.id).max().map_or(1, |id| id + 1);

        log::info!(
            "Level {} '{}' started (ink {}, {} platforms, boss: {})",
            level.id,
            level.name,
            level.ink,
            platforms.len(),
            level.boss.is_some()
        );

        Self {
            tuning: tuning.clone(),
            level_id: level.id,
            phase: GamePhase::Playing,
            ticks: 0,
            guide,
            companion,
            platforms,
            bridges: Vec::new(),
            crates,
            buttons,
            monsters,
            spawners,
            boss,
            projectiles: Vec::new(),
            no_ink_zones: level.no_ink_zones.clone(),
            particles: Vec::new(),
            camera,
            tether: Tether {
                linked: true,
                toggle_latch: false,
            },
            drawing: Drawing {
                ink: level.ink as f32,
                last_point: None,
            },
            health_mode: level.uses_health(),
            boss_level: level.boss.is_some(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id,
        }
    }

    /// Simulation time derived from the tick counter
    pub fn time(&self) -> f32 {
        self.ticks as f32 * self.tuning.time_step
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// The level's goal platform (first one authored)
    pub fn goal(&self) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.kind == PlatformKind::Goal)
    }

    /// Distance between the two characters' centers
    pub fn tether_distance(&self) -> f32 {
        self.guide.body.center().distance(self.companion.body.center())
    }

    /// Scatter cosmetic particles around `pos`
    pub fn burst(&mut self, pos: Vec2, count: u32, color: u32) {
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                break;
            }
            let angle: f32 = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed: f32 = self.rng.random_range(1.0..4.0);
            let size: f32 = self.rng.random_range(2.0..5.0);
            self.particles.push(Particle {
                pos,
                vel: unit_from_angle(angle) * speed,
                color,
                life: 1.0,
                size,
            });
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::level::PlatformDesc;

    /// A flat floor at y=400 spanning x 0..2000 with a goal at the far end
    pub fn flat_level() -> LevelDescriptor {
        LevelDescriptor {
            id: 1,
            name: "Flat".into(),
            guide_start: Vec2::new(100.0, 360.0),
            companion_start: Vec2::new(150.0, 374.0),
            platforms: vec![
                PlatformDesc {
                    rect: Rect::new(0.0, 400.0, 2000.0, 40.0),
                    kind: PlatformKind::Ground,
                    motion: None,
                    gate_id: None,
                    open: false,
                },
                PlatformDesc {
                    rect: Rect::new(1800.0, 340.0, 80.0, 60.0),
                    kind: PlatformKind::Goal,
                    motion: None,
                    gate_id: None,
                    open: false,
                },
            ],
            crates: Vec::new(),
            buttons: Vec::new(),
            monsters: Vec::new(),
            boss: None,
            spawners: Vec::new(),
            ink: 100,
            no_ink_zones: Vec::new(),
            auto_scroll: None,
            max_health: None,
        }
    }

    pub fn context(level: &LevelDescriptor) -> SimContext {
        SimContext::new(level, &Tuning::default(), 7)
    }
}
