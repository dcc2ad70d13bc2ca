//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod boss;
pub mod camera;
pub mod collision;
pub mod drawing;
pub mod geom;
pub mod monsters;
pub mod outcome;
pub mod puzzle;
pub mod state;
pub mod tether;
pub mod tick;

pub use geom::Rect;
pub use outcome::LossCause;
pub use state::{
    Body, Boss, BossPhase, BossState, Bridge, Camera, CameraMode, Character, Crate, GameEvent,
    GamePhase, Platform, Projectile, Role, SimContext,
};
pub use tick::{TickInput, TickOutput, tick};
