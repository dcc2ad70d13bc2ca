//! Tethered - simulation core for a two-character puzzle-platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, tether, puzzles, boss, outcomes)
//! - `level`: Immutable level descriptors and their JSON loader
//! - `tuning`: Data-driven game balance
//! - `driver`: Fixed-step driver that owns pacing and restarts

pub mod driver;
pub mod level;
pub mod sim;
pub mod tuning;

pub use driver::Driver;
pub use level::{LevelDescriptor, LevelError};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal tick rate the driver paces against (ticks per second)
    pub const TICK_HZ: f32 = 60.0;
    /// Wall-clock duration of one tick
    pub const TICK_DT: f32 = 1.0 / TICK_HZ;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Maximum cosmetic particles alive at once
    pub const MAX_PARTICLES: usize = 256;
}

/// Distance between two points, zero-safe direction from `from` toward `to`
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> (Vec2, f32) {
    let delta = to - from;
    let dist = delta.length();
    if dist > f32::EPSILON {
        (delta / dist, dist)
    } else {
        (Vec2::ZERO, 0.0)
    }
}

/// Unit vector for an angle in radians
#[inline]
pub fn unit_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_to() {
        let (dir, dist) = direction_to(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0));
        assert!((dist - 5.0).abs() < 1e-5);
        assert!((dir - Vec2::new(0.6, 0.8)).length() < 1e-5);
    }

    #[test]
    fn test_direction_to_same_point() {
        let (dir, dist) = direction_to(Vec2::ONE, Vec2::ONE);
        assert_eq!(dir, Vec2::ZERO);
        assert_eq!(dist, 0.0);
    }
}
