//! Game balance table
//!
//! Every gameplay constant lives here so levels can be re-tuned from JSON
//! without touching the simulation. All rates are per tick, all distances in
//! world units.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Simulation time advanced per tick (drives motion phases and the boss float)
    pub time_step: f32,

    // === Bodies ===
    /// Downward acceleration (units/tick²)
    pub gravity: f32,
    /// Guide horizontal speed while a direction is held
    pub move_speed: f32,
    /// Vertical velocity set by a jump (negative is up)
    pub jump_velocity: f32,
    /// Guide horizontal decay when no direction is held
    pub ground_friction: f32,
    pub guide_size: Vec2,
    pub companion_size: Vec2,
    pub crate_size: Vec2,
    /// Bodies below this y have fallen out of the world
    pub world_depth: f32,
    /// Guide health when the level does not override it
    pub default_max_hp: u32,
    /// Invulnerability window after the Guide takes damage
    pub invuln_ticks: u32,

    // === Tether ===
    pub tether_rest_length: f32,
    pub tether_stiffness: f32,
    /// Share of the correction applied to the Companion
    pub tether_companion_weight: f32,
    /// Share of the correction applied back onto the Guide
    pub tether_guide_weight: f32,
    /// Companion horizontal velocity multiplier, every tick
    pub companion_drag: f32,
    /// Relinking is refused at or beyond this distance
    pub reconnect_distance: f32,

    // === Drawing ===
    pub min_stroke_length: f32,
    pub ink_per_unit: f32,

    // === Bridges & crates ===
    /// Horizontal slack past a bridge's endpoints
    pub bridge_x_tolerance: f32,
    /// How far above the segment feet may sit and still land
    pub bridge_band_above: f32,
    /// How far below the segment feet may sink and still land
    pub bridge_band_below: f32,
    pub wood_friction: f32,
    pub bomb_friction: f32,

    // === Puzzle ===
    pub button_tolerance: f32,
    /// Vertical overlap a pusher needs before a crate is shoved sideways
    pub push_min_vertical_overlap: f32,
    pub spawner_cooldown: u32,
    pub spawner_dedup_radius: f32,

    // === Boss ===
    pub boss_phase_two_hp: u32,
    pub boss_rest_ticks: u32,
    pub shot_interval: u32,
    pub volley_size: u32,
    pub boss_invuln_ticks: u32,
    pub float_amplitude: f32,
    pub float_speed: f32,
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    pub projectile_life: u32,
    pub radial_count: u32,
    pub rain_count: u32,
    pub rain_spacing: f32,
    pub rain_height: f32,

    // === Camera & outcome ===
    pub viewport_width: f32,
    pub camera_smoothing: f32,
    /// Distance behind the scrolling camera's left edge that counts as abandoned
    pub scroll_trail_margin: f32,
    pub goal_tolerance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            time_step: 1.0 / 60.0,

            // Bodies
            gravity: 0.5,
            move_speed: 4.0,
            jump_velocity: -10.0,
            ground_friction: 0.8,
            guide_size: Vec2::new(30.0, 40.0),
            companion_size: Vec2::new(26.0, 26.0),
            crate_size: Vec2::new(30.0, 30.0),
            world_depth: 1500.0,
            default_max_hp: 3,
            invuln_ticks: 60,

            // Tether
            tether_rest_length: 70.0,
            tether_stiffness: 0.05,
            tether_companion_weight: 0.8,
            tether_guide_weight: 0.2,
            companion_drag: 0.9,
            reconnect_distance: 100.0,

            // Drawing
            min_stroke_length: 10.0,
            ink_per_unit: 0.5,

            // Bridges & crates
            bridge_x_tolerance: 5.0,
            bridge_band_above: 8.0,
            bridge_band_below: 15.0,
            wood_friction: 0.8,
            bomb_friction: 0.98,

            // Puzzle
            button_tolerance: 6.0,
            push_min_vertical_overlap: 8.0,
            spawner_cooldown: 200,
            spawner_dedup_radius: 1000.0,

            // Boss
            boss_phase_two_hp: 3,
            boss_rest_ticks: 180,
            shot_interval: 60,
            volley_size: 5,
            boss_invuln_ticks: 60,
            float_amplitude: 20.0,
            float_speed: 2.0,
            projectile_speed: 4.0,
            projectile_radius: 8.0,
            projectile_life: 240,
            radial_count: 8,
            rain_count: 5,
            rain_spacing: 80.0,
            rain_height: 350.0,

            // Camera & outcome
            viewport_width: 800.0,
            camera_smoothing: 0.08,
            scroll_trail_margin: 0.0,
            goal_tolerance: 30.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning table; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a tuning file, falling back to defaults when it is missing or malformed
    pub fn load_or_default(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Bad tuning file {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read tuning {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.7, "volleySize": 9 }"#).unwrap();
        assert!((tuning.gravity - 0.7).abs() < 1e-6);
        // Unknown-case key is ignored, default survives
        assert_eq!(tuning.volley_size, 5);
        assert_eq!(tuning.tether_rest_length, 70.0);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(Tuning::from_json("{ gravity: }").is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load_or_default(std::path::Path::new("/nonexistent/tuning.json"));
        assert_eq!(tuning, Tuning::default());
    }
}
