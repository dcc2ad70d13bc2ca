//! Fixed-step driver
//!
//! Owns the immutable level and tuning, paces ticks against wall-clock frame
//! time, and restarts attempts by swapping in a freshly built context.

use crate::consts::{MAX_SUBSTEPS, TICK_DT};
use crate::level::LevelDescriptor;
use crate::sim::{GamePhase, SimContext, TickInput, TickOutput, tick};
use crate::tuning::Tuning;

pub struct Driver {
    level: LevelDescriptor,
    tuning: Tuning,
    seed: u64,
    attempt: u32,
    ctx: SimContext,
    accumulator: f32,
}

impl Driver {
    pub fn new(level: LevelDescriptor, tuning: Tuning, seed: u64) -> Self {
        let ctx = SimContext::new(&level, &tuning, seed);
        Self {
            level,
            tuning,
            seed,
            attempt: 0,
            ctx,
            accumulator: 0.0,
        }
    }

    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    pub fn level(&self) -> &LevelDescriptor {
        &self.level
    }

    pub fn phase(&self) -> GamePhase {
        self.ctx.phase
    }

    /// Number of restarts so far
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Throw the current attempt away and start over from the level descriptor
    pub fn restart(&mut self) {
        self.attempt += 1;
        let seed = self.seed.wrapping_add(u64::from(self.attempt));
        self.ctx = SimContext::new(&self.level, &self.tuning, seed);
        self.accumulator = 0.0;
        log::info!("Restarting level {} (attempt {})", self.level.id, self.attempt + 1);
    }

    /// Run exactly one tick
    pub fn step(&mut self, input: &TickInput) -> TickOutput {
        tick(&mut self.ctx, input)
    }

    /// Run as many ticks as `dt` seconds of frame time allow, merging their events
    pub fn frame(&mut self, dt: f32, input: &TickInput) -> TickOutput {
        let dt = dt.clamp(0.0, 0.1);
        self.accumulator += dt;

        let mut output = TickOutput {
            ink: self.ctx.drawing.ink,
            guide_hp: self.ctx.guide.hp,
            events: Vec::new(),
        };
        let mut substeps = 0;
        while self.accumulator >= TICK_DT && substeps < MAX_SUBSTEPS {
            let out = tick(&mut self.ctx, input);
            output.ink = out.ink;
            output.guide_hp = out.guide_hp;
            output.events.extend(out.events);
            self.accumulator -= TICK_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= TICK_DT {
            log::debug!("Frame fell behind, dropping {:.3}s", self.accumulator);
            self.accumulator = 0.0;
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::test_support::flat_level;

    #[test]
    fn test_frame_runs_whole_ticks_only() {
        let mut driver = Driver::new(flat_level(), Tuning::default(), 1);
        let input = TickInput::default();
        driver.frame(TICK_DT * 0.5, &input);
        assert_eq!(driver.context().ticks, 0);
        driver.frame(TICK_DT * 0.6, &input);
        assert_eq!(driver.context().ticks, 1);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut driver = Driver::new(flat_level(), Tuning::default(), 1);
        // A multi-second hitch must not replay seconds of simulation
        driver.frame(5.0, &TickInput::default());
        let ticks = driver.context().ticks;
        assert!((5..=6).contains(&ticks));
        assert!(ticks <= u64::from(MAX_SUBSTEPS));
    }

    #[test]
    fn test_restart_swaps_in_fresh_context() {
        let mut driver = Driver::new(flat_level(), Tuning::default(), 1);
        let draw = |x: f32| TickInput {
            draw: true,
            pointer: glam::Vec2::new(x, 100.0),
            ..Default::default()
        };
        driver.step(&draw(0.0));
        driver.step(&draw(60.0));
        assert_eq!(driver.context().bridges.len(), 1);

        driver.restart();
        assert_eq!(driver.attempt(), 1);
        assert!(driver.context().bridges.is_empty());
        assert_eq!(driver.context().drawing.ink, 100.0);
        assert_eq!(driver.context().ticks, 0);
        assert_eq!(driver.phase(), GamePhase::Playing);
    }
}
