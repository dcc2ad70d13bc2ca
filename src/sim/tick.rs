//! Fixed timestep simulation tick
//!
//! One call advances the attempt by exactly one tick in a fixed stage order:
//! environment, input, tether, characters, crates, drawing, camera, outcome,
//! particles. Time is derived from the tick counter, never from wall clock.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Contact, step_character, step_crate};
use super::outcome::{self, LossCause};
use super::state::{GameEvent, SimContext};
use super::{boss, camera, drawing, monsters, puzzle, tether};

/// Raw input for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Jump (only acts while the Guide is grounded)
    pub jump: bool,
    /// Tether toggle key; only the press edge counts
    pub tether: bool,
    /// Draw button held
    pub draw: bool,
    /// Pointer position in world coordinates
    pub pointer: Vec2,
}

/// What the host sees after a tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickOutput {
    /// Remaining ink budget
    pub ink: f32,
    pub guide_hp: u32,
    /// Events raised during this tick, in order
    pub events: Vec<GameEvent>,
}

fn finish(ctx: &mut SimContext) -> TickOutput {
    TickOutput {
        ink: ctx.drawing.ink,
        guide_hp: ctx.guide.hp,
        events: std::mem::take(&mut ctx.events),
    }
}

/// Steer the Guide from input. The Companion has no locomotion of its own.
fn apply_input(ctx: &mut SimContext, input: &TickInput) {
    let guide = &mut ctx.guide;
    guide.body.vel.x = match (input.left, input.right) {
        (true, false) => -ctx.tuning.move_speed,
        (false, true) => ctx.tuning.move_speed,
        _ => guide.body.vel.x * ctx.tuning.ground_friction,
    };
    if input.jump && guide.body.grounded {
        guide.jump_queued = true;
    }
}

fn step_characters(ctx: &mut SimContext) -> Contact {
    let t = ctx.time();
    for character in [&mut ctx.guide, &mut ctx.companion] {
        let contact = step_character(character, &ctx.platforms, &ctx.bridges, &ctx.tuning, t);
        if contact != Contact::Clear {
            log::debug!("{:?} contact: {:?}", character.role, contact);
            return contact;
        }
    }
    Contact::Clear
}

fn step_crates(ctx: &mut SimContext) {
    let t = ctx.time();
    let SimContext {
        crates,
        platforms,
        bridges,
        tuning,
        ..
    } = ctx;
    let before = crates.len();
    crates.retain_mut(|c| step_crate(c, platforms.as_slice(), bridges.as_slice(), &*tuning, t));
    if crates.len() < before {
        log::debug!("{} crate(s) fell out of the world", before - crates.len());
    }

    puzzle::push_crates(ctx);
    boss::resolve_bomb_hits(ctx);
}

fn decay_particles(ctx: &mut SimContext) {
    for particle in ctx.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.vel *= 0.95;
        particle.life -= 0.04;
        particle.size *= 0.98;
    }
    ctx.particles.retain(|p| p.life > 0.0);
}

/// Advance the attempt by one fixed tick.
///
/// Once the attempt is complete or lost this is a no-op that reports no events.
pub fn tick(ctx: &mut SimContext, input: &TickInput) -> TickOutput {
    if !ctx.is_playing() {
        return finish(ctx);
    }
    ctx.ticks += 1;
    let t = ctx.time();
    ctx.guide.invuln = ctx.guide.invuln.saturating_sub(1);
    ctx.companion.invuln = ctx.companion.invuln.saturating_sub(1);

    // Environment
    for platform in &mut ctx.platforms {
        platform.sync_to_time(t);
    }
    monsters::update(ctx);
    puzzle::update_buttons(ctx);
    puzzle::update_gates(ctx);
    boss::update(ctx);
    puzzle::update_spawners(ctx);
    boss::update_projectiles(ctx);
    if !ctx.is_playing() {
        return finish(ctx);
    }

    apply_input(ctx, input);
    tether::handle_toggle(ctx, input.tether);
    tether::apply_constraint(ctx);

    match step_characters(ctx) {
        Contact::Clear => {}
        Contact::Hazard => {
            outcome::fail(ctx, LossCause::Hazard);
            return finish(ctx);
        }
        Contact::FellOut => {
            outcome::fail(ctx, LossCause::FellOut);
            return finish(ctx);
        }
    }

    step_crates(ctx);
    drawing::update(ctx, input.draw, input.pointer);
    camera::update(ctx);
    outcome::evaluate(ctx);
    decay_particles(ctx);

    finish(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{PlatformDesc, PlatformKind};
    use crate::sim::geom::Rect;
    use crate::sim::state::GamePhase;
    use crate::sim::state::test_support::*;

    fn settle(ctx: &mut SimContext) {
        for _ in 0..5 {
            tick(ctx, &TickInput::default());
        }
    }

    #[test]
    fn test_characters_settle_on_ground() {
        let level = flat_level();
        let mut ctx = context(&level);
        settle(&mut ctx);
        assert!(ctx.guide.body.grounded);
        assert!(ctx.companion.body.grounded);
        assert!((ctx.guide.body.rect().bottom() - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_jump_sets_exact_impulse() {
        let level = flat_level();
        let mut ctx = context(&level);
        settle(&mut ctx);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut ctx, &jump);
        assert_eq!(ctx.guide.body.vel.y, ctx.tuning.jump_velocity);
        assert!(!ctx.guide.body.grounded);

        // Mid-air jump input does nothing
        tick(&mut ctx, &jump);
        assert_eq!(
            ctx.guide.body.vel.y,
            ctx.tuning.jump_velocity + ctx.tuning.gravity
        );
    }

    #[test]
    fn test_walking_and_friction() {
        let level = flat_level();
        let mut ctx = context(&level);
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut ctx, &right);
        assert_eq!(ctx.guide.body.vel.x, ctx.tuning.move_speed);
        tick(&mut ctx, &TickInput::default());
        assert!(ctx.guide.body.vel.x < ctx.tuning.move_speed);
    }

    #[test]
    fn test_hazard_is_immediate_loss() {
        let mut level = flat_level();
        level.platforms.push(PlatformDesc {
            rect: Rect::new(90.0, 340.0, 60.0, 60.0),
            kind: PlatformKind::Hazard,
            motion: None,
            gate_id: None,
            open: false,
        });
        let mut ctx = context(&level);
        let out = tick(&mut ctx, &TickInput::default());
        assert_eq!(ctx.phase, GamePhase::GameOver);
        assert_eq!(out.events, vec![GameEvent::GameOver]);
    }

    #[test]
    fn test_terminal_tick_is_noop() {
        let level = flat_level();
        let mut ctx = context(&level);
        ctx.phase = GamePhase::Complete;
        let ticks = ctx.ticks;
        let out = tick(&mut ctx, &TickInput::default());
        assert!(out.events.is_empty());
        assert_eq!(ctx.ticks, ticks);
    }

    #[test]
    fn test_falling_out_of_world() {
        let mut level = flat_level();
        level.platforms.clear();
        let mut ctx = context(&level);
        let mut lost = false;
        for _ in 0..200 {
            let out = tick(&mut ctx, &TickInput::default());
            if out.events.contains(&GameEvent::GameOver) {
                lost = true;
                break;
            }
        }
        assert!(lost);
        assert!(ctx.guide.body.pos.y > ctx.tuning.world_depth);
    }

    #[test]
    fn test_reaching_goal_completes() {
        let level = flat_level();
        let mut ctx = context(&level);
        ctx.guide.body.pos = Vec2::new(1790.0, 300.0);
        ctx.companion.body.pos = Vec2::new(1840.0, 300.0);
        let out = tick(&mut ctx, &TickInput::default());
        assert_eq!(ctx.phase, GamePhase::Complete);
        assert_eq!(out.events, vec![GameEvent::LevelComplete { bridges_drawn: 0 }]);
    }

    #[test]
    fn test_determinism() {
        let mut level = flat_level();
        level.max_health = Some(3);
        let mut a = context(&level);
        let mut b = context(&level);
        let inputs = [
            TickInput {
                right: true,
                ..Default::default()
            },
            TickInput {
                jump: true,
                right: true,
                ..Default::default()
            },
            TickInput {
                draw: true,
                pointer: Vec2::new(300.0, 300.0),
                ..Default::default()
            },
            TickInput {
                draw: true,
                pointer: Vec2::new(360.0, 300.0),
                ..Default::default()
            },
        ];
        for input in inputs.iter().cycle().take(120) {
            assert_eq!(tick(&mut a, input), tick(&mut b, input));
        }
        assert_eq!(a.guide.body.pos, b.guide.body.pos);
        assert_eq!(a.bridges, b.bridges);
    }
}
