//! Integration and collision resolution for AABB bodies
//!
//! Terrain is resolved by minimum translation: whichever axis overlaps less is
//! the axis the body gets pushed out along. Drawn bridges are one-sided line
//! supports that only catch bodies moving down onto them.

use super::state::{Body, Bridge, Character, Crate, Platform};
use crate::level::{CrateKind, PlatformKind};
use crate::tuning::Tuning;

/// What a character ran into this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Clear,
    /// Touched a hazard platform
    Hazard,
    /// Dropped below the world depth
    FellOut,
}

#[inline]
pub fn apply_gravity(body: &mut Body, gravity: f32) {
    body.vel.y += gravity;
}

/// Move by velocity and clear grounded; contacts re-detect it
#[inline]
pub fn advance(body: &mut Body) {
    body.pos += body.vel;
    body.grounded = false;
}

/// Gravity then motion, for bodies with no impulses of their own
pub fn integrate(body: &mut Body, gravity: f32) {
    apply_gravity(body, gravity);
    advance(body);
}

/// Push `body` out of every solid platform it overlaps.
///
/// With `hazards_fatal` set, the first hazard overlap stops resolution and is
/// reported instead of being treated as ground.
pub fn resolve_platforms(
    body: &mut Body,
    platforms: &[Platform],
    t: f32,
    step: f32,
    hazards_fatal: bool,
) -> Contact {
    for platform in platforms.iter().filter(|p| p.is_solid()) {
        let Some(overlap) = body.rect().overlap(&platform.rect) else {
            continue;
        };
        if hazards_fatal && platform.kind == PlatformKind::Hazard {
            return Contact::Hazard;
        }

        let rect = platform.rect;
        if overlap.x < overlap.y {
            if body.center().x < rect.center().x {
                body.pos.x = rect.left() - body.size.x;
            } else {
                body.pos.x = rect.right();
            }
            body.vel.x = 0.0;
        } else if body.vel.y >= 0.0 && body.center().y < rect.center().y {
            body.rest_on(rect.top());
            body.pos.x += platform.carry_delta(t, step);
        } else {
            body.pos.y = rect.bottom();
            if body.vel.y < 0.0 {
                body.vel.y = 0.0;
            }
        }
    }
    Contact::Clear
}

/// Land `body` on the first bridge whose surface band contains its feet
pub fn support_on_bridges(body: &mut Body, bridges: &[Bridge], tuning: &Tuning) -> Option<Bridge> {
    if body.vel.y < 0.0 {
        return None;
    }
    let feet = body.feet();
    for bridge in bridges {
        if feet.x < bridge.min_x() - tuning.bridge_x_tolerance
            || feet.x > bridge.max_x() + tuning.bridge_x_tolerance
        {
            continue;
        }
        let Some(surface) = bridge.surface_y(feet.x) else {
            continue;
        };
        let dy = feet.y - surface;
        if dy >= -tuning.bridge_band_above && dy <= tuning.bridge_band_below {
            body.rest_on(surface);
            return Some(*bridge);
        }
    }
    None
}

/// Advance one character: gravity, queued jump, motion, terrain, bridges, fall-out
pub fn step_character(
    character: &mut Character,
    platforms: &[Platform],
    bridges: &[Bridge],
    tuning: &Tuning,
    t: f32,
) -> Contact {
    let body = &mut character.body;
    apply_gravity(body, tuning.gravity);
    if character.jump_queued {
        body.vel.y = tuning.jump_velocity;
        character.jump_queued = false;
    }
    advance(body);

    if resolve_platforms(body, platforms, t, tuning.time_step, true) == Contact::Hazard {
        return Contact::Hazard;
    }
    support_on_bridges(body, bridges, tuning);

    if body.pos.y > tuning.world_depth {
        return Contact::FellOut;
    }
    Contact::Clear
}

/// Advance one crate; returns false once it has fallen out of the world
pub fn step_crate(
    crate_: &mut Crate,
    platforms: &[Platform],
    bridges: &[Bridge],
    tuning: &Tuning,
    t: f32,
) -> bool {
    let body = &mut crate_.body;
    integrate(body, tuning.gravity);
    resolve_platforms(body, platforms, t, tuning.time_step, false);
    if body.grounded {
        body.vel.x *= match crate_.kind {
            CrateKind::Wood => tuning.wood_friction,
            CrateKind::Bomb => tuning.bomb_friction,
        };
    }

    if let Some(bridge) = support_on_bridges(body, bridges, tuning) {
        match crate_.kind {
            CrateKind::Wood => body.vel.x *= tuning.wood_friction,
            CrateKind::Bomb => {
                body.vel.x *= tuning.bomb_friction;
                body.vel.x += tuning.gravity * bridge.slope_angle().sin();
            }
        }
    }

    body.pos.y <= tuning.world_depth
}
