//! Puzzle elements: pressure buttons, the gates they drive, crate pushing and
//! object spawners.
//!
//! Button and gate state is recomputed from body positions every tick, never
//! latched, so a gate can only stay open while something keeps its button down.

use glam::Vec2;

use super::geom::Rect;
use super::state::{Body, Character, Crate, GameEvent, Platform, SimContext, particle_color};
use crate::level::{CrateKind, PlatformKind};
use crate::tuning::Tuning;

/// Feet resting within the tolerance band of the button's top face.
///
/// Only the top face counts, so a body brushing a tall button's side does not press it.
pub fn presses(body: &Body, button: &Rect, tolerance: f32) -> bool {
    let feet_y = body.rect().bottom();
    body.rect().spans_x(button)
        && feet_y >= button.top() - tolerance
        && feet_y <= button.top() + tolerance
}

/// Recompute every button's pressed flag from scratch
pub fn update_buttons(ctx: &mut SimContext) {
    let tolerance = ctx.tuning.button_tolerance;
    let bodies: Vec<Body> = [ctx.guide.body, ctx.companion.body]
        .into_iter()
        .chain(ctx.crates.iter().map(|c| c.body))
        .collect();

    for button in &mut ctx.buttons {
        let pressed = bodies.iter().any(|b| presses(b, &button.rect, tolerance));
        if pressed != button.pressed {
            log::debug!("Button {} {}", button.id, if pressed { "pressed" } else { "released" });
        }
        button.pressed = pressed;
    }
}

/// Drive each targeted gate's open flag from the OR of its buttons
pub fn update_gates(ctx: &mut SimContext) {
    for platform in ctx.platforms.iter_mut() {
        if platform.kind != PlatformKind::Gate {
            continue;
        }
        let Some(gate_id) = platform.gate_id else {
            continue;
        };
        let mut targeted = false;
        let mut open = false;
        for button in ctx.buttons.iter().filter(|b| b.target_gate == Some(gate_id)) {
            targeted = true;
            open |= button.pressed;
        }
        // Gates no button controls keep their authored state
        if targeted {
            platform.open = open;
        }
    }
}

/// Whether a spawner's controlling buttons (if any) allow it to produce
fn spawner_enabled(ctx: &SimContext, spawner_id: u32) -> bool {
    let mut gated = false;
    for button in ctx.buttons.iter().filter(|b| b.target_spawner == Some(spawner_id)) {
        if button.pressed {
            return true;
        }
        gated = true;
    }
    !gated
}

/// Tick spawner cooldowns and create crates where allowed
pub fn update_spawners(ctx: &mut SimContext) {
    for i in 0..ctx.spawners.len() {
        let spawner = &mut ctx.spawners[i];
        spawner.cooldown = spawner.cooldown.saturating_sub(1);
        if spawner.cooldown > 0 {
            continue;
        }
        let (id, pos, item) = (spawner.id, spawner.pos, spawner.item);

        if !spawner_enabled(ctx, id) {
            continue;
        }
        let radius = ctx.tuning.spawner_dedup_radius;
        let crowded = ctx
            .crates
            .iter()
            .any(|c| c.kind == item && c.body.center().distance(pos) < radius);
        if crowded {
            continue;
        }

        let crate_id = ctx.next_entity_id();
        let size = ctx.tuning.crate_size;
        ctx.crates.push(Crate {
            id: crate_id,
            kind: item,
            body: Body::new(pos - size * 0.5, size),
        });
        ctx.spawners[i].cooldown = ctx.tuning.spawner_cooldown;
        ctx.burst(pos, 6, particle_color::SPAWN);
        ctx.emit(GameEvent::CrateSpawned { id: crate_id });
        log::debug!("Spawner {} produced {:?} crate {}", id, item, crate_id);
    }
}

/// Whether `rect` overlaps any terrain a crate cannot be shoved into
fn blocked(rect: &Rect, platforms: &[Platform]) -> bool {
    platforms
        .iter()
        .filter(|p| p.is_solid())
        .any(|p| rect.intersects(&p.rect))
}

/// Resolve one character against one crate: a sideways shove or a landing on top
pub fn push_crate(
    pusher: &mut Character,
    crate_: &mut Crate,
    platforms: &[Platform],
    tuning: &Tuning,
) {
    let Some(overlap) = pusher.body.rect().overlap(&crate_.body.rect()) else {
        return;
    };

    if overlap.x < overlap.y && overlap.y > tuning.push_min_vertical_overlap {
        let dir = if crate_.body.center().x >= pusher.body.center().x {
            1.0
        } else {
            -1.0
        };
        let shove = Vec2::new(dir * overlap.x, 0.0);
        crate_.body.pos += shove;

        if blocked(&crate_.body.rect(), platforms) {
            crate_.body.pos -= shove;
            pusher.body.pos -= shove;
            pusher.body.vel.x = 0.0;
            crate_.body.vel.x = 0.0;
            return;
        }
        crate_.body.vel.x = match crate_.kind {
            CrateKind::Bomb => pusher.body.vel.x,
            CrateKind::Wood => 0.0,
        };
    } else if pusher.body.vel.y >= 0.0 && pusher.body.center().y < crate_.body.center().y {
        pusher.body.rest_on(crate_.body.rect().top());
    }
}

/// Let both characters push or stand on every crate
pub fn push_crates(ctx: &mut SimContext) {
    let SimContext {
        guide,
        companion,
        crates,
        platforms,
        tuning,
        ..
    } = ctx;
    for character in [guide, companion] {
        for crate_ in crates.iter_mut() {
            push_crate(character, crate_, platforms.as_slice(), &*tuning);
        }
    }
}
