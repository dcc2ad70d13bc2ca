//! Elastic tether between the Guide and the Companion
//!
//! The link behaves like a one-way spring: slack below the rest length, and a
//! correction proportional to the stretch beyond it. The Companion takes most of
//! the correction; the Guide feels a smaller pull back.

use super::state::{GameEvent, SimContext};
use crate::direction_to;

/// Handle the toggle key. Only the press edge counts; holding the key does nothing more.
pub fn handle_toggle(ctx: &mut SimContext, toggle_held: bool) {
    if !toggle_held {
        ctx.tether.toggle_latch = false;
        return;
    }
    if ctx.tether.toggle_latch {
        return;
    }
    ctx.tether.toggle_latch = true;

    if ctx.tether.linked {
        ctx.tether.linked = false;
    } else if ctx.tether_distance() < ctx.tuning.reconnect_distance {
        ctx.tether.linked = true;
    } else {
        log::debug!("Relink refused at distance {:.1}", ctx.tether_distance());
        return;
    }
    let linked = ctx.tether.linked;
    ctx.emit(GameEvent::TetherChanged { linked });
}

/// Apply the spring correction (when linked) and the Companion's passive drag
pub fn apply_constraint(ctx: &mut SimContext) {
    if ctx.tether.linked {
        let (dir, dist) = direction_to(ctx.companion.body.center(), ctx.guide.body.center());
        let stretch = dist - ctx.tuning.tether_rest_length;
        if stretch > 0.0 {
            let force = dir * stretch * ctx.tuning.tether_stiffness;
            ctx.companion.body.vel += force * ctx.tuning.tether_companion_weight;
            ctx.guide.body.vel -= force * ctx.tuning.tether_guide_weight;
        }
    }
    ctx.companion.body.vel.x *= ctx.tuning.companion_drag;
}
