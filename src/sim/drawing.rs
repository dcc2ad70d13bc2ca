//! Ink economy: turning pointer drags into bridge segments

use glam::Vec2;

use super::state::{Bridge, GameEvent, SimContext};

/// Whether `point` lies inside any no-ink zone
pub fn in_no_ink_zone(ctx: &SimContext, point: Vec2) -> bool {
    ctx.no_ink_zones.iter().any(|zone| zone.contains_point(point))
}

/// Feed one tick of pointer state into the current stroke
pub fn update(ctx: &mut SimContext, draw_held: bool, pointer: Vec2) {
    if !draw_held {
        ctx.drawing.last_point = None;
        return;
    }
    if ctx.drawing.ink <= 0.0 {
        return;
    }

    let Some(last) = ctx.drawing.last_point else {
        // A stroke may only begin outside every zone
        if !in_no_ink_zone(ctx, pointer) {
            ctx.drawing.last_point = Some(pointer);
        }
        return;
    };

    let dist = last.distance(pointer);
    if dist <= ctx.tuning.min_stroke_length {
        return;
    }
    if in_no_ink_zone(ctx, pointer) {
        ctx.drawing.last_point = None;
        return;
    }

    let cost = dist * ctx.tuning.ink_per_unit;
    if ctx.drawing.ink < cost {
        log::debug!("Stroke rejected: cost {:.1} > ink {:.1}", cost, ctx.drawing.ink);
        return;
    }

    ctx.drawing.ink -= cost;
    ctx.bridges.push(Bridge { a: last, b: pointer });
    ctx.drawing.last_point = Some(pointer);
    ctx.emit(GameEvent::BridgeCommitted);
}
