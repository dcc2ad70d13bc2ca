//! Horizontal camera: eased follow or forced auto-scroll

use super::outcome;
use super::state::{CameraMode, SimContext};

/// World x the follow camera centres on
fn focus_x(ctx: &SimContext) -> f32 {
    let guide = ctx.guide.body.center();
    if ctx.tether.linked {
        (guide.x + ctx.companion.body.center().x) * 0.5
    } else {
        guide.x
    }
}

/// Whether either character's right edge has dropped behind the scrolling view
pub fn left_behind(ctx: &SimContext) -> bool {
    let edge = ctx.camera.x - ctx.tuning.scroll_trail_margin;
    ctx.guide.body.rect().right() < edge || ctx.companion.body.rect().right() < edge
}

pub fn update(ctx: &mut SimContext) {
    match ctx.camera.mode {
        CameraMode::Follow => {
            let target = focus_x(ctx) - ctx.tuning.viewport_width * 0.5;
            ctx.camera.x += (target - ctx.camera.x) * ctx.tuning.camera_smoothing;
        }
        CameraMode::AutoScroll { rate } => {
            ctx.camera.x += rate;
            if left_behind(ctx) {
                log::debug!("Character left behind at camera x {:.1}", ctx.camera.x);
                outcome::damage_guide(ctx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;
    use crate::sim::state::test_support::*;
    use glam::Vec2;

    #[test]
    fn test_follow_eases_toward_midpoint() {
        let level = flat_level();
        let mut ctx = context(&level);
        ctx.camera.x = 0.0;
        let mid = (ctx.guide.body.center().x + ctx.companion.body.center().x) * 0.5;
        let target = mid - 400.0;
        update(&mut ctx);
        assert!((ctx.camera.x - target * 0.08).abs() < 1e-3);
    }

    #[test]
    fn test_follow_tracks_guide_when_unlinked() {
        let level = flat_level();
        let mut ctx = context(&level);
        ctx.tether.linked = false;
        ctx.guide.body.pos.x = 1000.0;
        ctx.camera.x = 0.0;
        for _ in 0..500 {
            update(&mut ctx);
        }
        let target = ctx.guide.body.center().x - 400.0;
        assert!((ctx.camera.x - target).abs() < 0.5);
    }

    #[test]
    fn test_auto_scroll_advances_and_abandons() {
        let mut level = flat_level();
        level.auto_scroll = Some(2.0);
        let mut ctx = context(&level);
        assert_eq!(ctx.camera.x, 0.0);
        update(&mut ctx);
        assert_eq!(ctx.camera.x, 2.0);
        assert_eq!(ctx.phase, GamePhase::Playing);

        // Companion right edge at 176; push the camera past it
        ctx.guide.body.pos = Vec2::new(500.0, 360.0);
        ctx.camera.x = 175.0;
        update(&mut ctx);
        assert_eq!(ctx.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_auto_scroll_uses_damage_path_with_health() {
        let mut level = flat_level();
        level.auto_scroll = Some(2.0);
        level.max_health = Some(3);
        let mut ctx = context(&level);
        ctx.camera.x = 400.0;
        update(&mut ctx);
        assert_eq!(ctx.guide.hp, 2);
        assert_eq!(ctx.phase, GamePhase::Playing);
    }
}
