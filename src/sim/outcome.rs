//! Damage policy and win/loss evaluation
//!
//! Every failure funnels into [`fail`], every win into [`complete`]. Both are
//! terminal and only fire while the attempt is still playing, so each attempt
//! reports exactly one outcome.

use super::state::{GameEvent, GamePhase, SimContext, particle_color};

/// Why an attempt ended in failure (logged; the host only sees `GameOver`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossCause {
    Hazard,
    FellOut,
    /// Damaging contact in a level without a health pool
    Contact,
    /// Health ran out
    Defeated,
}

pub fn fail(ctx: &mut SimContext, cause: LossCause) {
    if !ctx.is_playing() {
        return;
    }
    ctx.phase = GamePhase::GameOver;
    log::info!("Level {} lost ({:?}) after {} ticks", ctx.level_id, cause, ctx.ticks);
    ctx.emit(GameEvent::GameOver);
}

pub fn complete(ctx: &mut SimContext) {
    if !ctx.is_playing() {
        return;
    }
    ctx.phase = GamePhase::Complete;
    let bridges_drawn = ctx.bridges.len();
    log::info!(
        "Level {} complete after {} ticks with {} bridges",
        ctx.level_id,
        ctx.ticks,
        bridges_drawn
    );
    ctx.emit(GameEvent::LevelComplete { bridges_drawn });
}

/// Shared damage path for monsters, projectiles and auto-scroll abandonment
pub fn damage_guide(ctx: &mut SimContext) {
    if !ctx.is_playing() {
        return;
    }
    if !ctx.health_mode {
        fail(ctx, LossCause::Contact);
        return;
    }
    if ctx.guide.invuln > 0 {
        return;
    }

    ctx.guide.hp = ctx.guide.hp.saturating_sub(1);
    ctx.guide.invuln = ctx.tuning.invuln_ticks;
    let hp = ctx.guide.hp;
    ctx.emit(GameEvent::GuideDamaged { hp });
    ctx.burst(ctx.guide.body.center(), 10, particle_color::GUIDE_HIT);
    log::debug!("Guide hit, hp {}", hp);

    if hp == 0 {
        fail(ctx, LossCause::Defeated);
    }
}

/// Both characters inside the tolerance-expanded goal while linked
pub fn goal_reached(ctx: &SimContext) -> bool {
    if !ctx.tether.linked {
        return false;
    }
    let Some(goal) = ctx.goal() else {
        return false;
    };
    let area = goal.rect.expanded(ctx.tuning.goal_tolerance);
    area.intersects(&ctx.guide.body.rect()) && area.intersects(&ctx.companion.body.rect())
}

/// End-of-tick win check
pub fn evaluate(ctx: &mut SimContext) {
    if !ctx.is_playing() {
        return;
    }
    if ctx.boss_level {
        let defeated = ctx.boss.as_ref().is_some_and(|boss| boss.hp == 0);
        if defeated {
            ctx.boss = None;
            ctx.projectiles.clear();
            complete(ctx);
        }
        return;
    }
    if goal_reached(ctx) {
        complete(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::test_support::*;
    use glam::Vec2;

    fn at_goal(ctx: &mut SimContext) {
        ctx.guide.body.pos = Vec2::new(1790.0, 300.0);
        ctx.companion.body.pos = Vec2::new(1860.0, 314.0);
    }

    #[test]
    fn test_win_needs_both_characters_and_link() {
        let level = flat_level();
        let mut ctx = context(&level);
        at_goal(&mut ctx);
        assert!(goal_reached(&ctx));

        ctx.tether.linked = false;
        assert!(!goal_reached(&ctx));
        ctx.tether.linked = true;

        ctx.companion.body.pos = Vec2::new(1500.0, 374.0);
        assert!(!goal_reached(&ctx));
    }

    #[test]
    fn test_tolerance_margin_counts() {
        let level = flat_level();
        let mut ctx = context(&level);
        // Goal spans x 1800..1880; guide's right edge sits 20 short of it
        ctx.guide.body.pos = Vec2::new(1750.0, 360.0);
        ctx.companion.body.pos = Vec2::new(1890.0, 374.0);
        assert!(goal_reached(&ctx));
    }

    #[test]
    fn test_outcome_fires_once() {
        let level = flat_level();
        let mut ctx = context(&level);
        at_goal(&mut ctx);
        evaluate(&mut ctx);
        evaluate(&mut ctx);
        fail(&mut ctx, LossCause::Hazard);
        assert_eq!(ctx.phase, GamePhase::Complete);
        assert_eq!(ctx.events, vec![GameEvent::LevelComplete { bridges_drawn: 0 }]);
    }

    #[test]
    fn test_boss_death_wins_without_goal_or_link() {
        let mut level = flat_level();
        level.boss = Some(crate::level::BossDesc {
            rect: crate::sim::geom::Rect::new(600.0, 200.0, 80.0, 80.0),
            hp: 5,
        });
        let mut ctx = context(&level);
        ctx.tether.linked = false;
        ctx.companion.body.pos = Vec2::new(900.0, 374.0);
        ctx.projectiles.push(crate::sim::state::Projectile {
            pos: Vec2::new(300.0, 100.0),
            vel: Vec2::ZERO,
            radius: 8.0,
            life: 100,
        });

        evaluate(&mut ctx);
        assert_eq!(ctx.phase, GamePhase::Playing);

        ctx.boss.as_mut().unwrap().hp = 0;
        evaluate(&mut ctx);
        evaluate(&mut ctx);
        assert_eq!(ctx.phase, GamePhase::Complete);
        assert!(ctx.boss.is_none());
        assert!(ctx.projectiles.is_empty());
        assert_eq!(ctx.events, vec![GameEvent::LevelComplete { bridges_drawn: 0 }]);
    }

    #[test]
    fn test_health_never_underflows() {
        let mut level = flat_level();
        level.max_health = Some(1);
        let mut ctx = context(&level);
        damage_guide(&mut ctx);
        assert_eq!(ctx.guide.hp, 0);
        assert_eq!(ctx.phase, GamePhase::GameOver);
        ctx.guide.invuln = 0;
        damage_guide(&mut ctx);
        assert_eq!(ctx.guide.hp, 0);
        assert_eq!(
            ctx.events,
            vec![GameEvent::GuideDamaged { hp: 0 }, GameEvent::GameOver]
        );
    }
}
