//! Patrolling monsters

use super::outcome;
use super::state::{Monster, SimContext};

/// Move at constant speed, turning around past either patrol bound
pub fn patrol(monster: &mut Monster) {
    monster.rect.x += monster.vel.x;
    let past_start = monster.rect.x <= monster.patrol_start && monster.vel.x < 0.0;
    let past_end = monster.rect.x >= monster.patrol_end && monster.vel.x > 0.0;
    if past_start || past_end {
        monster.vel.x = -monster.vel.x;
    }
}

/// Advance every monster and hurt the Guide on contact.
///
/// The Companion is deliberately not checked: only the Guide takes combat damage.
pub fn update(ctx: &mut SimContext) {
    for monster in &mut ctx.monsters {
        patrol(monster);
    }
    let guide = ctx.guide.body.rect();
    if ctx.monsters.iter().any(|m| m.rect.intersects(&guide)) {
        outcome::damage_guide(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::MonsterDesc;
    use crate::sim::geom::Rect;
    use crate::sim::state::test_support::*;
    use crate::sim::state::{GameEvent, GamePhase};
    use glam::Vec2;

    fn monster(x: f32, vx: f32) -> Monster {
        Monster {
            id: 1,
            rect: Rect::new(x, 370.0, 30.0, 30.0),
            vel: Vec2::new(vx, 0.0),
            patrol_start: 100.0,
            patrol_end: 200.0,
        }
    }

    #[test]
    fn test_reverses_at_bounds() {
        let mut m = monster(198.0, 3.0);
        patrol(&mut m);
        assert_eq!(m.rect.x, 201.0);
        assert_eq!(m.vel.x, -3.0);
        patrol(&mut m);
        assert_eq!(m.rect.x, 198.0);
        assert_eq!(m.vel.x, -3.0);

        let mut m = monster(101.0, -2.0);
        patrol(&mut m);
        assert_eq!(m.vel.x, 2.0);
    }

    fn monster_level(max_health: Option<u32>) -> crate::level::LevelDescriptor {
        let mut level = flat_level();
        level.max_health = max_health;
        level.monsters.push(MonsterDesc {
            id: 1,
            rect: Rect::new(95.0, 370.0, 30.0, 30.0),
            vel: Vec2::ZERO,
            patrol: [0.0, 400.0],
        });
        level
    }

    #[test]
    fn test_contact_is_instant_loss_without_health() {
        let level = monster_level(None);
        let mut ctx = context(&level);
        update(&mut ctx);
        assert_eq!(ctx.phase, GamePhase::GameOver);
        assert_eq!(ctx.events, vec![GameEvent::GameOver]);
    }

    #[test]
    fn test_contact_drains_health_with_invulnerability() {
        let level = monster_level(Some(3));
        let mut ctx = context(&level);
        update(&mut ctx);
        assert_eq!(ctx.guide.hp, 2);
        assert_eq!(ctx.guide.invuln, ctx.tuning.invuln_ticks);
        // Still overlapping, but invulnerable
        update(&mut ctx);
        assert_eq!(ctx.guide.hp, 2);
        assert_eq!(ctx.phase, GamePhase::Playing);
    }

    #[test]
    fn test_companion_is_immune() {
        let level = monster_level(None);
        let mut ctx = context(&level);
        ctx.guide.body.pos = Vec2::new(800.0, 360.0);
        ctx.companion.body.pos = Vec2::new(100.0, 374.0);
        update(&mut ctx);
        assert_eq!(ctx.phase, GamePhase::Playing);
    }
}
