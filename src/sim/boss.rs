//! Boss encounter: floating, a timer-driven attack state machine, projectiles
//! and bomb hits.
//!
//! Phase One fires aimed volleys one shot at a time. Phase Two (entered once,
//! when hp first drops to the threshold) fires a single heavy pattern per
//! attack: either a radial ring or a rain of shots above the Guide.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::outcome;
use super::state::{
    Boss, BossPhase, BossState, GameEvent, Projectile, SimContext, particle_color,
};
use crate::level::CrateKind;
use crate::tuning::Tuning;
use crate::{direction_to, unit_from_angle};

/// Attack pattern chosen by the state machine for this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Volley {
    Aimed,
    Radial,
    Rain,
}

/// Switch to phase Two the first time hp reaches the threshold. Returns true on the transition.
pub fn enter_phase_two_if_due(boss: &mut Boss, threshold: u32) -> bool {
    if boss.phase == BossPhase::One && boss.hp <= threshold {
        boss.phase = BossPhase::Two;
        true
    } else {
        false
    }
}

/// Advance the attack state machine by one tick and report what to fire
pub fn advance(boss: &mut Boss, tuning: &Tuning, rng: &mut Pcg32) -> Option<Volley> {
    match boss.state {
        BossState::Cooldown => {
            boss.attack_timer = boss.attack_timer.saturating_sub(1);
            if boss.attack_timer == 0 {
                boss.state = BossState::Attack;
                boss.shots_fired = 0;
            }
            None
        }
        BossState::Attack => {
            if boss.attack_timer > 0 {
                boss.attack_timer -= 1;
                return None;
            }
            match boss.phase {
                BossPhase::One => {
                    boss.shots_fired += 1;
                    if boss.shots_fired >= tuning.volley_size {
                        boss.state = BossState::Cooldown;
                        boss.attack_timer = tuning.boss_rest_ticks;
                    } else {
                        boss.attack_timer = tuning.shot_interval;
                    }
                    Some(Volley::Aimed)
                }
                BossPhase::Two => {
                    boss.state = BossState::Cooldown;
                    boss.attack_timer = tuning.boss_rest_ticks;
                    if rng.random_bool(0.5) {
                        Some(Volley::Radial)
                    } else {
                        Some(Volley::Rain)
                    }
                }
            }
        }
    }
}

fn spawn_projectile(ctx: &mut SimContext, pos: Vec2, vel: Vec2) {
    ctx.projectiles.push(Projectile {
        pos,
        vel,
        radius: ctx.tuning.projectile_radius,
        life: ctx.tuning.projectile_life,
    });
}

fn fire(ctx: &mut SimContext, origin: Vec2, volley: Volley) {
    let target = ctx.guide.body.center();
    let speed = ctx.tuning.projectile_speed;
    match volley {
        Volley::Aimed => {
            let (dir, _) = direction_to(origin, target);
            spawn_projectile(ctx, origin, dir * speed);
        }
        Volley::Radial => {
            let count = ctx.tuning.radial_count.max(1);
            let spacing = std::f32::consts::TAU / count as f32;
            let offset = ctx.time();
            for i in 0..count {
                let dir = unit_from_angle(i as f32 * spacing + offset);
                spawn_projectile(ctx, origin, dir * speed);
            }
        }
        Volley::Rain => {
            let count = ctx.tuning.rain_count;
            let middle = (count.saturating_sub(1)) as f32 * 0.5;
            let y = target.y - ctx.tuning.rain_height;
            for i in 0..count {
                let x = target.x + (i as f32 - middle) * ctx.tuning.rain_spacing;
                spawn_projectile(ctx, Vec2::new(x, y), Vec2::new(0.0, speed));
            }
        }
    }
    log::debug!("Boss fired {:?}", volley);
}

/// Per-tick boss update: invulnerability, floating, phase check, attacks
pub fn update(ctx: &mut SimContext) {
    let t = ctx.time();
    let Some(boss) = ctx.boss.as_mut() else {
        return;
    };
    boss.invuln = boss.invuln.saturating_sub(1);
    boss.float_offset = ctx.tuning.float_amplitude * (t * ctx.tuning.float_speed).sin();

    let entered_two = enter_phase_two_if_due(boss, ctx.tuning.boss_phase_two_hp);
    let volley = advance(boss, &ctx.tuning, &mut ctx.rng);
    let origin = boss.rect().center();

    if entered_two {
        log::info!("Boss entered phase two");
        ctx.emit(GameEvent::BossPhaseTwo);
    }
    if let Some(volley) = volley {
        fire(ctx, origin, volley);
    }
}

/// Move projectiles, expire them, and resolve hits on the Guide
pub fn update_projectiles(ctx: &mut SimContext) {
    let guide_center = ctx.guide.body.center();
    let guide_radius = ctx.guide.body.rect().radius();
    let mut hits = 0;

    ctx.projectiles.retain_mut(|p| {
        p.pos += p.vel;
        p.life = p.life.saturating_sub(1);
        if p.life == 0 {
            return false;
        }
        if p.pos.distance(guide_center) < p.radius + guide_radius {
            hits += 1;
            return false;
        }
        true
    });

    for _ in 0..hits {
        outcome::damage_guide(ctx);
    }
}

/// Apply one bomb hit to the boss. Returns true if the hit entered phase Two.
pub fn apply_hit(boss: &mut Boss, tuning: &Tuning) -> bool {
    if boss.invuln > 0 {
        return false;
    }
    boss.hp = boss.hp.saturating_sub(1);
    boss.invuln = tuning.boss_invuln_ticks;
    enter_phase_two_if_due(boss, tuning.boss_phase_two_hp)
}

/// Destroy bombs that reach the boss and damage it when it is vulnerable
pub fn resolve_bomb_hits(ctx: &mut SimContext) {
    let Some(boss) = ctx.boss.as_ref() else {
        return;
    };
    let rect = boss.rect();
    let (center, radius) = (rect.center(), rect.radius());

    let mut impacts = Vec::new();
    ctx.crates.retain(|c| {
        let hit = c.kind == CrateKind::Bomb
            && c.body.center().distance(center) < radius + c.body.rect().radius();
        if hit {
            impacts.push(c.body.center());
        }
        !hit
    });

    for impact in impacts {
        ctx.burst(impact, 16, particle_color::BOMB);
        let Some(boss) = ctx.boss.as_mut() else {
            return;
        };
        let was_invuln = boss.invuln > 0;
        let entered_two = apply_hit(boss, &ctx.tuning);
        if was_invuln {
            continue;
        }
        let hp = boss.hp;
        log::debug!("Boss hit, hp {}", hp);
        ctx.emit(GameEvent::BossDamaged { hp });
        ctx.burst(center, 12, particle_color::BOSS_HIT);
        if entered_two {
            log::info!("Boss entered phase two");
            ctx.emit(GameEvent::BossPhaseTwo);
        }
    }
}
