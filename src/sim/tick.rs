//! One simulation step
//!
//! The order of the passes below is fixed. Each category sees the others as
//! already advanced this step, and removals happen only after a whole
//! category has been updated.

use glam::Vec2;

use super::boss::Archetype;
use super::context::DEFAULT_MAGNET_RANGE;
use super::enemy::Enemy;
use super::entity::{Entity, quarantine};
use super::events::{GameEvent, MusicTrack, SoundCue};
use super::particle::Spray;
use super::player::AttackModifier;
use super::powerup::PowerupKind;
use super::schedule::{Action, Scheduled, Target};
use super::state::{GameMode, REWARD_OPTIONS, World};
use crate::color::palette;
use crate::consts::*;

/// Input commands for a single step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Desired movement direction (not necessarily normalized)
    pub movement: Vec2,
    pub attack: bool,
    /// Activate Glow Up
    pub glow_up: bool,
    /// Activate Call Your Bestie
    pub call_bestie: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Clamp a frame delta into `[0, MAX_FRAME_DT]`; garbage becomes zero
pub fn clamp_dt(dt: f32) -> f32 {
    if !dt.is_finite() || dt <= 0.0 {
        return 0.0;
    }
    dt.min(MAX_FRAME_DT)
}

/// Advance the world by `dt` seconds (clamped)
pub fn step(world: &mut World, input: &TickInput, dt: f32) {
    if input.pause && !world.pause() {
        world.resume();
    }
    if world.mode != GameMode::Playing {
        return;
    }
    let dt = clamp_dt(dt);
    if dt == 0.0 {
        return;
    }
    world.ctx.time += dt;
    world.stats.elapsed += dt;

    run_schedule(world);

    update_player(world, input, dt);
    update_enemies(world, dt);
    update_projectiles(world, dt);
    update_powerups(world, dt);
    world.ctx.particles.retain_mut(|p| p.update(dt));
    update_effects(world, dt);
    cull_enemies(world);

    let target = world.player.pos;
    world.ctx.camera.update(target, world.ctx.viewport, dt);
    world.background.update(dt);

    if world.player.is_dead() {
        game_over(world);
        return;
    }

    spawn_enemies(world, dt);
    if world.quota_met() && world.live_enemy_count() == 0 {
        complete_level(world);
    }
}

fn run_schedule(world: &mut World) {
    let now = world.ctx.time;
    for Scheduled { due, target, action } in world.ctx.schedule.take_due(now) {
        let applied = match target {
            Target::Player(id) if id == world.player.id => {
                end_player_effect(world, due, target, action);
                true
            }
            Target::Player(_) => false,
            Target::Enemy(id) => match world.enemies.iter_mut().find(|e| e.id == id && !e.is_dead()) {
                Some(enemy) => {
                    end_enemy_effect(enemy, action);
                    true
                }
                None => false,
            },
            Target::World => {
                if action == Action::ResetMagnet {
                    world.ctx.magnet_range = DEFAULT_MAGNET_RANGE;
                }
                true
            }
        };
        if !applied {
            log::debug!("Skipped stale {:?} for {:?}", action, target);
        }
    }
}

fn end_player_effect(world: &mut World, due: f32, target: Target, action: Action) {
    let player = &mut world.player;
    match action {
        Action::EndModifier(key) => {
            player.modifiers.remove(key);
            log::debug!("{:?} wore off", key);
        }
        Action::EndShield => player.shielded = false,
        Action::EndConfusion => player.confused = false,
        Action::EndMultishot => player
            .attack_mods
            .retain(|m| !matches!(m, AttackModifier::Multishot { .. })),
        Action::Regen {
            amount,
            period,
            remaining,
        } => {
            if player.is_dead() {
                return;
            }
            player.heal(amount);
            let glow = Spray::new(3).speed(20.0, 40.0).life(0.6, 0.6).size(2.0, 4.0).jitter(player.radius).weightless();
            world.ctx.spray(player.pos, glow, &[palette::HEALTH_GREEN]);
            if remaining > 1 {
                let next = Action::Regen {
                    amount,
                    period,
                    remaining: remaining - 1,
                };
                world.ctx.schedule.at(due + period, target, next);
            }
        }
        other => log::debug!("{:?} has no effect on the player", other),
    }
}

fn end_enemy_effect(enemy: &mut Enemy, action: Action) {
    match action {
        Action::EndSlow => enemy.motor.slow = 1.0,
        Action::EndMirrorShield => {
            if let Some(boss) = enemy.boss_mut() {
                boss.end_mirror_shield();
            }
        }
        other => log::debug!("{:?} has no effect on enemy #{}", other, enemy.id),
    }
}

fn update_player(world: &mut World, input: &TickInput, dt: f32) {
    let World {
        player,
        enemies,
        ctx,
        level,
        ..
    } = world;
    player.update(dt, input, *level, enemies, ctx);
    if let Err(fault) = player.check_finite() {
        log::warn!("{}; resetting player motion", fault);
        player.pos = ctx.center();
        player.vel = Vec2::ZERO;
    }
    world.flush_spawned();
}

fn update_enemies(world: &mut World, dt: f32) {
    let World {
        player, enemies, ctx, ..
    } = world;
    for enemy in enemies.iter_mut() {
        enemy.update(dt, player, ctx);
    }
    quarantine(enemies);
    cull_enemies(world);
    world.flush_spawned();
}

fn update_projectiles(world: &mut World, dt: f32) {
    let World {
        player,
        enemies,
        projectiles,
        ctx,
        ..
    } = world;
    for projectile in projectiles.iter_mut() {
        projectile.update(dt, player, enemies, ctx);
    }
    quarantine(projectiles);
    projectiles.retain(|p| !p.should_remove());
    world.flush_spawned();
}

fn update_powerups(world: &mut World, dt: f32) {
    let World {
        player,
        enemies,
        powerups,
        effects,
        ctx,
        ..
    } = world;
    for powerup in powerups.iter_mut() {
        powerup.update(dt, player, enemies, effects, ctx);
    }
    quarantine(powerups);
    powerups.retain(|p| !p.should_remove());
    world.flush_spawned();
}

fn update_effects(world: &mut World, dt: f32) {
    let World {
        player,
        enemies,
        effects,
        ctx,
        ..
    } = world;
    for effect in effects.iter_mut() {
        effect.update(dt, player, enemies, ctx);
    }
    quarantine(effects);
    effects.retain(|e| !e.should_remove());
    world.flush_spawned();
}

/// Remove dead enemies, crediting each kill exactly once
fn cull_enemies(world: &mut World) {
    if !world.enemies.iter().any(Enemy::is_dead) {
        return;
    }
    let (dead, alive): (Vec<Enemy>, Vec<Enemy>) = std::mem::take(&mut world.enemies)
        .into_iter()
        .partition(Enemy::is_dead);
    world.enemies = alive;
    for enemy in &dead {
        on_enemy_killed(world, enemy);
    }
    world.flush_spawned();
}

fn on_enemy_killed(world: &mut World, enemy: &Enemy) {
    let ctx = &mut world.ctx;
    let pos = enemy.pos();
    enemy.on_death(ctx);

    let score = enemy.score_value;
    ctx.score += score;
    ctx.label(pos, format!("+{}", score), palette::GOLD);
    let burst = Spray::new(10).speed(0.0, 140.0).life(1.0, 2.0).size(2.0, 5.0).jitter(10.0);
    ctx.spray(pos, burst, &[palette::PINK, palette::PURPLE, palette::MINT]);
    ctx.sound(SoundCue::EnemyDeath);
    world.stats.record_kill(ctx.time);

    let boss = enemy.boss().map(|b| b.archetype);
    if let Some(archetype) = boss {
        world.stats.bosses_defeated += 1;
        ctx.shake(1.5);
        ctx.event(GameEvent::BossDefeated { archetype });
        log::info!("{} defeated", archetype.name());
    }
    ctx.event(GameEvent::EnemyKilled {
        boss: boss.is_some(),
        score,
    });

    if ctx.random() < POWERUP_DROP_CHANCE {
        let kind = PowerupKind::random_weighted(&mut ctx.rng);
        ctx.spawn_powerup(pos, kind);
    }
}

fn spawn_enemies(world: &mut World, dt: f32) {
    world.spawn_timer += dt;
    if world.quota_met() {
        return;
    }
    if world.spawn_timer >= world.config.spawn_interval(world.level) {
        world.spawn_timer = 0.0;
        world.spawn_enemy();
    }
}

fn complete_level(world: &mut World) {
    let completed = world.level;
    let untouched = world.player.stats.damage_taken == world.stats.damage_at_level_start;
    world.ctx.sound(SoundCue::LevelComplete);
    world.ctx.event(GameEvent::LevelComplete { completed, untouched });
    log::info!("Level {} complete", completed);

    if completed >= FINAL_LEVEL {
        victory(world);
        return;
    }

    world.level += 1;
    world.enemies_spawned = 0;
    world.spawn_timer = 0.0;
    world.stats.damage_at_level_start = world.player.stats.damage_taken;

    if world.level % BOSS_LEVEL_INTERVAL == 0 {
        let archetype = Archetype::for_level(world.level);
        world.ctx.event(GameEvent::BossIntro { archetype });
        log::info!("Boss intro: {}", archetype.name());
        world.mode = GameMode::BossIntro { archetype };
    } else {
        let options = PowerupKind::random_options(&mut world.ctx.rng, REWARD_OPTIONS);
        world.ctx.event(GameEvent::Music {
            track: MusicTrack::for_level(world.level),
        });
        world.mode = GameMode::PowerupSelect { options };
    }
}

fn game_over(world: &mut World) {
    world.mode = GameMode::GameOver;
    let (score, level) = (world.score(), world.level);
    world.ctx.event(GameEvent::GameOver { score, level });
    log::info!("Game over on level {} with {} points", level, score);
}

fn victory(world: &mut World) {
    world.mode = GameMode::Victory;
    let (score, level) = (world.score(), world.level);
    world.ctx.event(GameEvent::Music {
        track: MusicTrack::Victory,
    });
    world.ctx.event(GameEvent::Victory { score, level });
    log::info!("Victory with {} points", score);
}
