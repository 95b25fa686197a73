//! World state and run bookkeeping
//!
//! A `World` is one run: created fresh by "start game" so nothing scheduled in
//! a previous run can leak into it.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::boss::Archetype;
use super::camera::Background;
use super::context::SimContext;
use super::effect::Effect;
use super::enemy::Enemy;
use super::events::{GameEvent, MusicTrack};
use super::particle::Spray;
use super::player::Player;
use super::powerup::{Powerup, PowerupKind, apply_effect};
use super::projectile::Projectile;
use crate::color::palette;
use crate::consts::*;
use crate::settings::Difficulty;

/// Number of reward options offered after a normal level
pub const REWARD_OPTIONS: usize = 3;
/// Window used by the "Speed Demon" kill streak
pub const KILL_STREAK_WINDOW: f32 = 30.0;

/// Top-level mode of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameMode {
    Menu,
    Playing,
    Paused,
    /// Between levels, waiting for the player to pick a reward
    PowerupSelect { options: Vec<PowerupKind> },
    /// Boss splash shown before a boss level starts
    BossIntro { archetype: Archetype },
    GameOver,
    Victory,
}

impl GameMode {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameMode::GameOver | GameMode::Victory)
    }
}

/// Level pacing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub enemies_per_level: u32,
    /// Seconds between spawns on level 1
    pub base_spawn_interval: f32,
    /// Spawn interval divisor per level
    pub difficulty_multiplier: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            enemies_per_level: ENEMIES_PER_LEVEL,
            base_spawn_interval: BASE_SPAWN_INTERVAL,
            difficulty_multiplier: DIFFICULTY_MULTIPLIER,
        }
    }
}

impl LevelConfig {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let base_spawn_interval = match difficulty {
            Difficulty::Easy => 2.5,
            Difficulty::Normal => BASE_SPAWN_INTERVAL,
            Difficulty::Hard => 1.5,
        };
        Self {
            base_spawn_interval,
            ..Self::default()
        }
    }

    /// Enemies that must spawn before `level` can complete
    pub fn quota(&self, level: u32) -> u32 {
        self.enemies_per_level * level
    }

    pub fn spawn_interval(&self, level: u32) -> f32 {
        let exp = level.saturating_sub(1) as i32;
        self.base_spawn_interval / self.difficulty_multiplier.powi(exp)
    }
}

/// Run-wide counters the achievements and high-score table read
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub kills: u32,
    /// Timestamps of kills inside the streak window
    pub recent_kills: VecDeque<f32>,
    /// Player damage taken when the current level began
    pub damage_at_level_start: i32,
    pub bosses_defeated: u32,
    /// Seconds of play
    pub elapsed: f32,
}

impl RunStats {
    pub fn record_kill(&mut self, now: f32) {
        self.kills += 1;
        self.recent_kills.push_back(now);
        while self.recent_kills.front().is_some_and(|t| now - *t > KILL_STREAK_WINDOW) {
            self.recent_kills.pop_front();
        }
    }

    /// Kills in the trailing streak window
    pub fn streak(&self) -> usize {
        self.recent_kills.len()
    }
}

/// Everything a single run owns
#[derive(Debug)]
pub struct World {
    pub seed: u64,
    pub mode: GameMode,
    pub config: LevelConfig,
    pub level: u32,
    pub enemies_spawned: u32,
    /// Seconds since the last spawn
    pub spawn_timer: f32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub powerups: Vec<Powerup>,
    pub effects: Vec<Effect>,
    pub background: Background,
    pub stats: RunStats,
    pub ctx: SimContext,
}

impl World {
    /// Fresh run at level 1 with the player centred
    pub fn new(seed: u64, viewport: Vec2, config: LevelConfig) -> Self {
        let mut ctx = SimContext::new(seed, viewport);
        let player = Player::new(ctx.next_id(), viewport / 2.0);
        ctx.event(GameEvent::Music {
            track: MusicTrack::for_level(1),
        });
        log::info!("New run (seed {})", seed);
        Self {
            seed,
            mode: GameMode::Playing,
            config,
            level: 1,
            enemies_spawned: 0,
            spawn_timer: 0.0,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            powerups: Vec::new(),
            effects: Vec::new(),
            background: Background::default(),
            stats: RunStats::default(),
            ctx,
        }
    }

    pub fn score(&self) -> u64 {
        self.ctx.score
    }

    pub fn viewport(&self) -> Vec2 {
        self.ctx.viewport
    }

    /// Live regular and boss enemies
    pub fn live_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| !e.is_dead()).count()
    }

    pub fn quota_met(&self) -> bool {
        self.enemies_spawned >= self.config.quota(self.level)
    }

    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.is_boss() && !e.is_dead())
    }

    /// Spawn a level-scaled enemy just outside a random viewport edge
    pub fn spawn_enemy(&mut self) -> u32 {
        let m = SPAWN_MARGIN;
        let (w, h) = (self.ctx.viewport.x, self.ctx.viewport.y);
        let rng = &mut self.ctx.rng;
        let pos = match rng.random_range(0..4) {
            0 => Vec2::new(rng.random_range(-m..=w + m), -m),
            1 => Vec2::new(w + m, rng.random_range(-m..=h + m)),
            2 => Vec2::new(rng.random_range(-m..=w + m), h + m),
            _ => Vec2::new(-m, rng.random_range(-m..=h + m)),
        };
        self.spawn_enemy_at(pos)
    }

    /// Spawn a random-personality enemy at `pos`, counting it toward the quota
    pub fn spawn_enemy_at(&mut self, pos: Vec2) -> u32 {
        let id = self.ctx.next_id();
        let enemy = Enemy::new(id, pos, self.level, &mut self.ctx.rng);
        self.enemies.push(enemy);
        self.enemies_spawned += 1;
        id
    }

    /// Move pending spawns from the context into the world
    pub fn flush_spawned(&mut self) {
        let spawned = &mut self.ctx.spawned;
        self.projectiles.append(&mut spawned.projectiles);
        self.effects.append(&mut spawned.effects);
        self.powerups.append(&mut spawned.powerups);
    }

    pub fn pause(&mut self) -> bool {
        if self.mode != GameMode::Playing {
            return false;
        }
        self.mode = GameMode::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.mode != GameMode::Paused {
            return false;
        }
        self.mode = GameMode::Playing;
        true
    }

    /// Pick one of the offered rewards and resume play
    pub fn choose_powerup(&mut self, index: usize) -> Option<PowerupKind> {
        let kind = match &self.mode {
            GameMode::PowerupSelect { options } => options.get(index).copied()?,
            _ => return None,
        };
        apply_effect(kind, &mut self.player, &mut self.enemies, &mut self.effects, &mut self.ctx);
        self.flush_spawned();
        log::info!("Picked {}", kind.info().name);
        self.mode = GameMode::Playing;
        Some(kind)
    }

    /// Leave the boss splash: clear the field and drop the boss in
    pub fn confirm_boss(&mut self) -> bool {
        let archetype = match self.mode {
            GameMode::BossIntro { archetype } => archetype,
            _ => return false,
        };
        self.enemies.retain(|e| e.is_boss());
        let center = self.ctx.center();
        let pos = Vec2::new(center.x, center.y - 100.0);
        let id = self.ctx.next_id();
        self.enemies.push(Enemy::new_boss(id, pos, self.level, archetype));
        self.enemies_spawned = self.config.quota(self.level);

        self.ctx.shake(2.0);
        let converge = Spray::new(50).speed(-200.0, -100.0).life(1.0, 2.0).size(4.0, 10.0).ring(150.0).weightless();
        self.ctx.spray(pos, converge, &[archetype.color(), palette::WHITE]);
        self.ctx.event(GameEvent::Music {
            track: MusicTrack::Boss,
        });
        log::info!("{} appears on level {}", archetype.name(), self.level);
        self.mode = GameMode::Playing;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new(11, Vec2::new(800.0, 600.0), LevelConfig::default())
    }

    #[test]
    fn test_spawn_interval_shrinks_per_level() {
        let config = LevelConfig::default();
        assert!((config.spawn_interval(1) - 2.0).abs() < 1e-6);
        assert!((config.spawn_interval(2) - 2.0 / 1.2).abs() < 1e-5);
        assert_eq!(config.quota(3), 30);
        assert_eq!(LevelConfig::for_difficulty(Difficulty::Hard).base_spawn_interval, 1.5);
    }

    #[test]
    fn test_spawned_enemies_start_off_screen() {
        let mut w = world();
        for _ in 0..40 {
            w.spawn_enemy();
        }
        let vp = w.viewport();
        for e in &w.enemies {
            let p = e.pos();
            let outside = p.x <= -SPAWN_MARGIN + 1e-3
                || p.y <= -SPAWN_MARGIN + 1e-3
                || p.x >= vp.x + SPAWN_MARGIN - 1e-3
                || p.y >= vp.y + SPAWN_MARGIN - 1e-3;
            assert!(outside, "{:?} is on screen", p);
        }
        assert_eq!(w.enemies_spawned, 40);
    }

    #[test]
    fn test_kill_streak_window() {
        let mut stats = RunStats::default();
        for i in 0..10 {
            stats.record_kill(i as f32);
        }
        assert_eq!(stats.streak(), 10);
        stats.record_kill(45.0);
        assert_eq!(stats.streak(), 1);
        assert_eq!(stats.kills, 11);
    }

    #[test]
    fn test_choose_powerup_only_in_select_mode() {
        let mut w = world();
        assert_eq!(w.choose_powerup(0), None);
        w.mode = GameMode::PowerupSelect {
            options: vec![PowerupKind::Shield, PowerupKind::Speed],
        };
        assert_eq!(w.choose_powerup(5), None);
        assert_eq!(w.choose_powerup(0), Some(PowerupKind::Shield));
        assert!(w.player.shielded);
        assert_eq!(w.mode, GameMode::Playing);
    }

    #[test]
    fn test_confirm_boss_clears_regulars() {
        let mut w = world();
        w.level = 5;
        w.spawn_enemy_at(Vec2::new(10.0, 10.0));
        w.mode = GameMode::BossIntro {
            archetype: Archetype::Toxic,
        };
        assert!(w.confirm_boss());
        assert_eq!(w.enemies.len(), 1);
        assert!(w.boss().is_some());
        assert!(w.quota_met());
        assert!(!w.confirm_boss());
    }

    #[test]
    fn test_pause_resume() {
        let mut w = world();
        assert!(!w.resume());
        assert!(w.pause());
        assert!(!w.pause());
        assert!(w.resume());
        assert_eq!(w.mode, GameMode::Playing);
    }
}
