//! Enemy AI
//!
//! Regular enemies and bosses share one type. The kind (personality or boss
//! payload) is fixed at construction and selects the attack behaviour; the
//! chase state machine is common to both.
//!
//! States:
//! - `Approaching` → `Attacking` inside attack range, → `Wandering` outside detection range
//! - `Attacking` → `Approaching` once the target leaves attack range
//! - `Wandering` → `Approaching` once the target is back in detection range
//! - `Stunned` → `Approaching` after a short knockback stun
//! - `Fleeing` → `Wandering` after a few seconds or once far enough away

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::f32::consts::{PI, TAU};

use super::boss::{Archetype, BOSS_RADIUS, BOSS_SCORE, Boss};
use super::context::SimContext;
use super::entity::Entity;
use super::events::{GameEvent, SoundCue};
use super::particle::Spray;
use super::player::Player;
use super::projectile::Projectile;
use crate::color::{Color, palette};
use crate::{circle_collision, frame_damping, polar_to_cartesian};

pub const ENEMY_RADIUS: f32 = 18.0;
pub const ATTACK_RANGE: f32 = 40.0;
pub const DETECTION_RANGE: f32 = 200.0;
/// Seconds between attacks
pub const ATTACK_COOLDOWN: f32 = 2.0;
/// Velocity retained per reference frame
pub const ENEMY_FRICTION: f32 = 0.9;
/// Stun applied by a melee knockback
pub const STUN_DURATION: f32 = 0.25;
/// Health fraction under which an enemy may panic
pub const FLEE_HEALTH: f32 = 0.3;
pub const FLEE_CHANCE: f32 = 0.3;
pub const FLEE_TIMEOUT: f32 = 3.0;
/// Minimum seconds between voice lines
pub const VOICE_GAP: f32 = 5.0;
pub const BOSS_CONTACT_DAMAGE: i32 = 25;

/// Regular enemy profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Personality {
    Overconfident,
    Flirty,
    Creepy,
    Mansplainer,
    Showoff,
}

impl Personality {
    pub const ALL: [Personality; 5] = [
        Personality::Overconfident,
        Personality::Flirty,
        Personality::Creepy,
        Personality::Mansplainer,
        Personality::Showoff,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn color(self) -> Color {
        match self {
            Personality::Overconfident => palette::BLUE,
            Personality::Flirty => palette::RED,
            Personality::Creepy => palette::PLUM,
            Personality::Mansplainer => palette::AMBER,
            Personality::Showoff => palette::EMERALD,
        }
    }

    pub fn speed_scale(self) -> f32 {
        match self {
            Personality::Overconfident => 1.2,
            Personality::Flirty => 0.9,
            Personality::Creepy => 0.7,
            Personality::Mansplainer => 0.8,
            Personality::Showoff => 1.5,
        }
    }

    pub fn health_scale(self) -> f32 {
        match self {
            Personality::Overconfident => 1.0,
            Personality::Flirty => 0.8,
            Personality::Creepy => 1.3,
            Personality::Mansplainer => 1.1,
            Personality::Showoff => 0.9,
        }
    }

    /// Damage dealt on body contact during an attack
    pub fn contact_damage(self) -> Option<i32> {
        match self {
            Personality::Overconfident => Some(15),
            Personality::Flirty => None,
            Personality::Creepy => Some(20),
            Personality::Mansplainer => Some(12),
            Personality::Showoff => Some(25),
        }
    }

    pub fn pickup_lines(self) -> &'static [&'static str] {
        match self {
            Personality::Overconfident => &["Hey gorgeous! 😎", "You look lonely 😏", "I'm different from other guys 🙄"],
            Personality::Flirty => &["😘💕", "Beautiful! 💋", "Your eyes sparkle ✨"],
            Personality::Creepy => &[
                "I've been watching you 👁️",
                "You remind me of my ex 😬",
                "Nice guys finish last 🤢",
            ],
            Personality::Mansplainer => &["Actually... 🤓", "Let me explain... 📚", "You probably don't know... 🙄"],
            Personality::Showoff => &["Check out my car! 🏎️", "I make 6 figures 💰", "I'm basically famous 📸"],
        }
    }
}

/// Behaviour state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiState {
    Approaching,
    Attacking,
    Stunned { until: f32 },
    Fleeing { since: f32 },
    Wandering,
}

/// Kinematics shared by every enemy
#[derive(Debug, Clone, PartialEq)]
pub struct Motor {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Cruise speed (px/s); phases raise it permanently
    pub speed: f32,
    /// Temporary slow factor (1.0 = none)
    pub slow: f32,
    /// Last movement direction (radians)
    pub heading: f32,
    /// +1 facing right, -1 facing left
    pub facing: f32,
}

impl Motor {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            speed,
            slow: 1.0,
            heading: 0.0,
            facing: 1.0,
        }
    }

    pub fn effective_speed(&self) -> f32 {
        self.speed * self.slow
    }

    fn steer(&mut self, dir: Vec2, scale: f32) {
        if dir == Vec2::ZERO {
            return;
        }
        self.vel = dir * self.effective_speed() * scale;
        self.heading = dir.y.atan2(dir.x);
        self.facing = if dir.x > 0.0 { 1.0 } else { -1.0 };
    }

    pub fn move_towards(&mut self, target: Vec2, scale: f32) {
        self.steer((target - self.pos).normalize_or_zero(), scale);
    }

    pub fn move_away(&mut self, from: Vec2, scale: f32) {
        self.steer((self.pos - from).normalize_or_zero(), scale);
    }

    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.vel *= frame_damping(ENEMY_FRICTION, dt);
    }
}

#[derive(Debug, Clone, PartialEq)]
enum EnemyKind {
    Regular(Personality),
    Boss(Box<Boss>),
}

/// A hostile entity
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: u32,
    pub motor: Motor,
    pub radius: f32,
    health: f32,
    max_health: f32,
    kind: EnemyKind,
    pub state: AiState,
    pub attack_range: f32,
    pub detection_range: f32,
    pub attack_cooldown: f32,
    last_attack: Option<f32>,
    /// Hit flash intensity, decays to zero
    pub hit_flash: f32,
    /// Cosmetic spin (showoff attack)
    pub spin: f32,
    pub anim_time: f32,
    last_voice: Option<f32>,
    flee_rolled: bool,
    pub score_value: u64,
    pub color: Color,
}

impl Enemy {
    fn base_speed(level: u32) -> f32 {
        100.0 + level as f32 * 10.0
    }

    fn base_health(level: u32) -> f32 {
        50.0 + level as f32 * 10.0
    }

    fn build(id: u32, pos: Vec2, speed: f32, health: f32, radius: f32, color: Color, kind: EnemyKind) -> Self {
        Self {
            id,
            motor: Motor::new(pos, speed),
            radius,
            health,
            max_health: health,
            kind,
            state: AiState::Approaching,
            attack_range: ATTACK_RANGE,
            detection_range: DETECTION_RANGE,
            attack_cooldown: ATTACK_COOLDOWN,
            last_attack: None,
            hit_flash: 0.0,
            spin: 0.0,
            anim_time: 0.0,
            last_voice: None,
            flee_rolled: false,
            score_value: 100,
            color,
        }
    }

    /// Regular enemy with a random personality
    pub fn new<R: Rng + ?Sized>(id: u32, pos: Vec2, level: u32, rng: &mut R) -> Self {
        Self::with_personality(id, pos, level, Personality::random(rng))
    }

    pub fn with_personality(id: u32, pos: Vec2, level: u32, personality: Personality) -> Self {
        let speed = Self::base_speed(level) * personality.speed_scale();
        let health = (Self::base_health(level) * personality.health_scale()).round();
        Self::build(
            id,
            pos,
            speed,
            health,
            ENEMY_RADIUS,
            personality.color(),
            EnemyKind::Regular(personality),
        )
    }

    /// Boss scaled to `level`
    pub fn new_boss(id: u32, pos: Vec2, level: u32, archetype: Archetype) -> Self {
        let speed = Self::base_speed(level) * 0.7;
        let health = 300.0 + level as f32 * 50.0;
        let mut enemy = Self::build(
            id,
            pos,
            speed,
            health,
            BOSS_RADIUS,
            archetype.color(),
            EnemyKind::Boss(Box::new(Boss::new(archetype))),
        );
        enemy.score_value = BOSS_SCORE;
        enemy
    }

    pub fn pos(&self) -> Vec2 {
        self.motor.pos
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn health_pct(&self) -> f32 {
        (self.health / self.max_health.max(f32::EPSILON)).clamp(0.0, 1.0)
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn personality(&self) -> Option<Personality> {
        match &self.kind {
            EnemyKind::Regular(p) => Some(*p),
            EnemyKind::Boss(_) => None,
        }
    }

    pub fn boss(&self) -> Option<&Boss> {
        match &self.kind {
            EnemyKind::Boss(b) => Some(b),
            EnemyKind::Regular(_) => None,
        }
    }

    pub fn boss_mut(&mut self) -> Option<&mut Boss> {
        match &mut self.kind {
            EnemyKind::Boss(b) => Some(b),
            EnemyKind::Regular(_) => None,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.boss().is_some()
    }

    fn lines(&self) -> &'static [&'static str] {
        match &self.kind {
            EnemyKind::Regular(p) => p.pickup_lines(),
            EnemyKind::Boss(b) => b.archetype.dialogue(),
        }
    }

    /// Advance one step against the player
    pub fn update(&mut self, dt: f32, player: &mut Player, ctx: &mut SimContext) {
        if self.is_dead() {
            return;
        }
        self.anim_time += dt;
        self.hit_flash = (self.hit_flash - dt * 3.0).max(0.0);
        self.spin *= frame_damping(0.9, dt);

        self.update_ai(dt, player, ctx);

        let Self { id, motor, kind, .. } = self;
        if let EnemyKind::Boss(boss) = kind {
            boss.update(dt, *id, motor, player, ctx);
        }

        self.motor.integrate(dt);
        self.update_voice(dt, ctx);
    }

    fn update_ai(&mut self, dt: f32, player: &mut Player, ctx: &mut SimContext) {
        let target = player.pos;
        let dist = self.motor.pos.distance(target);

        match self.state {
            AiState::Approaching => {
                if dist <= self.attack_range {
                    self.state = AiState::Attacking;
                } else if dist > self.detection_range {
                    self.state = AiState::Wandering;
                } else {
                    self.motor.move_towards(target, 1.0);
                }
            }
            AiState::Attacking => {
                if dist > self.attack_range {
                    self.state = AiState::Approaching;
                } else if self.last_attack.is_none_or(|t| ctx.time - t > self.attack_cooldown) {
                    self.attack(player, ctx);
                }
            }
            AiState::Stunned { until } => {
                if ctx.time >= until {
                    self.state = AiState::Approaching;
                }
            }
            AiState::Fleeing { since } => {
                if ctx.time - since >= FLEE_TIMEOUT || dist > self.detection_range * 1.5 {
                    self.state = AiState::Wandering;
                } else {
                    self.motor.move_away(target, 1.5);
                }
            }
            AiState::Wandering => {
                if ctx.chance_per_frame(0.1, dt) {
                    let angle = ctx.random() * TAU;
                    self.motor.vel = polar_to_cartesian(self.motor.effective_speed() * 0.3, angle);
                }
                if dist <= self.detection_range {
                    self.state = AiState::Approaching;
                }
            }
        }
    }

    fn attack(&mut self, player: &mut Player, ctx: &mut SimContext) {
        self.last_attack = Some(ctx.time);
        let target = player.pos;
        let aim = (target - self.motor.pos).normalize_or_zero();
        let angle = aim.y.atan2(aim.x);
        let pos = self.motor.pos;

        let contact = match self.kind {
            EnemyKind::Boss(_) => Some(BOSS_CONTACT_DAMAGE),
            EnemyKind::Regular(p) => {
                match p {
                    Personality::Overconfident => {
                        self.motor.vel = aim * self.motor.effective_speed() * 2.0;
                    }
                    Personality::Flirty => {
                        for i in -1..=1 {
                            let vel = polar_to_cartesian(200.0, angle + i as f32 * 0.3);
                            ctx.spawn_projectile(Projectile::enemy(pos, vel, 10, palette::HOT_PINK, Some("💖")));
                        }
                    }
                    Personality::Creepy => {
                        self.motor.vel = aim * self.motor.effective_speed() * 0.5;
                        let creep = Spray::new(5).speed(0.0, 50.0).life(2.0, 2.0).size(2.0, 4.0).jitter(20.0);
                        ctx.spray(pos, creep, &[palette::PLUM]);
                    }
                    Personality::Mansplainer => {
                        let bubble = Projectile::enemy(pos, Vec2::new(0.0, -100.0), 15, palette::AMBER, Some("Actually..."))
                            .with_gravity(100.0);
                        ctx.spawn_projectile(bubble);
                    }
                    Personality::Showoff => {
                        self.spin += 10.0 * PI;
                        let bling = Spray::new(8).speed(100.0, 100.0).life(1.0, 1.0).size(3.0, 6.0).ring(30.0);
                        ctx.spray(pos, bling, &[palette::GOLD]);
                    }
                }
                p.contact_damage()
            }
        };

        if let Some(damage) = contact {
            let touching = circle_collision(self.motor.pos, self.radius, player.pos, player.radius);
            if touching && player.take_damage(damage, ctx) {
                ctx.shake(0.5);
            }
        }
    }

    fn update_voice(&mut self, dt: f32, ctx: &mut SimContext) {
        let quiet = self.last_voice.is_none_or(|t| ctx.time - t > VOICE_GAP);
        if quiet && ctx.chance_per_frame(0.01, dt) {
            if let Some(line) = self.lines().choose(&mut ctx.rng) {
                ctx.say(self.motor.pos, *line);
            }
            self.last_voice = Some(ctx.time);
        }
    }

    /// Apply damage; returns the amount actually taken
    pub fn take_damage(&mut self, amount: f32, ctx: &mut SimContext) -> f32 {
        if self.is_dead() || amount <= 0.0 {
            return 0.0;
        }
        let amount = if self.boss().is_some_and(Boss::mirror_shield) {
            amount * 0.5
        } else {
            amount
        };
        self.health = (self.health - amount).max(0.0);
        self.hit_flash = 1.0;

        let sparks = Spray::new(6).speed(100.0, 100.0).life(0.8, 0.8).size(3.0, 5.0);
        ctx.spray(self.motor.pos, sparks, &[palette::HURT_RED]);
        ctx.sound(SoundCue::EnemyHit);

        match self.kind {
            EnemyKind::Boss(_) => self.refresh_phase(ctx),
            EnemyKind::Regular(_) => self.maybe_flee(ctx),
        }
        amount
    }

    /// One roll per enemy once it drops below the flee threshold
    fn maybe_flee(&mut self, ctx: &mut SimContext) {
        if self.flee_rolled || self.is_dead() || self.health >= self.max_health * FLEE_HEALTH {
            return;
        }
        self.flee_rolled = true;
        if ctx.random() < FLEE_CHANCE {
            self.state = AiState::Fleeing { since: ctx.time };
        }
    }

    /// Apply every phase the boss has crossed since the last hit
    fn refresh_phase(&mut self, ctx: &mut SimContext) {
        let pct = self.health_pct();
        let Self {
            motor,
            kind,
            attack_cooldown,
            ..
        } = self;
        let EnemyKind::Boss(boss) = kind else {
            return;
        };
        for phase in boss.advance_phase(pct) {
            match phase {
                2 => {
                    motor.speed *= 1.2;
                    ctx.say(motor.pos, "You're making me angry! 😤");
                }
                _ => {
                    motor.speed *= 1.5;
                    *attack_cooldown *= 0.5;
                    ctx.say(motor.pos, "Fine! I'll show you who I really am! 😡");
                }
            }
            log::info!("{} entered phase {}", boss.archetype.name(), phase);
            ctx.event(GameEvent::BossPhase {
                archetype: boss.archetype,
                phase,
            });
        }
    }

    /// Push the enemy away; regular enemies are briefly stunned
    pub fn knock_back(&mut self, impulse: Vec2, now: f32) {
        if self.is_dead() {
            return;
        }
        self.motor.vel += impulse;
        let can_stun = !self.is_boss() && !matches!(self.state, AiState::Fleeing { .. });
        if can_stun {
            self.state = AiState::Stunned {
                until: now + STUN_DURATION,
            };
        }
    }

    /// Death burst and parting shot
    pub fn on_death(&self, ctx: &mut SimContext) {
        let burst = Spray::new(15).speed(100.0, 300.0).life(1.0, 2.0).size(4.0, 8.0);
        ctx.spray(self.motor.pos, burst, &[self.color]);
        ctx.say(self.motor.pos, "This isn't over! 😤");
    }
}

impl Entity for Enemy {
    fn kind(&self) -> &'static str {
        if self.is_boss() { "boss" } else { "enemy" }
    }
    fn id(&self) -> u32 {
        self.id
    }
    fn pos(&self) -> Vec2 {
        self.motor.pos
    }
    fn vel(&self) -> Vec2 {
        self.motor.vel
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn should_remove(&self) -> bool {
        self.is_dead()
    }
    fn health(&self) -> Option<f32> {
        Some(self.health)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx() -> SimContext {
        SimContext::new(5, Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_personality_scales_stats() {
        let e = Enemy::with_personality(1, Vec2::ZERO, 1, Personality::Creepy);
        assert_eq!(e.max_health(), 78.0);
        assert!((e.motor.speed - 77.0).abs() < 1e-3);
        assert_eq!(e.color, palette::PLUM);
    }

    #[test]
    fn test_personality_never_changes() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::new(400.0, 300.0));
        let mut enemies: Vec<Enemy> = (0..1000)
            .map(|i| {
                let pos = Vec2::new(rng.random_range(0.0..800.0), rng.random_range(0.0..600.0));
                Enemy::new(i + 10, pos, 3, &mut rng)
            })
            .collect();
        let before: Vec<_> = enemies.iter().map(Enemy::personality).collect();
        for _ in 0..5 {
            ctx.time += 1.0 / 60.0;
            for e in &mut enemies {
                e.update(1.0 / 60.0, &mut player, &mut ctx);
                e.take_damage(5.0, &mut ctx);
            }
        }
        let after: Vec<_> = enemies.iter().map(Enemy::personality).collect();
        assert_eq!(before, after);
        assert!(before.iter().all(Option::is_some));
    }

    #[test]
    fn test_fsm_transitions() {
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::new(400.0, 300.0));
        let mut e = Enemy::with_personality(2, Vec2::new(500.0, 300.0), 1, Personality::Flirty);

        e.update(0.016, &mut player, &mut ctx);
        assert_eq!(e.state, AiState::Approaching);
        assert!(e.motor.vel.x < 0.0);

        e.motor.pos = Vec2::new(430.0, 300.0);
        e.update(0.016, &mut player, &mut ctx);
        assert_eq!(e.state, AiState::Attacking);

        e.motor.pos = Vec2::new(480.0, 300.0);
        e.update(0.016, &mut player, &mut ctx);
        assert_eq!(e.state, AiState::Approaching);

        e.motor.pos = Vec2::new(700.0, 300.0);
        e.update(0.016, &mut player, &mut ctx);
        assert_eq!(e.state, AiState::Wandering);

        e.motor.pos = Vec2::new(550.0, 300.0);
        e.update(0.016, &mut player, &mut ctx);
        assert_eq!(e.state, AiState::Approaching);
    }

    #[test]
    fn test_flirty_attack_throws_three_hearts() {
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::new(400.0, 300.0));
        let mut e = Enemy::with_personality(2, Vec2::new(430.0, 300.0), 1, Personality::Flirty);
        e.state = AiState::Attacking;
        e.update(0.016, &mut player, &mut ctx);
        assert_eq!(ctx.spawned.projectiles.len(), 3);
        e.update(0.016, &mut player, &mut ctx);
        assert_eq!(ctx.spawned.projectiles.len(), 3);
    }

    #[test]
    fn test_contact_attack_hurts_player() {
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::new(400.0, 300.0));
        let mut e = Enemy::with_personality(2, Vec2::new(420.0, 300.0), 1, Personality::Showoff);
        e.state = AiState::Attacking;
        e.update(0.016, &mut player, &mut ctx);
        assert_eq!(player.health(), 75);
    }

    #[test]
    fn test_flee_exits_after_timeout() {
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::new(400.0, 300.0));
        let mut e = Enemy::with_personality(2, Vec2::new(450.0, 300.0), 1, Personality::Flirty);
        e.state = AiState::Fleeing { since: 0.0 };
        e.update(0.016, &mut player, &mut ctx);
        assert!(e.motor.vel.x > 0.0);
        ctx.time = FLEE_TIMEOUT;
        e.update(0.016, &mut player, &mut ctx);
        assert_eq!(e.state, AiState::Wandering);
    }

    #[test]
    fn test_flee_rolled_only_once() {
        let mut ctx = ctx();
        let mut e = Enemy::with_personality(2, Vec2::ZERO, 1, Personality::Creepy);
        e.take_damage(e.max_health() * 0.8, &mut ctx);
        assert!(e.flee_rolled);
        e.state = AiState::Approaching;
        for _ in 0..50 {
            e.health = e.max_health() * 0.1;
            e.take_damage(0.01, &mut ctx);
        }
        assert_eq!(e.state, AiState::Approaching);
    }

    #[test]
    fn test_knockback_stuns_regulars_only() {
        let mut e = Enemy::with_personality(2, Vec2::ZERO, 1, Personality::Flirty);
        e.knock_back(Vec2::new(200.0, 0.0), 1.0);
        assert_eq!(e.state, AiState::Stunned { until: 1.0 + STUN_DURATION });
        assert_eq!(e.motor.vel, Vec2::new(200.0, 0.0));

        let mut b = Enemy::new_boss(3, Vec2::ZERO, 5, Archetype::Toxic);
        b.knock_back(Vec2::new(200.0, 0.0), 1.0);
        assert_eq!(b.state, AiState::Approaching);
    }

    #[test]
    fn test_boss_phase_adjusts_once() {
        let mut ctx = ctx();
        let mut b = Enemy::new_boss(3, Vec2::ZERO, 5, Archetype::Toxic);
        let max = b.max_health();
        let speed = b.motor.speed;
        b.health = max * 0.67;
        b.take_damage(max * 0.02, &mut ctx);
        assert_eq!(b.boss().map(Boss::phase), Some(2));
        assert!((b.motor.speed - speed * 1.2).abs() < 1e-3);

        b.take_damage(1.0, &mut ctx);
        assert!((b.motor.speed - speed * 1.2).abs() < 1e-3);
        assert_eq!(b.attack_cooldown, ATTACK_COOLDOWN);

        b.take_damage(max, &mut ctx);
        assert_eq!(b.boss().map(Boss::phase), Some(3));
        assert_eq!(b.attack_cooldown, ATTACK_COOLDOWN * 0.5);
        let phases = ctx
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::BossPhase { .. }))
            .count();
        assert_eq!(phases, 2);
    }

    #[test]
    fn test_boss_stats_scale_with_level() {
        let b = Enemy::new_boss(3, Vec2::ZERO, 10, Archetype::Clingy);
        assert_eq!(b.max_health(), 800.0);
        assert_eq!(b.radius, BOSS_RADIUS);
        assert_eq!(b.score_value, BOSS_SCORE);
        assert!(b.personality().is_none());
    }

    proptest! {
        #[test]
        fn prop_boss_phase_never_drops(hits in prop::collection::vec(0.0f32..80.0, 1..30)) {
            let mut ctx = ctx();
            let mut b = Enemy::new_boss(3, Vec2::ZERO, 5, Archetype::Narcissist);
            let mut last = 1;
            for h in hits {
                b.take_damage(h, &mut ctx);
                let phase = b.boss().map(Boss::phase).unwrap_or(0);
                prop_assert!(phase >= last);
                last = phase;
            }
        }
    }
}
