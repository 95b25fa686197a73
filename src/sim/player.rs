//! Player controller
//!
//! Movement integration, attack styles, the two timed abilities and damage
//! intake. Temporary stat changes never touch the base tuning values; they live
//! in [`Modifiers`] and are multiplied in when read, so removing one restores
//! the exact base.

use glam::Vec2;

use super::collision::in_range;
use super::context::SimContext;
use super::effect::EffectKind;
use super::enemy::Enemy;
use super::entity::Entity;
use super::events::{GameEvent, SoundCue};
use super::particle::Spray;
use super::projectile::Projectile;
use super::tick::TickInput;
use crate::color::{Color, palette};
use crate::consts::*;
use crate::{frame_damping, normalize_angle, polar_to_cartesian};

pub const PLAYER_RADIUS: f32 = 20.0;
pub const PLAYER_SPEED: f32 = 300.0;
pub const PLAYER_ACCELERATION: f32 = 1200.0;
/// Velocity retained per reference frame
pub const PLAYER_FRICTION: f32 = 0.85;
pub const PLAYER_MAX_HEALTH: i32 = 100;
/// Grace window after a hit
pub const INVULNERABILITY_DURATION: f32 = 1.5;
/// How long the attacking animation holds
pub const ATTACK_ANIM_DURATION: f32 = 0.2;
/// Melee knockback impulse (px/s)
pub const KNOCKBACK: f32 = 200.0;
/// Glow Up: speed multiplier and flat damage bonus while active
pub const GLOW_SPEED: f32 = 1.5;
pub const GLOW_DAMAGE: f32 = 15.0;

/// One unlockable attack style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackStyle {
    pub name: &'static str,
    pub damage: f32,
    pub range: f32,
    /// Seconds between attacks
    pub cooldown: f32,
    pub color: Color,
    pub sound: SoundCue,
}

/// Styles in unlock order (a new one every three levels)
pub const ATTACK_STYLES: [AttackStyle; 4] = [
    AttackStyle {
        name: "Hair Whip",
        damage: 25.0,
        range: 80.0,
        cooldown: 0.3,
        color: palette::PINK,
        sound: SoundCue::AttackHairWhip,
    },
    AttackStyle {
        name: "Purse Swing",
        damage: 35.0,
        range: 60.0,
        cooldown: 0.4,
        color: palette::PURPLE,
        sound: SoundCue::AttackPurseSwing,
    },
    AttackStyle {
        name: "Witty Comeback",
        damage: 20.0,
        range: 120.0,
        cooldown: 0.2,
        color: palette::MINT,
        sound: SoundCue::AttackWittyComeback,
    },
    AttackStyle {
        name: "Dance Move",
        damage: 40.0,
        range: 70.0,
        cooldown: 0.5,
        color: palette::SUNSHINE,
        sound: SoundCue::AttackDanceMove,
    },
];

/// Style index unlocked at `level`
pub fn style_for_level(level: u32) -> usize {
    ((level.max(1) - 1) / 3).min(ATTACK_STYLES.len() as u32 - 1) as usize
}

/// Animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerAnim {
    #[default]
    Idle,
    Walking,
    Attacking,
}

/// A cooldown-gated timed ability
#[derive(Debug, Clone, PartialEq)]
pub struct Ability {
    pub name: &'static str,
    pub cooldown: f32,
    pub duration: f32,
    last_used: Option<f32>,
    active: bool,
    ends_at: f32,
}

impl Ability {
    pub const fn new(name: &'static str, cooldown: f32, duration: f32) -> Self {
        Self {
            name,
            cooldown,
            duration,
            last_used: None,
            active: false,
            ends_at: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn ready(&self, now: f32) -> bool {
        !self.active && self.last_used.is_none_or(|t| now - t >= self.cooldown)
    }

    /// Start the ability; rejected while active or cooling down
    fn try_start(&mut self, now: f32) -> bool {
        if !self.ready(now) {
            return false;
        }
        self.last_used = Some(now);
        self.active = true;
        self.ends_at = now + self.duration;
        true
    }

    /// Ends the active window; true exactly once per activation
    fn expire(&mut self, now: f32) -> bool {
        if self.active && now >= self.ends_at {
            self.active = false;
            return true;
        }
        false
    }

    /// Fraction of the cooldown elapsed (1.0 = ready)
    pub fn readiness(&self, now: f32) -> f32 {
        match self.last_used {
            None => 1.0,
            Some(t) => ((now - t) / self.cooldown).clamp(0.0, 1.0),
        }
    }
}

/// Identifies a timed stat modifier so it can be refreshed or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKey {
    SpeedBoost,
    DamageBoost,
    QuickWit,
    Confidence,
    GuiltTrip,
    Hug,
}

/// Stats that modifiers scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Speed,
    Damage,
    AttackRate,
}

/// Active multiplicative stat modifiers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Modifiers {
    active: Vec<(ModifierKey, Vec<(Stat, f32)>)>,
}

impl Modifiers {
    /// Add a modifier; false (and no change) if that key is already active
    pub fn insert(&mut self, key: ModifierKey, effects: &[(Stat, f32)]) -> bool {
        if self.contains(key) {
            return false;
        }
        self.active.push((key, effects.to_vec()));
        true
    }

    pub fn remove(&mut self, key: ModifierKey) -> bool {
        let before = self.active.len();
        self.active.retain(|(k, _)| *k != key);
        before != self.active.len()
    }

    pub fn contains(&self, key: ModifierKey) -> bool {
        self.active.iter().any(|(k, _)| *k == key)
    }

    /// Combined multiplier for a stat
    pub fn factor(&self, stat: Stat) -> f32 {
        self.active
            .iter()
            .flat_map(|(_, effects)| effects.iter())
            .filter(|(s, _)| *s == stat)
            .map(|(_, f)| *f)
            .product()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

/// Extra behaviour layered onto every attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackModifier {
    /// Fire `count` projectiles in a fan toward the facing direction
    Multishot { count: u32 },
}

/// Per-run bookkeeping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerStats {
    pub damage_dealt: f32,
    pub damage_taken: i32,
    pub kills: u32,
    pub distance: f32,
    pub abilities_used: u32,
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    health: i32,
    max_health: i32,
    pub base_speed: f32,
    pub acceleration: f32,
    pub friction: f32,
    /// Facing (radians), eased toward the movement direction
    pub angle: f32,
    target_angle: f32,
    pub anim: PlayerAnim,
    pub anim_time: f32,
    pub walk_cycle: f32,
    attack_anim: f32,
    style: usize,
    last_attack: Option<f32>,
    /// Seconds of post-hit invulnerability left
    invulnerable: f32,
    pub glow_up: Ability,
    pub bestie: Ability,
    pub modifiers: Modifiers,
    pub attack_mods: Vec<AttackModifier>,
    pub shielded: bool,
    /// Movement input is inverted while set
    pub confused: bool,
    pub stats: PlayerStats,
}

impl Player {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            base_speed: PLAYER_SPEED,
            acceleration: PLAYER_ACCELERATION,
            friction: PLAYER_FRICTION,
            angle: 0.0,
            target_angle: 0.0,
            anim: PlayerAnim::Idle,
            anim_time: 0.0,
            walk_cycle: 0.0,
            attack_anim: 0.0,
            style: 0,
            last_attack: None,
            invulnerable: 0.0,
            glow_up: Ability::new("Glow Up Mode", 15.0, 5.0),
            bestie: Ability::new("Call Your Bestie", 20.0, 3.0),
            modifiers: Modifiers::default(),
            attack_mods: Vec::new(),
            shielded: false,
            confused: false,
            stats: PlayerStats::default(),
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn health_pct(&self) -> f32 {
        self.health as f32 / self.max_health.max(1) as f32
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn style(&self) -> &'static AttackStyle {
        &ATTACK_STYLES[self.style]
    }

    pub fn style_index(&self) -> usize {
        self.style
    }

    /// Damage is ignored while this holds
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0.0 || self.glow_up.is_active() || self.shielded
    }

    /// Flashing grace window (not the buff-granted kind)
    pub fn is_blinking(&self) -> bool {
        self.invulnerable > 0.0 && !self.glow_up.is_active()
    }

    pub fn max_speed(&self) -> f32 {
        let glow = if self.glow_up.is_active() { GLOW_SPEED } else { 1.0 };
        self.base_speed * self.modifiers.factor(Stat::Speed) * glow
    }

    pub fn attack_damage(&self) -> f32 {
        let glow = if self.glow_up.is_active() { GLOW_DAMAGE } else { 0.0 };
        self.style().damage * self.modifiers.factor(Stat::Damage) + glow
    }

    pub fn attack_cooldown(&self) -> f32 {
        self.style().cooldown.max(0.05) / self.modifiers.factor(Stat::AttackRate).max(0.01)
    }

    /// Apply damage; returns whether it landed
    pub fn take_damage(&mut self, amount: i32, ctx: &mut SimContext) -> bool {
        if amount <= 0 || self.is_invulnerable() || self.is_dead() {
            return false;
        }
        self.health = (self.health - amount).clamp(0, self.max_health);
        self.invulnerable = INVULNERABILITY_DURATION;
        self.stats.damage_taken += amount;

        ctx.spray(self.pos, Spray::new(8).life(0.8, 0.8).size(3.0, 6.0), &[palette::HURT_RED]);
        ctx.sound(SoundCue::PlayerHurt);
        ctx.event(GameEvent::PlayerHurt {
            amount,
            health: self.health,
        });

        if self.is_dead() {
            ctx.spray(
                self.pos,
                Spray::new(20).speed(200.0, 200.0).life(1.0, 3.0).size(5.0, 10.0),
                &palette::CELEBRATION,
            );
            log::info!("Player defeated");
        }
        true
    }

    /// Restore health up to the current maximum
    pub fn heal(&mut self, amount: i32) {
        if self.is_dead() {
            return;
        }
        self.health = (self.health + amount.max(0)).clamp(0, self.max_health);
    }

    pub fn raise_max_health(&mut self, amount: i32) {
        self.max_health += amount.max(0);
    }

    /// Advance one step: abilities, movement, attacks
    pub fn update(
        &mut self,
        dt: f32,
        input: &TickInput,
        level: u32,
        enemies: &mut [Enemy],
        ctx: &mut SimContext,
    ) {
        if self.is_dead() {
            return;
        }
        self.anim_time += dt;
        self.invulnerable = (self.invulnerable - dt).max(0.0);
        self.update_abilities(ctx);
        self.update_attack_anim(dt);
        self.unlock_style(level, ctx);

        self.handle_input(dt, input, enemies, ctx);
        self.integrate(dt);
        self.emit_particles(ctx);
        self.wrap(ctx.viewport);
    }

    fn update_abilities(&mut self, ctx: &SimContext) {
        if self.glow_up.expire(ctx.time) {
            log::debug!("{} ended", self.glow_up.name);
        }
        if self.bestie.expire(ctx.time) {
            log::debug!("{} ended", self.bestie.name);
        }
    }

    fn update_attack_anim(&mut self, dt: f32) {
        if self.attack_anim > 0.0 {
            self.attack_anim -= dt;
            if self.attack_anim <= 0.0 {
                self.attack_anim = 0.0;
                self.anim = PlayerAnim::Idle;
            }
        }
    }

    fn unlock_style(&mut self, level: u32, ctx: &mut SimContext) {
        let unlocked = style_for_level(level);
        if unlocked > self.style {
            self.style = unlocked;
            let name = ATTACK_STYLES[unlocked].name;
            log::info!("New attack style: {}", name);
            ctx.event(GameEvent::AttackStyleUnlocked { name });
        }
    }

    fn handle_input(&mut self, dt: f32, input: &TickInput, enemies: &mut [Enemy], ctx: &mut SimContext) {
        let mut dir = input.movement.normalize_or_zero();
        if self.confused {
            dir = -dir;
        }
        if dir != Vec2::ZERO {
            self.vel += dir * self.acceleration * dt;
            self.target_angle = dir.y.atan2(dir.x);
            if self.attack_anim <= 0.0 {
                self.anim = PlayerAnim::Walking;
            }
        } else if self.attack_anim <= 0.0 {
            self.anim = PlayerAnim::Idle;
        }

        if input.attack {
            self.attack(enemies, ctx);
        }
        if input.glow_up {
            self.use_glow_up(ctx);
        }
        if input.call_bestie {
            self.call_bestie(ctx);
        }
    }

    fn integrate(&mut self, dt: f32) {
        let max_speed = self.max_speed();
        let speed = self.vel.length();
        if speed > max_speed {
            self.vel *= max_speed / speed;
        }
        self.vel *= frame_damping(self.friction, dt);
        let step = self.vel * dt;
        self.pos += step;
        self.stats.distance += step.length();

        let diff = normalize_angle(self.target_angle - self.angle);
        self.angle = normalize_angle(self.angle + diff * (dt * 8.0).min(1.0));

        if self.anim == PlayerAnim::Walking {
            self.walk_cycle += dt * 6.0;
        }
    }

    fn emit_particles(&mut self, ctx: &mut SimContext) {
        if self.glow_up.is_active() {
            let spray = Spray::new(2)
                .speed(30.0, 30.0)
                .life(1.0, 1.0)
                .size(3.0, 6.0)
                .jitter(self.radius)
                .weightless();
            ctx.spray(self.pos, spray, &[palette::SUNSHINE]);
        }
        if self.vel.length() > 100.0 {
            let spray = Spray::new(1).speed(0.0, 20.0).life(0.5, 0.5).size(2.0, 4.0).jitter(5.0).weightless();
            let start = ctx.particles.len();
            ctx.spray(self.pos, spray, &[palette::PINK]);
            for p in &mut ctx.particles[start..] {
                p.vel -= self.vel * 0.1;
            }
        }
    }

    fn wrap(&mut self, viewport: Vec2) {
        let m = WRAP_MARGIN;
        if self.pos.x < -m {
            self.pos.x = viewport.x + m;
        } else if self.pos.x > viewport.x + m {
            self.pos.x = -m;
        }
        if self.pos.y < -m {
            self.pos.y = viewport.y + m;
        } else if self.pos.y > viewport.y + m {
            self.pos.y = -m;
        }
    }

    /// Attack with the current style; returns false while cooling down
    pub fn attack(&mut self, enemies: &mut [Enemy], ctx: &mut SimContext) -> bool {
        if self.last_attack.is_some_and(|t| ctx.time - t < self.attack_cooldown()) {
            return false;
        }
        self.last_attack = Some(ctx.time);
        self.anim = PlayerAnim::Attacking;
        self.attack_anim = ATTACK_ANIM_DURATION;

        let style = *self.style();
        let damage = self.attack_damage();

        for i in in_range(enemies, self.pos, style.range) {
            let enemy = &mut enemies[i];
            let dealt = enemy.take_damage(damage, ctx);
            let hit_spray = Spray::new(8).speed(100.0, 200.0).life(0.5, 1.0).size(4.0, 8.0).jitter(10.0);
            ctx.spray(enemy.pos(), hit_spray, &[style.color]);
            let away = (enemy.pos() - self.pos).normalize_or_zero();
            enemy.knock_back(away * KNOCKBACK, ctx.time);
            self.stats.damage_dealt += dealt;
            if enemy.is_dead() {
                self.stats.kills += 1;
            }
        }

        self.flourish(&style, damage, ctx);
        let burst = Spray::new(10).speed(50.0, 150.0).life(0.3, 0.8).size(3.0, 6.0);
        ctx.spray(self.pos, burst, &[style.color]);
        ctx.shake(0.3);
        ctx.sound(style.sound);

        for modifier in self.attack_mods.clone() {
            self.apply_attack_modifier(modifier, damage, &style, ctx);
        }
        true
    }

    /// Style-specific visuals (and projectiles for Witty Comeback)
    fn flourish(&self, style: &AttackStyle, damage: f32, ctx: &mut SimContext) {
        match self.style {
            0 => {
                let fan = Spray::new(8).speed(100.0, 100.0).life(0.3, 0.3).size(3.0, 6.0);
                ctx.spray(self.pos, fan.fan(style.range * 0.8, self.angle, 0.3), &[style.color]);
            }
            1 => {
                let ring = Spray::new(12).speed(50.0, 50.0).life(0.4, 0.4).size(4.0, 7.0);
                ctx.spray(self.pos, ring.ring(style.range), &[style.color]);
            }
            2 => {
                for i in 0..5 {
                    let angle = self.angle + (i as f32 - 2.0) * 0.2;
                    let vel = polar_to_cartesian(400.0, angle);
                    ctx.spawn_projectile(Projectile::player(self.pos, vel, damage, style.color));
                }
            }
            _ => {
                let ring = Spray::new(16).speed(80.0, 80.0).life(0.6, 0.6).size(5.0, 8.0).weightless();
                ctx.spray(self.pos, ring.ring(style.range * 0.7), &[style.color]);
            }
        }
    }

    fn apply_attack_modifier(&self, modifier: AttackModifier, damage: f32, style: &AttackStyle, ctx: &mut SimContext) {
        match modifier {
            AttackModifier::Multishot { count } => {
                let center = (count as f32 - 1.0) / 2.0;
                for i in 0..count {
                    let angle = self.angle + (i as f32 - center) * 0.3;
                    let vel = polar_to_cartesian(400.0, angle);
                    ctx.spawn_projectile(Projectile::player(self.pos, vel, damage, style.color));
                }
            }
        }
    }

    /// Glow Up: faster, harder-hitting and invulnerable for its duration
    pub fn use_glow_up(&mut self, ctx: &mut SimContext) -> bool {
        if !self.glow_up.try_start(ctx.time) {
            return false;
        }
        self.stats.abilities_used += 1;
        ctx.shake(0.5);
        let burst = Spray::new(30).speed(100.0, 300.0).life(1.0, 2.0).size(5.0, 10.0).weightless();
        ctx.spray(self.pos, burst, &[palette::SUNSHINE, palette::PINK, palette::PURPLE]);
        ctx.sound(SoundCue::AbilityGlowUp);
        ctx.event(GameEvent::AbilityActivated {
            ability: self.glow_up.name,
        });
        log::debug!("{} activated", self.glow_up.name);
        true
    }

    /// Summon a helper that hunts the nearest enemy for the ability's duration
    pub fn call_bestie(&mut self, ctx: &mut SimContext) -> bool {
        if !self.bestie.try_start(ctx.time) {
            return false;
        }
        self.stats.abilities_used += 1;
        let offset = Vec2::new(ctx.between(-50.0, 50.0), ctx.between(-50.0, 50.0));
        ctx.spawn_effect(
            self.pos + offset,
            self.bestie.duration,
            palette::MINT,
            EffectKind::Bestie { hit_cooldown: 0.0 },
        );
        ctx.sound(SoundCue::AbilityCallBestie);
        ctx.event(GameEvent::AbilityActivated {
            ability: self.bestie.name,
        });
        log::debug!("{} activated", self.bestie.name);
        true
    }
}

impl Entity for Player {
    fn kind(&self) -> &'static str {
        "player"
    }
    fn id(&self) -> u32 {
        self.id
    }
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn vel(&self) -> Vec2 {
        self.vel
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn should_remove(&self) -> bool {
        self.is_dead()
    }
    fn health(&self) -> Option<f32> {
        Some(self.health as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::Personality;
    use proptest::prelude::*;

    fn ctx() -> SimContext {
        SimContext::new(42, Vec2::new(800.0, 600.0))
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_damage_then_grace_window() {
        let mut ctx = ctx();
        let mut p = Player::new(1, Vec2::new(400.0, 300.0));
        assert!(p.take_damage(30, &mut ctx));
        assert_eq!(p.health(), 70);
        assert!(p.is_invulnerable());

        for _ in 0..30 {
            ctx.time += 1.0 / 60.0;
            p.update(1.0 / 60.0, &idle(), 1, &mut [], &mut ctx);
        }
        assert!(!p.take_damage(30, &mut ctx));
        assert_eq!(p.health(), 70);

        for _ in 0..61 {
            ctx.time += 1.0 / 60.0;
            p.update(1.0 / 60.0, &idle(), 1, &mut [], &mut ctx);
        }
        assert!(p.take_damage(30, &mut ctx));
        assert_eq!(p.health(), 40);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut ctx = ctx();
        let mut p = Player::new(1, Vec2::ZERO);
        p.take_damage(50, &mut ctx);
        p.heal(500);
        assert_eq!(p.health(), p.max_health());
        p.raise_max_health(10);
        assert_eq!(p.max_health(), 110);
    }

    #[test]
    fn test_style_never_decreases() {
        let mut ctx = ctx();
        let mut p = Player::new(1, Vec2::new(400.0, 300.0));
        p.update(0.016, &idle(), 7, &mut [], &mut ctx);
        assert_eq!(p.style_index(), 2);
        p.update(0.016, &idle(), 1, &mut [], &mut ctx);
        assert_eq!(p.style_index(), 2);
        p.update(0.016, &idle(), 40, &mut [], &mut ctx);
        assert_eq!(p.style_index(), 3);
    }

    #[test]
    fn test_glow_up_gated_and_reverted_once() {
        let mut ctx = ctx();
        let mut p = Player::new(1, Vec2::new(400.0, 300.0));
        let base = p.max_speed();
        assert!(p.use_glow_up(&mut ctx));
        assert!(!p.use_glow_up(&mut ctx));
        assert!((p.max_speed() - base * GLOW_SPEED).abs() < 1e-3);
        assert!(p.is_invulnerable());

        ctx.time = 5.0;
        p.update(0.0, &idle(), 1, &mut [], &mut ctx);
        assert!(!p.glow_up.is_active());
        assert_eq!(p.max_speed(), base);
        p.update(0.0, &idle(), 1, &mut [], &mut ctx);
        assert_eq!(p.max_speed(), base);

        ctx.time = 10.0;
        assert!(!p.use_glow_up(&mut ctx));
        ctx.time = 15.0;
        assert!(p.use_glow_up(&mut ctx));
    }

    #[test]
    fn test_attack_hits_everything_in_range() {
        let mut ctx = ctx();
        let mut p = Player::new(1, Vec2::new(400.0, 300.0));
        let mut enemies = vec![
            Enemy::with_personality(10, Vec2::new(450.0, 300.0), 1, Personality::Flirty),
            Enemy::with_personality(11, Vec2::new(350.0, 300.0), 1, Personality::Flirty),
            Enemy::with_personality(12, Vec2::new(600.0, 300.0), 1, Personality::Flirty),
        ];
        let full = enemies[0].max_health();
        assert!(p.attack(&mut enemies, &mut ctx));
        assert!(enemies[0].health() < full);
        assert!(enemies[1].health() < full);
        assert_eq!(enemies[2].health(), full);
        assert!(!p.attack(&mut enemies, &mut ctx));
        assert_eq!(p.anim, PlayerAnim::Attacking);
    }

    #[test]
    fn test_modifier_removal_restores_base() {
        let mut m = Modifiers::default();
        assert!(m.insert(ModifierKey::SpeedBoost, &[(Stat::Speed, 1.5)]));
        assert!(!m.insert(ModifierKey::SpeedBoost, &[(Stat::Speed, 1.5)]));
        assert!(m.insert(ModifierKey::GuiltTrip, &[(Stat::Speed, 0.5)]));
        assert!((m.factor(Stat::Speed) - 0.75).abs() < 1e-6);
        m.remove(ModifierKey::SpeedBoost);
        m.remove(ModifierKey::GuiltTrip);
        assert_eq!(m.factor(Stat::Speed), 1.0);
    }

    #[test]
    fn test_confusion_inverts_movement() {
        let mut ctx = ctx();
        let mut p = Player::new(1, Vec2::new(400.0, 300.0));
        p.confused = true;
        let input = TickInput {
            movement: Vec2::X,
            ..Default::default()
        };
        p.update(0.1, &input, 1, &mut [], &mut ctx);
        assert!(p.pos.x < 400.0);
    }

    #[test]
    fn test_wraps_past_margin() {
        let mut p = Player::new(1, Vec2::new(-60.0, 300.0));
        p.wrap(Vec2::new(800.0, 600.0));
        assert_eq!(p.pos.x, 850.0);
    }

    proptest! {
        #[test]
        fn prop_health_stays_clamped(ops in prop::collection::vec((any::<bool>(), 0i32..200), 1..40)) {
            let mut ctx = ctx();
            let mut p = Player::new(1, Vec2::ZERO);
            for (hurt, amount) in ops {
                if hurt {
                    p.take_damage(amount, &mut ctx);
                } else {
                    p.heal(amount);
                }
                prop_assert!(p.health() >= 0 && p.health() <= p.max_health());
                // clear the grace window so the next hit can land
                p.invulnerable = 0.0;
            }
        }
    }
}
