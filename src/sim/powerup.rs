//! Power-up pickups and their effects
//!
//! Effects are shared between dropped pickups and the between-level reward
//! screen. Timed effects go through the world schedule: collecting the same
//! kind again while it is active pushes its end time back rather than applying
//! the effect a second time.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::context::SimContext;
use super::effect::{Effect, EffectKind};
use super::enemy::Enemy;
use super::entity::Entity;
use super::events::{GameEvent, SoundCue};
use super::particle::Spray;
use super::player::{AttackModifier, ModifierKey, Player, Stat};
use super::schedule::{Action, Target};
use crate::color::{Color, palette};
use crate::frame_damping;

pub const POWERUP_RADIUS: f32 = 15.0;
/// Seconds before an unclaimed pickup disappears
pub const POWERUP_LIFETIME: f32 = 15.0;
/// Pickups blink for this many final seconds
pub const BLINK_TIME: f32 = 3.0;
/// Pull strength at point blank (px/s²)
pub const MAGNET_FORCE: f32 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    Health,
    Speed,
    Damage,
    AttackSpeed,
    Shield,
    Magnet,
    Multishot,
    FreezeTime,
    Confidence,
    SelfLove,
    RedFlag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

/// What collecting a power-up does
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PowerupEffect {
    Heal { amount: i32, max_boost: i32 },
    Stat { key: ModifierKey, stats: &'static [(Stat, f32)], duration: f32 },
    Shield { duration: f32 },
    Magnet { range: f32, duration: f32 },
    Multishot { count: u32, duration: f32 },
    SlowEnemies { factor: f32, duration: f32 },
    Regen { per_second: i32, duration: f32 },
    DamageAura { damage: f32, range: f32, duration: f32 },
}

/// Static description of a power-up kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerupInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub rarity: Rarity,
    pub value: u64,
    pub color: Color,
    /// Relative drop weight
    pub weight: u32,
    pub effect: PowerupEffect,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 11] = [
        PowerupKind::Health,
        PowerupKind::Speed,
        PowerupKind::Damage,
        PowerupKind::AttackSpeed,
        PowerupKind::Shield,
        PowerupKind::Magnet,
        PowerupKind::Multishot,
        PowerupKind::FreezeTime,
        PowerupKind::Confidence,
        PowerupKind::SelfLove,
        PowerupKind::RedFlag,
    ];

    /// Kinds offered on the reward screen
    pub const SELECTABLE: [PowerupKind; 9] = [
        PowerupKind::Speed,
        PowerupKind::Damage,
        PowerupKind::Health,
        PowerupKind::AttackSpeed,
        PowerupKind::Shield,
        PowerupKind::Magnet,
        PowerupKind::Multishot,
        PowerupKind::Confidence,
        PowerupKind::SelfLove,
    ];

    pub fn info(self) -> PowerupInfo {
        use PowerupEffect as E;
        match self {
            PowerupKind::Health => PowerupInfo {
                name: "Self-Care Heart",
                description: "Restore health and boost max health",
                icon: "💖",
                rarity: Rarity::Common,
                value: 50,
                color: palette::HEALTH_GREEN,
                weight: 25,
                effect: E::Heal { amount: 30, max_boost: 10 },
            },
            PowerupKind::Speed => PowerupInfo {
                name: "Lightning Heels",
                description: "Increased movement speed",
                icon: "⚡",
                rarity: Rarity::Common,
                value: 75,
                color: palette::CYAN,
                weight: 20,
                effect: E::Stat {
                    key: ModifierKey::SpeedBoost,
                    stats: &[(Stat::Speed, 1.3)],
                    duration: 10.0,
                },
            },
            PowerupKind::Damage => PowerupInfo {
                name: "Confidence Boost",
                description: "Increased attack damage",
                icon: "💪",
                rarity: Rarity::Common,
                value: 100,
                color: palette::PINK,
                weight: 20,
                effect: E::Stat {
                    key: ModifierKey::DamageBoost,
                    stats: &[(Stat::Damage, 1.5)],
                    duration: 15.0,
                },
            },
            PowerupKind::AttackSpeed => PowerupInfo {
                name: "Quick Wit",
                description: "Faster attack speed",
                icon: "🏃",
                rarity: Rarity::Common,
                value: 80,
                color: palette::SUNSHINE,
                weight: 15,
                effect: E::Stat {
                    key: ModifierKey::QuickWit,
                    stats: &[(Stat::AttackRate, 1.4)],
                    duration: 12.0,
                },
            },
            PowerupKind::Shield => PowerupInfo {
                name: "Protective Aura",
                description: "Temporary invulnerability shield",
                icon: "🛡️",
                rarity: Rarity::Uncommon,
                value: 150,
                color: palette::PURPLE,
                weight: 10,
                effect: E::Shield { duration: 5.0 },
            },
            PowerupKind::Magnet => PowerupInfo {
                name: "Charisma Field",
                description: "Attract nearby powerups",
                icon: "🧲",
                rarity: Rarity::Uncommon,
                value: 120,
                color: palette::MINT,
                weight: 15,
                effect: E::Magnet { range: 150.0, duration: 20.0 },
            },
            PowerupKind::Multishot => PowerupInfo {
                name: "Multitasking Master",
                description: "Attacks hit multiple targets",
                icon: "🎯",
                rarity: Rarity::Rare,
                value: 200,
                color: palette::ORANGE,
                weight: 8,
                effect: E::Multishot { count: 3, duration: 10.0 },
            },
            PowerupKind::FreezeTime => PowerupInfo {
                name: "Time Out",
                description: "Slow down all enemies",
                icon: "⏰",
                rarity: Rarity::Rare,
                value: 250,
                color: palette::SKY,
                weight: 5,
                effect: E::SlowEnemies { factor: 0.3, duration: 8.0 },
            },
            PowerupKind::Confidence => PowerupInfo {
                name: "Confidence Star",
                description: "Boost all stats temporarily",
                icon: "⭐",
                rarity: Rarity::Uncommon,
                value: 180,
                color: palette::GOLD,
                weight: 12,
                effect: E::Stat {
                    key: ModifierKey::Confidence,
                    stats: &[(Stat::Speed, 1.2), (Stat::Damage, 1.2)],
                    duration: 15.0,
                },
            },
            PowerupKind::SelfLove => PowerupInfo {
                name: "Self-Love Heart",
                description: "Gradual health regeneration",
                icon: "❤️",
                rarity: Rarity::Uncommon,
                value: 160,
                color: palette::HOT_PINK,
                weight: 8,
                effect: E::Regen { per_second: 5, duration: 30.0 },
            },
            PowerupKind::RedFlag => PowerupInfo {
                name: "Red Flag Detector",
                description: "Enemies take damage when approaching",
                icon: "🚩",
                rarity: Rarity::Legendary,
                value: 500,
                color: palette::HURT_RED,
                weight: 2,
                effect: E::DamageAura { damage: 10.0, range: 80.0, duration: 20.0 },
            },
        }
    }

    /// Weighted random kind (rarer kinds drop less often)
    pub fn random_weighted<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let total: u32 = Self::ALL.iter().map(|k| k.info().weight).sum();
        let mut roll = rng.random_range(0..total);
        for kind in Self::ALL {
            let weight = kind.info().weight;
            if roll < weight {
                return kind;
            }
            roll -= weight;
        }
        PowerupKind::Health
    }

    /// `count` distinct reward-screen options
    pub fn random_options<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Self> {
        let mut pool = Self::SELECTABLE.to_vec();
        let mut picked = Vec::with_capacity(count);
        while picked.len() < count && !pool.is_empty() {
            let i = rng.random_range(0..pool.len());
            picked.push(pool.swap_remove(i));
        }
        picked
    }
}

/// Apply a power-up's effect to the player / world
pub fn apply_effect(
    kind: PowerupKind,
    player: &mut Player,
    enemies: &mut [Enemy],
    effects: &mut [Effect],
    ctx: &mut SimContext,
) {
    let now = ctx.time;
    let me = Target::Player(player.id);
    match kind.info().effect {
        PowerupEffect::Heal { amount, max_boost } => {
            player.raise_max_health(max_boost);
            player.heal(amount + max_boost);
        }
        PowerupEffect::Stat { key, stats, duration } => {
            if ctx.schedule.extend_or_insert(now, duration, me, Action::EndModifier(key)) {
                player.modifiers.insert(key, stats);
            }
        }
        PowerupEffect::Shield { duration } => {
            if ctx.schedule.extend_or_insert(now, duration, me, Action::EndShield) {
                player.shielded = true;
            }
        }
        PowerupEffect::Magnet { range, duration } => {
            if ctx.schedule.extend_or_insert(now, duration, Target::World, Action::ResetMagnet) {
                ctx.magnet_range = ctx.magnet_range.max(range);
            }
        }
        PowerupEffect::Multishot { count, duration } => {
            if ctx.schedule.extend_or_insert(now, duration, me, Action::EndMultishot) {
                player.attack_mods.push(AttackModifier::Multishot { count });
            }
        }
        PowerupEffect::SlowEnemies { factor, duration } => {
            for enemy in enemies.iter_mut().filter(|e| !e.is_dead()) {
                if ctx.schedule.extend_or_insert(now, duration, Target::Enemy(enemy.id), Action::EndSlow) {
                    enemy.motor.slow = factor;
                }
            }
        }
        PowerupEffect::Regen { per_second, duration } => {
            let ticks = duration.max(1.0) as u32;
            let regen = Action::Regen {
                amount: per_second,
                period: 1.0,
                remaining: ticks,
            };
            ctx.schedule.extend_or_insert(now, 1.0, me, regen);
        }
        PowerupEffect::DamageAura { damage, range, duration } => {
            let live = effects
                .iter_mut()
                .chain(ctx.spawned.effects.iter_mut())
                .find(|e| e.is_aura() && !e.is_finished());
            if let Some(aura) = live {
                aura.extend(duration);
                return;
            }
            ctx.spawn_effect(
                player.pos,
                duration,
                palette::HURT_RED,
                EffectKind::DamageAura {
                    range,
                    damage,
                    interval: 0.5,
                    next_tick: 0.0,
                },
            );
        }
    }
}

/// A pickup lying in the world
#[derive(Debug, Clone, PartialEq)]
pub struct Powerup {
    pub id: u32,
    pub kind: PowerupKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Seconds remaining
    pub lifetime: f32,
    pub anim_time: f32,
    collected: bool,
}

impl Powerup {
    pub fn new(id: u32, pos: Vec2, kind: PowerupKind) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            radius: POWERUP_RADIUS,
            lifetime: POWERUP_LIFETIME,
            anim_time: 0.0,
            collected: false,
        }
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0.0
    }

    /// Off-phase of the expiry blink
    pub fn blink_hidden(&self) -> bool {
        self.lifetime <= BLINK_TIME && self.lifetime % 0.5 >= 0.25
    }

    /// Claim the pickup. Applies its effect only the first time; later calls
    /// are no-ops and return false.
    pub fn collect(
        &mut self,
        player: &mut Player,
        enemies: &mut [Enemy],
        effects: &mut [Effect],
        ctx: &mut SimContext,
    ) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        let info = self.kind.info();
        apply_effect(self.kind, player, enemies, effects, ctx);

        let burst = Spray::new(15).speed(100.0, 250.0).life(0.8, 1.5).size(4.0, 8.0);
        ctx.spray(self.pos, burst, &[info.color]);
        ctx.label(self.pos, info.name, info.color);
        ctx.score += info.value;
        ctx.sound(SoundCue::PowerupCollect);
        ctx.event(GameEvent::PowerupCollected { kind: self.kind });
        log::debug!("Collected {}", info.name);
        true
    }

    pub fn update(
        &mut self,
        dt: f32,
        player: &mut Player,
        enemies: &mut [Enemy],
        effects: &mut [Effect],
        ctx: &mut SimContext,
    ) {
        if self.collected {
            return;
        }
        self.anim_time += dt;
        self.lifetime -= dt;
        if self.is_expired() {
            return;
        }

        if ctx.chance_per_frame(0.08, dt) {
            let ambient = Spray::new(2).speed(20.0, 20.0).life(1.0, 1.0).size(2.0, 4.0).jitter(self.radius).weightless();
            ctx.spray(self.pos, ambient, &[self.kind.info().color]);
        }

        if player.is_dead() {
            return;
        }
        let dist = self.pos.distance(player.pos);
        if dist <= self.radius + player.radius {
            self.collect(player, enemies, effects, ctx);
            return;
        }

        let range = ctx.magnet_range;
        if dist <= range {
            let dir = (player.pos - self.pos).normalize_or_zero();
            let force = MAGNET_FORCE * (1.0 - dist / range);
            self.vel += dir * force * dt;
            self.pos += self.vel * dt;
            self.vel *= frame_damping(0.9, dt);
        }
    }
}

impl Entity for Powerup {
    fn kind(&self) -> &'static str {
        "powerup"
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
        self.collected || self.is_expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ctx() -> SimContext {
        SimContext::new(4, Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_collect_is_idempotent() {
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::ZERO);
        let mut p = Powerup::new(5, Vec2::ZERO, PowerupKind::Damage);
        assert!(p.collect(&mut player, &mut [], &mut [], &mut ctx));
        let score = ctx.score;
        assert!(!p.collect(&mut player, &mut [], &mut [], &mut ctx));
        assert_eq!(ctx.score, score);
        assert!((player.modifiers.factor(Stat::Damage) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_collected_on_contact() {
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::new(400.0, 300.0));
        let mut p = Powerup::new(5, Vec2::new(420.0, 300.0), PowerupKind::Shield);
        p.update(0.016, &mut player, &mut [], &mut [], &mut ctx);
        assert!(p.is_collected());
        assert!(player.shielded);
        assert_eq!(ctx.score, 150);
    }

    #[test]
    fn test_magnet_pulls_toward_player() {
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::new(400.0, 300.0));
        let mut p = Powerup::new(5, Vec2::new(450.0, 300.0), PowerupKind::Health);
        for _ in 0..10 {
            p.update(1.0 / 60.0, &mut player, &mut [], &mut [], &mut ctx);
        }
        assert!(p.pos.x < 450.0);
    }

    #[test]
    fn test_expires_and_blinks() {
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::new(0.0, 0.0));
        let mut p = Powerup::new(5, Vec2::new(400.0, 300.0), PowerupKind::Speed);
        p.lifetime = 2.85;
        assert!(p.blink_hidden());
        p.lifetime = 2.6;
        assert!(!p.blink_hidden());
        p.update(3.0, &mut player, &mut [], &mut [], &mut ctx);
        assert!(p.should_remove());
        assert!(!p.is_collected());
    }

    #[test]
    fn test_repeat_pickup_extends_instead_of_stacking() {
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::ZERO);
        apply_effect(PowerupKind::Speed, &mut player, &mut [], &mut [], &mut ctx);
        ctx.time = 5.0;
        apply_effect(PowerupKind::Speed, &mut player, &mut [], &mut [], &mut ctx);
        assert!((player.modifiers.factor(Stat::Speed) - 1.3).abs() < 1e-6);
        assert!(ctx.schedule.take_due(19.9).is_empty());
        assert_eq!(ctx.schedule.take_due(20.0).len(), 1);
    }

    #[test]
    fn test_repeat_aura_extends_single_ring() {
        use crate::sim::enemy::Personality;
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::new(400.0, 300.0));
        let mut enemies = vec![Enemy::with_personality(2, Vec2::new(430.0, 300.0), 1, Personality::Creepy)];
        apply_effect(PowerupKind::RedFlag, &mut player, &mut enemies, &mut [], &mut ctx);
        apply_effect(PowerupKind::RedFlag, &mut player, &mut enemies, &mut [], &mut ctx);
        assert_eq!(ctx.spawned.effects.len(), 1);

        let mut effects: Vec<Effect> = ctx.spawned.effects.drain(..).collect();
        ctx.time = 5.0;
        apply_effect(PowerupKind::RedFlag, &mut player, &mut enemies, &mut effects, &mut ctx);
        assert!(ctx.spawned.effects.is_empty());
        assert_eq!(effects.len(), 1);
        assert!((effects[0].life - 60.0).abs() < 1e-4);

        let before = enemies[0].health();
        effects[0].update(0.016, &mut player, &mut enemies, &mut ctx);
        assert!((before - enemies[0].health() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_health_pickup_raises_max() {
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::ZERO);
        player.take_damage(50, &mut ctx);
        apply_effect(PowerupKind::Health, &mut player, &mut [], &mut [], &mut ctx);
        assert_eq!(player.max_health(), 110);
        assert_eq!(player.health(), 90);
    }

    #[test]
    fn test_freeze_slows_live_enemies() {
        use crate::sim::enemy::Personality;
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::ZERO);
        let mut enemies = vec![Enemy::with_personality(2, Vec2::ZERO, 1, Personality::Showoff)];
        apply_effect(PowerupKind::FreezeTime, &mut player, &mut enemies, &mut [], &mut ctx);
        assert_eq!(enemies[0].motor.slow, 0.3);
        assert!(ctx.schedule.is_pending(Target::Enemy(2), Action::EndSlow));
    }

    #[test]
    fn test_reward_options_are_distinct() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..50 {
            let opts = PowerupKind::random_options(&mut rng, 3);
            assert_eq!(opts.len(), 3);
            assert!(opts[0] != opts[1] && opts[1] != opts[2] && opts[0] != opts[2]);
            assert!(opts.iter().all(|k| PowerupKind::SELECTABLE.contains(k)));
        }
    }

    proptest! {
        #[test]
        fn prop_collect_applies_once(calls in 1usize..10, kind_idx in 0usize..11) {
            let mut ctx = ctx();
            let mut player = Player::new(1, Vec2::ZERO);
            let mut p = Powerup::new(5, Vec2::ZERO, PowerupKind::ALL[kind_idx]);
            let applied = (0..calls).filter(|_| p.collect(&mut player, &mut [], &mut [], &mut ctx)).count();
            prop_assert_eq!(applied, 1);
            prop_assert!(p.is_collected());
        }
    }
}
