//! Boss overlays: attack-pattern rotation, ability cooldown and phase escalation
//!
//! A boss is an [`Enemy`](super::enemy::Enemy) whose kind carries a [`Boss`]
//! payload. The base chase/attack state machine still runs; the pattern picked
//! by the rotation timer then steers movement and fires projectiles, and an
//! independent timer triggers a random archetype ability.

use glam::Vec2;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use super::context::SimContext;
use super::effect::EffectKind;
use super::enemy::Motor;
use super::particle::Spray;
use super::player::{ModifierKey, Player, Stat};
use super::projectile::Projectile;
use super::schedule::{Action, Target};
use crate::color::{Color, palette};
use crate::{angle_between, polar_to_cartesian};

/// Seconds each attack pattern runs before rotating
pub const PATTERN_DURATION: f32 = 5.0;
/// Seconds between special abilities
pub const ABILITY_COOLDOWN: f32 = 5.0;
pub const BOSS_RADIUS: f32 = 35.0;
pub const BOSS_SCORE: u64 = 1000;
/// Health fractions below which phases 2 and 3 begin
pub const PHASE_2_THRESHOLD: f32 = 0.66;
pub const PHASE_3_THRESHOLD: f32 = 0.33;

/// Which ex this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Toxic,
    Clingy,
    Ghosting,
    CommitmentPhobe,
    Narcissist,
}

/// Per-frame behaviour while a pattern is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    CircleStrafe,
    GuiltBombs,
    ToxicWaves,
    FollowConstantly,
    MessageSpam,
    ClingyTendrils,
    PhaseInOut,
    MixedSignals,
    VanishingAttacks,
    EvasiveManeuvers,
    LabelDodge,
    NonCommittal,
    SelfCentered,
    SpotlightSteal,
    EgoAttacks,
}

/// One-shot special abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossAbility {
    GuiltTrip,
    GaslightingField,
    EmotionalManipulation,
    SuffocatingHug,
    SpamMessages,
    DisappearingAct,
    FalsePromises,
    ConfusionCloud,
    CommitmentDodge,
    MixedSignals,
    FutureFake,
    EgoBlast,
    AttentionTheft,
    MirrorShield,
}

const SPAM_MESSAGES: [&str; 3] = [
    "Why aren't you answering? 📱",
    "Hello??? 😠",
    "I can see you're online! 👀",
];

const LABELS: [&str; 3] = ["Situationship 🏷️", "Just friends 🤝", "It's complicated 🤷"];

impl Archetype {
    pub const ALL: [Archetype; 5] = [
        Archetype::Toxic,
        Archetype::Clingy,
        Archetype::Ghosting,
        Archetype::CommitmentPhobe,
        Archetype::Narcissist,
    ];

    /// Boss guarding a boss level (5 → toxic, 10 → clingy, ...)
    pub fn for_level(level: u32) -> Self {
        let index = ((level / 5).max(1) - 1) as usize % Self::ALL.len();
        Self::ALL[index]
    }

    pub fn name(self) -> &'static str {
        match self {
            Archetype::Toxic => "The Toxic Ex",
            Archetype::Clingy => "The Clingy Ex",
            Archetype::Ghosting => "The Ghoster",
            Archetype::CommitmentPhobe => "The Commitment-Phobe",
            Archetype::Narcissist => "The Narcissist",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Archetype::Toxic => palette::PLUM,
            Archetype::Clingy => palette::RED,
            Archetype::Ghosting => palette::SLATE,
            Archetype::CommitmentPhobe => palette::AMBER,
            Archetype::Narcissist => palette::EMERALD,
        }
    }

    /// Intro card text
    pub fn story(self) -> &'static str {
        match self {
            Archetype::Toxic => {
                "Remember him? The one who made everything about himself and never listened to your feelings. Time to show him what you've learned!"
            }
            Archetype::Clingy => {
                "The one who couldn't give you space and texted you 47 times in a row. Show him what healthy boundaries look like!"
            }
            Archetype::Ghosting => {
                "He disappeared without explanation and then reappeared months later like nothing happened. Time for some closure!"
            }
            Archetype::CommitmentPhobe => {
                "Three years of 'I'm not ready for labels' but suddenly he's engaged to someone else. Show him what commitment looks like!"
            }
            Archetype::Narcissist => {
                "Everything was always about him. His problems, his achievements, his feelings. Time to center yourself!"
            }
        }
    }

    pub fn dialogue(self) -> &'static [&'static str] {
        match self {
            Archetype::Toxic => &[
                "You'll never find anyone better than me! 😤",
                "I was just trying to help you! 🙄",
                "You're being too sensitive! 😒",
            ],
            Archetype::Clingy => &[
                "Why aren't you texting me back?! 📱",
                "I just want to spend time with you! 🥺",
                "We're perfect together! 💕",
            ],
            Archetype::Ghosting => &[
                "Sorry, I was busy... 👻",
                "I thought we were just casual? 🤷",
                "Can we start fresh? 😅",
            ],
            Archetype::CommitmentPhobe => &[
                "I just don't want to rush things... ⏰",
                "Labels are just social constructs! 🏷️",
                "I need more time to figure myself out! 🤔",
            ],
            Archetype::Narcissist => &[
                "But enough about you, let's talk about me! 🗣️",
                "I'm basically perfect! ✨",
                "This is all your fault! 👆",
            ],
        }
    }

    /// Patterns in rotation order
    pub fn patterns(self) -> &'static [Pattern] {
        use Pattern::*;
        match self {
            Archetype::Toxic => &[CircleStrafe, GuiltBombs, ToxicWaves],
            Archetype::Clingy => &[FollowConstantly, MessageSpam, ClingyTendrils],
            Archetype::Ghosting => &[PhaseInOut, MixedSignals, VanishingAttacks],
            Archetype::CommitmentPhobe => &[EvasiveManeuvers, LabelDodge, NonCommittal],
            Archetype::Narcissist => &[SelfCentered, SpotlightSteal, EgoAttacks],
        }
    }

    pub fn abilities(self) -> &'static [BossAbility] {
        use BossAbility::*;
        match self {
            Archetype::Toxic => &[GuiltTrip, GaslightingField, EmotionalManipulation],
            Archetype::Clingy => &[SuffocatingHug, SpamMessages, GuiltTrip],
            Archetype::Ghosting => &[DisappearingAct, FalsePromises, ConfusionCloud],
            Archetype::CommitmentPhobe => &[CommitmentDodge, MixedSignals, FutureFake],
            Archetype::Narcissist => &[EgoBlast, AttentionTheft, MirrorShield],
        }
    }
}

/// Phase implied by a health fraction
pub fn phase_for(health_pct: f32) -> u8 {
    if health_pct < PHASE_3_THRESHOLD {
        3
    } else if health_pct < PHASE_2_THRESHOLD {
        2
    } else {
        1
    }
}

/// Boss-only state carried by an enemy
#[derive(Debug, Clone, PartialEq)]
pub struct Boss {
    pub archetype: Archetype,
    phase: u8,
    pattern_index: usize,
    pattern_timer: f32,
    ability_timer: f32,
    /// Angle around the player while circle-strafing
    pub orbit_angle: f32,
    /// Render opacity (the ghoster flickers)
    pub fade: f32,
    mirror: bool,
    /// Alternates heart / broken heart for mixed signals
    signal_flip: bool,
}

impl Boss {
    pub fn new(archetype: Archetype) -> Self {
        Self {
            archetype,
            phase: 1,
            pattern_index: 0,
            pattern_timer: 0.0,
            ability_timer: ABILITY_COOLDOWN,
            orbit_angle: 0.0,
            fade: 1.0,
            mirror: false,
            signal_flip: false,
        }
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }

    pub fn pattern(&self) -> Pattern {
        let patterns = self.archetype.patterns();
        patterns[self.pattern_index % patterns.len()]
    }

    /// Incoming damage is halved while set
    pub fn mirror_shield(&self) -> bool {
        self.mirror
    }

    pub fn end_mirror_shield(&mut self) {
        self.mirror = false;
    }

    /// Move to the phase implied by `health_pct` if it is higher than the
    /// current one. Returns every phase entered, in order; empty when nothing
    /// changed. Never lowers the phase.
    pub fn advance_phase(&mut self, health_pct: f32) -> RangeInclusive<u8> {
        let target = phase_for(health_pct);
        let from = self.phase;
        if target > from {
            self.phase = target;
        }
        (from + 1)..=target
    }

    /// Pattern rotation and ability overlay for one step
    pub fn update(&mut self, dt: f32, id: u32, motor: &mut Motor, player: &mut Player, ctx: &mut SimContext) {
        self.pattern_timer += dt;
        if self.pattern_timer > PATTERN_DURATION {
            self.pattern_index = (self.pattern_index + 1) % self.archetype.patterns().len();
            self.pattern_timer = 0.0;
        }
        self.run_pattern(dt, motor, player, ctx);

        self.ability_timer -= dt;
        if self.ability_timer <= 0.0 {
            self.ability_timer = ABILITY_COOLDOWN;
            if let Some(&ability) = self.archetype.abilities().choose(&mut ctx.rng) {
                self.use_ability(ability, id, motor, player, ctx);
            }
        }
    }

    fn run_pattern(&mut self, dt: f32, motor: &mut Motor, player: &mut Player, ctx: &mut SimContext) {
        let color = self.archetype.color();
        let target = player.pos;
        let aim = angle_between(motor.pos, target);
        self.fade = 1.0;

        match self.pattern() {
            Pattern::CircleStrafe => {
                self.orbit_angle += dt * 2.0;
                motor.move_towards(target + polar_to_cartesian(150.0, self.orbit_angle), 1.0);
            }
            Pattern::GuiltBombs => {
                if ctx.chance_per_frame(0.02, dt) {
                    fire(ctx, motor.pos, aim, 150.0, 25, color, Some("It's your fault! 😢"));
                }
            }
            Pattern::ToxicWaves => {
                if ctx.chance_per_frame(0.01, dt) {
                    radial(ctx, motor.pos, 8, 100.0, 20, color, Some("💀"));
                }
            }
            Pattern::FollowConstantly => motor.move_towards(target, 1.5),
            Pattern::MessageSpam => {
                if ctx.chance_per_frame(0.05, dt) {
                    let vel = Vec2::new(ctx.between(-100.0, 100.0), ctx.between(-100.0, 100.0));
                    let text = SPAM_MESSAGES.choose(&mut ctx.rng).copied().unwrap_or(SPAM_MESSAGES[0]);
                    ctx.spawn_projectile(Projectile::enemy(motor.pos, vel, 15, palette::RED, Some(text)));
                }
            }
            Pattern::ClingyTendrils => {
                if ctx.chance_per_frame(0.03, dt) {
                    for i in -1..=1 {
                        fire(ctx, motor.pos, aim + i as f32 * 0.25, 120.0, 10, color, Some("💕"));
                    }
                }
            }
            Pattern::PhaseInOut => {
                self.fade = 0.3 + 0.7 * (self.pattern_timer * 2.0).sin().abs();
                if ctx.chance_per_frame(0.01, dt) {
                    let angle = ctx.random() * TAU;
                    self.teleport(motor, target + polar_to_cartesian(150.0, angle), ctx);
                }
            }
            Pattern::MixedSignals => {
                if ctx.chance_per_frame(0.03, dt) {
                    self.mixed_signal(ctx, motor.pos, aim, 160.0, color);
                }
            }
            Pattern::VanishingAttacks => {
                if ctx.chance_per_frame(0.015, dt) {
                    let behind = (target - motor.pos).normalize_or_zero();
                    self.teleport(motor, target + behind * 120.0, ctx);
                    let aim = angle_between(motor.pos, target);
                    fire(ctx, motor.pos, aim, 200.0, 20, color, Some("👻"));
                }
            }
            Pattern::EvasiveManeuvers => {
                let dist = motor.pos.distance(target);
                if dist < 220.0 {
                    motor.move_away(target, 1.0);
                } else if dist > 260.0 {
                    motor.move_towards(target, 1.0);
                } else {
                    sidestep(motor, aim);
                }
            }
            Pattern::LabelDodge => {
                sidestep(motor, aim);
                if ctx.chance_per_frame(0.02, dt) {
                    let text = LABELS.choose(&mut ctx.rng).copied().unwrap_or(LABELS[0]);
                    fire(ctx, motor.pos, aim, 140.0, 15, color, Some(text));
                }
            }
            Pattern::NonCommittal => {
                if ((self.pattern_timer / 0.5) as u32) % 2 == 0 {
                    motor.move_towards(target, 1.0);
                } else {
                    motor.move_away(target, 1.0);
                }
            }
            Pattern::SelfCentered => {
                let center = ctx.center();
                if motor.pos.distance(center) > 20.0 {
                    motor.move_towards(center, 1.0);
                }
                if ctx.chance_per_frame(0.02, dt) {
                    radial(ctx, motor.pos, 6, 80.0, 15, color, Some("✨"));
                }
            }
            Pattern::SpotlightSteal => motor.move_towards(target, 2.0),
            Pattern::EgoAttacks => {
                if ctx.chance_per_frame(0.025, dt) {
                    for i in -1..=1 {
                        fire(ctx, motor.pos, aim + i as f32 * 0.2, 180.0, 15, color, Some("👆"));
                    }
                }
            }
        }
    }

    fn use_ability(&mut self, ability: BossAbility, id: u32, motor: &mut Motor, player: &mut Player, ctx: &mut SimContext) {
        let color = self.archetype.color();
        let now = ctx.time;
        log::debug!("{} uses {:?}", self.archetype.name(), ability);

        match ability {
            BossAbility::GuiltTrip => {
                ctx.say(motor.pos, "After everything I did for you! 😢");
                slow_player(player, ctx, ModifierKey::GuiltTrip, 0.5, 3.0);
            }
            BossAbility::GaslightingField => {
                ctx.say(motor.pos, "You're just being dramatic! 🙄");
                ctx.shake(1.0);
                confuse_player(player, ctx, 2.0);
            }
            BossAbility::EmotionalManipulation => {
                ctx.say(motor.pos, "I've changed, I promise! 🥺");
                traps(ctx, motor.pos, 3, 100.0);
            }
            BossAbility::SuffocatingHug => {
                ctx.say(motor.pos, "Come here, I miss you! 🤗");
                player.vel += (motor.pos - player.pos).normalize_or_zero() * 300.0;
                slow_player(player, ctx, ModifierKey::Hug, 0.6, 2.0);
            }
            BossAbility::SpamMessages => {
                ctx.say(motor.pos, "Did you get my texts?? 📱");
                for i in 0..6 {
                    let angle = i as f32 / 6.0 * TAU;
                    let text = SPAM_MESSAGES[i % SPAM_MESSAGES.len()];
                    let vel = polar_to_cartesian(150.0, angle);
                    ctx.spawn_projectile(Projectile::enemy(motor.pos, vel, 10, palette::RED, Some(text)));
                }
            }
            BossAbility::DisappearingAct => {
                let to = Vec2::new(ctx.random() * ctx.viewport.x, ctx.random() * ctx.viewport.y);
                self.teleport(motor, to, ctx);
                ctx.say(motor.pos, "👻");
            }
            BossAbility::FalsePromises => {
                ctx.say(motor.pos, "This time it'll be different! 🤞");
                traps(ctx, motor.pos, 3, 100.0);
            }
            BossAbility::ConfusionCloud => {
                ctx.say(motor.pos, "Wait, what were we talking about? 🌫️");
                ctx.shake(0.6);
                let cloud = Spray::new(25).speed(20.0, 60.0).life(1.0, 2.0).size(8.0, 14.0).jitter(60.0).weightless();
                ctx.spray(player.pos, cloud, &[palette::SLATE, palette::WHITE]);
                confuse_player(player, ctx, 3.0);
            }
            BossAbility::CommitmentDodge => {
                ctx.say(motor.pos, "Whoa, let's slow down! 🏃");
                let away = (motor.pos - player.pos).normalize_or_zero();
                let to = (player.pos + away * 250.0).clamp(Vec2::ZERO, ctx.viewport);
                self.teleport(motor, to, ctx);
            }
            BossAbility::MixedSignals => {
                ctx.say(motor.pos, "I love you... I think? 💔");
                for i in 0..8 {
                    self.mixed_signal(ctx, motor.pos, i as f32 / 8.0 * TAU, 120.0, color);
                }
            }
            BossAbility::FutureFake => {
                ctx.say(motor.pos, "Let's go to Paris next year! ✈️");
                for _ in 0..2 {
                    let angle = ctx.random() * TAU;
                    let dist = ctx.between(80.0, 150.0);
                    let at = player.pos + polar_to_cartesian(dist, angle);
                    ctx.spawn_effect(at, 10.0, palette::HOT_PINK, EffectKind::Trap { damage: 20 });
                }
            }
            BossAbility::EgoBlast => {
                ctx.say(motor.pos, "Bow down to greatness! 👑");
                radial(ctx, motor.pos, 12, 150.0, 20, color, None);
                ctx.shake(0.8);
            }
            BossAbility::AttentionTheft => {
                ctx.say(motor.pos, "Look at me! 📸");
                player.vel += (motor.pos - player.pos).normalize_or_zero() * 250.0;
                ctx.shake(0.4);
            }
            BossAbility::MirrorShield => {
                ctx.say(motor.pos, "I'm rubber, you're glue! 🪞");
                if ctx.schedule.extend_or_insert(now, 4.0, Target::Enemy(id), Action::EndMirrorShield) {
                    self.mirror = true;
                }
                let ring = Spray::new(16).speed(40.0, 40.0).life(0.8, 0.8).size(4.0, 6.0).ring(BOSS_RADIUS + 10.0).weightless();
                ctx.spray(motor.pos, ring, &[palette::SKY, palette::WHITE]);
            }
        }
    }

    fn mixed_signal(&mut self, ctx: &mut SimContext, from: Vec2, angle: f32, speed: f32, color: Color) {
        self.signal_flip = !self.signal_flip;
        let (text, damage) = if self.signal_flip { ("❤️", 10) } else { ("💔", 20) };
        fire(ctx, from, angle, speed, damage, color, Some(text));
    }

    fn teleport(&self, motor: &mut Motor, to: Vec2, ctx: &mut SimContext) {
        let puff = Spray::new(20).speed(50.0, 150.0).life(0.5, 1.0).size(4.0, 8.0).weightless();
        ctx.spray(motor.pos, puff, &[self.archetype.color()]);
        motor.pos = to;
        motor.vel = Vec2::ZERO;
        ctx.spray(motor.pos, puff, &[self.archetype.color()]);
    }
}

fn fire(ctx: &mut SimContext, from: Vec2, angle: f32, speed: f32, damage: i32, color: Color, label: Option<&str>) {
    let vel = polar_to_cartesian(speed, angle);
    ctx.spawn_projectile(Projectile::enemy(from, vel, damage, color, label));
}

fn radial(ctx: &mut SimContext, from: Vec2, count: usize, speed: f32, damage: i32, color: Color, label: Option<&str>) {
    for i in 0..count {
        fire(ctx, from, i as f32 / count as f32 * TAU, speed, damage, color, label);
    }
}

/// Strafe perpendicular to the line toward the target
fn sidestep(motor: &mut Motor, aim: f32) {
    let perp = polar_to_cartesian(1.0, aim + std::f32::consts::FRAC_PI_2);
    motor.vel = perp * motor.effective_speed();
}

fn traps(ctx: &mut SimContext, around: Vec2, count: usize, spread: f32) {
    for _ in 0..count {
        let at = around + Vec2::new(ctx.between(-spread, spread), ctx.between(-spread, spread));
        ctx.spawn_effect(at, 10.0, palette::HOT_PINK, EffectKind::Trap { damage: 20 });
    }
}

fn slow_player(player: &mut Player, ctx: &mut SimContext, key: ModifierKey, factor: f32, duration: f32) {
    let target = Target::Player(player.id);
    if ctx.schedule.extend_or_insert(ctx.time, duration, target, Action::EndModifier(key)) {
        player.modifiers.insert(key, &[(Stat::Speed, factor)]);
    }
}

fn confuse_player(player: &mut Player, ctx: &mut SimContext, duration: f32) {
    let target = Target::Player(player.id);
    if ctx.schedule.extend_or_insert(ctx.time, duration, target, Action::EndConfusion) {
        player.confused = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boss_levels_map_to_archetypes() {
        assert_eq!(Archetype::for_level(5), Archetype::Toxic);
        assert_eq!(Archetype::for_level(10), Archetype::Clingy);
        assert_eq!(Archetype::for_level(15), Archetype::Ghosting);
        assert_eq!(Archetype::for_level(20), Archetype::CommitmentPhobe);
        assert_eq!(Archetype::for_level(25), Archetype::Narcissist);
    }

    #[test]
    fn test_every_archetype_has_three_of_each() {
        for a in Archetype::ALL {
            assert_eq!(a.patterns().len(), 3);
            assert_eq!(a.abilities().len(), 3);
            assert_eq!(a.dialogue().len(), 3);
        }
    }

    #[test]
    fn test_phase_crossing_fires_once() {
        let mut boss = Boss::new(Archetype::Toxic);
        assert!(boss.advance_phase(0.67).is_empty());
        assert_eq!(boss.advance_phase(0.65).collect::<Vec<_>>(), vec![2]);
        assert!(boss.advance_phase(0.65).is_empty());
        assert!(boss.advance_phase(0.70).is_empty());
        assert_eq!(boss.phase(), 2);
    }

    #[test]
    fn test_big_hit_enters_each_phase_in_order() {
        let mut boss = Boss::new(Archetype::Clingy);
        assert_eq!(boss.advance_phase(0.1).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(boss.phase(), 3);
    }

    #[test]
    fn test_pattern_rotates_every_five_seconds() {
        let mut ctx = SimContext::new(9, Vec2::new(800.0, 600.0));
        let mut player = Player::new(1, Vec2::new(400.0, 300.0));
        let mut motor = Motor::new(Vec2::new(100.0, 100.0), 100.0);
        let mut boss = Boss::new(Archetype::Narcissist);
        assert_eq!(boss.pattern(), Pattern::SelfCentered);
        for _ in 0..310 {
            ctx.time += 1.0 / 60.0;
            boss.update(1.0 / 60.0, 2, &mut motor, &mut player, &mut ctx);
        }
        assert_eq!(boss.pattern(), Pattern::SpotlightSteal);
    }

    #[test]
    fn test_mirror_shield_is_scheduled() {
        let mut ctx = SimContext::new(9, Vec2::new(800.0, 600.0));
        let mut player = Player::new(1, Vec2::new(400.0, 300.0));
        let mut motor = Motor::new(Vec2::new(100.0, 100.0), 100.0);
        let mut boss = Boss::new(Archetype::Narcissist);
        boss.use_ability(BossAbility::MirrorShield, 7, &mut motor, &mut player, &mut ctx);
        assert!(boss.mirror_shield());
        assert!(ctx.schedule.is_pending(Target::Enemy(7), Action::EndMirrorShield));
    }

    #[test]
    fn test_guilt_trip_refreshes_instead_of_stacking() {
        let mut ctx = SimContext::new(9, Vec2::new(800.0, 600.0));
        let mut player = Player::new(1, Vec2::new(400.0, 300.0));
        let mut motor = Motor::new(Vec2::new(100.0, 100.0), 100.0);
        let mut boss = Boss::new(Archetype::Toxic);
        boss.use_ability(BossAbility::GuiltTrip, 7, &mut motor, &mut player, &mut ctx);
        boss.use_ability(BossAbility::GuiltTrip, 7, &mut motor, &mut player, &mut ctx);
        assert!((player.modifiers.factor(Stat::Speed) - 0.5).abs() < 1e-6);
        assert_eq!(ctx.schedule.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_phase_is_monotonic(healths in prop::collection::vec(0.0f32..1.0, 1..50)) {
            let mut boss = Boss::new(Archetype::Ghosting);
            let mut last = boss.phase();
            for h in healths {
                let _ = boss.advance_phase(h);
                prop_assert!(boss.phase() >= last);
                last = boss.phase();
            }
        }
    }
}
