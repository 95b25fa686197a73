//! Transient world effects
//!
//! One homogeneous list covers everything short-lived that is neither a
//! projectile nor a pickup: floating text, the bestie helper, the red-flag
//! damage aura and boss trap pickups.

use glam::Vec2;

use super::collision::{in_range, overlaps};
use super::context::SimContext;
use super::enemy::Enemy;
use super::entity::{Entity, nearest};
use super::particle::Spray;
use super::player::Player;
use crate::color::Color;

/// Bestie chase speed (px/s)
pub const BESTIE_SPEED: f32 = 200.0;
pub const BESTIE_RADIUS: f32 = 15.0;
/// Distance at which the bestie stops closing in
pub const BESTIE_REACH: f32 = 30.0;
pub const BESTIE_HIT_RANGE: f32 = 40.0;
pub const BESTIE_DAMAGE: f32 = 30.0;
/// Minimum seconds between bestie hits
pub const BESTIE_HIT_INTERVAL: f32 = 0.5;
pub const TRAP_RADIUS: f32 = 15.0;

#[derive(Debug, Clone, PartialEq)]
pub enum EffectKind {
    /// Rising text; `bubble` draws it in a speech bubble
    FloatingText { text: String, rise: f32, bubble: bool },
    /// Ally that hunts the nearest enemy
    Bestie { hit_cooldown: f32 },
    /// Ring around the player that periodically damages enemies inside it
    DamageAura {
        range: f32,
        damage: f32,
        interval: f32,
        /// Seconds until the next damage tick
        next_tick: f32,
    },
    /// Fake heart pickup that hurts the player on contact
    Trap { damage: i32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
    pub color: Color,
    pub kind: EffectKind,
    finished: bool,
}

impl Effect {
    pub fn new(id: u32, pos: Vec2, life: f32, color: Color, kind: EffectKind) -> Self {
        let radius = match &kind {
            EffectKind::FloatingText { .. } => 0.0,
            EffectKind::Bestie { .. } => BESTIE_RADIUS,
            EffectKind::DamageAura { range, .. } => *range,
            EffectKind::Trap { .. } => TRAP_RADIUS,
        };
        Self {
            id,
            pos,
            radius,
            life,
            max_life: life,
            color,
            kind,
            finished: false,
        }
    }

    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.finished || self.life <= 0.0
    }

    pub fn is_aura(&self) -> bool {
        matches!(self.kind, EffectKind::DamageAura { .. })
    }

    /// Push the end out by `seconds`, keeping the fade proportional
    pub fn extend(&mut self, seconds: f32) {
        self.life += seconds;
        self.max_life += seconds;
    }

    pub fn update(&mut self, dt: f32, player: &mut Player, enemies: &mut [Enemy], ctx: &mut SimContext) {
        if self.is_finished() {
            return;
        }
        self.life -= dt;

        match &mut self.kind {
            EffectKind::FloatingText { rise, .. } => {
                self.pos.y -= *rise * dt;
            }
            EffectKind::Bestie { hit_cooldown } => {
                *hit_cooldown = (*hit_cooldown - dt).max(0.0);
                if let Some((i, dist)) = nearest(enemies, self.pos) {
                    if dist > BESTIE_REACH {
                        let dir = (enemies[i].pos() - self.pos).normalize_or_zero();
                        self.pos += dir * BESTIE_SPEED * dt;
                    }
                }
                if *hit_cooldown <= 0.0 {
                    let targets = in_range(enemies, self.pos, BESTIE_HIT_RANGE);
                    if !targets.is_empty() {
                        *hit_cooldown = BESTIE_HIT_INTERVAL;
                    }
                    for i in targets {
                        let enemy = &mut enemies[i];
                        enemy.take_damage(BESTIE_DAMAGE, ctx);
                        let hit = Spray::new(5).speed(100.0, 100.0).life(0.5, 0.5).size(3.0, 6.0);
                        ctx.spray(enemy.pos(), hit, &[self.color]);
                    }
                }
            }
            EffectKind::DamageAura {
                range,
                damage,
                interval,
                next_tick,
            } => {
                self.pos = player.pos;
                *next_tick -= dt;
                if *next_tick <= 0.0 {
                    *next_tick = *interval;
                    for i in in_range(enemies, self.pos, *range) {
                        enemies[i].take_damage(*damage, ctx);
                    }
                }
            }
            EffectKind::Trap { damage } => {
                if !player.is_dead() && overlaps(player, self.pos, self.radius) {
                    player.take_damage(*damage, ctx);
                    self.finished = true;
                }
            }
        }
    }
}

impl Entity for Effect {
    fn kind(&self) -> &'static str {
        "effect"
    }
    fn id(&self) -> u32 {
        self.id
    }
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn vel(&self) -> Vec2 {
        Vec2::ZERO
    }
    fn radius(&self) -> f32 {
        self.radius
    }
    fn should_remove(&self) -> bool {
        self.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::palette;
    use crate::sim::enemy::Personality;

    fn ctx() -> SimContext {
        SimContext::new(9, Vec2::new(800.0, 600.0))
    }

    fn bestie(pos: Vec2) -> Effect {
        Effect::new(1, pos, 3.0, palette::MINT, EffectKind::Bestie { hit_cooldown: 0.0 })
    }

    #[test]
    fn test_floating_text_rises_and_fades() {
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::ZERO);
        let kind = EffectKind::FloatingText {
            text: "+100".into(),
            rise: 50.0,
            bubble: false,
        };
        let mut text = Effect::new(2, Vec2::new(100.0, 100.0), 2.0, palette::GOLD, kind);
        text.update(1.0, &mut player, &mut [], &mut ctx);
        assert_eq!(text.pos.y, 50.0);
        assert!((text.alpha() - 0.5).abs() < 1e-6);
        text.update(1.0, &mut player, &mut [], &mut ctx);
        assert!(text.should_remove());
    }

    #[test]
    fn test_bestie_chases_nearest_enemy() {
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::ZERO);
        let mut enemies = vec![
            Enemy::with_personality(2, Vec2::new(500.0, 100.0), 1, Personality::Creepy),
            Enemy::with_personality(3, Vec2::new(200.0, 100.0), 1, Personality::Creepy),
        ];
        let mut b = bestie(Vec2::new(100.0, 100.0));
        b.update(0.1, &mut player, &mut enemies, &mut ctx);
        assert!((b.pos.x - 120.0).abs() < 1e-3);
    }

    #[test]
    fn test_bestie_hits_are_rate_limited() {
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::ZERO);
        let at = Vec2::new(300.0, 300.0);
        let mut enemies = vec![Enemy::with_personality(2, at, 5, Personality::Mansplainer)];
        let full = enemies[0].max_health();
        let mut b = bestie(at + Vec2::new(10.0, 0.0));
        for _ in 0..10 {
            b.update(1.0 / 60.0, &mut player, &mut enemies, &mut ctx);
        }
        assert!((full - enemies[0].health() - BESTIE_DAMAGE).abs() < 1e-3 || enemies[0].is_dead());
    }

    #[test]
    fn test_aura_follows_player_and_ticks() {
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::new(400.0, 300.0));
        let mut enemies = vec![Enemy::with_personality(2, Vec2::new(450.0, 300.0), 5, Personality::Mansplainer)];
        let full = enemies[0].max_health();
        let kind = EffectKind::DamageAura {
            range: 80.0,
            damage: 10.0,
            interval: 0.5,
            next_tick: 0.0,
        };
        let mut aura = Effect::new(3, Vec2::ZERO, 20.0, palette::HURT_RED, kind);
        aura.update(0.1, &mut player, &mut enemies, &mut ctx);
        assert_eq!(aura.pos, player.pos);
        assert!(enemies[0].health() < full);
        let after_first = enemies[0].health();
        aura.update(0.1, &mut player, &mut enemies, &mut ctx);
        assert_eq!(enemies[0].health(), after_first);
    }

    #[test]
    fn test_trap_hurts_player_once() {
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::new(200.0, 200.0));
        let mut trap = Effect::new(4, Vec2::new(210.0, 200.0), 10.0, palette::HOT_PINK, EffectKind::Trap { damage: 20 });
        trap.update(0.016, &mut player, &mut [], &mut ctx);
        assert_eq!(player.health(), 80);
        assert!(trap.should_remove());
    }
}
