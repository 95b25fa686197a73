//! Projectiles
//!
//! Straight-line (optionally lobbed) hazards owned by one side. A projectile
//! resolves at most one hit and is gone after it.

use glam::Vec2;

use super::collision::{first_overlap, overlaps};
use super::context::SimContext;
use super::enemy::Enemy;
use super::entity::Entity;
use super::particle::Spray;
use super::player::Player;
use crate::color::Color;
use crate::consts::*;

/// Which side fired it (and therefore which side it can hurt)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Player,
    Enemy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Downward acceleration (px/s²), zero for straight shots
    pub gravity: f32,
    pub damage: f32,
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
    pub radius: f32,
    pub color: Color,
    /// Text drawn in a bubble instead of a dot
    pub label: Option<String>,
    pub owner: Owner,
    done: bool,
}

impl Projectile {
    /// Player shot (id is assigned when spawned through the context)
    pub fn player(pos: Vec2, vel: Vec2, damage: f32, color: Color) -> Self {
        Self {
            id: 0,
            pos,
            vel,
            gravity: 0.0,
            damage,
            life: 2.0,
            max_life: 2.0,
            radius: 4.0,
            color,
            label: None,
            owner: Owner::Player,
            done: false,
        }
    }

    /// Enemy shot; labelled ones are drawn as speech bubbles and are bigger
    pub fn enemy(pos: Vec2, vel: Vec2, damage: i32, color: Color, label: Option<&str>) -> Self {
        Self {
            id: 0,
            pos,
            vel,
            gravity: 0.0,
            damage: damage as f32,
            life: 3.0,
            max_life: 3.0,
            radius: if label.is_some() { 15.0 } else { 6.0 },
            color,
            label: label.map(str::to_owned),
            owner: Owner::Enemy,
            done: false,
        }
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    /// Move, then resolve a single hit against the opposing side
    pub fn update(&mut self, dt: f32, player: &mut Player, enemies: &mut [Enemy], ctx: &mut SimContext) {
        if self.done {
            return;
        }
        self.pos += self.vel * dt;
        self.vel.y += self.gravity * dt;
        self.life -= dt;
        if self.life <= 0.0 {
            self.done = true;
            return;
        }

        let hit = match self.owner {
            Owner::Player => match first_overlap(enemies, self.pos, self.radius) {
                Some(i) => {
                    enemies[i].take_damage(self.damage, ctx);
                    true
                }
                None => false,
            },
            Owner::Enemy => {
                if !player.is_dead() && overlaps(player, self.pos, self.radius) {
                    player.take_damage(self.damage.round() as i32, ctx);
                    true
                } else {
                    false
                }
            }
        };
        if hit {
            self.done = true;
            let burst = Spray::new(5).speed(100.0, 100.0).life(0.5, 0.5).size(2.0, 4.0);
            ctx.spray(self.pos, burst, &[self.color]);
            return;
        }

        if ctx.is_out_of_bounds(self.pos, OUT_OF_BOUNDS_MARGIN) {
            self.done = true;
        }
    }
}

impl Entity for Projectile {
    fn kind(&self) -> &'static str {
        "projectile"
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
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::palette;
    use crate::sim::enemy::Personality;

    fn ctx() -> SimContext {
        SimContext::new(2, Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_hits_only_one_of_two_overlapping_targets() {
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::new(50.0, 50.0));
        let at = Vec2::new(400.0, 300.0);
        let mut enemies = vec![
            Enemy::with_personality(2, at, 1, Personality::Creepy),
            Enemy::with_personality(3, at, 1, Personality::Creepy),
        ];
        let full = enemies[0].max_health();
        let mut shot = Projectile::player(at, Vec2::ZERO, 10.0, palette::MINT);
        shot.update(0.016, &mut player, &mut enemies, &mut ctx);
        shot.update(0.016, &mut player, &mut enemies, &mut ctx);

        let damaged = enemies.iter().filter(|e| e.health() < full).count();
        assert_eq!(damaged, 1);
        assert!(shot.should_remove());
    }

    #[test]
    fn test_enemy_shot_ignores_enemies() {
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::new(50.0, 50.0));
        let at = Vec2::new(400.0, 300.0);
        let mut enemies = vec![Enemy::with_personality(2, at, 1, Personality::Creepy)];
        let full = enemies[0].max_health();
        let mut shot = Projectile::enemy(at, Vec2::ZERO, 10, palette::RED, None);
        shot.update(0.016, &mut player, &mut enemies, &mut ctx);
        assert_eq!(enemies[0].health(), full);
        assert!(!shot.should_remove());
    }

    #[test]
    fn test_enemy_shot_hurts_player_once() {
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::new(400.0, 300.0));
        let mut shot = Projectile::enemy(Vec2::new(400.0, 300.0), Vec2::ZERO, 15, palette::RED, Some("Actually..."));
        assert_eq!(shot.radius, 15.0);
        shot.update(0.016, &mut player, &mut [], &mut ctx);
        assert_eq!(player.health(), 85);
        assert!(shot.should_remove());
    }

    #[test]
    fn test_expires_and_leaves_bounds() {
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::new(400.0, 300.0));
        let mut old = Projectile::player(Vec2::new(100.0, 100.0), Vec2::ZERO, 5.0, palette::MINT);
        old.update(2.5, &mut player, &mut [], &mut ctx);
        assert!(old.should_remove());

        let mut far = Projectile::player(Vec2::new(895.0, 100.0), Vec2::new(400.0, 0.0), 5.0, palette::MINT);
        far.update(0.1, &mut player, &mut [], &mut ctx);
        assert!(far.should_remove());
    }

    #[test]
    fn test_gravity_bends_path() {
        let mut ctx = ctx();
        let mut player = Player::new(1, Vec2::new(0.0, 0.0));
        let mut lob = Projectile::enemy(Vec2::new(400.0, 300.0), Vec2::new(0.0, -100.0), 15, palette::AMBER, None)
            .with_gravity(100.0);
        for _ in 0..60 {
            lob.update(1.0 / 60.0, &mut player, &mut [], &mut ctx);
        }
        assert!(lob.vel.y > -1.0);
    }
}
