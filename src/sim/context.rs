//! Shared per-step services handed to every entity update
//!
//! Entities never hold references to the world. Anything they want to create
//! (projectiles, effects, drops) or announce (sounds, events, shake) goes
//! through this context and is merged by the world after the update pass.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::camera::Camera;
use super::effect::{Effect, EffectKind};
use super::events::{GameEvent, SoundCue};
use super::particle::{Particle, Spray};
use super::powerup::{Powerup, PowerupKind};
use super::projectile::Projectile;
use super::schedule::Schedule;
use crate::color::{Color, palette};
use crate::consts::*;
use crate::{per_frame_chance, rand_between};

/// Default power-up attraction radius
pub const DEFAULT_MAGNET_RANGE: f32 = 60.0;

/// Objects created during an update pass, merged into the world afterwards
#[derive(Debug, Default)]
pub struct Spawned {
    pub projectiles: Vec<Projectile>,
    pub effects: Vec<Effect>,
    pub powerups: Vec<Powerup>,
}

impl Spawned {
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty() && self.effects.is_empty() && self.powerups.is_empty()
    }
}

/// Services shared by every update within a step
#[derive(Debug)]
pub struct SimContext {
    /// Simulation clock (seconds, only advances while playing)
    pub time: f32,
    pub viewport: Vec2,
    pub rng: Pcg32,
    pub particles: Vec<Particle>,
    pub spawned: Spawned,
    pub camera: Camera,
    pub schedule: Schedule,
    /// Drained by the host after each frame
    pub events: Vec<GameEvent>,
    /// Drained by the host after each frame
    pub sounds: Vec<SoundCue>,
    pub score: u64,
    /// Radius within which power-ups drift toward the player
    pub magnet_range: f32,
    /// Live particle cap (the settings may lower it)
    pub particle_budget: usize,
    next_id: u32,
}

impl SimContext {
    pub fn new(seed: u64, viewport: Vec2) -> Self {
        Self {
            time: 0.0,
            viewport,
            rng: Pcg32::seed_from_u64(seed),
            particles: Vec::new(),
            spawned: Spawned::default(),
            camera: Camera::default(),
            schedule: Schedule::new(),
            events: Vec::new(),
            sounds: Vec::new(),
            score: 0,
            magnet_range: DEFAULT_MAGNET_RANGE,
            particle_budget: MAX_PARTICLES,
            next_id: 1,
        }
    }

    /// Allocate a fresh entity id
    pub fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    /// Uniform float in [0, 1)
    pub fn random(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    pub fn between(&mut self, min: f32, max: f32) -> f32 {
        rand_between(&mut self.rng, min, max)
    }

    /// Roll a chance tuned as "p per 60 Hz frame" over `dt` seconds
    pub fn chance_per_frame(&mut self, p: f32, dt: f32) -> bool {
        let p = per_frame_chance(p, dt);
        self.random() < p
    }

    pub fn spray(&mut self, at: Vec2, spray: Spray, colors: &[Color]) {
        spray.emit(&mut self.rng, at, colors, &mut self.particles, self.particle_budget);
    }

    /// Speech bubble above an entity
    pub fn say(&mut self, pos: Vec2, text: impl Into<String>) {
        let at = Vec2::new(pos.x, pos.y - 40.0);
        self.spawn_effect(at, 2.0, palette::WHITE, EffectKind::FloatingText {
            text: text.into(),
            rise: 20.0,
            bubble: true,
        });
    }

    /// Floating label (score pops, power-up names)
    pub fn label(&mut self, pos: Vec2, text: impl Into<String>, color: Color) {
        let at = Vec2::new(pos.x, pos.y - 30.0);
        self.spawn_effect(at, 2.0, color, EffectKind::FloatingText {
            text: text.into(),
            rise: 50.0,
            bubble: false,
        });
    }

    pub fn shake(&mut self, intensity: f32) {
        self.camera.add_shake(intensity);
    }

    pub fn sound(&mut self, cue: SoundCue) {
        self.sounds.push(cue);
    }

    pub fn event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn spawn_projectile(&mut self, mut projectile: Projectile) {
        projectile.id = self.next_id();
        self.spawned.projectiles.push(projectile);
    }

    pub fn spawn_effect(&mut self, pos: Vec2, life: f32, color: Color, kind: EffectKind) {
        let id = self.next_id();
        self.spawned.effects.push(Effect::new(id, pos, life, color, kind));
    }

    pub fn spawn_powerup(&mut self, pos: Vec2, kind: PowerupKind) {
        let id = self.next_id();
        self.spawned.powerups.push(Powerup::new(id, pos, kind));
    }

    /// Whether `pos` is further than `margin` outside the viewport
    pub fn is_out_of_bounds(&self, pos: Vec2, margin: f32) -> bool {
        pos.x < -margin
            || pos.x > self.viewport.x + margin
            || pos.y < -margin
            || pos.y > self.viewport.y + margin
    }

    pub fn center(&self) -> Vec2 {
        self.viewport / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let mut ctx = SimContext::new(1, Vec2::new(800.0, 600.0));
        let a = ctx.next_id();
        let b = ctx.next_id();
        assert_ne!(a, b);
        assert_ne!(a, 0);
    }

    #[test]
    fn test_out_of_bounds_margin() {
        let ctx = SimContext::new(1, Vec2::new(800.0, 600.0));
        assert!(!ctx.is_out_of_bounds(Vec2::new(-99.0, 300.0), 100.0));
        assert!(ctx.is_out_of_bounds(Vec2::new(-101.0, 300.0), 100.0));
        assert!(ctx.is_out_of_bounds(Vec2::new(400.0, 701.0), 100.0));
    }

    #[test]
    fn test_particle_budget_is_respected() {
        let mut ctx = SimContext::new(3, Vec2::new(800.0, 600.0));
        ctx.particle_budget = 5;
        ctx.spray(Vec2::ZERO, Spray::new(20), &[palette::PINK]);
        assert_eq!(ctx.particles.len(), 5);
    }

    #[test]
    fn test_say_queues_bubble() {
        let mut ctx = SimContext::new(3, Vec2::new(800.0, 600.0));
        ctx.say(Vec2::new(100.0, 100.0), "hey");
        assert_eq!(ctx.spawned.effects.len(), 1);
        assert_eq!(ctx.spawned.effects[0].pos, Vec2::new(100.0, 60.0));
    }
}
