//! Visual-only particles
//!
//! Particles never affect gameplay. Everything is expressed in seconds: velocity
//! in px/s, gravity in px/s², friction as a per-60Hz-frame factor.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use crate::color::{Color, palette};
use crate::{frame_damping, polar_to_cartesian, rand_between};

/// Default downward pull (px/s²)
pub const DEFAULT_GRAVITY: f32 = 360.0;
/// Default velocity retention per reference frame
pub const DEFAULT_FRICTION: f32 = 0.98;

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub gravity: f32,
    pub friction: f32,
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
    pub color: Color,
    pub size: f32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, life: f32, color: Color, size: f32) -> Self {
        Self {
            pos,
            vel,
            gravity: DEFAULT_GRAVITY,
            friction: DEFAULT_FRICTION,
            life,
            max_life: life.max(f32::EPSILON),
            color,
            size,
        }
    }

    /// Advance one step; returns false once expired
    pub fn update(&mut self, dt: f32) -> bool {
        self.pos += self.vel * dt;
        self.vel.y += self.gravity * dt;
        self.vel *= frame_damping(self.friction, dt);
        self.life -= dt;
        self.life > 0.0
    }

    /// Remaining life fraction in [0, 1]
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Where a spray places its particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layout {
    /// Random directions from the origin, positions jittered by up to `jitter` px
    Scatter { jitter: f32 },
    /// Evenly spaced on a circle, moving outward
    Ring { radius: f32 },
    /// A fan of `count` particles centred on `facing`, `step` radians apart
    Fan { radius: f32, facing: f32, step: f32 },
}

/// Recipe for a burst of particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spray {
    pub count: usize,
    pub speed: (f32, f32),
    pub life: (f32, f32),
    pub size: (f32, f32),
    pub gravity: f32,
    pub layout: Layout,
}

impl Spray {
    pub const fn new(count: usize) -> Self {
        Self {
            count,
            speed: (100.0, 100.0),
            life: (0.5, 0.5),
            size: (3.0, 3.0),
            gravity: DEFAULT_GRAVITY,
            layout: Layout::Scatter { jitter: 0.0 },
        }
    }

    pub const fn speed(mut self, min: f32, max: f32) -> Self {
        self.speed = (min, max);
        self
    }

    pub const fn life(mut self, min: f32, max: f32) -> Self {
        self.life = (min, max);
        self
    }

    pub const fn size(mut self, min: f32, max: f32) -> Self {
        self.size = (min, max);
        self
    }

    pub const fn jitter(mut self, jitter: f32) -> Self {
        self.layout = Layout::Scatter { jitter };
        self
    }

    pub const fn ring(mut self, radius: f32) -> Self {
        self.layout = Layout::Ring { radius };
        self
    }

    pub const fn fan(mut self, radius: f32, facing: f32, step: f32) -> Self {
        self.layout = Layout::Fan { radius, facing, step };
        self
    }

    pub const fn weightless(mut self) -> Self {
        self.gravity = 0.0;
        self
    }

    /// Emit into `out`, never growing it past `cap`
    pub fn emit<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        origin: Vec2,
        colors: &[Color],
        out: &mut Vec<Particle>,
        cap: usize,
    ) {
        for i in 0..self.count {
            if out.len() >= cap {
                return;
            }
            let (offset, angle) = match self.layout {
                Layout::Scatter { jitter } => {
                    let offset = Vec2::new(
                        rand_between(rng, -jitter, jitter),
                        rand_between(rng, -jitter, jitter),
                    );
                    (offset, rng.random::<f32>() * TAU)
                }
                Layout::Ring { radius } => {
                    let angle = i as f32 / self.count as f32 * TAU;
                    (polar_to_cartesian(radius, angle), angle)
                }
                Layout::Fan { radius, facing, step } => {
                    let center = (self.count as f32 - 1.0) / 2.0;
                    let angle = facing + (i as f32 - center) * step;
                    (polar_to_cartesian(radius, angle), angle)
                }
            };
            let speed = rand_between(rng, self.speed.0, self.speed.1);
            let color = match colors.len() {
                0 => palette::WHITE,
                1 => colors[0],
                n => colors[rng.random_range(0..n)],
            };
            let mut particle = Particle::new(
                origin + offset,
                polar_to_cartesian(speed, angle),
                rand_between(rng, self.life.0, self.life.1),
                color,
                rand_between(rng, self.size.0, self.size.1),
            );
            particle.gravity = self.gravity;
            out.push(particle);
        }
    }
}
