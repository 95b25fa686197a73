//! Ex Battle - A top-down arcade brawler against waves of bad dates
//!
//! Core modules:
//! - `sim`: Simulation core (entities, AI state machines, world step)
//! - `renderer`: 2D immediate-mode drawing (Canvas2D on the web)
//! - `game`: Wall-clock loop host that drives `sim` and feeds collaborators
//! - `audio`, `hud`, `platform`, `persistence`: Thin collaborator shims
//! - `settings`, `highscores`, `achievements`: Persisted player data

pub mod achievements;
pub mod audio;
pub mod color;
pub mod error;
pub mod game;
pub mod highscores;
pub mod hud;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use achievements::Achievements;
pub use color::Color;
pub use error::{AudioError, EntityFault, SetupError, StoreError};
pub use game::Game;
pub use highscores::HighScores;
pub use settings::{Difficulty, Settings};

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Largest simulation delta a single frame may use (spiral-of-death guard)
    pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;
    /// Reference frame rate that per-frame factors are tuned against
    pub const REFERENCE_FPS: f32 = 60.0;

    /// Default logical playfield size (the canvas may override it)
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 720.0;

    /// Level pacing
    pub const ENEMIES_PER_LEVEL: u32 = 10;
    pub const BASE_SPAWN_INTERVAL: f32 = 2.0;
    pub const DIFFICULTY_MULTIPLIER: f32 = 1.2;
    /// Enemies appear this far outside the visible edge
    pub const SPAWN_MARGIN: f32 = 100.0;
    /// Chance that a killed enemy drops a power-up
    pub const POWERUP_DROP_CHANCE: f32 = 0.1;

    /// A boss guards every level that is a multiple of this
    pub const BOSS_LEVEL_INTERVAL: u32 = 5;
    /// Beating this level's boss wins the run
    pub const FINAL_LEVEL: u32 = 25;

    /// Projectiles further than this outside the playfield are culled
    pub const OUT_OF_BOUNDS_MARGIN: f32 = 100.0;
    /// Player wraps to the opposite edge past this margin
    pub const WRAP_MARGIN: f32 = 50.0;

    /// Camera follow rate (lerp factor per second)
    pub const CAMERA_FOLLOW_RATE: f32 = 2.0;
    /// Camera shake decay (intensity units per second)
    pub const SHAKE_DECAY: f32 = 5.0;
    /// Render-time shake amplitude in pixels per unit of intensity
    pub const SHAKE_PIXELS: f32 = 10.0;

    /// Background scroll speed (px/s) and wrap length
    pub const BACKGROUND_SPEED: f32 = 50.0;
    pub const BACKGROUND_WRAP: f32 = 100.0;

    /// Upper bound on live particles
    pub const MAX_PARTICLES: usize = 2000;
}

/// Angle (radians) of the direction from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Linear interpolation
#[inline]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// Clamp `value` into `[min, max]`
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// True when two circles overlap (touching edges do not count)
#[inline]
pub fn circle_collision(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) < r * r
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Scale a per-frame multiplicative factor (tuned at 60 Hz) to an arbitrary delta
#[inline]
pub fn frame_damping(factor: f32, dt: f32) -> f32 {
    factor.powf(dt * consts::REFERENCE_FPS)
}

/// Probability that a per-frame chance `p` fires at least once within `dt`
#[inline]
pub fn per_frame_chance(p: f32, dt: f32) -> f32 {
    1.0 - (1.0 - p.clamp(0.0, 1.0)).powf(dt * consts::REFERENCE_FPS)
}

/// Uniform float in `[min, max)`; returns `min` for an empty range instead of panicking
#[inline]
pub fn rand_between<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}
