//! Camera follow/shake and the scrolling background

use glam::Vec2;
use rand::Rng;

use crate::consts::*;

/// World-space camera (top-left corner of the view)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Camera {
    pub pos: Vec2,
    /// Current shake intensity, decays linearly to zero
    pub shake: f32,
}

impl Camera {
    /// Request shake; the strongest outstanding request wins
    pub fn add_shake(&mut self, intensity: f32) {
        self.shake = self.shake.max(intensity);
    }

    /// Decay shake and ease toward centring `target` in the viewport
    pub fn update(&mut self, target: Vec2, viewport: Vec2, dt: f32) {
        if self.shake > 0.0 {
            self.shake = (self.shake - dt * SHAKE_DECAY).max(0.0);
        }
        let goal = target - viewport / 2.0;
        let t = (dt * CAMERA_FOLLOW_RATE).min(1.0);
        self.pos = self.pos.lerp(goal, t);
    }

    /// Cosmetic render offset. Takes its own RNG so it can never perturb the simulation.
    pub fn jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        if self.shake <= 0.0 {
            return Vec2::ZERO;
        }
        let amp = self.shake * SHAKE_PIXELS;
        Vec2::new(
            (rng.random::<f32>() - 0.5) * amp,
            (rng.random::<f32>() - 0.5) * amp,
        )
    }
}

/// Scrolling background pattern
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Background {
    pub offset: f32,
}

impl Background {
    pub fn update(&mut self, dt: f32) {
        self.offset += BACKGROUND_SPEED * dt;
        if self.offset > BACKGROUND_WRAP {
            self.offset = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shake_keeps_max_and_decays() {
        let mut cam = Camera::default();
        cam.add_shake(0.5);
        cam.add_shake(0.3);
        assert_eq!(cam.shake, 0.5);
        cam.update(Vec2::ZERO, Vec2::ZERO, 0.05);
        assert!((cam.shake - 0.25).abs() < 1e-6);
        cam.update(Vec2::ZERO, Vec2::ZERO, 1.0);
        assert_eq!(cam.shake, 0.0);
    }

    #[test]
    fn test_camera_eases_toward_player() {
        let mut cam = Camera::default();
        let viewport = Vec2::new(800.0, 600.0);
        let player = Vec2::new(600.0, 400.0);
        cam.update(player, viewport, 0.1);
        // goal is (200, 100), moved 20% of the way
        assert!((cam.pos - Vec2::new(40.0, 20.0)).length() < 1e-3);
    }

    #[test]
    fn test_background_wraps() {
        let mut bg = Background { offset: 99.0 };
        bg.update(0.1);
        assert_eq!(bg.offset, 0.0);
    }
}
