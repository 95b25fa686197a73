//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input (key codes, pointer, virtual joystick) → `TickInput`
//! - Wall-clock time

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::tick::TickInput;

/// Key codes (`KeyboardEvent.code`) the game listens to
pub const GAME_KEYS: [&str; 14] = [
    "ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight", "KeyW", "KeyA", "KeyS", "KeyD", "Space", "KeyQ", "KeyE",
    "Digit1", "Digit2", "Escape",
];

/// Held keys plus pointer state, sampled once per frame
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<String>,
    /// Keys pressed since the last `take_input`
    pressed: HashSet<String>,
    pub pointer_down: bool,
    /// Virtual joystick deflection (-1..1 per axis)
    pub joystick: Vec2,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, code: &str) {
        if self.held.insert(code.to_owned()) {
            self.pressed.insert(code.to_owned());
        }
    }

    pub fn key_up(&mut self, code: &str) {
        self.held.remove(code);
    }

    pub fn is_held(&self, code: &str) -> bool {
        self.held.contains(code)
    }

    /// Drop everything (focus lost)
    pub fn clear(&mut self) {
        self.held.clear();
        self.pressed.clear();
        self.pointer_down = false;
        self.joystick = Vec2::ZERO;
    }

    fn any_held(&self, codes: &[&str]) -> bool {
        codes.iter().any(|c| self.held.contains(*c))
    }

    fn any_pressed(&self, codes: &[&str]) -> bool {
        codes.iter().any(|c| self.pressed.contains(*c))
    }

    /// Movement direction, at most unit length
    pub fn movement(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.any_held(&["ArrowLeft", "KeyA"]) {
            dir.x -= 1.0;
        }
        if self.any_held(&["ArrowRight", "KeyD"]) {
            dir.x += 1.0;
        }
        if self.any_held(&["ArrowUp", "KeyW"]) {
            dir.y -= 1.0;
        }
        if self.any_held(&["ArrowDown", "KeyS"]) {
            dir.y += 1.0;
        }
        dir += self.joystick;
        if dir.length() > 1.0 { dir.normalize() } else { dir }
    }

    /// Build this frame's input; one-shot presses are consumed
    pub fn take_input(&mut self) -> TickInput {
        let input = TickInput {
            movement: self.movement(),
            attack: self.is_held("Space") || self.pointer_down,
            glow_up: self.any_held(&["KeyQ", "Digit1"]),
            call_bestie: self.any_held(&["KeyE", "Digit2"]),
            pause: self.any_pressed(&["Escape", "KeyP"]),
        };
        self.pressed.clear();
        input
    }
}

/// Monotonic wall clock in milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// `performance.now()`
#[cfg(target_arch = "wasm32")]
pub struct BrowserClock {
    performance: web_sys::Performance,
}

#[cfg(target_arch = "wasm32")]
impl BrowserClock {
    pub fn new() -> Result<Self, crate::error::SetupError> {
        let performance = web_sys::window()
            .and_then(|w| w.performance())
            .ok_or_else(|| crate::error::SetupError::ClockUnavailable("window.performance missing".into()))?;
        Ok(Self { performance })
    }
}

#[cfg(target_arch = "wasm32")]
impl Clock for BrowserClock {
    fn now_ms(&self) -> f64 {
        self.performance.now()
    }
}

/// `std::time::Instant` based clock
#[cfg(not(target_arch = "wasm32"))]
pub struct SystemClock {
    start: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// Unix time in milliseconds, for score timestamps
pub fn unix_time_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_is_normalized() {
        let mut keys = KeyboardState::new();
        keys.key_down("KeyW");
        keys.key_down("KeyD");
        let m = keys.movement();
        assert!((m.length() - 1.0).abs() < 1e-5);
        assert!(m.x > 0.0 && m.y < 0.0);
    }

    #[test]
    fn test_pause_is_one_shot() {
        let mut keys = KeyboardState::new();
        keys.key_down("Escape");
        assert!(keys.take_input().pause);
        assert!(!keys.take_input().pause);
        keys.key_up("Escape");
        keys.key_down("Escape");
        assert!(keys.take_input().pause);
    }

    #[test]
    fn test_attack_from_space_or_pointer() {
        let mut keys = KeyboardState::new();
        assert!(!keys.take_input().attack);
        keys.pointer_down = true;
        assert!(keys.take_input().attack);
        keys.clear();
        keys.key_down("Space");
        let input = keys.take_input();
        assert!(input.attack);
        assert!(!input.glow_up);
    }
}
