//! Per-entity drawing and the frame layout
//!
//! Scene order, back to front: background, power-ups, enemies, player,
//! projectiles, effects, particles. All of it is drawn in world space under
//! the camera transform; the overlay (mode screens, debug counters) is drawn
//! afterwards in screen space.

use glam::Vec2;

use super::{Layer, Surface, TextAlign};
use crate::color::{Color, palette};
use crate::sim::effect::{Effect, EffectKind};
use crate::sim::enemy::{AiState, Enemy};
use crate::sim::particle::Particle;
use crate::sim::player::{Player, PlayerAnim};
use crate::sim::powerup::Powerup;
use crate::sim::projectile::{Owner, Projectile};
use crate::sim::state::{GameMode, World};

/// Background grid spacing
const GRID_SIZE: f32 = 50.0;

/// Something that can put itself on a surface. `time` is the simulation
/// clock, used for cosmetic pulsing.
pub trait Draw {
    fn draw(&self, surface: &mut dyn Surface, time: f32);
}

fn health_bar(surface: &mut dyn Surface, center: Vec2, width: f32, pct: f32, fill: Color) {
    let origin = Vec2::new(center.x - width / 2.0, center.y);
    let size = Vec2::new(width, 4.0);
    surface.fill_rect(origin, size, palette::BLACK);
    surface.fill_rect(origin, Vec2::new(width * pct.clamp(0.0, 1.0), size.y), fill);
}

impl Draw for Player {
    fn draw(&self, surface: &mut dyn Surface, time: f32) {
        surface.save();
        if self.is_blinking() {
            surface.set_alpha(0.5 + 0.5 * (time * 20.0).sin());
        }
        if self.glow_up.is_active() {
            surface.set_glow(palette::SUNSHINE, 20.0);
        }
        surface.translate(self.pos);
        surface.rotate(self.angle);

        let bob = if self.anim == PlayerAnim::Walking {
            (self.walk_cycle * 10.0).sin() * 2.0
        } else {
            0.0
        };
        let body = Vec2::new(0.0, bob);
        surface.fill_circle(body, self.radius, palette::PINK);
        surface.stroke_circle(body, self.radius, palette::WHITE, 2.0);
        surface.fill_circle(body + Vec2::new(-6.0, -5.0), 2.0, palette::WHITE);
        surface.fill_circle(body + Vec2::new(6.0, -5.0), 2.0, palette::WHITE);
        // hair
        surface.fill_circle(body + Vec2::new(0.0, -self.radius * 0.8), self.radius * 0.6, palette::PURPLE);

        if self.anim == PlayerAnim::Attacking {
            let style = self.style();
            surface.set_alpha(0.4);
            surface.stroke_circle(Vec2::ZERO, style.range * (0.5 + self.anim_time.min(0.3)), style.color, 3.0);
        }
        surface.restore();

        if self.shielded {
            surface.save();
            surface.set_alpha(0.3 + 0.2 * (time * 4.0).sin());
            surface.stroke_circle(self.pos, self.radius + 10.0, palette::PURPLE, 3.0);
            surface.restore();
        }
        if self.confused {
            surface.text("💫", self.pos - Vec2::new(0.0, self.radius + 24.0), 16.0, palette::WHITE, TextAlign::Center);
        }
        let bar = self.pos - Vec2::new(0.0, self.radius + 12.0);
        health_bar(surface, bar, 40.0, self.health_pct(), palette::HEALTH_GREEN);
    }
}

impl Draw for Enemy {
    fn draw(&self, surface: &mut dyn Surface, time: f32) {
        let pos = self.pos();
        surface.save();
        if let Some(boss) = self.boss() {
            surface.set_alpha(boss.fade);
            surface.set_glow(boss.archetype.color(), 10.0 + boss.phase() as f32 * 5.0);
        }
        surface.translate(pos);
        surface.rotate(self.motor.facing + self.spin);

        let color = self.color.mix(palette::WHITE, self.hit_flash);
        surface.fill_circle(Vec2::ZERO, self.radius, color);
        surface.stroke_circle(Vec2::ZERO, self.radius, palette::BLACK, 2.0);
        let eye = self.radius * 0.3;
        surface.fill_circle(Vec2::new(eye, -eye), eye * 0.4, palette::WHITE);
        surface.fill_circle(Vec2::new(eye, eye), eye * 0.4, palette::WHITE);
        surface.restore();

        if let Some(boss) = self.boss() {
            if boss.mirror_shield() {
                surface.save();
                surface.set_alpha(0.4 + 0.2 * (time * 6.0).sin());
                surface.stroke_circle(pos, self.radius + 8.0, palette::SKY, 4.0);
                surface.restore();
            }
            let label = pos - Vec2::new(0.0, self.radius + 28.0);
            surface.text(boss.archetype.name(), label, 16.0, palette::WHITE, TextAlign::Center);
            let bar = pos - Vec2::new(0.0, self.radius + 16.0);
            health_bar(surface, bar, self.radius * 2.5, self.health_pct(), boss.archetype.color());
            return;
        }

        match self.state {
            AiState::Stunned { .. } => {
                surface.text("💫", pos - Vec2::new(0.0, self.radius + 8.0), 14.0, palette::WHITE, TextAlign::Center);
            }
            AiState::Fleeing { .. } => {
                surface.text("💦", pos - Vec2::new(0.0, self.radius + 8.0), 14.0, palette::WHITE, TextAlign::Center);
            }
            _ => {}
        }
        if self.health_pct() < 1.0 {
            let bar = pos - Vec2::new(0.0, self.radius + 10.0);
            health_bar(surface, bar, self.radius * 2.0, self.health_pct(), palette::HURT_RED);
        }
    }
}

impl Draw for Projectile {
    fn draw(&self, surface: &mut dyn Surface, _time: f32) {
        let alpha = if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            1.0
        };
        surface.save();
        surface.set_alpha(alpha);

        if let Some(label) = &self.label {
            surface.fill_circle(self.pos, self.radius + 6.0, palette::WHITE);
            surface.text(label, self.pos, 12.0, self.color, TextAlign::Center);
            surface.restore();
            return;
        }

        surface.set_glow(self.color, 10.0);
        surface.fill_circle(self.pos, self.radius, self.color);
        // trail
        surface.set_alpha(alpha * 0.5);
        surface.fill_circle(self.pos - self.vel * 0.01, self.radius * 0.7, self.color);
        if self.owner == Owner::Enemy {
            surface.stroke_circle(self.pos, self.radius, palette::BLACK, 1.0);
        }
        surface.restore();
    }
}

impl Draw for Powerup {
    fn draw(&self, surface: &mut dyn Surface, _time: f32) {
        if self.is_collected() || self.blink_hidden() {
            return;
        }
        let info = self.kind.info();
        let bob = (self.anim_time * 3.0).sin() * 4.0;
        let at = self.pos + Vec2::new(0.0, bob);
        let pulse = 1.0 + (self.anim_time * 5.0).sin() * 0.1;

        surface.save();
        surface.set_glow(info.color, 15.0);
        surface.fill_circle(at, self.radius * pulse, info.color);
        surface.stroke_circle(at, self.radius * pulse, palette::WHITE, 2.0);
        surface.restore();
        surface.text(info.icon, at, self.radius, palette::WHITE, TextAlign::Center);
    }
}

impl Draw for Effect {
    fn draw(&self, surface: &mut dyn Surface, time: f32) {
        surface.save();
        match &self.kind {
            EffectKind::FloatingText { text, bubble, .. } => {
                surface.set_alpha(self.alpha());
                if *bubble {
                    let width = text.chars().count() as f32 * 7.0 + 16.0;
                    let origin = self.pos - Vec2::new(width / 2.0, 12.0);
                    surface.fill_rect(origin, Vec2::new(width, 22.0), palette::WHITE);
                    surface.stroke_rect(origin, Vec2::new(width, 22.0), palette::BLACK, 1.0);
                    surface.text(text, self.pos, 12.0, palette::BLACK, TextAlign::Center);
                } else {
                    surface.text(text, self.pos, 18.0, self.color, TextAlign::Center);
                }
            }
            EffectKind::Bestie { .. } => {
                surface.set_glow(self.color, 12.0);
                surface.fill_circle(self.pos, self.radius, self.color);
                surface.stroke_circle(self.pos, self.radius, palette::WHITE, 2.0);
                surface.text("👯", self.pos, 14.0, palette::WHITE, TextAlign::Center);
            }
            EffectKind::DamageAura { range, .. } => {
                surface.set_alpha(0.25 + 0.15 * (time * 8.0).sin());
                surface.stroke_circle(self.pos, *range, self.color, 3.0);
                surface.set_alpha(0.08);
                surface.fill_circle(self.pos, *range, self.color);
            }
            EffectKind::Trap { .. } => {
                let pulse = 1.0 + (time * 6.0).sin() * 0.1;
                surface.set_glow(self.color, 10.0);
                surface.fill_circle(self.pos, self.radius * pulse, self.color);
                surface.text("💔", self.pos, self.radius, palette::WHITE, TextAlign::Center);
            }
        }
        surface.restore();
    }
}

impl Draw for Particle {
    fn draw(&self, surface: &mut dyn Surface, _time: f32) {
        let alpha = self.alpha();
        if alpha <= 0.0 {
            return;
        }
        surface.save();
        surface.set_alpha(alpha);
        surface.fill_circle(self.pos, self.size * alpha.max(0.2), self.color);
        surface.restore();
    }
}

/// Animated gradient plus a drifting grid, covering the camera's view
fn draw_background(world: &World, surface: &mut dyn Surface) {
    let camera = world.ctx.camera.pos;
    let view = surface.size();
    let offset = world.background.offset / 100.0;
    let stops = [
        (0.0, Color::from_hsl(280.0 + offset * 20.0, 0.7, 0.3)),
        (0.5, Color::from_hsl(200.0 + offset * 30.0, 0.8, 0.4)),
        (1.0, Color::from_hsl(160.0 + offset * 25.0, 0.9, 0.45)),
    ];
    surface.fill_gradient(camera - Vec2::splat(100.0), view + Vec2::splat(200.0), &stops);

    surface.save();
    surface.set_alpha(0.1);
    let shift = Vec2::new(
        (camera.x + world.background.offset).rem_euclid(GRID_SIZE),
        (camera.y + world.background.offset * 0.7).rem_euclid(GRID_SIZE),
    );
    let mut x = -GRID_SIZE;
    while x < view.x + GRID_SIZE {
        let gx = camera.x + x - shift.x;
        surface.line(Vec2::new(gx, camera.y), Vec2::new(gx, camera.y + view.y), palette::WHITE, 1.0);
        x += GRID_SIZE;
    }
    let mut y = -GRID_SIZE;
    while y < view.y + GRID_SIZE {
        let gy = camera.y + y - shift.y;
        surface.line(Vec2::new(camera.x, gy), Vec2::new(camera.x + view.x, gy), palette::WHITE, 1.0);
        y += GRID_SIZE;
    }
    surface.restore();
}

/// Draw every live entity in the fixed back-to-front order.
/// `jitter` is the cosmetic shake offset for this frame.
pub fn draw_scene(world: &World, surface: &mut dyn Surface, jitter: Vec2) {
    let time = world.ctx.time;
    surface.clear();
    surface.save();
    surface.translate(jitter - world.ctx.camera.pos);

    surface.layer(Layer::Background);
    draw_background(world, surface);

    surface.layer(Layer::Powerups);
    for p in world.powerups.iter().filter(|p| !p.is_collected() && !p.is_expired()) {
        p.draw(surface, time);
    }
    surface.layer(Layer::Enemies);
    for e in world.enemies.iter().filter(|e| !e.is_dead()) {
        e.draw(surface, time);
    }
    surface.layer(Layer::Player);
    if !world.player.is_dead() {
        world.player.draw(surface, time);
    }
    surface.layer(Layer::Projectiles);
    for p in &world.projectiles {
        p.draw(surface, time);
    }
    surface.layer(Layer::Effects);
    for e in world.effects.iter().filter(|e| !e.is_finished()) {
        e.draw(surface, time);
    }
    surface.layer(Layer::Particles);
    for p in &world.ctx.particles {
        p.draw(surface, time);
    }
    surface.restore();
}

fn dim(surface: &mut dyn Surface, alpha: f32) {
    surface.save();
    surface.set_alpha(alpha);
    surface.fill_rect(Vec2::ZERO, surface.size(), palette::BLACK);
    surface.restore();
}

/// Mode screens and debug counters, in screen space
pub fn draw_overlay(world: &World, surface: &mut dyn Surface, fps: Option<f32>) {
    surface.layer(Layer::Overlay);
    let center = surface.size() / 2.0;
    let line = |n: f32| center + Vec2::new(0.0, n * 36.0);

    match &world.mode {
        GameMode::Playing => {}
        GameMode::Menu => {
            dim(surface, 0.6);
            surface.text("Ex Battle", line(-1.0), 48.0, palette::PINK, TextAlign::Center);
            surface.text("Press Enter to start", line(1.0), 20.0, palette::WHITE, TextAlign::Center);
        }
        GameMode::Paused => {
            dim(surface, 0.5);
            surface.text("Paused", line(0.0), 40.0, palette::WHITE, TextAlign::Center);
            surface.text("Esc to resume", line(1.0), 18.0, palette::WHITE, TextAlign::Center);
        }
        GameMode::PowerupSelect { options } => {
            dim(surface, 0.6);
            let title = format!("Level {} - choose a reward", world.level);
            surface.text(&title, line(-2.0), 28.0, palette::SUNSHINE, TextAlign::Center);
            for (i, kind) in options.iter().enumerate() {
                let info = kind.info();
                let text = format!("{}  {} {} - {}", i + 1, info.icon, info.name, info.description);
                surface.text(&text, line(i as f32), 18.0, info.color, TextAlign::Center);
            }
        }
        GameMode::BossIntro { archetype } => {
            dim(surface, 0.7);
            surface.text(archetype.name(), line(-1.0), 40.0, archetype.color(), TextAlign::Center);
            surface.text(archetype.story(), line(0.0), 18.0, palette::WHITE, TextAlign::Center);
            surface.text("Press Enter to fight", line(2.0), 18.0, palette::WHITE, TextAlign::Center);
        }
        GameMode::GameOver => {
            dim(surface, 0.7);
            surface.text("Game Over", line(-1.0), 48.0, palette::HURT_RED, TextAlign::Center);
            let text = format!("Score {}  -  Level {}", world.score(), world.level);
            surface.text(&text, line(0.5), 20.0, palette::WHITE, TextAlign::Center);
            surface.text("Press Enter to play again", line(1.5), 18.0, palette::WHITE, TextAlign::Center);
        }
        GameMode::Victory => {
            dim(surface, 0.6);
            surface.text("You're Free!", line(-1.0), 48.0, palette::GOLD, TextAlign::Center);
            let text = format!("Final score {}", world.score());
            surface.text(&text, line(0.5), 20.0, palette::WHITE, TextAlign::Center);
            surface.text("Press Enter to play again", line(1.5), 18.0, palette::WHITE, TextAlign::Center);
        }
    }

    if let Some(fps) = fps {
        surface.save();
        surface.set_alpha(0.7);
        surface.fill_rect(Vec2::new(10.0, 10.0), Vec2::new(180.0, 76.0), palette::BLACK);
        surface.restore();
        let rows = [
            format!("FPS: {:.0}", fps),
            format!("Entities: {}", world.enemies.len() + world.projectiles.len() + world.powerups.len()),
            format!("Particles: {}", world.ctx.particles.len()),
            format!("Level: {}  Score: {}", world.level, world.score()),
        ];
        for (i, row) in rows.iter().enumerate() {
            let at = Vec2::new(16.0, 26.0 + i as f32 * 15.0);
            surface.text(row, at, 12.0, palette::HEALTH_GREEN, TextAlign::Left);
        }
    }
}

/// Whole frame: scene then overlay. Runs every frame whatever the mode.
pub fn draw_frame(world: &World, surface: &mut dyn Surface, jitter: Vec2, fps: Option<f32>) {
    draw_scene(world, surface, jitter);
    draw_overlay(world, surface, fps);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCall, RecordingSurface};
    use crate::sim::powerup::PowerupKind;
    use crate::sim::state::LevelConfig;

    fn world() -> World {
        World::new(9, Vec2::new(800.0, 600.0), LevelConfig::default())
    }

    fn surface() -> RecordingSurface {
        RecordingSurface::new(Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_scene_layers_back_to_front() {
        let w = world();
        let mut s = surface();
        draw_scene(&w, &mut s, Vec2::ZERO);
        assert_eq!(
            s.layers(),
            vec![
                Layer::Background,
                Layer::Powerups,
                Layer::Enemies,
                Layer::Player,
                Layer::Projectiles,
                Layer::Effects,
                Layer::Particles,
            ]
        );
        assert_eq!(s.calls.first(), Some(&DrawCall::Clear));
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn test_each_live_enemy_is_drawn() {
        let mut w = world();
        w.spawn_enemy_at(Vec2::new(100.0, 100.0));
        w.spawn_enemy_at(Vec2::new(300.0, 100.0));
        w.spawn_enemy_at(Vec2::new(500.0, 100.0));
        let mut s = surface();
        draw_scene(&w, &mut s, Vec2::ZERO);
        let bodies = s
            .calls_in(Layer::Enemies)
            .iter()
            .filter(|c| matches!(c, DrawCall::Circle { filled: true, radius, .. } if *radius > 5.0))
            .count();
        assert_eq!(bodies, 3);
    }

    #[test]
    fn test_camera_and_jitter_translate_scene() {
        let mut w = world();
        w.ctx.camera.pos = Vec2::new(10.0, 20.0);
        let mut s = surface();
        draw_scene(&w, &mut s, Vec2::new(1.0, 1.0));
        assert!(s.calls.contains(&DrawCall::Translate(Vec2::new(-9.0, -19.0))));
    }

    #[test]
    fn test_overlay_per_mode() {
        let mut w = world();
        let mut s = surface();
        draw_overlay(&w, &mut s, None);
        assert!(!s.has_text("Paused"));

        w.pause();
        s.reset();
        draw_overlay(&w, &mut s, Some(60.0));
        assert!(s.has_text("Paused"));
        assert!(s.has_text("FPS: 60"));

        w.mode = GameMode::GameOver;
        s.reset();
        draw_overlay(&w, &mut s, None);
        assert!(s.has_text("Game Over"));
        assert!(!s.has_text("FPS"));
    }

    #[test]
    fn test_hidden_blink_powerup_is_skipped() {
        let mut w = world();
        w.ctx.spawn_powerup(Vec2::new(200.0, 200.0), PowerupKind::Health);
        w.flush_spawned();
        w.powerups[0].lifetime = 2.85;
        let mut s = surface();
        draw_scene(&w, &mut s, Vec2::ZERO);
        assert!(s.calls_in(Layer::Powerups).is_empty());
    }
}
