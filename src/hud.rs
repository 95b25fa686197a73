//! HUD collaborator
//!
//! After every frame the host pushes a snapshot of the externally visible
//! numbers plus any notable events. How they are shown is up to the sink.

use crate::sim::events::GameEvent;
use crate::sim::state::{GameMode, World};

/// Numbers the HUD shows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HudSnapshot {
    /// 0.0 - 1.0
    pub health_pct: f32,
    pub score: u64,
    pub level: u32,
    /// 0.0 (just used) - 1.0 (ready)
    pub glow_up_ready: f32,
    pub bestie_ready: f32,
    pub fps: f32,
    /// Enemies + projectiles + power-ups
    pub entities: usize,
    pub particles: usize,
    /// Current boss name and health (0.0 - 1.0)
    pub boss: Option<(&'static str, f32)>,
    pub paused: bool,
}

impl HudSnapshot {
    pub fn capture(world: &World, fps: f32) -> Self {
        let now = world.ctx.time;
        let boss = world
            .boss()
            .and_then(|e| e.boss().map(|b| (b.archetype.name(), e.health_pct())));
        Self {
            health_pct: world.player.health_pct(),
            score: world.score(),
            level: world.level,
            glow_up_ready: world.player.glow_up.readiness(now),
            bestie_ready: world.player.bestie.readiness(now),
            fps,
            entities: world.enemies.len() + world.projectiles.len() + world.powerups.len(),
            particles: world.ctx.particles.len(),
            boss,
            paused: world.mode == GameMode::Paused,
        }
    }
}

/// Receives HUD updates
pub trait HudSink {
    fn update(&mut self, snapshot: &HudSnapshot);
    /// Notable events (level complete, boss intro, game over, ...)
    fn notify(&mut self, event: &GameEvent);
    /// Achievement toast
    fn achievement(&mut self, name: &str, description: &str);
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHud;

impl HudSink for NullHud {
    fn update(&mut self, _snapshot: &HudSnapshot) {}
    fn notify(&mut self, _event: &GameEvent) {}
    fn achievement(&mut self, _name: &str, _description: &str) {}
}

/// Writes notable events to the log; snapshots are kept, not printed
#[derive(Debug, Default, Clone)]
pub struct LogHud {
    pub last: HudSnapshot,
}

impl HudSink for LogHud {
    fn update(&mut self, snapshot: &HudSnapshot) {
        self.last = snapshot.clone();
    }

    fn notify(&mut self, event: &GameEvent) {
        match event {
            GameEvent::LevelComplete { completed, .. } => log::info!("HUD: level {} complete", completed),
            GameEvent::BossIntro { archetype } => log::info!("HUD: {} - {}", archetype.name(), archetype.story()),
            GameEvent::GameOver { score, level } => log::info!("HUD: game over (level {}, score {})", level, score),
            GameEvent::Victory { score, .. } => log::info!("HUD: victory! score {}", score),
            GameEvent::AttackStyleUnlocked { name } => log::info!("HUD: new attack style {}", name),
            _ => {}
        }
    }

    fn achievement(&mut self, name: &str, description: &str) {
        log::info!("HUD: achievement {} ({})", name, description);
    }
}

/// Whether an event deserves a HUD notification
pub fn is_notable(event: &GameEvent) -> bool {
    matches!(
        event,
        GameEvent::LevelComplete { .. }
            | GameEvent::BossIntro { .. }
            | GameEvent::BossPhase { .. }
            | GameEvent::BossDefeated { .. }
            | GameEvent::AttackStyleUnlocked { .. }
            | GameEvent::GameOver { .. }
            | GameEvent::Victory { .. }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::LevelConfig;
    use glam::Vec2;

    #[test]
    fn test_snapshot_of_fresh_world() {
        let world = World::new(5, Vec2::new(800.0, 600.0), LevelConfig::default());
        let snap = HudSnapshot::capture(&world, 60.0);
        assert_eq!(snap.health_pct, 1.0);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.glow_up_ready, 1.0);
        assert_eq!(snap.entities, 0);
        assert!(snap.boss.is_none());
        assert!(!snap.paused);
    }

    #[test]
    fn test_notable_events() {
        assert!(is_notable(&GameEvent::GameOver { score: 1, level: 1 }));
        assert!(!is_notable(&GameEvent::EnemyKilled { boss: false, score: 100 }));
    }
}
