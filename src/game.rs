//! Loop host
//!
//! `Game` owns the world and the collaborators. Each `tick(now)` turns the
//! wall clock into a clamped step, always redraws, then hands the step's
//! sounds and events to audio and the HUD. High scores and achievements are
//! persisted when a run reaches a terminal mode.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::achievements::Achievements;
use crate::audio::AudioSink;
use crate::error::SetupError;
use crate::highscores::HighScores;
use crate::hud::{HudSink, HudSnapshot, is_notable};
use crate::persistence::KeyValueStore;
use crate::platform::unix_time_ms;
use crate::renderer::{Surface, draw_frame};
use crate::settings::Settings;
use crate::sim::events::{GameEvent, SoundCue};
use crate::sim::powerup::PowerupKind;
use crate::sim::state::{GameMode, LevelConfig, World};
use crate::sim::tick::{TickInput, clamp_dt, step};

/// Frames averaged for the FPS readout
const FPS_WINDOW: usize = 60;

/// Rolling frame-rate estimate from frame timestamps
#[derive(Debug, Clone)]
struct FpsCounter {
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0.0,
        }
    }

    fn record(&mut self, now_ms: f64) {
        self.frame_times[self.frame_index] = now_ms;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // oldest sample is the one we'll overwrite next
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = now_ms - oldest;
            if elapsed > 0.0 {
                self.fps = (FPS_WINDOW as f64 * 1000.0 / elapsed) as f32;
            }
        }
    }

    fn reset(&mut self) {
        self.frame_times = [0.0; FPS_WINDOW];
        self.frame_index = 0;
    }
}

/// The running game and its collaborators
pub struct Game {
    world: World,
    settings: Settings,
    audio: Box<dyn AudioSink>,
    hud: Box<dyn HudSink>,
    store: Box<dyn KeyValueStore>,
    high_scores: HighScores,
    achievements: Achievements,
    viewport: Vec2,
    base_seed: u64,
    runs: u64,
    /// Wall-clock time of the previous tick; `None` restarts the delta
    last_time: Option<f64>,
    fps: FpsCounter,
    /// Shake jitter only; never touches the simulation RNG
    cosmetic_rng: Pcg32,
    /// Terminal state already persisted
    recorded: bool,
    last_rank: Option<usize>,
}

impl Game {
    /// Load persisted data and sit on the menu. Fails only on a viewport no
    /// step could run in.
    pub fn new(
        viewport: Vec2,
        seed: u64,
        mut audio: Box<dyn AudioSink>,
        hud: Box<dyn HudSink>,
        store: Box<dyn KeyValueStore>,
    ) -> Result<Self, SetupError> {
        if !viewport.is_finite() || viewport.x <= 0.0 || viewport.y <= 0.0 {
            return Err(SetupError::InvalidViewport {
                width: viewport.x,
                height: viewport.y,
            });
        }
        let settings = Settings::load(store.as_ref());
        let high_scores = HighScores::load(store.as_ref());
        let achievements = Achievements::load(store.as_ref());
        audio.set_volumes(settings.sfx_gain(), settings.music_gain());

        let mut world = World::new(seed, viewport, LevelConfig::for_difficulty(settings.difficulty));
        world.mode = GameMode::Menu;
        world.ctx.events.clear();

        let mut game = Self {
            world,
            settings,
            audio,
            hud,
            store,
            high_scores,
            achievements,
            viewport,
            base_seed: seed,
            runs: 0,
            last_time: None,
            fps: FpsCounter::new(),
            cosmetic_rng: Pcg32::seed_from_u64(seed ^ 0x5eed),
            recorded: false,
            last_rank: None,
        };
        game.apply_settings();
        log::info!("Game ready ({}x{})", viewport.x, viewport.y);
        Ok(game)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn mode(&self) -> &GameMode {
        &self.world.mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn achievements(&self) -> &Achievements {
        &self.achievements
    }

    pub fn fps(&self) -> f32 {
        self.fps.fps
    }

    /// Leaderboard rank of the last finished run, if it placed
    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    /// Replace and persist the settings. Difficulty applies from the next run.
    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.apply_settings();
        if let Err(e) = self.settings.save(self.store.as_mut()) {
            log::warn!("Could not save settings: {}", e);
        }
    }

    fn apply_settings(&mut self) {
        self.audio.set_volumes(self.settings.sfx_gain(), self.settings.music_gain());
        let budget = self.settings.max_particles();
        self.world.ctx.particle_budget = if self.settings.reduced_motion { budget / 4 } else { budget };
    }

    /// Throw away the current world and start at level 1
    pub fn start_game(&mut self) {
        self.runs += 1;
        let seed = self.base_seed.wrapping_add(self.runs);
        let config = LevelConfig::for_difficulty(self.settings.difficulty);
        self.world = World::new(seed, self.viewport, config);
        self.apply_settings();
        self.recorded = false;
        self.last_rank = None;
        self.last_time = None;
        self.fps.reset();
        log::info!("Run {} started ({} difficulty)", self.runs, self.settings.difficulty.as_str());
    }

    pub fn pause(&mut self) -> bool {
        self.world.pause()
    }

    /// Resume without a catch-up delta for the time spent paused
    pub fn resume(&mut self) -> bool {
        if !self.world.resume() {
            return false;
        }
        self.last_time = None;
        true
    }

    pub fn choose_powerup(&mut self, index: usize) -> Option<PowerupKind> {
        let kind = self.world.choose_powerup(index)?;
        self.play(SoundCue::UiClick);
        self.last_time = None;
        self.dispatch();
        Some(kind)
    }

    pub fn confirm_boss(&mut self) -> bool {
        if !self.world.confirm_boss() {
            return false;
        }
        self.play(SoundCue::UiClick);
        self.last_time = None;
        self.dispatch();
        true
    }

    /// Menu navigation by key code; returns whether the key did anything
    pub fn handle_menu_key(&mut self, code: &str) -> bool {
        let confirm = matches!(code, "Enter" | "Space" | "NumpadEnter");
        match &self.world.mode {
            GameMode::Menu | GameMode::GameOver | GameMode::Victory if confirm => {
                self.play(SoundCue::UiClick);
                self.start_game();
                true
            }
            GameMode::BossIntro { .. } if confirm => self.confirm_boss(),
            GameMode::PowerupSelect { .. } => {
                let index = match code {
                    "Digit1" | "Numpad1" => 0,
                    "Digit2" | "Numpad2" => 1,
                    "Digit3" | "Numpad3" => 2,
                    _ => return false,
                };
                self.choose_powerup(index).is_some()
            }
            _ => false,
        }
    }

    /// One frame at wall-clock `now_ms`
    pub fn tick(&mut self, now_ms: f64, input: &TickInput, surface: &mut dyn Surface) {
        let raw = match self.last_time {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(now_ms);
        self.fps.record(now_ms);

        let mut dt = clamp_dt(raw);
        let mut input = input.clone();
        if input.pause && self.world.mode == GameMode::Paused {
            self.resume();
            self.last_time = Some(now_ms);
            input.pause = false;
            dt = 0.0;
        }
        step(&mut self.world, &input, dt);

        let jitter = if self.settings.effective_screen_shake() {
            self.world.ctx.camera.jitter(&mut self.cosmetic_rng)
        } else {
            Vec2::ZERO
        };
        let fps = self.settings.show_fps.then_some(self.fps.fps);
        draw_frame(&self.world, surface, jitter, fps);

        self.dispatch();
    }

    fn play(&mut self, cue: SoundCue) {
        let pitch = self.pitch_for(cue);
        if let Err(e) = self.audio.play_sound(cue.name(), 1.0, pitch) {
            log::warn!("Sound skipped: {}", e);
        }
    }

    /// Small random detune so repeated hits don't sound identical
    fn pitch_for(&mut self, cue: SoundCue) -> f32 {
        match cue {
            SoundCue::EnemyHit | SoundCue::EnemyDeath => self.cosmetic_rng.random_range(0.9..1.1),
            _ => 1.0,
        }
    }

    /// Drain this step's sounds and events to the collaborators
    fn dispatch(&mut self) {
        for cue in std::mem::take(&mut self.world.ctx.sounds) {
            self.play(cue);
        }

        let events = std::mem::take(&mut self.world.ctx.events);
        for event in &events {
            if let GameEvent::Music { track } = event {
                if let Err(e) = self.audio.play_music(track.name(), track.looped()) {
                    log::warn!("Music skipped: {}", e);
                }
            }
            if is_notable(event) {
                self.hud.notify(event);
            }
        }

        if self.world.mode != GameMode::Menu {
            let fresh = self.achievements.check(&self.world, &events);
            if !fresh.is_empty() {
                for a in &fresh {
                    self.hud.achievement(a.name(), a.description());
                }
                self.play(SoundCue::AchievementUnlock);
                if let Err(e) = self.achievements.save(self.store.as_mut()) {
                    log::warn!("Could not save achievements: {}", e);
                }
            }
        }

        if self.world.mode.is_terminal() && !self.recorded {
            self.recorded = true;
            self.record_run();
        }

        self.hud.update(&HudSnapshot::capture(&self.world, self.fps.fps));
    }

    fn record_run(&mut self) {
        let (score, level) = (self.world.score(), self.world.level);
        self.last_rank = self
            .high_scores
            .add_score(score, level, unix_time_ms(), self.world.stats.elapsed);
        match self.last_rank {
            Some(rank) => {
                log::info!("New high score #{}: {}", rank, score);
                if let Err(e) = self.high_scores.save(self.store.as_mut()) {
                    log::warn!("Could not save high scores: {}", e);
                }
            }
            None => log::info!("Run ended with {} points", score),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::audio::NullAudio;
    use crate::error::{AudioError, StoreError};
    use crate::hud::NullHud;
    use crate::persistence::MemoryStore;
    use crate::renderer::{Layer, RecordingSurface};
    use crate::sim::enemy::Enemy;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Audio sink that logs every request
    struct Spy(Log);

    impl AudioSink for Spy {
        fn play_sound(&mut self, name: &str, _volume: f32, _pitch: f32) -> Result<(), AudioError> {
            self.0.borrow_mut().push(name.to_owned());
            Ok(())
        }
        fn play_music(&mut self, track: &str, _looped: bool) -> Result<(), AudioError> {
            self.0.borrow_mut().push(format!("music:{}", track));
            Ok(())
        }
        fn stop_music(&mut self) {}
        fn set_volumes(&mut self, _sfx: f32, _music: f32) {}
    }

    /// Store shared with the test so writes can be inspected
    #[derive(Clone, Default)]
    struct Shared(Rc<RefCell<MemoryStore>>);

    impl KeyValueStore for Shared {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.borrow().get(key)
        }
        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            self.0.borrow_mut().set(key, value)
        }
        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            self.0.borrow_mut().remove(key)
        }
    }

    const VIEW: Vec2 = Vec2::new(800.0, 600.0);

    fn game() -> Game {
        Game::new(VIEW, 42, Box::new(NullAudio::new()), Box::new(NullHud), Box::new(MemoryStore::new()))
            .unwrap()
    }

    fn surface() -> RecordingSurface {
        RecordingSurface::new(VIEW)
    }

    #[test]
    fn test_rejects_empty_viewport() {
        let result = Game::new(
            Vec2::new(0.0, 600.0),
            1,
            Box::new(NullAudio::new()),
            Box::new(NullHud),
            Box::new(MemoryStore::new()),
        );
        assert!(matches!(result, Err(SetupError::InvalidViewport { .. })));
    }

    #[test]
    fn test_menu_renders_without_stepping() {
        let mut g = game();
        let mut s = surface();
        g.tick(0.0, &TickInput::default(), &mut s);
        g.tick(500.0, &TickInput::default(), &mut s);
        assert_eq!(*g.mode(), GameMode::Menu);
        assert_eq!(g.world().ctx.time, 0.0);
        assert!(s.has_text("Ex Battle"));
        assert!(s.layers().contains(&Layer::Player));
    }

    #[test]
    fn test_wall_clock_delta_is_clamped() {
        let mut g = game();
        assert!(g.handle_menu_key("Enter"));
        let mut s = surface();
        g.tick(1000.0, &TickInput::default(), &mut s);
        assert_eq!(g.world().ctx.time, 0.0);
        g.tick(6000.0, &TickInput::default(), &mut s);
        assert!((g.world().ctx.time - crate::consts::MAX_FRAME_DT).abs() < 1e-6);
    }

    #[test]
    fn test_resume_has_no_catch_up() {
        let mut g = game();
        g.start_game();
        let mut s = surface();
        g.tick(0.0, &TickInput::default(), &mut s);
        g.tick(16.0, &TickInput::default(), &mut s);
        let pause = TickInput {
            pause: true,
            ..TickInput::default()
        };
        g.tick(32.0, &pause, &mut s);
        assert_eq!(*g.mode(), GameMode::Paused);
        let paused_at = g.world().ctx.time;

        g.tick(10_000.0, &TickInput::default(), &mut s);
        assert_eq!(g.world().ctx.time, paused_at);
        assert!(s.has_text("Paused"));

        g.tick(20_000.0, &pause, &mut s);
        assert_eq!(*g.mode(), GameMode::Playing);
        assert_eq!(g.world().ctx.time, paused_at);
        g.tick(20_016.0, &TickInput::default(), &mut s);
        assert!((g.world().ctx.time - paused_at - 0.016).abs() < 1e-4);
    }

    #[test]
    fn test_music_and_sounds_reach_audio() {
        let log: Log = Rc::default();
        let mut g = Game::new(VIEW, 3, Box::new(Spy(log.clone())), Box::new(NullHud), Box::new(MemoryStore::new()))
            .unwrap();
        assert!(g.handle_menu_key("Enter"));
        g.tick(0.0, &TickInput::default(), &mut surface());
        assert_eq!(*log.borrow(), vec!["ui_click".to_owned(), "music:level_1".to_owned()]);
    }

    /// Audio sink that keeps the pitch of each sound
    struct Pitches(Rc<RefCell<Vec<(String, f32)>>>);

    impl AudioSink for Pitches {
        fn play_sound(&mut self, name: &str, _volume: f32, pitch: f32) -> Result<(), AudioError> {
            self.0.borrow_mut().push((name.to_owned(), pitch));
            Ok(())
        }
        fn play_music(&mut self, _track: &str, _looped: bool) -> Result<(), AudioError> {
            Ok(())
        }
        fn stop_music(&mut self) {}
        fn set_volumes(&mut self, _sfx: f32, _music: f32) {}
    }

    #[test]
    fn test_hit_sounds_are_detuned() {
        let heard = Rc::new(RefCell::new(Vec::new()));
        let mut g = Game::new(VIEW, 8, Box::new(Pitches(heard.clone())), Box::new(NullHud), Box::new(MemoryStore::new()))
            .unwrap();
        g.world.ctx.sounds = vec![SoundCue::EnemyHit; 20];
        g.world.ctx.sounds.push(SoundCue::PowerupCollect);
        g.dispatch();

        let heard = heard.borrow();
        assert_eq!(heard.len(), 21);
        assert!(heard[..20].iter().all(|(name, p)| name == "enemy_hit" && (0.9..1.1).contains(p)));
        assert!(heard[..20].iter().any(|(_, p)| *p != 1.0));
        assert_eq!(heard[20].1, 1.0);
    }

    #[test]
    fn test_game_over_persists_high_score_once() {
        let store = Shared::default();
        let mut g = Game::new(VIEW, 5, Box::new(NullAudio::new()), Box::new(NullHud), Box::new(store.clone()))
            .unwrap();
        g.start_game();
        let mut s = surface();
        g.tick(0.0, &TickInput::default(), &mut s);
        g.world.ctx.score = 1234;
        let World { player, ctx, .. } = &mut g.world;
        assert!(player.take_damage(1000, ctx));
        g.tick(16.0, &TickInput::default(), &mut s);
        assert_eq!(*g.mode(), GameMode::GameOver);
        assert_eq!(g.last_rank(), Some(1));
        assert_eq!(g.high_scores().top_score(), Some(1234));

        g.tick(32.0, &TickInput::default(), &mut s);
        assert_eq!(g.high_scores().entries.len(), 1);
        let saved = HighScores::load(&store);
        assert_eq!(saved.top_score(), Some(1234));
        assert!(s.has_text("Game Over"));
    }

    #[test]
    fn test_first_kill_unlocks_and_saves() {
        let store = Shared::default();
        let mut g = Game::new(VIEW, 8, Box::new(NullAudio::new()), Box::new(NullHud), Box::new(store.clone()))
            .unwrap();
        g.start_game();
        let id = g.world.ctx.next_id();
        let mut enemy = Enemy::new(id, Vec2::new(100.0, 100.0), 1, &mut g.world.ctx.rng);
        enemy.take_damage(10_000.0, &mut g.world.ctx);
        g.world.enemies.push(enemy);
        g.tick(0.0, &TickInput::default(), &mut surface());
        g.tick(16.0, &TickInput::default(), &mut surface());
        assert!(g.achievements().is_unlocked(crate::achievements::Achievement::FirstKill));
        assert!(Achievements::load(&store).is_unlocked(crate::achievements::Achievement::FirstKill));
    }

    #[test]
    fn test_powerup_menu_keys() {
        let mut g = game();
        g.start_game();
        g.world.mode = GameMode::PowerupSelect {
            options: vec![PowerupKind::Health, PowerupKind::Speed],
        };
        assert!(!g.handle_menu_key("Digit3"));
        assert!(g.handle_menu_key("Digit2"));
        assert_eq!(*g.mode(), GameMode::Playing);
        assert!(!g.handle_menu_key("Digit1"));
    }

    #[test]
    fn test_reduced_motion_trims_particles() {
        let mut g = game();
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        g.update_settings(settings);
        assert!(!g.settings().effective_screen_shake());
        assert_eq!(g.world().ctx.particle_budget, crate::consts::MAX_PARTICLES / 4);
    }
}
