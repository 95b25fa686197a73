//! Ex Battle entry point
//!
//! In the browser: canvas, input listeners, DOM HUD and a requestAnimationFrame
//! loop. Natively: a headless soak run with scripted input.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use ex_battle::audio::{AudioSink, NullAudio, WebAudio};
    use ex_battle::hud::{HudSink, HudSnapshot};
    use ex_battle::persistence::{KeyValueStore, LocalStore, MemoryStore};
    use ex_battle::platform::{BrowserClock, Clock, GAME_KEYS, KeyboardState};
    use ex_battle::renderer::CanvasSurface;
    use ex_battle::sim::GameEvent;
    use ex_battle::{Game, SetupError};

    /// Touch drag (px) for full joystick deflection
    const JOYSTICK_RADIUS: f32 = 60.0;

    /// Everything the frame loop and the listeners share
    struct Runtime {
        game: Game,
        keys: KeyboardState,
        surface: CanvasSurface,
        clock: BrowserClock,
        touch_origin: Option<Vec2>,
    }

    /// Writes the HUD into the page's DOM
    struct DomHud {
        document: Document,
    }

    impl DomHud {
        fn set_text(&self, selector: &str, text: &str) {
            if let Some(el) = self.document.query_selector(selector).ok().flatten() {
                el.set_text_content(Some(text));
            }
        }

        fn set_width(&self, selector: &str, fraction: f32) {
            if let Some(el) = self.document.query_selector(selector).ok().flatten() {
                let _ = el.set_attribute("style", &format!("width: {:.0}%", fraction.clamp(0.0, 1.0) * 100.0));
            }
        }

        fn toast(&self, text: &str) {
            if let Some(el) = self.document.get_element_by_id("notification") {
                el.set_text_content(Some(text));
                let _ = el.set_attribute("class", "show");
            }
        }
    }

    impl HudSink for DomHud {
        fn update(&mut self, s: &HudSnapshot) {
            self.set_width("#health-bar .fill", s.health_pct);
            self.set_text("#hud-score .hud-value", &s.score.to_string());
            self.set_text("#hud-level .hud-value", &s.level.to_string());
            self.set_width("#ability-glow-up .fill", s.glow_up_ready);
            self.set_width("#ability-bestie .fill", s.bestie_ready);
            self.set_text("#hud-fps .hud-value", &format!("{:.0}", s.fps));
            match s.boss {
                Some((name, pct)) => {
                    self.set_text("#boss-name", name);
                    self.set_width("#boss-bar .fill", pct);
                }
                None => self.set_text("#boss-name", ""),
            }
        }

        fn notify(&mut self, event: &GameEvent) {
            let text = match event {
                GameEvent::LevelComplete { completed, .. } => format!("Level {} complete!", completed),
                GameEvent::BossIntro { archetype } => format!("{} approaches", archetype.name()),
                GameEvent::BossPhase { archetype, phase } => format!("{} - phase {}", archetype.name(), phase),
                GameEvent::BossDefeated { archetype } => format!("{} defeated!", archetype.name()),
                GameEvent::AttackStyleUnlocked { name } => format!("New attack: {}", name),
                GameEvent::GameOver { score, .. } => format!("Game over - {} points", score),
                GameEvent::Victory { score, .. } => format!("Victory! {} points", score),
                _ => return,
            };
            self.toast(&text);
        }

        fn achievement(&mut self, name: &str, description: &str) {
            self.toast(&format!("🏆 {} - {}", name, description));
        }
    }

    fn setup_error(what: &str) -> SetupError {
        SetupError::SurfaceUnavailable(what.to_owned())
    }

    pub fn run() -> Result<(), SetupError> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialised".into());
        }
        log::info!("Ex Battle starting...");

        let window = web_sys::window().ok_or_else(|| setup_error("no window"))?;
        let document = window.document().ok_or_else(|| setup_error("no document"))?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| setup_error("no #canvas element"))?
            .dyn_into()
            .map_err(|_| setup_error("#canvas is not a canvas"))?;
        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        let surface = CanvasSurface::new(canvas.clone())?;
        surface.resize(width, height);

        let clock = BrowserClock::new()?;

        let audio: Box<dyn AudioSink> = match WebAudio::new() {
            Ok(audio) => Box::new(audio),
            Err(e) => {
                log::warn!("Audio disabled: {}", e);
                Box::new(NullAudio::new())
            }
        };
        let store: Box<dyn KeyValueStore> = match LocalStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("LocalStorage unavailable ({}); progress won't be saved", e);
                Box::new(MemoryStore::new())
            }
        };
        let hud = Box::new(DomHud {
            document: document.clone(),
        });

        let seed = js_sys::Date::now() as u64;
        let viewport = Vec2::new(width as f32, height as f32);
        let game = Game::new(viewport, seed, audio, hud, store)?;
        log::info!("Game initialized with seed: {}", seed);

        let runtime = Rc::new(RefCell::new(Runtime {
            game,
            keys: KeyboardState::new(),
            surface,
            clock,
            touch_origin: None,
        }));

        setup_keyboard(runtime.clone());
        setup_pointer(&canvas, runtime.clone());
        setup_auto_pause(runtime.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(runtime);
        log::info!("Ex Battle running!");
        Ok(())
    }

    fn setup_keyboard(runtime: Rc<RefCell<Runtime>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        {
            let runtime = runtime.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if GAME_KEYS.contains(&code.as_str()) {
                    event.prevent_default();
                }
                if event.repeat() {
                    return;
                }
                let mut rt = runtime.borrow_mut();
                if !rt.game.handle_menu_key(&code) {
                    rt.keys.key_down(&code);
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                runtime.borrow_mut().keys.key_up(&event.code());
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_pointer(canvas: &HtmlCanvasElement, runtime: Rc<RefCell<Runtime>>) {
        {
            let runtime = runtime.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                runtime.borrow_mut().keys.pointer_down = true;
            });
            let _ = canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let runtime = runtime.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                runtime.borrow_mut().keys.pointer_down = false;
            });
            let _ = canvas.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: drag is a virtual joystick, holding a finger down attacks
        {
            let runtime = runtime.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut rt = runtime.borrow_mut();
                    rt.touch_origin = Some(Vec2::new(touch.client_x() as f32, touch.client_y() as f32));
                    rt.keys.pointer_down = true;
                }
            });
            let _ = canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let runtime = runtime.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut rt = runtime.borrow_mut();
                let (Some(origin), Some(touch)) = (rt.touch_origin, event.touches().get(0)) else {
                    return;
                };
                let at = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                rt.keys.joystick = ((at - origin) / JOYSTICK_RADIUS).clamp_length_max(1.0);
            });
            let _ = canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                let mut rt = runtime.borrow_mut();
                rt.touch_origin = None;
                rt.keys.joystick = Vec2::ZERO;
                rt.keys.pointer_down = false;
            });
            let _ = canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(runtime: Rc<RefCell<Runtime>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let runtime = runtime.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut rt = runtime.borrow_mut();
                    rt.keys.clear();
                    if rt.game.pause() {
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut rt = runtime.borrow_mut();
                rt.keys.clear();
                if rt.game.pause() {
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(runtime: Rc<RefCell<Runtime>>) {
        let Some(window) = web_sys::window() else {
            log::error!("window went away; stopping the loop");
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(runtime);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(runtime: Rc<RefCell<Runtime>>) {
        {
            let mut rt = runtime.borrow_mut();
            let input = rt.keys.take_input();
            let now = rt.clock.now_ms();
            let Runtime { game, surface, .. } = &mut *rt;
            game.tick(now, &input, surface);
        }
        request_animation_frame(runtime);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().map_err(|e| {
        log::error!("Startup failed: {}", e);
        JsValue::from_str(&e.to_string())
    })
}

#[cfg(not(target_arch = "wasm32"))]
mod soak {
    use glam::Vec2;

    use ex_battle::audio::NullAudio;
    use ex_battle::consts::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
    use ex_battle::hud::LogHud;
    use ex_battle::persistence::MemoryStore;
    use ex_battle::platform::{Clock, SystemClock, unix_time_ms};
    use ex_battle::renderer::NullSurface;
    use ex_battle::sim::{GameMode, TickInput};
    use ex_battle::{Game, SetupError};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Scripted input: circle the arena, always swinging, abilities on cooldown
    fn script(frame: u64) -> TickInput {
        let t = frame as f32 / 60.0;
        TickInput {
            movement: Vec2::new((t * 0.7).cos(), (t * 0.9).sin()),
            attack: true,
            glow_up: frame % 120 == 0,
            call_bestie: frame % 180 == 0,
            pause: false,
        }
    }

    /// Play up to `frames` simulated frames headless and log a summary
    pub fn run(frames: u64) -> Result<(), SetupError> {
        let viewport = Vec2::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT);
        let seed = unix_time_ms() as u64;
        let mut game = Game::new(
            viewport,
            seed,
            Box::new(NullAudio::new()),
            Box::new(LogHud::default()),
            Box::new(MemoryStore::new()),
        )?;
        let mut surface = NullSurface { size: viewport };
        let clock = SystemClock::default();

        game.handle_menu_key("Enter");
        let mut frame = 0;
        while frame < frames {
            match game.mode() {
                GameMode::PowerupSelect { .. } => {
                    game.handle_menu_key("Digit1");
                }
                GameMode::BossIntro { .. } => {
                    game.handle_menu_key("Enter");
                }
                GameMode::GameOver | GameMode::Victory => break,
                _ => {}
            }
            game.tick(frame as f64 * FRAME_MS, &script(frame), &mut surface);
            frame += 1;
        }

        let world = game.world();
        let wall = clock.now_ms() / 1000.0;
        log::info!(
            "Soak finished after {} frames ({:.1}s simulated, {:.2}s wall): {:?} on level {}, score {}, {} kills",
            frame,
            world.stats.elapsed,
            wall,
            world.mode,
            world.level,
            world.score(),
            world.stats.kills,
        );
        if let Some(rank) = game.last_rank() {
            log::info!("Leaderboard rank #{}", rank);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Ex Battle (native) starting headless soak...");
    log::info!("The playable build is the web version (`trunk serve`)");

    let frames = std::env::args()
        .nth(1)
        .and_then(|a| a.parse().ok())
        .unwrap_or(60 * 60 * 10);
    if let Err(e) = soak::run(frames) {
        log::error!("Startup failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
