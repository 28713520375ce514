//! Stomp Run entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlInputElement};

    use stomp_run::api::validate_name;
    use stomp_run::autopilot::Autopilot;
    use stomp_run::consts::*;
    use stomp_run::platform::{Action, HeldKeys, Registration, StartAction, is_submit_key};
    use stomp_run::renderer::{self, canvas};
    use stomp_run::sim::{GameEvent, GameState, SessionSummary, tick};
    use stomp_run::{ApiClient, Settings};

    /// Game instance holding all state
    struct Game {
        /// None until a player has registered
        state: Option<GameState>,
        settings: Settings,
        keys: HeldKeys,
        autopilot: Option<Autopilot>,
        registration: Registration,
        accumulator: f32,
        last_time: f64,
        api: ApiClient,
        ctx: CanvasRenderingContext2d,
    }

    impl Game {
        fn new(settings: Settings, ctx: CanvasRenderingContext2d) -> Self {
            let api = ApiClient::new(&settings.api_base_url);
            Self {
                state: None,
                settings,
                keys: HeldKeys::new(),
                autopilot: None,
                registration: Registration::default(),
                accumulator: 0.0,
                last_time: 0.0,
                api,
                ctx,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let Some(state) = self.state.as_mut() else {
                return;
            };

            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = match self.autopilot.as_mut() {
                    Some(pilot) => pilot.next_input(state),
                    None => self.keys.sample(),
                };
                tick(state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        /// Render the current frame
        fn render(&self) {
            let Some(state) = self.state.as_ref() else {
                return;
            };
            let commands = renderer::build(&state.snapshot(), &self.settings);
            canvas::execute(
                &self.ctx,
                f64::from(CANVAS_WIDTH),
                f64::from(CANVAS_HEIGHT),
                &commands,
            );
        }

        fn drain_events(&mut self) -> Vec<GameEvent> {
            self.state
                .as_mut()
                .map(GameState::drain_events)
                .unwrap_or_default()
        }

        fn toggle_autopilot(&mut self) {
            self.autopilot = match self.autopilot {
                Some(_) => None,
                None => Some(Autopilot::new(js_sys::Date::now() as u64)),
            };
            self.keys.clear();
            log::info!("Autopilot: {}", self.autopilot.is_some());
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    /// Show or hide an overlay element
    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn show_start_error(message: &str) {
        set_text("name-error", message);
        set_hidden("name-error", false);
        set_hidden("start-screen", false);
    }

    fn show_game_over(summary: &SessionSummary) {
        set_text("final-score", &summary.score.to_string());
        set_text("final-level", &summary.level.to_string());
        set_text("final-deaths", &summary.deaths.to_string());
        set_hidden("game-over", false);
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Stomp Run starting...");

        let document = document().ok_or("no document")?;

        // Hide loading indicator
        set_hidden("loading", true);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let settings = Settings::load();
        log::info!("Backend: {}", settings.api_base_url);

        // Prefill the name from last time
        if let Some(input) = document
            .get_element_by_id("name-input")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(&settings.last_player_name);
        }

        let game = Rc::new(RefCell::new(Game::new(settings, ctx)));

        setup_start_screen(game.clone());
        setup_input_handlers(game.clone())?;
        setup_restart_button(game.clone());

        set_hidden("start-screen", false);

        // Start game loop
        request_animation_frame(game);

        log::info!("Stomp Run running!");
        Ok(())
    }

    fn setup_start_screen(game: Rc<RefCell<Game>>) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id("start-btn")) else {
            log::warn!("No start button, game cannot be started");
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            start(&game);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Start button or Enter in the name field
    fn start(game: &Rc<RefCell<Game>>) {
        let raw = document()
            .and_then(|d| d.get_element_by_id("name-input"))
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default();

        let name = match validate_name(&raw) {
            Ok(name) => name,
            Err(e) => {
                show_start_error(&e.to_string());
                return;
            }
        };
        set_hidden("name-error", true);

        let api = {
            let mut g = game.borrow_mut();

            match g.registration.on_start() {
                StartAction::Wait => return,
                // Already registered but the level never loaded
                StartAction::RetryLevel => {
                    if let Some(state) = g.state.as_mut() {
                        if state.request_level() {
                            set_hidden("start-screen", true);
                        }
                    }
                    return;
                }
                StartAction::Register => {}
            }

            g.settings.remember_player(&name);
            g.settings.save();
            g.api.clone()
        };

        let game = game.clone();
        spawn_local(async move {
            let result = api.register_player(&name).await;
            let mut g = game.borrow_mut();
            g.registration.finished(result.is_ok());
            match result {
                Ok(player_id) => {
                    log::info!("Registered {} as {}", name, player_id);
                    let mut state = GameState::new(player_id);
                    state.request_level();
                    g.state = Some(state);
                    set_hidden("start-screen", true);
                }
                Err(e) => {
                    log::error!("Registration failed: {}", e);
                    show_start_error(&format!("Could not register: {}", e));
                }
            }
        });
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                // Let the name field receive its keystrokes; Enter submits it
                if event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .is_some()
                {
                    if is_submit_key(&event.code()) {
                        start(&game);
                    }
                    return;
                }

                let mut g = game.borrow_mut();
                match g.keys.press(&event.code()) {
                    Some(Action::ToggleAutopilot) => g.toggle_autopilot(),
                    Some(action) if action.blocks_default() => event.prevent_default(),
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().keys.release(&event.code());
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur: keyup events never arrive for keys held while switching away
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().keys.clear();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id("restart-btn")) else {
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let mut g = game.borrow_mut();
            if let Some(state) = g.state.as_mut() {
                state.restart();
            }
            g.accumulator = 0.0;
            g.keys.clear();
            set_hidden("game-over", true);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        // Skip the frame rather than tick while another callback holds the state
        let events = match game.try_borrow_mut() {
            Ok(mut g) => {
                // Calculate delta time
                let dt = if g.last_time > 0.0 {
                    ((time - g.last_time) / 1000.0) as f32
                } else {
                    SIM_DT
                };
                g.last_time = time;

                g.update(dt);
                g.render();
                g.drain_events()
            }
            Err(_) => {
                log::debug!("Frame skipped, game state busy");
                Vec::new()
            }
        };

        for event in events {
            handle_event(&game, event);
        }

        request_animation_frame(game);
    }

    /// Side effects for simulation events, run with no borrow held
    fn handle_event(game: &Rc<RefCell<Game>>, event: GameEvent) {
        match event {
            GameEvent::ConfigRequested { level } => fetch_level_config(game.clone(), level),
            GameEvent::EnemyStomped { enemy_id } => log::debug!("Stomped enemy {}", enemy_id),
            GameEvent::CharacterHit { lives_left } => log::info!("Hit! {} lives left", lives_left),
            GameEvent::LevelCleared { level, score } => {
                log::info!("Level {} cleared with score {}", level, score)
            }
            GameEvent::GameOver(mut summary) => {
                if let Some(state) = game.borrow().state.as_ref() {
                    summary.completion_time = state.session.wall_clock_secs(js_sys::Date::now());
                }
                show_game_over(&summary);
                submit_session(game, summary);
            }
        }
    }

    fn fetch_level_config(game: Rc<RefCell<Game>>, level: u32) {
        let (api, player_id) = {
            let g = game.borrow();
            let Some(state) = g.state.as_ref() else {
                return;
            };
            (g.api.clone(), state.session.player_id.clone())
        };

        spawn_local(async move {
            let result = api.fetch_level_config(level, &player_id).await;
            let mut guard = game.borrow_mut();
            let g = &mut *guard;
            let Some(state) = g.state.as_mut() else {
                return;
            };
            match result {
                Ok(config) => {
                    if state.apply_config(level, &config, js_sys::Date::now()) {
                        g.accumulator = 0.0;
                    }
                }
                Err(e) => {
                    log::error!("Failed to load level {}: {}", level, e);
                    state.config_failed();
                    show_start_error(&format!("Could not load level {}: {}", level, e));
                }
            }
        });
    }

    /// Fire and forget; the run is already over on screen
    fn submit_session(game: &Rc<RefCell<Game>>, summary: SessionSummary) {
        let api = game.borrow().api.clone();
        spawn_local(async move {
            match api.submit_session(&summary).await {
                Ok(()) => log::info!(
                    "Session submitted: level {}, score {}",
                    summary.level,
                    summary.score
                ),
                Err(e) => log::error!("Failed to submit session: {}", e),
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

/// Ticks the headless demo plays before giving up on a session
#[cfg(not(target_arch = "wasm32"))]
const DEMO_TICK_LIMIT: u64 = 60 * 60 * 10;
#[cfg(not(target_arch = "wasm32"))]
const DEMO_RUNS: u64 = 5;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use stomp_run::PlayerId;
    use stomp_run::director::Director;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Stomp Run (native) starting...");
    log::info!("The playable game runs in the browser; running a headless autopilot demo");

    let player_id = match PlayerId::parse("native-demo") {
        Ok(id) => id,
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };

    let mut director = Director::new();
    for seed in 1..=DEMO_RUNS {
        let summary = play_demo_run(&director, player_id.clone(), seed);
        log::info!(
            "Run {}: level {}, score {}, deaths {}, {:.1}s at difficulty {:.1}",
            seed,
            summary.level,
            summary.score,
            summary.deaths,
            summary.completion_time,
            summary.difficulty_level
        );
        director.record(&summary);
    }

    let report = director.performance();
    log::info!(
        "Average {:.1}s and {:.1} deaths per run, success rate {:.0}%, next difficulty {:.1}",
        report.avg_completion_time,
        report.avg_deaths_per_level,
        report.success_rate * 100.0,
        report.suggested_difficulty
    );
}

/// Play one session with the autopilot, serving configs from the director
#[cfg(not(target_arch = "wasm32"))]
fn play_demo_run(
    director: &stomp_run::director::Director,
    player_id: stomp_run::PlayerId,
    seed: u64,
) -> stomp_run::SessionSummary {
    use stomp_run::autopilot::Autopilot;
    use stomp_run::consts::SIM_DT;
    use stomp_run::sim::{GameEvent, tick};

    let mut state = stomp_run::GameState::new(player_id);
    let mut pilot = Autopilot::new(seed);
    state.request_level();

    for _ in 0..DEMO_TICK_LIMIT {
        for event in state.drain_events() {
            match event {
                GameEvent::ConfigRequested { level } => {
                    let config = director.config_for(level);
                    state.apply_config(level, &config, 0.0);
                }
                GameEvent::LevelCleared { level, score } => {
                    log::info!("Level {} cleared, score {}", level, score)
                }
                GameEvent::GameOver(summary) => return summary,
                GameEvent::EnemyStomped { .. } | GameEvent::CharacterHit { .. } => {}
            }
        }
        let input = pilot.next_input(&state);
        tick(&mut state, &input, SIM_DT);
    }

    log::warn!("Demo run {} hit the tick limit", seed);
    state.summary()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
