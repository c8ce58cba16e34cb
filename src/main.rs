//! Arcade Hub entry point
//!
//! Browser builds run the runner game on a 2D canvas. Native builds play one
//! headless run with a simple autopilot and record it in a file-backed store.
//!
//! Only the runner has a front end here. The flappy, grid, quiz and blocks
//! games are library APIs (`FlappyGame`, `GridMatch`, `QuizSession`,
//! `BlocksGame`) for a host page to drive; their finished sessions go through
//! the same `Economy::record_session`.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, DeviceOrientationEvent, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use arcade_hub::consts::*;
    use arcade_hub::economy::streak_label;
    use arcade_hub::persistence::{KeyValueStore, LocalStore};
    use arcade_hub::platform::{TiltDetector, today};
    use arcade_hub::sim::{CollectibleKind, Runner, RunnerEvent, RunnerPhase};
    use arcade_hub::{Economy, GameKind, Identity, RunnerTuning, SessionReport, Settings, seed_from_millis};

    /// Wallet address key written by the hub page
    const WALLET_KEY: &str = "userWalletAddress";

    /// Game instance holding all state
    struct Game {
        runner: Runner,
        economy: Economy<LocalStore>,
        tilt: TiltDetector,
        accumulator: f32,
        last_time: f64,
        last_report: Option<SessionReport>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let store = LocalStore::new();
            let settings = Settings::load(&store);
            let identity = store.get(WALLET_KEY).map(Identity::wallet).unwrap_or_default();
            Self {
                runner: Runner::new(RunnerTuning::default(), seed),
                tilt: TiltDetector::new(settings.tilt_controls),
                economy: Economy::new(store, identity),
                accumulator: 0.0,
                last_time: 0.0,
                last_report: None,
            }
        }

        /// Primary action: start, jump, or go back to the start screen
        fn action(&mut self) {
            match self.runner.phase() {
                RunnerPhase::NotStarted => {
                    self.last_report = None;
                    self.runner.start_seeded(seed_from_millis(js_sys::Date::now()));
                }
                RunnerPhase::Running => self.runner.request_jump(),
                RunnerPhase::GameOver => self.runner.restart(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                for event in self.runner.step() {
                    if let RunnerEvent::GameOver { score, frames } = event {
                        self.finish_run(score, frames);
                    }
                }
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            if substeps == MAX_SUBSTEPS {
                self.accumulator = 0.0;
            }
        }

        fn finish_run(&mut self, score: u32, frames: u64) {
            let report = self.economy.record_session(GameKind::Runner, score, frames, today());
            log::info!(
                "Run recorded: {} tokens, {} events",
                report.tokens_awarded,
                report.events.len()
            );
            self.last_report = Some(report);
        }

        fn render(&self, ctx: &CanvasRenderingContext2d) {
            let state = self.runner.state();
            ctx.clear_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);

            ctx.set_fill_style_str("#888");
            ctx.fill_rect(0.0, GROUND_LINE_Y as f64, CANVAS_WIDTH as f64, 2.0);

            let c = &state.character;
            ctx.set_fill_style_str("#2b2b2b");
            ctx.fill_rect(c.pos.x as f64, c.pos.y as f64, c.size.x as f64, c.size.y as f64);

            ctx.set_fill_style_str("#c0392b");
            for o in &state.obstacles {
                ctx.fill_rect(o.pos.x as f64, o.pos.y as f64, o.size.x as f64, o.size.y as f64);
            }

            for item in state.collectibles.iter().filter(|c| !c.collected) {
                let color = match item.kind {
                    CollectibleKind::Beneficial => "#f1c40f",
                    CollectibleKind::Penalizing => "#8e44ad",
                };
                ctx.set_fill_style_str(color);
                ctx.fill_rect(
                    item.pos.x as f64,
                    item.pos.y as f64,
                    item.size.x as f64,
                    item.size.y as f64,
                );
            }

            ctx.set_fill_style_str("#000");
            ctx.set_font("16px monospace");
            let _ = ctx.fill_text(&format!("Score {}", state.score), 10.0, 24.0);
            let _ = ctx.fill_text(&format!("{}s", state.seconds_survived()), 10.0, 44.0);
            let message = match state.phase {
                RunnerPhase::NotStarted => Some("Press space or tap to start"),
                RunnerPhase::GameOver => Some("Game over - press space to continue"),
                RunnerPhase::Running => None,
            };
            if let Some(message) = message {
                let _ = ctx.fill_text(message, 260.0, 120.0);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let stats = self.economy.stats();

            if let Some(el) = document.query_selector("#hud-tokens .hud-value").ok().flatten() {
                el.set_text_content(Some(&stats.total_tokens.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-streak .hud-value").ok().flatten() {
                let label = streak_label(stats.daily_streak).unwrap_or("");
                el.set_text_content(Some(&format!("{} {label}", stats.daily_streak)));
            }
            if let Some(el) = document.query_selector("#hud-player .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.economy.identity().short_label()));
            }
            if let Some(el) = document.get_element_by_id("hud-report") {
                let text = self
                    .last_report
                    .as_ref()
                    .map(|r| match r.rank {
                        Some(rank) => format!("+{} tokens, rank #{rank}", r.tokens_awarded),
                        None => format!("+{} tokens", r.tokens_awarded),
                    })
                    .unwrap_or_default();
                el.set_text_content(Some(&text));
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Arcade Hub starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = match document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::error!("No canvas element");
                return;
            }
        };
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = match canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into().ok())
        {
            Some(ctx) => ctx,
            None => {
                log::error!("2D canvas context unavailable");
                return;
            }
        };

        let seed = seed_from_millis(js_sys::Date::now());
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game, Rc::new(ctx));

        log::info!("Arcade Hub running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Keyboard: space / arrow up act, R returns to the start screen
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "Space" | "ArrowUp" => {
                        event.prevent_default();
                        g.action();
                    }
                    "KeyR" => g.runner.restart(),
                    _ => {}
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: tap acts
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().action();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Device tilt: sharp forward tilt jumps
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DeviceOrientationEvent| {
                let Some(beta) = event.beta() else {
                    return;
                };
                let mut g = game.borrow_mut();
                if g.tilt.sample(beta) {
                    g.runner.request_jump();
                }
            });
            let _ = window.add_event_listener_with_callback(
                "deviceorientation",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, ctx: Rc<CanvasRenderingContext2d>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, ctx, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, ctx: Rc<CanvasRenderingContext2d>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render(&ctx);
            g.update_hud();
        }

        request_animation_frame(game, ctx);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Arcade Hub (native) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use arcade_hub::consts::FRAMES_PER_SECOND;
    use arcade_hub::persistence::FileStore;
    use arcade_hub::platform::today;
    use arcade_hub::sim::{Runner, RunnerPhase, RunnerState};
    use arcade_hub::{Economy, EconomyEvent, GameKind, Identity, RunnerTuning, seed_from_millis};

    /// Store file, overridable with `ARCADE_HUB_STORE`
    const DEFAULT_STORE: &str = "arcade-hub-store.json";
    /// Give up after five minutes of play
    const MAX_FRAMES: u64 = 5 * 60 * FRAMES_PER_SECOND as u64;

    pub fn run() {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or_default();
        let seed = std::env::var("ARCADE_HUB_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| seed_from_millis(millis));

        let mut runner = Runner::new(RunnerTuning::default(), seed);
        runner.start();
        log::info!("Headless run with seed {seed}");

        while runner.phase() == RunnerPhase::Running && runner.state().frame_count < MAX_FRAMES {
            if should_jump(runner.state()) {
                runner.request_jump();
            }
            runner.step();
        }

        let state = runner.state();
        println!(
            "Run ended after {}s with score {} (speed {:.1})",
            state.seconds_survived(),
            state.score,
            state.speed
        );

        let path = std::env::var("ARCADE_HUB_STORE").unwrap_or_else(|_| DEFAULT_STORE.to_string());
        let identity = std::env::var("ARCADE_HUB_WALLET")
            .map(Identity::wallet)
            .unwrap_or_default();
        let mut economy = Economy::new(FileStore::open_or_empty(path), identity);
        let report = economy.record_session(GameKind::Runner, state.score, state.frame_count, today());

        println!("Tokens earned: {}", report.tokens_awarded);
        for event in &report.events {
            match event {
                EconomyEvent::QuestCompleted { id, reward } => {
                    println!("  Quest complete: {} (+{reward})", id.title())
                }
                EconomyEvent::ChallengeCompleted { id, reward } => {
                    println!("  Daily challenge complete: {} (+{reward})", id.title())
                }
                EconomyEvent::NewHighScore { rank, .. } => println!("  New high score, rank #{rank}"),
                _ => {}
            }
        }
        println!(
            "Totals: {} tokens, {} games, streak {}",
            economy.stats().total_tokens,
            economy.stats().total_games_played,
            economy.stats().daily_streak
        );
    }

    /// Jump when a hazard that would hit a standing character is close ahead
    fn should_jump(state: &RunnerState) -> bool {
        let c = &state.character;
        if c.airborne {
            return false;
        }
        let reach = state.speed * 14.0;
        let front = c.pos.x + c.size.x;
        state.obstacles.iter().any(|o| {
            let ahead = o.pos.x - front;
            ahead > 0.0 && ahead < reach && o.pos.y + o.size.y > c.pos.y
        })
    }
}
