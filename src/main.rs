//! Bounce Merge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::fmt::Write as _;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, MouseEvent};

    use bounce_merge::minigame::GuessOutcome;
    use bounce_merge::palette::{self, Appearance};
    use bounce_merge::persistence::LocalStorageStore;
    use bounce_merge::render::{Renderer, format_money};
    use bounce_merge::sim::{GameEvent, GameState};
    use bounce_merge::upgrades::UpgradeKind;
    use bounce_merge::{Session, Settings};

    type Game = Session<LocalStorageStore, DomRenderer>;

    /// Draws the arena and HUD into plain DOM elements
    struct DomRenderer {
        document: Document,
        trails: bool,
    }

    impl DomRenderer {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn draw_arena(&self, state: &GameState, events: &[GameEvent]) {
            let Some(arena) = self.document.get_element_by_id("arena") else {
                return;
            };

            let mut html = String::new();
            for ball in &state.balls {
                let color = palette::ball_color(ball.value);
                if self.trails {
                    let dot = ball.radius() * 0.6;
                    for point in &ball.trail {
                        let _ = write!(
                            html,
                            concat!(
                                "<div class=\"trail\" style=\"left:{:.1}px;top:{:.1}px;",
                                "width:{:.1}px;height:{:.1}px;opacity:{:.2};background:{}\"></div>"
                            ),
                            point.pos.x - dot / 2.0,
                            point.pos.y - dot / 2.0,
                            dot,
                            dot,
                            point.opacity,
                            color
                        );
                    }
                }

                let look = Appearance::for_value(ball.value);
                let size = ball.size();
                let _ = write!(
                    html,
                    concat!(
                        "<div class=\"ball\" style=\"left:{:.1}px;top:{:.1}px;",
                        "width:{:.1}px;height:{:.1}px;background:{};",
                        "box-shadow:0 0 {}px {c},0 0 {}px {c}88,0 0 {}px {c}44;",
                        "--shine:{}s;animation-duration:{}s\">{}</div>"
                    ),
                    ball.pos.x,
                    ball.pos.y,
                    size,
                    size,
                    palette::ball_gradient(ball.value),
                    look.glow,
                    look.bloom,
                    look.halo,
                    look.shine_period,
                    look.pulse_period,
                    ball.value,
                    c = color
                );
            }

            for event in events {
                if let GameEvent::Sparkle { pos, count, .. } = event {
                    for i in 0..*count {
                        let _ = write!(
                            html,
                            "<div class=\"sparkle\" style=\"left:{:.1}px;top:{:.1}px\"></div>",
                            pos.x + i as f32 * 3.0,
                            pos.y - i as f32 * 3.0
                        );
                    }
                }
            }

            arena.set_inner_html(&html);
        }

        fn draw_achievements(&self, state: &GameState) {
            let Some(list) = self.document.get_element_by_id("achievements") else {
                return;
            };
            let mut html = String::new();
            for entry in state.achievements.entries() {
                let _ = write!(
                    html,
                    "<div class=\"achievement{}\" title=\"{}\">{} ({})</div>",
                    if entry.unlocked { " unlocked" } else { "" },
                    entry.description,
                    entry.name,
                    format_money(entry.reward)
                );
            }
            list.set_inner_html(&html);
        }
    }

    impl Renderer for DomRenderer {
        fn notify_tick(&mut self, state: &GameState, events: &[GameEvent]) {
            self.draw_arena(state, events);
            self.draw_achievements(state);
            self.set_text("money", &format_money(state.money));
            self.set_text("level", &state.level.to_string());
            self.set_text("available-balls", &state.available_balls.to_string());
            self.set_text("ball-profit", &state.ball_profit.to_string());
            self.set_text("total-bounces", &state.total_bounces.to_string());
            self.set_text("total-merges", &state.total_merges.to_string());
            self.set_text("streak", &state.current_streak.to_string());
            self.set_text(
                "auto-spawn-btn",
                if state.auto_spawn_active {
                    "Auto Spawn: ON"
                } else {
                    "Auto Spawn: OFF"
                },
            );
            self.set_text(
                "hard-mode-btn",
                if state.is_hard_mode {
                    "Hard Mode: ON"
                } else {
                    "Hard Mode: OFF"
                },
            );
        }

        fn notify_achievement_unlocked(&mut self, name: &str, reward: f64) {
            let Some(container) = self.document.get_element_by_id("notifications") else {
                return;
            };
            if let Ok(toast) = self.document.create_element("div") {
                let _ = toast.set_attribute("class", "notification");
                toast.set_text_content(Some(&format!(
                    "🏆 {} +{}",
                    name,
                    format_money(reward)
                )));
                let _ = container.append_child(&toast);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Bounce Merge starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let settings = Settings::load();
        let renderer = DomRenderer {
            document: document.clone(),
            trails: settings.trails,
        };
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Session::load(
            settings,
            LocalStorageStore::default(),
            renderer,
            seed,
        )));
        game.borrow_mut().start(js_sys::Date::now());

        setup_buttons(&document, game.clone());
        setup_upgrade_buttons(&document, game.clone());
        setup_minigame(&document, game.clone());
        setup_save_on_exit(game.clone());

        request_animation_frame(game);

        log::info!("Bounce Merge running!");
    }

    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler());
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click(document, "spawn-btn", move || {
                if game.borrow_mut().spawn_ball().is_none() {
                    log::info!("No balls left to spawn");
                }
            });
        }
        {
            let game = game.clone();
            on_click(document, "auto-spawn-btn", move || {
                game.borrow_mut().toggle_auto_spawn(js_sys::Date::now());
            });
        }
        {
            let game = game.clone();
            on_click(document, "hard-mode-btn", move || {
                game.borrow_mut().toggle_hard_mode();
            });
        }
        {
            let game = game.clone();
            on_click(document, "save-btn", move || {
                game.borrow_mut().save();
            });
        }
        on_click(document, "reset-btn", move || {
            let confirmed = web_sys::window()
                .and_then(|w| w.confirm_with_message("Reset all progress?").ok())
                .unwrap_or(false);
            if confirmed {
                game.borrow_mut().reset_progress();
            }
        });
    }

    fn setup_upgrade_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        let buttons = [
            ("upgrade-add-ball", UpgradeKind::AddBall),
            ("upgrade-ball-profit", UpgradeKind::BallProfit),
            ("upgrade-add-pin", UpgradeKind::AddPin),
            ("upgrade-merge-pins", UpgradeKind::MergePins),
        ];
        for (id, kind) in buttons {
            let game = game.clone();
            let doc = document.clone();
            on_click(document, id, move || {
                let mut g = game.borrow_mut();
                if let Err(e) = g.buy(kind) {
                    log::info!("{}: {}", kind.label(), e);
                }
                let price = format_money(g.upgrade_cost(kind));
                if let Some(el) = doc.get_element_by_id(&format!("{}-price", id)) {
                    el.set_text_content(Some(&price));
                }
            });
        }
    }

    fn setup_minigame(document: &Document, game: Rc<RefCell<Game>>) {
        let doc = document.clone();
        on_click(document, "minigame-play-btn", move || {
            let Some(options_el) = doc.get_element_by_id("color-options") else {
                return;
            };
            options_el.set_inner_html("");

            let round = game.borrow_mut().start_minigame().cloned();
            let Some(round) = round else {
                if let Some(result) = doc.get_element_by_id("minigame-result") {
                    result.set_text_content(Some("No balls to guess! Merge some first."));
                }
                return;
            };

            if let Some(display) = doc.get_element_by_id("ball-display") {
                let _ = display.set_attribute("style", &format!("background:{}", round.gradient()));
            }

            for name in round.options {
                let Ok(option) = doc.create_element("div") else {
                    continue;
                };
                let _ = option.set_attribute("class", "color-option");
                let _ = option.set_attribute(
                    "style",
                    &format!("background-color:{}", palette::color_hex(name)),
                );

                let game = game.clone();
                let doc = doc.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let outcome = game.borrow_mut().answer_minigame(name);
                    let text = match outcome {
                        Some(GuessOutcome::Correct { reward, streak }) => {
                            format!("Correct! +{} (Streak: {})", format_money(reward), streak)
                        }
                        Some(GuessOutcome::Wrong { answer }) => {
                            format!("Wrong! The answer was {}. Streak reset.", answer)
                        }
                        None => return,
                    };
                    if let Some(result) = doc.get_element_by_id("minigame-result") {
                        result.set_text_content(Some(&text));
                    }
                });
                let _ = option
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
                let _ = options_el.append_child(&option);
            }
        });
    }

    fn setup_save_on_exit(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        for event in ["beforeunload", "pagehide"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().save();
            });
            let _ =
                window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().pump(js_sys::Date::now());
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// Headless run: simulate a session on a virtual clock and log what happened
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use bounce_merge::persistence::FileStore;
    use bounce_merge::render::{LogRenderer, format_money};
    use bounce_merge::upgrades::UpgradeKind;
    use bounce_merge::{Session, Settings};

    env_logger::init();
    log::info!("Bounce Merge (native) starting...");

    let seconds: u64 = match std::env::args().nth(1) {
        Some(arg) => match arg.parse() {
            Ok(s) => s,
            Err(_) => {
                log::warn!("Ignoring bad duration {:?}, running 60s", arg);
                60
            }
        },
        None => 60,
    };
    let save_path =
        std::env::var("BOUNCE_MERGE_SAVE").unwrap_or_else(|_| "bounce_merge_save.json".to_string());

    let settings = Settings::load();
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let step = settings.tick_ms as f64;

    let mut session = Session::load(
        settings,
        FileStore::new(save_path),
        LogRenderer::default(),
        seed,
    );
    session.start(0.0);
    while session.spawn_ball().is_some() {}

    let end = seconds as f64 * 1000.0;
    let mut now = 0.0;
    let mut next_purchase = 1000.0;
    while now <= end {
        session.pump(now);

        // Idle player: keep buying balls once per second while affordable
        if now >= next_purchase {
            if session.buy(UpgradeKind::AddBall).is_ok() {
                log::debug!("Bought a ball");
            }
            next_purchase += 1000.0;
        }
        now += step;
    }

    session.save();

    let state = session.state();
    let top = state.balls.iter().map(|b| b.value).max().unwrap_or(0);
    log::info!(
        "After {}s: {} balls (top {}), money {}, {} bounces, {} merges, {} achievements",
        seconds,
        state.balls.len(),
        top,
        format_money(state.money),
        state.total_bounces,
        state.total_merges,
        state.achievements.unlocked_count()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
