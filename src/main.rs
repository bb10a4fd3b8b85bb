//! Polar Clock entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_clock {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    use polar_clock::countdown::CountdownUnit;
    use polar_clock::face::ArcKey;
    use polar_clock::platform::SystemClock;
    use polar_clock::renderer::CanvasSurface;
    use polar_clock::{
        ClockError, ClockMode, LabelMode, RenderLoop, SeparatorMode, Settings, UiEvent,
    };

    /// Clock instance bound to the page canvas
    struct App {
        clock: RenderLoop<SystemClock>,
        surface: CanvasSurface,
        canvas: HtmlCanvasElement,
    }

    thread_local! {
        static APP: RefCell<Option<App>> = const { RefCell::new(None) };
    }

    fn to_js(e: ClockError) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    /// Forward one event to the running clock
    fn dispatch(event: UiEvent) -> Result<(), JsValue> {
        APP.with(|app| match app.borrow_mut().as_mut() {
            Some(app) => app.clock.dispatch(event).map_err(to_js),
            None => Err(JsValue::from_str("clock is not running")),
        })
    }

    #[wasm_bindgen]
    pub fn toggle_arc(key: &str) -> Result<(), JsValue> {
        let key: ArcKey = key.parse().map_err(to_js)?;
        dispatch(UiEvent::ToggleArcVisibility(key))
    }

    #[wasm_bindgen]
    pub fn select_preset(name: &str) -> Result<(), JsValue> {
        dispatch(UiEvent::SelectPreset(name.to_string()))
    }

    #[wasm_bindgen]
    pub fn toggle_reverse() -> Result<(), JsValue> {
        dispatch(UiEvent::ToggleReverse)
    }

    #[wasm_bindgen]
    pub fn set_countdown_component(unit: &str, value: f64) -> Result<(), JsValue> {
        let unit: CountdownUnit = unit.parse().map_err(to_js)?;
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(JsValue::from_str("countdown fields take whole numbers"));
        }
        dispatch(UiEvent::SetCountdownComponent(unit, value as i64))
    }

    #[wasm_bindgen]
    pub fn toggle_countdown() -> Result<(), JsValue> {
        dispatch(UiEvent::ToggleCountdown)
    }

    #[wasm_bindgen]
    pub fn reset_countdown() -> Result<(), JsValue> {
        dispatch(UiEvent::ResetCountdown)
    }

    #[wasm_bindgen]
    pub fn set_mode(mode: &str) -> Result<(), JsValue> {
        let mode = match mode.to_lowercase().as_str() {
            "clock" => ClockMode::Clock,
            "countdown" | "timer" => ClockMode::Countdown,
            other => return Err(JsValue::from_str(&format!("unknown mode '{other}'"))),
        };
        dispatch(UiEvent::SetMode(mode))
    }

    #[wasm_bindgen]
    pub fn set_label_mode(mode: &str) -> Result<(), JsValue> {
        let mode: LabelMode = mode.parse().map_err(to_js)?;
        dispatch(UiEvent::SetLabelMode(mode))
    }

    #[wasm_bindgen]
    pub fn set_inverse(on: bool) -> Result<(), JsValue> {
        dispatch(UiEvent::SetInverse(on))
    }

    #[wasm_bindgen]
    pub fn show_separators(on: bool) -> Result<(), JsValue> {
        dispatch(UiEvent::SetSeparatorsShown(on))
    }

    #[wasm_bindgen]
    pub fn set_separator_mode(mode: &str) -> Result<(), JsValue> {
        let mode: SeparatorMode = mode.parse().map_err(to_js)?;
        dispatch(UiEvent::SetSeparatorMode(mode))
    }

    #[wasm_bindgen]
    pub fn toggle_separator(key: &str) -> Result<(), JsValue> {
        let key: ArcKey = key.parse().map_err(to_js)?;
        dispatch(UiEvent::ToggleSeparatorVisibility(key))
    }

    /// Current preferences as JSON, for the page to store
    #[wasm_bindgen]
    pub fn current_settings() -> Result<String, JsValue> {
        APP.with(|app| match app.borrow().as_ref() {
            Some(app) => app.clock.settings().to_json().map_err(to_js),
            None => Err(JsValue::from_str("clock is not running")),
        })
    }

    /// Match the canvas backing store to its CSS size
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (f32, f32) {
        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width as f32, height as f32)
    }

    /// Start the clock on `<canvas id="canvas">`; `settings_json` may be empty
    #[wasm_bindgen]
    pub fn start(settings_json: &str) -> Result<(), JsValue> {
        let settings = if settings_json.trim().is_empty() {
            Settings::default()
        } else {
            Settings::from_json(settings_json).map_err(to_js)?
        };

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;

        let mut clock = RenderLoop::new(&settings, SystemClock).map_err(to_js)?;
        let (w, h) = fit_canvas(&canvas);
        clock.dispatch(UiEvent::SetViewport(w, h)).map_err(to_js)?;

        APP.with(|app| {
            *app.borrow_mut() = Some(App {
                clock,
                surface: CanvasSurface::new(ctx),
                canvas,
            })
        });

        setup_resize_handler(&window);
        request_animation_frame();

        log::info!("Polar Clock running!");
        Ok(())
    }

    fn setup_resize_handler(window: &web_sys::Window) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            APP.with(|app| {
                if let Some(app) = app.borrow_mut().as_mut() {
                    let (w, h) = fit_canvas(&app.canvas);
                    if let Err(e) = app.clock.dispatch(UiEvent::SetViewport(w, h)) {
                        log::warn!("Resize ignored: {e}");
                    }
                }
            });
        });
        if let Err(e) =
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
        {
            log::warn!("Failed to install resize handler: {:?}", e);
        }
        closure.forget();
    }

    fn request_animation_frame() {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            frame_loop();
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::warn!("Failed to schedule frame, clock stopped: {:?}", e);
        }
        closure.forget();
    }

    fn frame_loop() {
        APP.with(|app| {
            if let Some(app) = app.borrow_mut().as_mut() {
                let App { clock, surface, .. } = app;
                clock.frame(surface);
            }
        });
        request_animation_frame();
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialized".into());
        }
        log::info!("Polar Clock loaded; call start() to attach to the canvas");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_clock::init();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Polar Clock (native) starting...");

    if let Err(e) = native::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: a short countdown drawn into a recording surface
#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::thread;
    use std::time::Duration;

    use polar_clock::consts::FRAME_INTERVAL_MS;
    use polar_clock::countdown::{CountdownStatus, CountdownUnit};
    use polar_clock::platform::SystemClock;
    use polar_clock::renderer::RecordingSurface;
    use polar_clock::{ClockMode, RenderLoop, Result, Settings, UiEvent};

    /// Frames between JSON dumps (~1 s)
    const REPORT_EVERY: u64 = 60;
    const DEMO_SECONDS: i64 = 3;

    /// Optional first argument: path to a settings JSON file
    fn load_settings() -> Result<Settings> {
        match std::env::args().nth(1) {
            Some(path) => {
                let json = std::fs::read_to_string(&path).map_err(|e| {
                    polar_clock::ClockError::Configuration(format!("cannot read {path}: {e}"))
                })?;
                Settings::from_json(&json)
            }
            None => Ok(Settings::default()),
        }
    }

    pub fn run() -> Result<()> {
        let settings = load_settings()?;
        let mut clock = RenderLoop::new(&settings, SystemClock)?;
        let mut surface = RecordingSurface::new();

        // One clock frame first
        let report = clock.frame(&mut surface);
        println!("{}", serde_json::to_string_pretty(&report)?);

        clock.dispatch(UiEvent::SetCountdownComponent(
            CountdownUnit::Seconds,
            DEMO_SECONDS,
        ))?;
        clock.dispatch(UiEvent::SetMode(ClockMode::Countdown))?;
        clock.dispatch(UiEvent::ToggleCountdown)?;

        loop {
            let report = clock.frame(&mut surface);
            if report.frame % REPORT_EVERY == 0 {
                println!("{}", serde_json::to_string(&report)?);
            }
            if report.countdown_status == Some(CountdownStatus::Finished) {
                println!("{}", serde_json::to_string_pretty(&surface.instructions)?);
                log::info!("Countdown finished after {} frames", report.frame);
                break;
            }
            thread::sleep(Duration::from_millis(FRAME_INTERVAL_MS));
        }
        Ok(())
    }
}
