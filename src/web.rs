//! Browser front end (wasm32 only)
//!
//! A page constructs a `WebGame`, draws from `snapshot()` (or from the render
//! callback) and forwards UI buttons to its methods. Frames and the serve
//! delay run on the window's `requestAnimationFrame` / `setTimeout`, keys are
//! read from window keyboard events and settings live in LocalStorage.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, KeyboardEvent, Window};

use crate::game::Game;
use crate::input::{KeyAction, KeyboardState};
use crate::persistence::{KvStore, LocalStorageStore, MemoryStore};
use crate::platform::{Clock, TimerBook, TimerId};
use crate::settings::SpeedSetting;
use crate::sim::CourtSize;
use crate::tuning::Tuning;

type BrowserGame = Game<Box<dyn KvStore>, BrowserClock>;
type Listener = (&'static str, Closure<dyn FnMut(Event)>);

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::info!("Space Cat Pong starting...");
    }
}

/// `Clock` backed by the window's frame and timeout callbacks
///
/// Callbacks hold a weak handle, so they do nothing once the `WebGame` that
/// owns the clock has been dropped.
pub struct BrowserClock {
    window: Window,
    target: Weak<Shared>,
    frame: Option<i32>,
    timers: TimerBook<i32>,
}

impl BrowserClock {
    fn new(window: Window) -> Self {
        Self {
            window,
            target: Weak::new(),
            frame: None,
            timers: TimerBook::new(),
        }
    }

    fn attach(&mut self, target: Weak<Shared>) {
        self.target = target;
    }

    fn frame_fired(&mut self) {
        self.frame = None;
    }

    fn timer_fired(&mut self, id: TimerId) {
        self.timers.remove(id);
    }
}

impl Clock for BrowserClock {
    fn request_frame(&mut self) {
        let target = self.target.clone();
        let callback = Closure::once_into_js(move |_time: f64| {
            if let Some(shared) = target.upgrade() {
                shared.frame();
            }
        });
        match self.window.request_animation_frame(callback.unchecked_ref()) {
            Ok(handle) => self.frame = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {e:?}"),
        }
    }

    fn cancel_frame(&mut self) {
        let Some(handle) = self.frame.take() else {
            return;
        };
        if let Err(e) = self.window.cancel_animation_frame(handle) {
            log::warn!("cancelAnimationFrame failed: {e:?}");
        }
    }

    fn schedule_timer(&mut self, delay_ms: u32) -> TimerId {
        let id = self.timers.allocate();
        let target = self.target.clone();
        let callback = Closure::once_into_js(move || {
            if let Some(shared) = target.upgrade() {
                shared.timer(id);
            }
        });
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
        {
            Ok(handle) => self.timers.insert(id, handle),
            Err(e) => log::error!("setTimeout failed: {e:?}"),
        }
        id
    }

    fn cancel_timer(&mut self, id: TimerId) {
        if let Some(handle) = self.timers.remove(id) {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

/// State shared between the exported handle and the browser callbacks
struct Shared {
    game: RefCell<BrowserGame>,
    keys: RefCell<KeyboardState>,
    on_render: RefCell<Option<js_sys::Function>>,
}

impl Shared {
    fn frame(&self) {
        let input = self.keys.borrow().tick_input();
        {
            let mut game = self.game.borrow_mut();
            game.clock_mut().frame_fired();
            game.on_frame(&input);
        }
        self.render();
    }

    fn timer(&self, id: TimerId) {
        let resumed = {
            let mut game = self.game.borrow_mut();
            game.clock_mut().timer_fired(id);
            game.on_timer(id)
        };
        if resumed {
            self.render();
        }
    }

    fn key_down(&self, event: &KeyboardEvent) {
        let key = event.key();
        if matches!(key.as_str(), " " | "ArrowUp" | "ArrowDown") {
            event.prevent_default();
        }
        // Holding space must not flicker between play and pause
        if event.repeat() && key == " " {
            return;
        }
        let action = self.keys.borrow_mut().key_down(&key);
        if action == KeyAction::TogglePause {
            self.game.borrow_mut().toggle_pause();
            self.render();
        }
    }

    fn key_up(&self, event: &KeyboardEvent) {
        self.keys.borrow_mut().key_up(&event.key());
    }

    /// Hand the current snapshot to the page's render callback
    fn render(&self) {
        // Cloned so the callback may call back into `WebGame`
        let Some(callback) = self.on_render.borrow().clone() else {
            return;
        };
        let json = match serde_json::to_string(&self.game.borrow().snapshot()) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Could not serialize snapshot: {e}");
                return;
            }
        };
        if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
            log::warn!("Render callback threw: {e:?}");
        }
    }
}

/// Space Cat Pong match bound to the browser window
#[wasm_bindgen]
pub struct WebGame {
    window: Window,
    shared: Rc<Shared>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl WebGame {
    /// Create a match on a `width` x `height` court (phase idle)
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Result<WebGame, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        let store: Box<dyn KvStore> = match LocalStorageStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{e}; settings will not persist");
                Box::new(MemoryStore::new())
            }
        };
        let seed = js_sys::Date::now() as u64;
        let game = Game::new(
            Tuning::default(),
            CourtSize::new(width, height),
            store,
            BrowserClock::new(window.clone()),
            seed,
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let shared = Rc::new(Shared {
            game: RefCell::new(game),
            keys: RefCell::new(KeyboardState::new()),
            on_render: RefCell::new(None),
        });
        shared
            .game
            .borrow_mut()
            .clock_mut()
            .attach(Rc::downgrade(&shared));

        let listeners = listen_keyboard(&window, &shared)?;
        Ok(WebGame {
            window,
            shared,
            listeners,
        })
    }

    /// Called with the snapshot JSON after every frame and state change
    #[wasm_bindgen(js_name = onRender)]
    pub fn on_render(&self, callback: Option<js_sys::Function>) {
        *self.shared.on_render.borrow_mut() = callback;
        self.shared.render();
    }

    pub fn start(&self) -> bool {
        let started = self.shared.game.borrow_mut().start();
        self.shared.render();
        started
    }

    pub fn pause(&self) {
        self.shared.game.borrow_mut().pause();
        self.shared.render();
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&self) {
        self.shared.game.borrow_mut().toggle_pause();
        self.shared.render();
    }

    pub fn reset(&self) {
        self.shared.game.borrow_mut().reset();
        self.shared.render();
    }

    pub fn resize(&self, width: f32, height: f32) {
        self.shared
            .game
            .borrow_mut()
            .resize(CourtSize::new(width, height));
        self.shared.render();
    }

    /// `"slow"`, `"normal"` or `"fast"`
    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&self, name: &str) -> Result<(), JsValue> {
        let speed = SpeedSetting::from_str(name)
            .ok_or_else(|| JsValue::from_str(&format!("unknown speed {name:?}")))?;
        self.shared.game.borrow_mut().set_speed(speed);
        self.shared.render();
        Ok(())
    }

    /// Current match as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.shared.game.borrow().snapshot())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = highScore)]
    pub fn high_score(&self) -> u32 {
        self.shared.game.borrow().high_score()
    }
}

impl Drop for WebGame {
    fn drop(&mut self) {
        for (name, closure) in &self.listeners {
            if let Err(e) = self
                .window
                .remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
            {
                log::warn!("Could not remove {name} listener: {e:?}");
            }
        }
        // Stops frames and any pending serve
        self.shared.game.borrow_mut().pause();
    }
}

fn listen_keyboard(window: &Window, shared: &Rc<Shared>) -> Result<Vec<Listener>, JsValue> {
    let mut listeners: Vec<Listener> = Vec::new();

    let target = Rc::downgrade(shared);
    listeners.push((
        "keydown",
        Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let (Some(shared), Some(event)) =
                (target.upgrade(), event.dyn_ref::<KeyboardEvent>())
            {
                shared.key_down(event);
            }
        }),
    ));

    let target = Rc::downgrade(shared);
    listeners.push((
        "keyup",
        Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let (Some(shared), Some(event)) =
                (target.upgrade(), event.dyn_ref::<KeyboardEvent>())
            {
                shared.key_up(event);
            }
        }),
    ));

    // Key-ups are lost while the window is unfocused
    let target = Rc::downgrade(shared);
    listeners.push((
        "blur",
        Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            if let Some(shared) = target.upgrade() {
                shared.keys.borrow_mut().release_all();
            }
        }),
    ));

    for (name, closure) in &listeners {
        window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    }
    Ok(listeners)
}
