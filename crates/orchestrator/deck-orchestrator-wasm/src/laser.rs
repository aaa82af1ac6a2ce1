//! Browser wiring for the laser pointer: `mousemove` on the deck root shows
//! it at once, an idle timer hides it on the next animation frame.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Date, Function};
use log::LevelFilter;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

use deck_orchestrator::{LaserPointer as PointerState, OrchestratorConfig, PointerClass};

const MOUSEMOVE: &str = "mousemove";

struct Inner {
    pointer: PointerState,
    target: Element,
    timer: Option<i32>,
}

impl Inner {
    fn arm(&mut self, idle: &Function, delay_ms: f64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(handle) = self.timer.take() {
            window.clear_timeout_with_handle(handle);
        }
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(idle, delay_ms.ceil() as i32)
        {
            Ok(handle) => self.timer = Some(handle),
            Err(err) => log::warn!("laser pointer timer failed: {err:?}"),
        }
    }
}

fn apply_on_next_frame(target: Element, class: PointerClass) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once_into_js(move || target.set_class_name(class.class_name()));
    if let Err(err) = window.request_animation_frame(callback.unchecked_ref()) {
        log::warn!("requestAnimationFrame failed: {err:?}");
    }
}

#[wasm_bindgen]
pub struct LaserPointer {
    inner: Rc<RefCell<Inner>>,
    on_move: Closure<dyn FnMut()>,
    // Kept alive for the timer; never called directly.
    _on_idle: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl LaserPointer {
    /// Track pointer movement over `target` (the `#webslides` root).
    /// `config` is optional JSON matching `OrchestratorConfig`.
    #[wasm_bindgen(constructor)]
    pub fn new(target: Element, config: JsValue) -> Result<LaserPointer, JsError> {
        deck_animation_wasm::logger::install(LevelFilter::Warn);
        let cfg: OrchestratorConfig = if config.is_undefined() || config.is_null() {
            OrchestratorConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        let inner = Rc::new(RefCell::new(Inner {
            pointer: PointerState::new(&cfg),
            target: target.clone(),
            timer: None,
        }));

        // The idle callback re-arms itself through this slot.
        let idle_fn: Rc<RefCell<Option<Function>>> = Rc::new(RefCell::new(None));

        let on_idle = {
            let inner = Rc::clone(&inner);
            let idle_fn = Rc::clone(&idle_fn);
            Closure::<dyn FnMut()>::new(move || {
                let mut state = inner.borrow_mut();
                state.timer = None;
                let now = Date::now();
                match state.pointer.tick(now) {
                    Some(class) => apply_on_next_frame(state.target.clone(), class),
                    None => {
                        // Fired a hair early; wait out the rest.
                        if let (Some(deadline), Some(idle)) =
                            (state.pointer.deadline(), idle_fn.borrow().as_ref())
                        {
                            state.arm(idle, deadline - now);
                        }
                    }
                }
            })
        };
        let idle: Function = on_idle.as_ref().unchecked_ref::<Function>().clone();
        *idle_fn.borrow_mut() = Some(idle.clone());

        let on_move = {
            let inner = Rc::clone(&inner);
            Closure::<dyn FnMut()>::new(move || {
                let mut state = inner.borrow_mut();
                if let Some(class) = state.pointer.on_move(Date::now()) {
                    state.target.set_class_name(class.class_name());
                }
                let idle_ms = state.pointer.idle_ms();
                state.arm(&idle, idle_ms);
            })
        };

        target
            .add_event_listener_with_callback(MOUSEMOVE, on_move.as_ref().unchecked_ref())
            .map_err(|e| JsError::new(&format!("listen error: {e:?}")))?;

        Ok(LaserPointer {
            inner,
            on_move,
            _on_idle: on_idle,
        })
    }

    /// Current class name, if the pointer has moved yet.
    #[wasm_bindgen]
    pub fn class_name(&self) -> Option<String> {
        self.inner
            .borrow()
            .pointer
            .class()
            .map(|c| c.class_name().to_string())
    }
}

impl Drop for LaserPointer {
    fn drop(&mut self) {
        let mut state = self.inner.borrow_mut();
        let _ = state
            .target
            .remove_event_listener_with_callback(MOUSEMOVE, self.on_move.as_ref().unchecked_ref());
        if let (Some(handle), Some(window)) = (state.timer.take(), web_sys::window()) {
            window.clear_timeout_with_handle(handle);
        }
    }
}
