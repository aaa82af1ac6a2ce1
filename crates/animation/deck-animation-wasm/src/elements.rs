//! Element classes the `<animation-player>` / `<transition-runner>` custom
//! elements delegate to. The JS side forwards `connectedCallback` and
//! `attributeChangedCallback`; everything else happens here.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::Array;
use log::LevelFilter;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event};

use deck_animation_core::{
    AnimationPlayer, AttributeChange, Config, PlayerCommand, RunnerCommand, RunnerOutcome,
    TransitionRunner, PLAYER_ATTRIBUTES, RUNNER_ATTRIBUTES,
};

use crate::logger;
use crate::view::ElementView;
use crate::web_engine::{FinishNotifier, WebAnimationEngine};

type WebPlayer = AnimationPlayer<ElementView, WebAnimationEngine>;
type WebRunner = TransitionRunner<ElementView, WebAnimationEngine>;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn decode_config(config: JsValue) -> Result<Config, JsError> {
    if jsvalue_is_undefined_or_null(&config) {
        return Ok(Config::default());
    }
    swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))
}

fn attribute_list(names: &[&str]) -> Array {
    names.iter().map(|n| JsValue::from_str(n)).collect()
}

/// Dispatch a payload-less `finish` event on `host`.
fn dispatch_finish(host: &Element) {
    let dispatched = Event::new("finish").and_then(|event| host.dispatch_event(&event));
    if let Err(err) = dispatched {
        log::error!("finish event could not be dispatched: {err:?}");
    }
}

fn request_frame(callback: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        log::warn!("no window: frame callback dropped");
        return;
    };
    let callback = Closure::once_into_js(callback);
    if let Err(err) = window.request_animation_frame(callback.unchecked_ref()) {
        log::error!("requestAnimationFrame failed: {err:?}");
    }
}

#[wasm_bindgen]
pub struct AnimationPlayerElement {
    inner: Rc<RefCell<WebPlayer>>,
}

#[wasm_bindgen]
impl AnimationPlayerElement {
    /// Bind to `host`. `config` is an optional object matching `Config`, e.g.
    ///   new AnimationPlayerElement(this, { supersede: "finish" })
    #[wasm_bindgen(constructor)]
    pub fn new(host: Element, config: JsValue) -> Result<AnimationPlayerElement, JsError> {
        logger::install(LevelFilter::Warn);
        let cfg = decode_config(config)?;

        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<WebPlayer>>| {
            let weak = weak.clone();
            let finish_host = host.clone();
            let notify: FinishNotifier = Rc::new(move |id| {
                let Some(player) = weak.upgrade() else {
                    return;
                };
                let outcome = player
                    .borrow_mut()
                    .apply(PlayerCommand::AnimationFinished(id));
                match outcome {
                    Ok(outcome) if outcome.emits_finish() => dispatch_finish(&finish_host),
                    Ok(_) => {}
                    Err(err) => log::error!("animation-player: {err}"),
                }
            });
            RefCell::new(AnimationPlayer::new(
                ElementView::new(host),
                WebAnimationEngine::new(notify),
                &cfg,
            ))
        });
        Ok(AnimationPlayerElement { inner })
    }

    #[wasm_bindgen(js_name = observed_attributes)]
    pub fn observed_attributes() -> Array {
        attribute_list(&PLAYER_ATTRIBUTES)
    }

    /// Apply attributes present at attach time.
    #[wasm_bindgen]
    pub fn connected(&self) -> Result<(), JsError> {
        self.inner
            .borrow_mut()
            .connected()
            .map(|_| ())
            .map_err(|e| JsError::new(&format!("animation-player connect error: {e}")))
    }

    /// Every write is applied, including one that repeats the current value:
    /// re-writing `animate` restarts the animation.
    #[wasm_bindgen(js_name = attribute_changed)]
    pub fn attribute_changed(
        &self,
        name: String,
        _old_value: Option<String>,
        new_value: Option<String>,
    ) -> Result<(), JsError> {
        let change = AttributeChange::new(name, new_value);
        self.inner
            .borrow_mut()
            .attribute_changed(&change)
            .map(|_| ())
            .map_err(|e| JsError::new(&format!("{} error: {e}", change.name)))
    }

    /// Debug view of the play state (`Idle`, `Running`, ...).
    #[wasm_bindgen]
    pub fn state(&self) -> String {
        format!("{:?}", self.inner.borrow().state())
    }
}

/// React to a runner outcome: emit `finish` and/or schedule the next `Run`.
fn drive_runner(runner: &Rc<RefCell<WebRunner>>, host: &Element, outcome: RunnerOutcome) {
    if outcome.emits_finish() {
        dispatch_finish(host);
    }
    if outcome.needs_frame() {
        schedule_run(Rc::downgrade(runner), host.clone());
    }
}

fn schedule_run(runner: Weak<RefCell<WebRunner>>, host: Element) {
    request_frame(move || {
        let Some(runner) = runner.upgrade() else {
            return;
        };
        let outcome = runner.borrow_mut().apply(RunnerCommand::Run);
        match outcome {
            Ok(outcome) => drive_runner(&runner, &host, outcome),
            Err(err) => log::error!("transition-runner: {err}"),
        }
    });
}

#[wasm_bindgen]
pub struct TransitionRunnerElement {
    host: Element,
    inner: Rc<RefCell<WebRunner>>,
}

#[wasm_bindgen]
impl TransitionRunnerElement {
    /// Bind to `host`. `config` is an optional object matching `Config`, e.g.
    ///   new TransitionRunnerElement(this, { retrigger: "queue", transition: { duration_ms: 300 } })
    #[wasm_bindgen(constructor)]
    pub fn new(host: Element, config: JsValue) -> Result<TransitionRunnerElement, JsError> {
        logger::install(LevelFilter::Warn);
        let cfg = decode_config(config)?;

        let inner = Rc::new_cyclic(|weak: &Weak<RefCell<WebRunner>>| {
            let weak = weak.clone();
            let finish_host = host.clone();
            let notify: FinishNotifier = Rc::new(move |id| {
                let Some(runner) = weak.upgrade() else {
                    return;
                };
                let outcome = runner
                    .borrow_mut()
                    .apply(RunnerCommand::AnimationFinished(id));
                match outcome {
                    Ok(outcome) => drive_runner(&runner, &finish_host, outcome),
                    Err(err) => log::error!("transition-runner: {err}"),
                }
            });
            RefCell::new(TransitionRunner::new(
                ElementView::new(host.clone()),
                WebAnimationEngine::new(notify),
                &cfg,
            ))
        });
        Ok(TransitionRunnerElement { host, inner })
    }

    #[wasm_bindgen(js_name = observed_attributes)]
    pub fn observed_attributes() -> Array {
        attribute_list(&RUNNER_ATTRIBUTES)
    }

    #[wasm_bindgen]
    pub fn connected(&self) -> Result<(), JsError> {
        let outcome = self
            .inner
            .borrow_mut()
            .connected()
            .map_err(|e| JsError::new(&format!("transition-runner connect error: {e}")))?;
        drive_runner(&self.inner, &self.host, outcome);
        Ok(())
    }

    #[wasm_bindgen(js_name = attribute_changed)]
    pub fn attribute_changed(
        &self,
        name: String,
        _old_value: Option<String>,
        new_value: Option<String>,
    ) -> Result<(), JsError> {
        let change = AttributeChange::new(name, new_value);
        let outcome = self
            .inner
            .borrow_mut()
            .attribute_changed(&change)
            .map_err(|e| JsError::new(&format!("{} error: {e}", change.name)))?;
        drive_runner(&self.inner, &self.host, outcome);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn state(&self) -> String {
        format!("{:?}", self.inner.borrow().state())
    }
}
