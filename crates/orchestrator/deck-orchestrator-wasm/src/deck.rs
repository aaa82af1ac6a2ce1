use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use log::LevelFilter;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::EventTarget;

use deck_orchestrator::{
    AppSpec, DeckOrchestrator as Orchestrator, OrchestratorConfig, SlideReport,
};

use crate::launcher::{DocumentMounts, JsLauncher};

/// Event WebSlides fires after every slide change.
pub const SLIDE_CHANGE_EVENT: &str = "ws:slide-change";

type Shared = Rc<RefCell<Orchestrator<JsLauncher>>>;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn run_slide_change(inner: &Shared) -> Result<SlideReport, JsError> {
    let selector = inner.borrow().config().current_slide.clone();
    let mounts =
        DocumentMounts::current(&selector).ok_or_else(|| JsError::new("no document"))?;
    let report = inner.borrow_mut().slide_changed(&mounts);
    if !report.is_empty() {
        log::debug!("slide change: {report:?}");
    }
    Ok(report)
}

struct Listener {
    target: EventTarget,
    event: String,
    callback: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
pub struct DeckOrchestrator {
    inner: Shared,
    listener: Option<Listener>,
}

#[wasm_bindgen]
impl DeckOrchestrator {
    /// `config` is optional JSON matching `OrchestratorConfig`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<DeckOrchestrator, JsError> {
        deck_animation_wasm::logger::install(LevelFilter::Warn);
        let cfg: OrchestratorConfig = if jsvalue_is_undefined_or_null(&config) {
            OrchestratorConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        Ok(DeckOrchestrator {
            inner: Rc::new(RefCell::new(Orchestrator::new(JsLauncher::default(), cfg))),
            listener: None,
        })
    }

    /// Register an embedded app, in slide order. `init` is called as
    /// `init({ node, flags })` the first time `#mount_id` is on screen.
    #[wasm_bindgen(js_name = register_app)]
    pub fn register_app(
        &mut self,
        id: String,
        mount_id: String,
        init: Function,
        flags: JsValue,
    ) -> Result<(), JsError> {
        let flags: serde_json::Value = if jsvalue_is_undefined_or_null(&flags) {
            serde_json::Value::Null
        } else {
            swb::from_value(flags)
                .map_err(|e| JsError::new(&format!("flags for '{id}': {e}")))?
        };
        let mut orch = self.inner.borrow_mut();
        orch.register_app(AppSpec::new(id.clone(), mount_id, flags))
            .map_err(|e| JsError::new(&e.to_string()))?;
        orch.launcher_mut().insert(id, init);
        Ok(())
    }

    /// Reconcile apps with the current slide. Returns the `SlideReport` as JSON.
    #[wasm_bindgen(js_name = slide_changed)]
    pub fn slide_changed(&self) -> Result<JsValue, JsError> {
        let report = run_slide_change(&self.inner)?;
        swb::to_value(&report).map_err(|e| JsError::new(&format!("report error: {e}")))
    }

    /// Call `slide_changed` on every `event` (default `ws:slide-change`) fired at `target`.
    #[wasm_bindgen]
    pub fn listen(&mut self, target: EventTarget, event: Option<String>) -> Result<(), JsError> {
        self.detach();
        let event = event.unwrap_or_else(|| SLIDE_CHANGE_EVENT.to_string());
        let inner = Rc::clone(&self.inner);
        let callback = Closure::<dyn FnMut()>::new(move || {
            if let Err(err) = run_slide_change(&inner) {
                log::error!("slide change failed: {:?}", JsValue::from(err));
            }
        });
        target
            .add_event_listener_with_callback(&event, callback.as_ref().unchecked_ref())
            .map_err(|e| JsError::new(&format!("listen error: {e:?}")))?;
        self.listener = Some(Listener {
            target,
            event,
            callback,
        });
        Ok(())
    }

    /// Remove the listener installed by `listen`, if any.
    #[wasm_bindgen]
    pub fn detach(&mut self) {
        if let Some(listener) = self.listener.take() {
            let _ = listener.target.remove_event_listener_with_callback(
                &listener.event,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
    }

    #[wasm_bindgen(js_name = app_state)]
    pub fn app_state(&self, id: String) -> Result<String, JsError> {
        self.inner
            .borrow()
            .app_state(&id)
            .map(|state| format!("{state:?}"))
            .map_err(|e| JsError::new(&e.to_string()))
    }
}

impl Drop for DeckOrchestrator {
    fn drop(&mut self) {
        self.detach();
    }
}
