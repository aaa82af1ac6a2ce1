//! [`AnimationEngine`] over the Web Animations API (`Element.animate`).

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Animation, AnimationPlayState, Element};

use deck_animation_core::{
    AnimationEngine, AnimationError, AnimationHandle, AnimationId, AnimationOptions, IdAllocator,
    Iterations, Keyframe, Result,
};

/// Called when the platform reports a natural finish.
pub type FinishNotifier = Rc<dyn Fn(AnimationId)>;

fn engine_err(context: &str, err: JsValue) -> AnimationError {
    AnimationError::Engine {
        reason: format!("{context}: {err:?}"),
    }
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<()> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|e| engine_err("options", e))
}

fn options_to_js(options: &AnimationOptions) -> Result<Object> {
    let obj = Object::new();
    set(&obj, "duration", &JsValue::from_f64(f64::from(options.duration_ms)))?;
    let iterations = match options.iterations {
        Iterations::Infinite => f64::INFINITY,
        Iterations::Count(n) => f64::from(n),
    };
    set(&obj, "iterations", &JsValue::from_f64(iterations))?;
    set(&obj, "fill", &JsValue::from_str(options.fill.as_str()))?;
    set(&obj, "easing", &JsValue::from_str(&options.easing.to_string()))?;
    Ok(obj)
}

fn keyframes_to_js(keyframes: &[Keyframe]) -> Result<JsValue> {
    // Plain objects, not `Map`s: `Element.animate` only reads own properties.
    keyframes
        .serialize(&Serializer::json_compatible())
        .map_err(|e| AnimationError::Engine {
            reason: format!("keyframes: {e}"),
        })
}

struct Listener {
    animation: Animation,
    // Freed with the entry; JS only holds a reference.
    _callback: Closure<dyn FnMut()>,
    fired: Rc<Cell<bool>>,
}

/// `onfinish` callbacks by animation. Handles may be dropped while their
/// animation still runs, so the engine owns the callbacks.
#[derive(Clone)]
struct Listeners {
    notify: FinishNotifier,
    by_id: Rc<RefCell<HashMap<AnimationId, Listener>>>,
}

impl Listeners {
    fn new(notify: FinishNotifier) -> Self {
        Self {
            notify,
            by_id: Rc::default(),
        }
    }

    /// Arm `onfinish` for the current run of `animation`, replacing any
    /// earlier callback for `id`.
    fn arm(&self, animation: &Animation, id: AnimationId) {
        let notify = Rc::clone(&self.notify);
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let callback = Closure::<dyn FnMut()>::new(move || {
            flag.set(true);
            notify(id);
        });
        animation.set_onfinish(Some(callback.as_ref().unchecked_ref::<Function>()));
        self.by_id
            .borrow_mut()
            .insert(
                id,
                Listener {
                    animation: animation.clone(),
                    _callback: callback,
                    fired,
                },
            );
    }

    fn disarm(&self, animation: &Animation, id: AnimationId) {
        animation.set_onfinish(None);
        self.by_id.borrow_mut().remove(&id);
    }

    /// Drop callbacks that already ran. A replay re-arms its own.
    fn prune(&self) {
        self.by_id.borrow_mut().retain(|_, l| {
            if l.fired.get() {
                l.animation.set_onfinish(None);
            }
            !l.fired.get()
        });
    }

    fn len(&self) -> usize {
        self.by_id.borrow().len()
    }
}

pub struct WebAnimationEngine {
    ids: IdAllocator,
    listeners: Listeners,
}

impl WebAnimationEngine {
    pub fn new(notify: FinishNotifier) -> Self {
        Self {
            ids: IdAllocator::new(),
            listeners: Listeners::new(notify),
        }
    }

    /// Number of `onfinish` callbacks still held.
    pub fn armed_listeners(&self) -> usize {
        self.listeners.len()
    }
}

impl AnimationEngine for WebAnimationEngine {
    type Target = Element;
    type Handle = WebAnimationHandle;

    fn animate(
        &mut self,
        target: &Element,
        keyframes: &[Keyframe],
        options: &AnimationOptions,
    ) -> Result<WebAnimationHandle> {
        let animate: Function = Reflect::get(target, &JsValue::from_str("animate"))
            .map_err(|e| engine_err("Element.animate", e))?
            .dyn_into()
            .map_err(|e| engine_err("Element.animate is not a function", e))?;
        let frames = keyframes_to_js(keyframes)?;
        let opts = options_to_js(options)?;
        let animation: Animation = animate
            .call2(target, &frames, &opts)
            .map_err(|e| engine_err("animate", e))?
            .unchecked_into();

        self.listeners.prune();
        let id = self.ids.alloc();
        self.listeners.arm(&animation, id);
        Ok(WebAnimationHandle {
            id,
            animation,
            listeners: self.listeners.clone(),
        })
    }
}

pub struct WebAnimationHandle {
    id: AnimationId,
    animation: Animation,
    listeners: Listeners,
}

impl WebAnimationHandle {
    pub fn animation(&self) -> &Animation {
        &self.animation
    }
}

impl AnimationHandle for WebAnimationHandle {
    fn id(&self) -> AnimationId {
        self.id
    }

    fn play(&mut self) -> Result<()> {
        // A replay after finish needs a fresh one-shot listener.
        if self.animation.play_state() == AnimationPlayState::Finished {
            self.listeners.arm(&self.animation, self.id);
        }
        self.animation.play().map_err(|e| engine_err("play", e))
    }

    fn pause(&mut self) -> Result<()> {
        self.animation.pause().map_err(|e| engine_err("pause", e))
    }

    fn cancel(&mut self) {
        self.listeners.disarm(&self.animation, self.id);
        self.animation.cancel();
    }

    fn finish(&mut self) -> Result<()> {
        self.animation.finish().map_err(|e| engine_err("finish", e))
    }
}
