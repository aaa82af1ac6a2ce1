//! JS side of the app seams: `init({ node, flags })` launchers, apps with an
//! optional `ports.pause.send(bool)`, and mounts looked up by element id.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use js_sys::{Function, Object, Reflect};
use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Node};

use deck_orchestrator::{AppLauncher, AppSpec, EmbeddedApp, MountLookup};

fn js_err(context: &str, err: JsValue) -> anyhow::Error {
    anyhow!("{context}: {err:?}")
}

fn get(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

/// Init functions by app id.
#[derive(Default)]
pub struct JsLauncher {
    inits: HashMap<String, Function>,
}

impl JsLauncher {
    pub fn insert(&mut self, app_id: String, init: Function) {
        self.inits.insert(app_id, init);
    }
}

impl AppLauncher for JsLauncher {
    type Mount = Element;
    type App = JsApp;

    fn launch(&mut self, spec: &AppSpec, mount: &Element) -> Result<JsApp> {
        let init = self
            .inits
            .get(&spec.id)
            .ok_or_else(|| anyhow!("no init function for '{}'", spec.id))?;

        let args = Object::new();
        Reflect::set(&args, &JsValue::from_str("node"), mount)
            .map_err(|e| js_err("node", e))?;
        if spec.flags != JsonValue::Null {
            let flags = spec
                .flags
                .serialize(&Serializer::json_compatible())
                .map_err(|e| anyhow!("flags: {e}"))?;
            Reflect::set(&args, &JsValue::from_str("flags"), &flags)
                .map_err(|e| js_err("flags", e))?;
        }

        let instance = init
            .call1(&JsValue::UNDEFINED, &args)
            .map_err(|e| js_err("init", e))?;
        Ok(JsApp { instance })
    }
}

/// Whatever `init` returned.
pub struct JsApp {
    instance: JsValue,
}

impl JsApp {
    /// `(ports.pause, ports.pause.send)` when the app has a pause port.
    fn pause_port(&self) -> Option<(JsValue, Function)> {
        let pause = get(&self.instance, "ports").and_then(|ports| get(&ports, "pause"))?;
        let send = get(&pause, "send")?.dyn_into::<Function>().ok()?;
        Some((pause, send))
    }
}

impl EmbeddedApp for JsApp {
    fn is_pausable(&self) -> bool {
        self.pause_port().is_some()
    }

    fn set_paused(&mut self, paused: bool) -> Result<()> {
        let (port, send) = self
            .pause_port()
            .ok_or_else(|| anyhow!("app has no pause port"))?;
        send.call1(&port, &JsValue::from_bool(paused))
            .map(|_| ())
            .map_err(|e| js_err("ports.pause.send", e))
    }
}

enum Scope {
    Document,
    Slide(Element),
    /// The selector matched nothing: no mount is on screen.
    Empty,
}

/// Mounts are elements by id inside the slide on screen. Every slide stays in
/// the document, so a mount elsewhere counts as absent.
pub struct DocumentMounts {
    document: Document,
    scope: Scope,
}

impl DocumentMounts {
    /// Scope lookups to the first match of `current_slide`; an empty selector
    /// searches the whole document.
    pub fn new(document: Document, current_slide: &str) -> Self {
        let scope = if current_slide.trim().is_empty() {
            Scope::Document
        } else {
            match document.query_selector(current_slide) {
                Ok(Some(slide)) => Scope::Slide(slide),
                Ok(None) => {
                    log::debug!("no slide matches '{current_slide}'");
                    Scope::Empty
                }
                Err(err) => {
                    log::warn!("bad current slide selector '{current_slide}': {err:?}");
                    Scope::Document
                }
            }
        };
        Self { document, scope }
    }

    pub fn current(current_slide: &str) -> Option<Self> {
        web_sys::window()
            .and_then(|w| w.document())
            .map(|doc| Self::new(doc, current_slide))
    }
}

impl MountLookup for DocumentMounts {
    type Mount = Element;

    fn find_mount(&self, mount_id: &str) -> Option<Element> {
        let node = self.document.get_element_by_id(mount_id)?;
        match &self.scope {
            Scope::Document => Some(node),
            Scope::Slide(slide) => {
                let inner: &Node = &node;
                slide.contains(Some(inner)).then_some(node)
            }
            Scope::Empty => None,
        }
    }
}
