#![cfg(target_arch = "wasm32")]
use deck_animation_wasm::{abi_version, AnimationPlayerElement, TransitionRunnerElement};
use serde_json::json;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::{Element, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn host_with(tag: &str, children: &[&str]) -> Element {
    let doc = document();
    let host = doc.create_element(tag).unwrap();
    for child in children {
        let el = doc.create_element(child).unwrap();
        el.dyn_ref::<HtmlElement>()
            .unwrap()
            .style()
            .set_property("display", "none")
            .unwrap();
        host.append_child(&el).unwrap();
    }
    doc.body().unwrap().append_child(&host).unwrap();
    host
}

fn fade_json() -> String {
    json!({
        "keyframes": [{ "opacity": 1 }, { "opacity": 0 }],
        "options": { "durationMs": 500, "fill": "forwards", "easing": "ease-in-out" }
    })
    .to_string()
}

#[wasm_bindgen_test]
fn abi_is_1() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn observed_attributes_match_the_attribute_surface() {
    let player: Vec<String> = AnimationPlayerElement::observed_attributes()
        .iter()
        .filter_map(|v| v.as_string())
        .collect();
    assert_eq!(player, vec!["animate", "playback"]);
    let runner: Vec<String> = TransitionRunnerElement::observed_attributes()
        .iter()
        .filter_map(|v| v.as_string())
        .collect();
    assert_eq!(runner, vec!["transitioning"]);
}

#[wasm_bindgen_test]
fn player_starts_and_pauses_an_animation() {
    let host = host_with("animation-player", &["div"]);
    let el = AnimationPlayerElement::new(host, JsValue::UNDEFINED).unwrap();
    el.attribute_changed("animate".into(), None, Some(fade_json()))
        .unwrap();
    assert_eq!(el.state(), "Running");
    el.attribute_changed("playback".into(), None, Some("pause".into()))
        .unwrap();
    assert_eq!(el.state(), "Paused");
}

#[wasm_bindgen_test]
fn rewriting_the_same_descriptor_restarts_the_animation() {
    let host = host_with("animation-player", &["div"]);
    let el = AnimationPlayerElement::new(host, JsValue::UNDEFINED).unwrap();
    el.attribute_changed("animate".into(), None, Some(fade_json()))
        .unwrap();
    el.attribute_changed("playback".into(), None, Some("pause".into()))
        .unwrap();
    assert_eq!(el.state(), "Paused");

    el.attribute_changed("animate".into(), Some(fade_json()), Some(fade_json()))
        .unwrap();
    assert_eq!(el.state(), "Running");
}

#[wasm_bindgen_test]
fn player_rejects_malformed_descriptors_and_bad_config() {
    let host = host_with("animation-player", &["div"]);
    let el = AnimationPlayerElement::new(host.clone(), JsValue::NULL).unwrap();
    assert!(el
        .attribute_changed("animate".into(), None, Some("{ nope".into()))
        .is_err());
    assert_eq!(el.state(), "Idle");

    let bad = serde_wasm_bindgen::to_value(&json!({ "supersede": "explode" })).unwrap();
    assert!(AnimationPlayerElement::new(host, bad).is_err());
}

#[wasm_bindgen_test]
fn player_without_child_stays_idle() {
    let host = host_with("animation-player", &[]);
    host.set_attribute("animate", &fade_json()).unwrap();
    let el = AnimationPlayerElement::new(host, JsValue::UNDEFINED).unwrap();
    el.connected().unwrap();
    assert_eq!(el.state(), "Idle");
}

#[wasm_bindgen_test]
fn runner_without_markers_is_inert() {
    let host = host_with("transition-runner", &[]);
    host.set_attribute("kind", "Fade").unwrap();
    let el = TransitionRunnerElement::new(host, JsValue::UNDEFINED).unwrap();
    el.attribute_changed("transitioning".into(), None, Some("true".into()))
        .unwrap();
    assert_eq!(el.state(), "Idle");
}

#[wasm_bindgen_test]
fn runner_trigger_is_deferred_to_the_next_frame() {
    let host = host_with("transition-runner", &["transition-from", "transition-to"]);
    host.set_attribute("kind", "Fade").unwrap();
    let el = TransitionRunnerElement::new(host, JsValue::UNDEFINED).unwrap();
    el.attribute_changed("transitioning".into(), None, Some("true".into()))
        .unwrap();
    // Nothing runs synchronously.
    assert_eq!(el.state(), "Idle");
}

#[wasm_bindgen_test]
fn cancelled_animations_release_their_finish_listener() {
    use deck_animation_core::{presets, AnimationEngine, AnimationHandle};
    use deck_animation_wasm::WebAnimationEngine;
    use std::rc::Rc;

    let host = host_with("animation-player", &["div"]);
    let target = host.first_element_child().unwrap();
    let mut engine = WebAnimationEngine::new(Rc::new(|_| {}));
    let spin = presets::spin(3000);

    let mut first = engine.animate(&target, &spin.keyframes, &spin.options).unwrap();
    let _second = engine.animate(&target, &spin.keyframes, &spin.options).unwrap();
    assert_eq!(engine.armed_listeners(), 2);

    first.cancel();
    assert_eq!(engine.armed_listeners(), 1);
    assert!(first.animation().onfinish().is_none());
}
