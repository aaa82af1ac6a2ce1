#![cfg(target_arch = "wasm32")]
use deck_orchestrator_wasm::{abi_version, DeckOrchestrator, LaserPointer};
use js_sys::{Function, Object, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn mount(id: &str) -> web_sys::Element {
    mount_in(&document().body().unwrap(), id)
}

fn mount_in(parent: &web_sys::Element, id: &str) -> web_sys::Element {
    let el = document().create_element("div").unwrap();
    el.set_id(id);
    parent.append_child(&el).unwrap();
    el
}

/// A WebSlides slide; `current` marks it as the one on screen.
fn slide(current: bool) -> web_sys::Element {
    let section = document().create_element("section").unwrap();
    if current {
        section.set_class_name("current");
    }
    document().body().unwrap().append_child(&section).unwrap();
    section
}

/// `init` that counts its calls on `window.__inits` and returns an app
/// recording pause messages on `window.__pauses`.
fn counting_init() -> Function {
    Function::new_with_args(
        "args",
        "window.__inits = (window.__inits || 0) + 1;\
         window.__pauses = [];\
         return { ports: { pause: { send: (p) => window.__pauses.push(p) } } };",
    )
}

fn window_prop(name: &str) -> JsValue {
    let window = web_sys::window().unwrap();
    Reflect::get(&window, &JsValue::from_str(name)).unwrap()
}

#[wasm_bindgen_test]
fn abi_is_shared_with_the_animation_module() {
    assert_eq!(abi_version(), 1);
}

#[wasm_bindgen_test]
fn registered_app_starts_once_and_pauses_when_its_mount_leaves() {
    let mut deck = DeckOrchestrator::new(JsValue::UNDEFINED).unwrap();
    deck.register_app(
        "tea".into(),
        "elmTeaTest".into(),
        counting_init(),
        Object::new().into(),
    )
    .unwrap();

    let inits_before = window_prop("__inits").as_f64().unwrap_or(0.0);
    deck.slide_changed().unwrap();
    assert_eq!(deck.app_state("tea".into()).unwrap(), "NotStarted");

    let section = slide(true);
    let el = mount_in(&section, "elmTeaTest");
    deck.slide_changed().unwrap();
    deck.slide_changed().unwrap();
    assert_eq!(window_prop("__inits").as_f64(), Some(inits_before + 1.0));
    assert_eq!(deck.app_state("tea".into()).unwrap(), "Running");

    el.remove();
    deck.slide_changed().unwrap();
    assert_eq!(deck.app_state("tea".into()).unwrap(), "Paused");
    section.remove();
}

#[wasm_bindgen_test]
fn only_the_current_slide_starts_its_app() {
    let mut deck = DeckOrchestrator::new(JsValue::UNDEFINED).unwrap();
    for (id, mount_id) in [("first", "firstSlideApp"), ("second", "secondSlideApp")] {
        deck.register_app(id.into(), mount_id.into(), counting_init(), JsValue::UNDEFINED)
            .unwrap();
    }
    let first = slide(true);
    let second = slide(false);
    mount_in(&first, "firstSlideApp");
    mount_in(&second, "secondSlideApp");

    deck.slide_changed().unwrap();
    assert_eq!(deck.app_state("first".into()).unwrap(), "Running");
    assert_eq!(deck.app_state("second".into()).unwrap(), "NotStarted");

    first.set_class_name("");
    second.set_class_name("current");
    deck.slide_changed().unwrap();
    assert_eq!(deck.app_state("first".into()).unwrap(), "Paused");
    assert_eq!(deck.app_state("second".into()).unwrap(), "Running");

    first.remove();
    second.remove();
}

#[wasm_bindgen_test]
fn duplicate_registration_is_an_error() {
    let mut deck = DeckOrchestrator::new(JsValue::NULL).unwrap();
    deck.register_app("a".into(), "m".into(), counting_init(), JsValue::UNDEFINED)
        .unwrap();
    assert!(deck
        .register_app("a".into(), "m".into(), counting_init(), JsValue::UNDEFINED)
        .is_err());
}

#[wasm_bindgen_test]
fn laser_pointer_starts_without_a_class() {
    let root = mount("webslidesTest");
    let laser = LaserPointer::new(root, JsValue::UNDEFINED).unwrap();
    assert_eq!(laser.class_name(), None);
}
