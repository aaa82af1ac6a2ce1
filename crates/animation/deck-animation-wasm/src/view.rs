//! [`DomView`] over the component's host element.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use deck_animation_core::DomView;

#[derive(Clone, Debug)]
pub struct ElementView {
    host: Element,
}

impl ElementView {
    pub fn new(host: Element) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &Element {
        &self.host
    }
}

impl DomView for ElementView {
    type Element = Element;

    fn first_child(&self) -> Option<Element> {
        self.host.first_element_child()
    }

    fn find_tag(&self, tag: &str) -> Option<Element> {
        self.host.get_elements_by_tag_name(tag).item(0)
    }

    fn reveal(&mut self, element: &Element) {
        let Some(html) = element.dyn_ref::<HtmlElement>() else {
            return;
        };
        if let Err(err) = html.style().set_property("display", "inline-block") {
            log::warn!("could not reveal <{}>: {err:?}", element.tag_name());
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.host.get_attribute(name)
    }
}
