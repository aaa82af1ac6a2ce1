//! wasm-bindgen adapter for `deck-animation-core`.
//!
//! Exposes [`AnimationPlayerElement`] and [`TransitionRunnerElement`], which a
//! thin custom-element shell constructs with its host element, plus the
//! console logger used by every deck wasm crate.

use wasm_bindgen::prelude::*;

pub mod elements;
pub mod logger;
pub mod view;
pub mod web_engine;

pub use elements::{AnimationPlayerElement, TransitionRunnerElement};
pub use view::ElementView;
pub use web_engine::{FinishNotifier, WebAnimationEngine, WebAnimationHandle};

/// Route `log` output to the console at `level` (`"error"` .. `"trace"`,
/// default `"warn"`). Only the first call takes effect.
#[wasm_bindgen(js_name = init_logging)]
pub fn init_logging(level: Option<String>) {
    logger::install(logger::parse_level(level.as_deref()));
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
