//! wasm-bindgen bindings for the deck host: embedded app orchestration and
//! the laser pointer.
//!
//! The animation elements and the ABI/logging entry points come from
//! `deck-animation-wasm` and are re-exported, so a deck loads one module.

pub mod deck;
pub mod laser;
pub mod launcher;

pub use deck::{DeckOrchestrator, SLIDE_CHANGE_EVENT};
pub use deck_animation_wasm::{
    abi_version, init_logging, AnimationPlayerElement, TransitionRunnerElement,
};
pub use laser::LaserPointer;
