//! deck-orchestrator
//!
//! Host-side coordination for a slide deck: embedded apps are started the
//! first time their mount node shows up on the current slide, resumed when
//! they come back, and paused while off-screen. The laser pointer idle state
//! lives here too.
//!
//! Nothing in this crate touches the DOM; the wasm crate supplies the
//! [`AppLauncher`] and [`MountLookup`] implementations.

pub mod apps;
pub mod config;
pub mod error;
pub mod laser;
pub mod orchestrator;

pub use crate::apps::{AppLauncher, AppSpec, EmbeddedApp, MountLookup};
pub use crate::config::OrchestratorConfig;
pub use crate::error::OrchestratorError;
pub use crate::laser::{LaserPointer, PointerClass};
pub use crate::orchestrator::{AppState, DeckOrchestrator, SlideReport};
