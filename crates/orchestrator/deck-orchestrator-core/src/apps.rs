//! Seams between the orchestrator and the embedded apps it manages.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Registration record for one embedded app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSpec {
    pub id: String,
    /// Id of the element the app mounts into.
    pub mount_id: String,
    /// Passed verbatim to the app's `init`.
    #[serde(default)]
    pub flags: JsonValue,
}

impl AppSpec {
    pub fn new(id: impl Into<String>, mount_id: impl Into<String>, flags: JsonValue) -> Self {
        Self {
            id: id.into(),
            mount_id: mount_id.into(),
            flags,
        }
    }
}

/// A running app instance.
pub trait EmbeddedApp {
    /// Whether the app exposes a pause port at all.
    fn is_pausable(&self) -> bool;

    /// Send `paused` on the app's pause port.
    fn set_paused(&mut self, paused: bool) -> Result<()>;
}

/// Starts apps. `launch` runs at most once per successful start.
pub trait AppLauncher {
    type Mount;
    type App: EmbeddedApp;

    fn launch(&mut self, spec: &AppSpec, mount: &Self::Mount) -> Result<Self::App>;
}

/// Resolves mount ids against whatever is currently on screen.
pub trait MountLookup {
    type Mount;

    fn find_mount(&self, mount_id: &str) -> Option<Self::Mount>;
}
