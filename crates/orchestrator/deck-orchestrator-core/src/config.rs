use serde::{Deserialize, Serialize};

/// Host configuration. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Pointer idle time before the laser pointer hides.
    pub pointer_idle_ms: u32,
    /// CSS selector of the slide on screen. Mounts outside it count as absent.
    /// Empty searches the whole document.
    pub current_slide: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        OrchestratorConfig {
            pointer_idle_ms: 1000,
            current_slide: "section.current".to_string(),
        }
    }
}
