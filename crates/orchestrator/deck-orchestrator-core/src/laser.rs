//! Laser pointer visibility: shown while the pointer moves, hidden once it
//! has been idle for `pointer_idle_ms`.

use serde::{Deserialize, Serialize};

use crate::config::OrchestratorConfig;

/// Class applied to the deck root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerClass {
    Moving,
    Stopped,
}

impl PointerClass {
    pub fn class_name(&self) -> &'static str {
        match self {
            PointerClass::Moving => "mousemoving",
            PointerClass::Stopped => "mousestop",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LaserPointer {
    idle_ms: f64,
    deadline: Option<f64>,
    class: Option<PointerClass>,
}

impl LaserPointer {
    pub fn new(config: &OrchestratorConfig) -> Self {
        Self {
            idle_ms: f64::from(config.pointer_idle_ms),
            deadline: None,
            class: None,
        }
    }

    /// Pointer moved at `now_ms`. Re-arms the idle deadline; returns the class
    /// to apply when it changed.
    pub fn on_move(&mut self, now_ms: f64) -> Option<PointerClass> {
        self.deadline = Some(now_ms + self.idle_ms);
        self.switch_to(PointerClass::Moving)
    }

    /// Timer check at `now_ms`. Returns `Stopped` once the deadline has passed.
    pub fn tick(&mut self, now_ms: f64) -> Option<PointerClass> {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                self.switch_to(PointerClass::Stopped)
            }
            _ => None,
        }
    }

    fn switch_to(&mut self, class: PointerClass) -> Option<PointerClass> {
        if self.class == Some(class) {
            return None;
        }
        self.class = Some(class);
        Some(class)
    }

    pub fn class(&self) -> Option<PointerClass> {
        self.class
    }

    /// When the next `tick` can change anything.
    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    pub fn idle_ms(&self) -> f64 {
        self.idle_ms
    }
}
