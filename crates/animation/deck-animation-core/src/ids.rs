//! Identifiers for animations started through an engine.

use serde::{Deserialize, Serialize};

/// Identity of one started animation. Completion notifications are keyed by it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub u32);

/// Monotonic allocator for AnimationId. Engines own one each.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> AnimationId {
        let id = AnimationId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}
