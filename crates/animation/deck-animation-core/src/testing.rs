//! In-memory engine and DOM for tests and headless hosts.
//!
//! [`ManualEngine`] runs on virtual time: nothing moves until [`ManualEngine::advance`]
//! or [`ManualEngine::settle`] is called, and both return the ids whose
//! `finish` the platform would have reported, in order. Feeding those back as
//! `AnimationFinished` commands reproduces the browser's event flow without
//! re-entering a component.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::descriptor::Keyframe;
use crate::engine::{AnimationEngine, AnimationHandle, DomView, Marker};
use crate::error::AnimationError;
use crate::ids::{AnimationId, IdAllocator};
use crate::sampling::sample_keyframes;
use crate::timing::AnimationOptions;
use crate::Result;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Paused,
    Finished,
    Cancelled,
}

/// Everything the engine knows about one started animation.
#[derive(Clone, Debug)]
pub struct RecordedAnimation<T> {
    pub id: AnimationId,
    pub target: T,
    pub keyframes: Vec<Keyframe>,
    pub options: AnimationOptions,
    pub status: Status,
    pub elapsed_ms: f64,
}

impl<T> RecordedAnimation<T> {
    /// Property values the effect currently applies to its target.
    pub fn computed(&self) -> Option<Keyframe> {
        if self.status == Status::Cancelled {
            return None;
        }
        self.options
            .progress_at(self.elapsed_ms)
            .map(|progress| sample_keyframes(&self.keyframes, progress))
    }
}

#[derive(Debug)]
struct EngineState<T> {
    ids: IdAllocator,
    animations: Vec<RecordedAnimation<T>>,
    /// Finish notifications queued by explicit `finish()` calls.
    queued: Vec<AnimationId>,
}

impl<T> EngineState<T> {
    fn get_mut(&mut self, id: AnimationId) -> Option<&mut RecordedAnimation<T>> {
        self.animations.iter_mut().find(|a| a.id == id)
    }
}

/// Virtual-time animation engine.
#[derive(Debug)]
pub struct ManualEngine<T> {
    state: Rc<RefCell<EngineState<T>>>,
}

impl<T> Default for ManualEngine<T> {
    fn default() -> Self {
        Self {
            state: Rc::new(RefCell::new(EngineState {
                ids: IdAllocator::new(),
                animations: Vec::new(),
                queued: Vec::new(),
            })),
        }
    }
}

impl<T: Clone> ManualEngine<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move virtual time forward by `ms` for every running animation.
    pub fn advance(&mut self, ms: f64) -> Vec<AnimationId> {
        let mut state = self.state.borrow_mut();
        let mut finished = std::mem::take(&mut state.queued);
        for anim in state.animations.iter_mut() {
            if anim.status != Status::Running {
                continue;
            }
            anim.elapsed_ms += ms;
            if let Some(end) = anim.options.end_time_ms() {
                if anim.elapsed_ms >= end {
                    anim.elapsed_ms = end;
                    anim.status = Status::Finished;
                    finished.push(anim.id);
                }
            }
        }
        finished
    }

    /// Run every finite running animation to its end. Infinite ones keep running.
    pub fn settle(&mut self) -> Vec<AnimationId> {
        let longest = self
            .state
            .borrow()
            .animations
            .iter()
            .filter(|a| a.status == Status::Running)
            .filter_map(|a| a.options.end_time_ms().map(|end| end - a.elapsed_ms))
            .fold(0.0_f64, f64::max);
        self.advance(longest)
    }

    pub fn animations(&self) -> Vec<RecordedAnimation<T>> {
        self.state.borrow().animations.clone()
    }

    pub fn animation(&self, id: AnimationId) -> Option<RecordedAnimation<T>> {
        self.state
            .borrow()
            .animations
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    /// Number of animations that are running or paused.
    pub fn live_count(&self) -> usize {
        self.state
            .borrow()
            .animations
            .iter()
            .filter(|a| matches!(a.status, Status::Running | Status::Paused))
            .count()
    }
}

/// Handle into a [`ManualEngine`].
#[derive(Debug)]
pub struct ManualHandle<T> {
    id: AnimationId,
    state: Rc<RefCell<EngineState<T>>>,
}

impl<T> ManualHandle<T> {
    fn with<R>(&self, f: impl FnOnce(&mut RecordedAnimation<T>) -> R) -> Result<R> {
        let mut state = self.state.borrow_mut();
        let anim = state.get_mut(self.id).ok_or_else(|| AnimationError::Engine {
            reason: format!("unknown animation {:?}", self.id),
        })?;
        Ok(f(anim))
    }
}

impl<T> AnimationHandle for ManualHandle<T> {
    fn id(&self) -> AnimationId {
        self.id
    }

    fn play(&mut self) -> Result<()> {
        self.with(|anim| match anim.status {
            Status::Paused => anim.status = Status::Running,
            Status::Finished | Status::Cancelled => {
                anim.elapsed_ms = 0.0;
                anim.status = Status::Running;
            }
            Status::Running => {}
        })
    }

    fn pause(&mut self) -> Result<()> {
        self.with(|anim| {
            if anim.status == Status::Running {
                anim.status = Status::Paused;
            }
        })
    }

    fn cancel(&mut self) {
        let _ = self.with(|anim| {
            anim.status = Status::Cancelled;
            anim.elapsed_ms = 0.0;
        });
    }

    fn finish(&mut self) -> Result<()> {
        let id = self.id;
        let newly_finished = self.with(|anim| {
            let end = anim.options.end_time_ms().ok_or_else(|| AnimationError::Engine {
                reason: "cannot finish an infinite animation".into(),
            })?;
            let was_finished = anim.status == Status::Finished;
            anim.elapsed_ms = end;
            anim.status = Status::Finished;
            Ok::<bool, AnimationError>(!was_finished)
        })??;
        if newly_finished {
            self.state.borrow_mut().queued.push(id);
        }
        Ok(())
    }
}

impl<T: Clone> AnimationEngine for ManualEngine<T> {
    type Target = T;
    type Handle = ManualHandle<T>;

    fn animate(
        &mut self,
        target: &T,
        keyframes: &[Keyframe],
        options: &AnimationOptions,
    ) -> Result<ManualHandle<T>> {
        let mut state = self.state.borrow_mut();
        let id = state.ids.alloc();
        state.animations.push(RecordedAnimation {
            id,
            target: target.clone(),
            keyframes: keyframes.to_vec(),
            options: options.clone(),
            status: Status::Running,
            elapsed_ms: 0.0,
        });
        Ok(ManualHandle {
            id,
            state: Rc::clone(&self.state),
        })
    }
}

/// Element handle inside a [`FakeDom`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FakeElement(pub u32);

#[derive(Clone, Debug)]
struct FakeNode {
    element: FakeElement,
    tag: String,
    display: Option<String>,
}

/// Flat stand-in for a component's subtree, in document order.
#[derive(Clone, Debug, Default)]
pub struct FakeDom {
    nodes: Vec<FakeNode>,
    attributes: HashMap<String, String>,
    next: u32,
}

impl FakeDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element, hidden (`display: none`) the way projected content arrives.
    pub fn push(&mut self, tag: &str) -> FakeElement {
        let element = FakeElement(self.next);
        self.next += 1;
        self.nodes.push(FakeNode {
            element,
            tag: tag.to_string(),
            display: Some("none".to_string()),
        });
        element
    }

    pub fn push_marker(&mut self, marker: Marker) -> FakeElement {
        self.push(marker.tag_name())
    }

    pub fn with_child(mut self, tag: &str) -> Self {
        self.push(tag);
        self
    }

    pub fn with_markers(mut self) -> Self {
        self.push_marker(Marker::From);
        self.push_marker(Marker::To);
        self
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    pub fn remove(&mut self, element: FakeElement) {
        self.nodes.retain(|n| n.element != element);
    }

    pub fn display_of(&self, element: FakeElement) -> Option<&str> {
        self.nodes
            .iter()
            .find(|n| n.element == element)
            .and_then(|n| n.display.as_deref())
    }

    pub fn is_hidden(&self, element: FakeElement) -> bool {
        self.display_of(element) == Some("none")
    }
}

impl DomView for FakeDom {
    type Element = FakeElement;

    fn first_child(&self) -> Option<FakeElement> {
        self.nodes.first().map(|n| n.element)
    }

    fn find_tag(&self, tag: &str) -> Option<FakeElement> {
        self.nodes
            .iter()
            .find(|n| n.tag == tag)
            .map(|n| n.element)
    }

    fn reveal(&mut self, element: &FakeElement) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.element == *element) {
            node.display = Some("inline-block".to_string());
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;
    use crate::timing::{FillMode, Iterations};

    #[test]
    fn advance_reports_each_natural_finish_once() {
        let mut engine = ManualEngine::<u8>::new();
        let opts = AnimationOptions {
            duration_ms: 100,
            ..Default::default()
        };
        let h = engine.animate(&0, &presets::fade_out(), &opts).unwrap();
        assert!(engine.advance(99.0).is_empty());
        assert_eq!(engine.advance(1.0), vec![h.id()]);
        assert!(engine.advance(1000.0).is_empty());
    }

    #[test]
    fn explicit_finish_is_queued_and_infinite_cannot_finish() {
        let mut engine = ManualEngine::<u8>::new();
        let opts = AnimationOptions {
            duration_ms: 100,
            fill: FillMode::Forwards,
            ..Default::default()
        };
        let mut h = engine.animate(&0, &presets::fade_out(), &opts).unwrap();
        h.finish().unwrap();
        assert_eq!(engine.advance(0.0), vec![h.id()]);
        let computed = engine.animation(h.id()).unwrap().computed().unwrap();
        assert_eq!(computed.get("opacity"), Some("0"));

        let spin = presets::spin(3000);
        let mut h = engine.animate(&1, &spin.keyframes, &spin.options).unwrap();
        assert!(h.finish().is_err());
        assert_eq!(spin.options.iterations, Iterations::Infinite);
    }

    #[test]
    fn fake_dom_reveals_and_finds_markers() {
        let mut dom = FakeDom::new().with_child("div").with_markers();
        let to = dom.find_marker(Marker::To).unwrap();
        assert!(dom.is_hidden(to));
        dom.reveal(&to);
        assert_eq!(dom.display_of(to), Some("inline-block"));
        assert_eq!(dom.first_child(), Some(FakeElement(0)));
    }
}
