use std::cell::RefCell;
use std::rc::Rc;

use cranpose_adapter::{
    AdapterDelegate, Component, DelegateContext, Edge, FetchCompletion, Item,
};

/// Notification observed by a [`RecordingDelegate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DelegateEvent {
    Selected { component: usize, index: usize },
    ComponentsChanged(usize),
    Reached(Edge),
}

struct Recording<P> {
    events: Vec<DelegateEvent>,
    completions: Vec<FetchCompletion>,
    reload_on_select: Option<Vec<Component<P>>>,
    reload_on_end: Option<Vec<Component<P>>>,
}

/// Delegate that records every callback and keeps fetch completions until
/// the test runs them.
///
/// Clones share the same recording, so a test can hand one clone to the
/// controller and inspect another.
pub struct RecordingDelegate<P> {
    inner: Rc<RefCell<Recording<P>>>,
}

impl<P> Clone for RecordingDelegate<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<P> Default for RecordingDelegate<P> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Recording {
                events: Vec::new(),
                completions: Vec::new(),
                reload_on_select: None,
                reload_on_end: None,
            })),
        }
    }
}

impl<P> RecordingDelegate<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DelegateEvent> {
        self.inner.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.inner.borrow_mut().events.clear();
    }

    pub fn selections(&self) -> Vec<(usize, usize)> {
        self.inner
            .borrow()
            .events
            .iter()
            .filter_map(|event| match event {
                DelegateEvent::Selected { component, index } => Some((*component, *index)),
                _ => None,
            })
            .collect()
    }

    pub fn pending_completions(&self) -> usize {
        self.inner.borrow().completions.len()
    }

    /// Runs every stored completion, oldest first.
    pub fn complete_all(&self) {
        let completions = std::mem::take(&mut self.inner.borrow_mut().completions);
        for completion in completions {
            completion.complete();
        }
    }

    /// Requests a reload with `components` from the next `on_select`.
    pub fn reload_on_select(&self, components: Vec<Component<P>>) {
        self.inner.borrow_mut().reload_on_select = Some(components);
    }

    /// Requests a reload with `components` from the next `on_reached_end`.
    pub fn reload_on_end(&self, components: Vec<Component<P>>) {
        self.inner.borrow_mut().reload_on_end = Some(components);
    }

    fn reached(&self, completion: FetchCompletion) {
        let mut recording = self.inner.borrow_mut();
        recording.events.push(DelegateEvent::Reached(completion.edge()));
        recording.completions.push(completion);
    }
}

impl<P> AdapterDelegate<P> for RecordingDelegate<P> {
    fn on_select(&mut self, component: &Component<P>, item: &Item<P>, cx: &mut DelegateContext<P>) {
        let mut recording = self.inner.borrow_mut();
        recording.events.push(DelegateEvent::Selected {
            component: component.index(),
            index: item.index(),
        });
        if let Some(components) = recording.reload_on_select.take() {
            cx.reload(components);
        }
    }

    fn on_components_changed(&mut self, components: &[Component<P>], _cx: &mut DelegateContext<P>) {
        self.inner
            .borrow_mut()
            .events
            .push(DelegateEvent::ComponentsChanged(components.len()));
    }

    fn on_reached_beginning(&mut self, completion: FetchCompletion, _cx: &mut DelegateContext<P>) {
        self.reached(completion);
    }

    fn on_reached_end(&mut self, completion: FetchCompletion, cx: &mut DelegateContext<P>) {
        self.reached(completion);
        if let Some(components) = self.inner.borrow_mut().reload_on_end.take() {
            cx.reload(components);
        }
    }
}
