//! Outward-facing delegate notified by the controller.

use crate::component::Component;
use crate::item::Item;
use crate::threshold::FetchCompletion;

/// Requests a delegate may make while handling a callback.
///
/// The controller applies them once the callback has returned, so a
/// delegate can ask for a reload without re-entering the controller.
#[derive(Debug)]
pub struct DelegateContext<P> {
    reload: Option<Vec<Component<P>>>,
}

impl<P> Default for DelegateContext<P> {
    fn default() -> Self {
        Self { reload: None }
    }
}

impl<P> DelegateContext<P> {
    /// Replaces the controller's components after the callback returns.
    /// A later request overrides an earlier one.
    pub fn reload(&mut self, components: Vec<Component<P>>) {
        self.reload = Some(components);
    }

    pub fn has_requests(&self) -> bool {
        self.reload.is_some()
    }

    pub(crate) fn take_reload(&mut self) -> Option<Vec<Component<P>>> {
        self.reload.take()
    }
}

/// Receives selection, structure and pagination notifications.
///
/// The threshold callbacks complete their handle immediately by default, so
/// delegates that do not paginate never leave an edge suppressed.
pub trait AdapterDelegate<P> {
    fn on_select(&mut self, component: &Component<P>, item: &Item<P>, cx: &mut DelegateContext<P>) {
        let _ = (component, item, cx);
    }

    fn on_components_changed(&mut self, components: &[Component<P>], cx: &mut DelegateContext<P>) {
        let _ = (components, cx);
    }

    fn on_reached_beginning(&mut self, completion: FetchCompletion, cx: &mut DelegateContext<P>) {
        let _ = cx;
        completion.complete();
    }

    fn on_reached_end(&mut self, completion: FetchCompletion, cx: &mut DelegateContext<P>) {
        let _ = cx;
        completion.complete();
    }
}
