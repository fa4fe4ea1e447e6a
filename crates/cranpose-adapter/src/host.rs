//! Interfaces consumed from, and exposed to, the host toolkit.

use cranpose_ui_graphics::{Point, Size};

use crate::component::Component;
use crate::error::AdapterError;
use crate::item::Item;

/// Identifies a component view inside the host container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Scrollable host container that component views are attached to.
pub trait ViewContainer {
    fn attach(&mut self, view: ViewId);

    fn detach(&mut self, view: ViewId);

    fn invalidate_layout(&mut self);

    fn content_size(&self) -> Size;

    fn viewport_size(&self) -> Size;

    fn offset(&self) -> Point;

    /// Clears the host-side selection highlight of `index` in `view`.
    fn deselect(&mut self, view: ViewId, index: usize) {
        let _ = (view, index);
    }
}

/// A recyclable cell able to render an item.
pub trait Cell<P> {
    /// Binds the cell to `item`. Cells may update the item's payload or kind.
    fn configure(&mut self, item: &mut Item<P>);

    /// Size the cell wants after its last configuration.
    fn intrinsic_size(&self) -> Size;
}

/// Produces cells for reuse identifiers.
pub trait CellProvider<P> {
    /// Returns a cell for `identifier` bound to slot `index`, or `None` when
    /// the identifier is not registered.
    fn dequeue(&mut self, identifier: &str, index: usize) -> Option<&mut dyn Cell<P>>;
}

/// Supplies an initial ordered component collection, typically decoded from
/// a transport or persisted representation.
pub trait ComponentSource<P> {
    fn components(&self) -> Vec<Component<P>>;
}

impl<P: Clone> ComponentSource<P> for Vec<Component<P>> {
    fn components(&self) -> Vec<Component<P>> {
        self.clone()
    }
}

/// Receives scroll and resize notifications from the host container.
///
/// Hosts call these synchronously on the UI thread, in the order the events
/// occurred.
pub trait ViewObserver {
    fn did_scroll(&mut self) -> Result<(), AdapterError>;

    fn did_resize(&mut self, viewport: Size) -> Result<(), AdapterError>;
}
