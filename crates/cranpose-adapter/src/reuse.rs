//! Reuse identifier resolution and cell configuration.
//!
//! Identifiers are resolved on every cell request rather than cached, so an
//! item whose kind changes between requests is picked up immediately.

use crate::component::Component;
use crate::host::{Cell, ViewContainer};
use crate::item::Item;

/// Resolves the identifier for an item given its component's default kind.
pub fn item_identifier<'a, P>(item: &'a Item<P>, component_kind: &'a str) -> Option<&'a str> {
    item.kind()
        .or_else(|| Some(component_kind).filter(|kind| !kind.is_empty()))
}

/// Returns the reuse identifier for the item at `index`.
///
/// The item's own kind wins when present and non-empty; otherwise the
/// component kind is used. Returns `None` if `index` is out of range or
/// neither kind is set.
pub fn resolve_identifier<P>(component: &Component<P>, index: usize) -> Option<&str> {
    let item = component.item(index)?;
    item_identifier(item, component.kind())
}

/// Binds `cell` to the item at `index`.
///
/// Stamps the current index into the item, lets the cell configure itself
/// against it, and adopts the cell's intrinsic size if the item has not been
/// measured yet. The owning view's layout is invalidated afterwards.
///
/// Returns `false` without touching anything if `index` no longer exists.
pub fn configure_cell<P, C>(
    component: &mut Component<P>,
    index: usize,
    cell: &mut dyn Cell<P>,
    container: &mut C,
) -> bool
where
    C: ViewContainer + ?Sized,
{
    let Some(item) = component.items.get_mut(index) else {
        return false;
    };

    item.index = index;
    cell.configure(item);
    if !item.is_measured() {
        item.adopt_size(cell.intrinsic_size());
        component.cached_size = None;
    }

    container.invalidate_layout();
    true
}
