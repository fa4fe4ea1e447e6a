//! Component model: an ordered group of items rendered as one view.

use cranpose_ui_graphics::Size;

use crate::host::ViewId;
use crate::item::Item;
use crate::selection::SingleSelection;

/// How a component arranges its items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutKind {
    /// Vertical stack; height is the sum of item heights.
    #[default]
    List,
    /// Row-major grid with `LayoutHints::span` columns.
    Grid,
    /// Horizontal strip; height is the tallest item.
    Carousel,
}

/// Layout hints carried by a component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutHints {
    /// Number of columns for [`LayoutKind::Grid`]. Values below 1 are treated as 1.
    pub span: usize,
    pub header_height: f32,
    pub footer_height: f32,
    /// Externally supplied height. Wins over the computed height when larger.
    pub preferred_height: Option<f32>,
}

impl Default for LayoutHints {
    fn default() -> Self {
        Self {
            span: 1,
            header_height: 0.0,
            footer_height: 0.0,
            preferred_height: None,
        }
    }
}

impl LayoutHints {
    pub fn with_span(mut self, span: usize) -> Self {
        self.span = span;
        self
    }

    pub fn with_header_height(mut self, height: f32) -> Self {
        self.header_height = height;
        self
    }

    pub fn with_footer_height(mut self, height: f32) -> Self {
        self.footer_height = height;
        self
    }

    pub fn with_preferred_height(mut self, height: f32) -> Self {
        self.preferred_height = Some(height);
        self
    }

    pub(crate) fn effective_span(&self) -> usize {
        self.span.max(1)
    }
}

/// A child component embedded in the cell of one of its parent's items.
#[derive(Clone, Debug)]
pub struct Composite<P> {
    pub item_index: usize,
    pub component: Component<P>,
}

/// Ordered collection of items plus component-level metadata.
///
/// Item order is the only source of visible order. Every structural mutation
/// rewrites item indices and drops the cached size, which the sizing pass
/// recomputes. Children are owned outright, so the composite graph is always
/// a tree.
#[derive(Clone, Debug)]
pub struct Component<P> {
    pub(crate) kind: String,
    pub(crate) layout: LayoutKind,
    pub(crate) hints: LayoutHints,
    pub(crate) items: Vec<Item<P>>,
    pub(crate) cached_size: Option<Size>,
    pub(crate) index: usize,
    pub(crate) composites: Vec<Composite<P>>,
    pub(crate) view: Option<ViewId>,
    pub(crate) selection: SingleSelection,
}

impl<P> Component<P> {
    pub fn new(kind: impl Into<String>, layout: LayoutKind) -> Self {
        Self {
            kind: kind.into(),
            layout,
            hints: LayoutHints::default(),
            items: Vec::new(),
            cached_size: None,
            index: 0,
            composites: Vec::new(),
            view: None,
            selection: SingleSelection::default(),
        }
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = Item<P>>) -> Self {
        self.set_items(items);
        self
    }

    pub fn with_hints(mut self, hints: LayoutHints) -> Self {
        self.hints = hints;
        self.cached_size = None;
        self
    }

    /// Embeds `child` in the cell of the item at `item_index`.
    pub fn with_composite(mut self, item_index: usize, child: Component<P>) -> Self {
        self.composites.push(Composite {
            item_index,
            component: child,
        });
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn layout(&self) -> LayoutKind {
        self.layout
    }

    pub fn hints(&self) -> &LayoutHints {
        &self.hints
    }

    pub fn items(&self) -> &[Item<P>] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&Item<P>> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Size from the last layout pass, if still valid.
    pub fn cached_size(&self) -> Option<Size> {
        self.cached_size
    }

    pub fn composites(&self) -> &[Composite<P>] {
        &self.composites
    }

    /// View assigned when the component was set up.
    pub fn view(&self) -> Option<ViewId> {
        self.view
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selection.selected()
    }

    pub fn selected_item(&self) -> Option<&Item<P>> {
        self.selection.selected().and_then(|index| self.items.get(index))
    }

    pub fn set_items(&mut self, items: impl IntoIterator<Item = Item<P>>) {
        self.items = items.into_iter().collect();
        let len = self.items.len();
        self.composites.retain(|composite| composite.item_index < len);
        self.selection.clear();
        self.structure_changed();
    }

    pub fn push_item(&mut self, item: Item<P>) {
        self.insert_items(self.items.len(), [item]);
    }

    /// Inserts `item` at `index`, clamped to the end of the sequence.
    pub fn insert_item(&mut self, index: usize, item: Item<P>) {
        self.insert_items(index, [item]);
    }

    /// Inserts `items` before `index` (clamped to the end), keeping the
    /// selection and composites attached to the items they referred to.
    pub fn insert_items(&mut self, index: usize, items: impl IntoIterator<Item = Item<P>>) {
        let index = index.min(self.items.len());
        let before = self.items.len();
        self.items.splice(index..index, items);
        let count = self.items.len() - before;
        if count == 0 {
            return;
        }
        self.selection.shift_for_insert(index, count);
        for composite in &mut self.composites {
            if composite.item_index >= index {
                composite.item_index += count;
            }
        }
        self.structure_changed();
    }

    /// Replaces the item at `index`, returning the previous one.
    pub fn replace_item(&mut self, index: usize, item: Item<P>) -> Option<Item<P>> {
        let slot = self.items.get_mut(index)?;
        let previous = std::mem::replace(slot, item);
        self.structure_changed();
        Some(previous)
    }

    pub fn remove_item(&mut self, index: usize) -> Option<Item<P>> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        self.selection.shift_for_remove(index);
        self.composites.retain(|composite| composite.item_index != index);
        for composite in &mut self.composites {
            if composite.item_index > index {
                composite.item_index -= 1;
            }
        }
        self.structure_changed();
        Some(removed)
    }

    /// Marks every item (and every composite child) for re-measurement.
    pub fn invalidate_sizes(&mut self) {
        for item in &mut self.items {
            item.invalidate_size();
        }
        for composite in &mut self.composites {
            composite.component.invalidate_sizes();
        }
        self.cached_size = None;
    }

    /// Drops host-side state so the component can be set up in a new view.
    pub(crate) fn reset_view_state(&mut self) {
        self.view = None;
        self.selection.clear();
        for composite in &mut self.composites {
            composite.component.reset_view_state();
        }
    }

    pub(crate) fn reindex(&mut self) {
        for (position, item) in self.items.iter_mut().enumerate() {
            item.index = position;
        }
    }

    fn structure_changed(&mut self) {
        self.reindex();
        self.cached_size = None;
    }
}
