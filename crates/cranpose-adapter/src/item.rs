//! Item model: one renderable entry inside a component.

use cranpose_ui_graphics::Size;

/// Height marking an item whose size has not been measured yet.
pub const UNMEASURED_HEIGHT: f32 = 0.0;

/// A single renderable entry with its position and measured size.
///
/// `index` always equals the item's position within its owning component;
/// the component rewrites it on every structural change. A height of
/// [`UNMEASURED_HEIGHT`] means the size still has to be negotiated.
#[derive(Clone, Debug, PartialEq)]
pub struct Item<P> {
    pub(crate) index: usize,
    /// Reuse identifier override. Empty strings fall back to the component kind.
    pub kind: Option<String>,
    pub(crate) size: Size,
    pub payload: P,
}

impl<P> Item<P> {
    pub fn new(payload: P) -> Self {
        Self {
            index: 0,
            kind: None,
            size: Size::ZERO,
            payload,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Seeds the item with an already known size so it is not measured again.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the item's own reuse identifier, ignoring empty overrides.
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref().filter(|kind| !kind.is_empty())
    }

    pub fn is_measured(&self) -> bool {
        self.size.height != UNMEASURED_HEIGHT
    }

    /// Marks the item for re-measurement on the next layout pass.
    pub fn invalidate_size(&mut self) {
        self.size.height = UNMEASURED_HEIGHT;
    }

    pub(crate) fn adopt_size(&mut self, size: Size) {
        self.size = size;
    }
}
