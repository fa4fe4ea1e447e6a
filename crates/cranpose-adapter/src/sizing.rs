//! Size negotiation for items and components.
//!
//! Items keep their measured size across layout passes; only items still at
//! the unmeasured sentinel (or explicitly invalidated) are measured again.
//! Component heights are cached on the component and only grow while the
//! cache is valid.

use cranpose_ui_graphics::Size;

use crate::component::{Component, LayoutHints, LayoutKind};
use crate::error::AdapterError;
use crate::item::Item;
use crate::reuse::item_identifier;

/// Row-major grid arrangement used to derive a grid component's content size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    span: usize,
}

impl GridLayout {
    pub fn new(span: usize) -> Self {
        Self { span: span.max(1) }
    }

    pub fn span(&self) -> usize {
        self.span
    }

    pub fn row_count(&self, item_count: usize) -> usize {
        item_count.div_ceil(self.span)
    }

    /// Content size of `items` laid out in rows of `span`; each row is as
    /// tall as its tallest item.
    pub fn content_size<P>(&self, items: &[Item<P>], width: f32) -> Size {
        let height = items
            .chunks(self.span)
            .map(|row| {
                row.iter()
                    .map(|item| item.size().height)
                    .fold(0.0_f32, f32::max)
            })
            .sum();
        Size::new(width, height)
    }
}

/// Height of a component's content plus its header and footer.
///
/// Lists sum their item heights, grids take the grid content height and
/// carousels take their tallest item.
pub fn computed_height<P>(component: &Component<P>) -> f32 {
    let hints = component.hints();
    let items = component.items();
    let content = match component.layout() {
        LayoutKind::List => items.iter().map(|item| item.size().height).sum(),
        LayoutKind::Grid => {
            GridLayout::new(hints.effective_span())
                .content_size(items, 0.0)
                .height
        }
        LayoutKind::Carousel => items
            .iter()
            .map(|item| item.size().height)
            .fold(0.0_f32, f32::max),
    };
    content + hints.header_height + hints.footer_height
}

/// Measures stale items of `component` and caches its size for `new_size`.
///
/// `measure` is called with the resolved reuse identifier for every item that
/// still needs a size; already measured items are left alone. The cached
/// size becomes `{ new_size.width, ceil(computed height) }`, except that a
/// still valid, larger cached height is kept.
pub fn layout<P, F>(
    component: &mut Component<P>,
    new_size: Size,
    mut measure: F,
) -> Result<Size, AdapterError>
where
    F: FnMut(&str, &mut Item<P>) -> Result<Size, AdapterError>,
{
    let layout_kind = component.layout;
    let hints = component.hints;
    for item in component.items.iter_mut().filter(|item| !item.is_measured()) {
        let identifier = item_identifier(item, &component.kind)
            .map(str::to_owned)
            .ok_or(AdapterError::EmptyIdentifier {
                component: component.index,
                index: item.index,
            })?;
        let measured = measure(&identifier, &mut *item)?;
        item.adopt_size(fit_to_layout(measured, layout_kind, &hints, new_size.width));
    }

    let height = computed_height(component).ceil();
    let height = match component.cached_size {
        Some(cached) if cached.height > height => cached.height,
        _ => height,
    };
    let size = Size::new(new_size.width, height);
    component.cached_size = Some(size);
    Ok(size)
}

/// Applies an externally supplied preferred height if it exceeds the cached one.
pub fn reconcile_preferred_height<P>(component: &mut Component<P>) -> Option<Size> {
    let preferred = component.hints.preferred_height;
    let size = component.cached_size.get_or_insert(Size::ZERO);
    if let Some(preferred) = preferred {
        if preferred > size.height {
            size.height = preferred;
        }
    }
    component.cached_size
}

fn fit_to_layout(measured: Size, kind: LayoutKind, hints: &LayoutHints, width: f32) -> Size {
    match kind {
        LayoutKind::List => measured.with_width(width),
        LayoutKind::Grid if measured.width <= 0.0 => {
            measured.with_width(width / hints.effective_span() as f32)
        }
        LayoutKind::Grid | LayoutKind::Carousel => measured,
    }
}
