use std::cell::Cell as Counter;
use std::fmt::Debug;
use std::rc::Rc;

use cranpose_adapter::{Cell, Item};
use cranpose_ui_graphics::Size;

/// Shared count of `configure` calls across every cell of a factory.
pub type ConfigureCounter = Rc<Counter<usize>>;

/// Cell with a fixed intrinsic size.
#[derive(Debug)]
pub struct FixedCell {
    size: Size,
    configured: ConfigureCounter,
}

impl FixedCell {
    pub fn new(size: Size) -> Self {
        Self::counted(size, ConfigureCounter::default())
    }

    pub fn counted(size: Size, configured: ConfigureCounter) -> Self {
        Self { size, configured }
    }
}

impl<P> Cell<P> for FixedCell {
    fn configure(&mut self, _item: &mut Item<P>) {
        self.configured.set(self.configured.get() + 1);
    }

    fn intrinsic_size(&self) -> Size {
        self.size
    }
}

/// Returns a factory building [`FixedCell`]s of `height` plus the counter
/// they share.
pub fn fixed_factory<P>(height: f32) -> (impl Fn() -> Box<dyn Cell<P>>, ConfigureCounter) {
    let configured = ConfigureCounter::default();
    let shared = Rc::clone(&configured);
    let factory = move || {
        Box::new(FixedCell::counted(
            Size::new(0.0, height),
            Rc::clone(&shared),
        )) as Box<dyn Cell<P>>
    };
    (factory, configured)
}

/// Cell whose height is derived from the payload and which remembers the
/// last payload it rendered.
pub struct PayloadCell<P> {
    height_of: fn(&P) -> f32,
    height: f32,
    last: Option<String>,
}

impl<P> PayloadCell<P> {
    pub fn new(height_of: fn(&P) -> f32) -> Self {
        Self {
            height_of,
            height: 0.0,
            last: None,
        }
    }

    pub fn last_rendered(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

impl<P: Debug> Cell<P> for PayloadCell<P> {
    fn configure(&mut self, item: &mut Item<P>) {
        self.height = (self.height_of)(&item.payload);
        self.last = Some(format!("{:?}", item.payload));
    }

    fn intrinsic_size(&self) -> Size {
        Size::new(0.0, self.height)
    }
}
