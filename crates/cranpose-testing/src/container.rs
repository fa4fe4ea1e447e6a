use cranpose_adapter::{ViewContainer, ViewId};
use cranpose_ui_graphics::{Point, Size};

/// In-memory host container that records every call the adapter makes.
#[derive(Clone, Debug, Default)]
pub struct FakeViewContainer {
    pub attached: Vec<ViewId>,
    pub detached: Vec<ViewId>,
    pub deselected: Vec<(ViewId, usize)>,
    pub invalidations: usize,
    pub offset: Point,
    pub content_size: Size,
    pub viewport_size: Size,
}

impl FakeViewContainer {
    pub fn new(viewport_size: Size) -> Self {
        Self {
            viewport_size,
            ..Self::default()
        }
    }

    /// Positions the viewport at `offset_y` over content of `content_height`.
    pub fn scroll_to(&mut self, offset_y: f32, content_height: f32) {
        self.offset = Point::new(self.offset.x, offset_y);
        self.content_size = Size::new(self.viewport_size.width, content_height);
    }

    pub fn is_attached(&self, view: ViewId) -> bool {
        self.attached.contains(&view)
    }
}

impl ViewContainer for FakeViewContainer {
    fn attach(&mut self, view: ViewId) {
        log::trace!("FakeViewContainer: attach {}", view);
        self.attached.push(view);
    }

    fn detach(&mut self, view: ViewId) {
        log::trace!("FakeViewContainer: detach {}", view);
        self.attached.retain(|attached| *attached != view);
        self.detached.push(view);
    }

    fn invalidate_layout(&mut self) {
        self.invalidations += 1;
    }

    fn content_size(&self) -> Size {
        self.content_size
    }

    fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    fn offset(&self) -> Point {
        self.offset
    }

    fn deselect(&mut self, view: ViewId, index: usize) {
        self.deselected.push((view, index));
    }
}
