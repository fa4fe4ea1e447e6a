//! Scroll threshold detection for pagination and pull to refresh.
//!
//! The detector watches scroll metrics delivered by the host and reports when
//! the content was overscrolled past its beginning or scrolled close to its
//! end. Each report hands out a [`FetchCompletion`]; the same edge does not
//! fire again until that completion runs. The scroll offsets that triggered
//! an end fetch are additionally remembered for the lifetime of the current
//! content, so returning to an already handled offset never re-triggers the
//! same fetch, while a different qualifying offset can retry it.

use std::cell::RefCell;
use std::rc::Rc;

use cranpose_ui_graphics::{Point, Rect, Size};
use smallvec::SmallVec;

/// Two recorded thresholds closer than this are considered the same.
const THRESHOLD_TOLERANCE: f32 = 0.5;

/// Scroll edge a notification refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Beginning,
    End,
}

/// Which fetches are currently outstanding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThresholdPhase {
    Idle,
    PendingBeginning,
    PendingEnd,
    PendingBoth,
}

/// Snapshot of the host container's scroll geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    pub content_offset: Point,
    pub content_size: Size,
    pub viewport_size: Size,
}

impl ScrollMetrics {
    pub fn new(content_offset: Point, content_size: Size, viewport_size: Size) -> Self {
        Self {
            content_offset,
            content_size,
            viewport_size,
        }
    }

    /// Portion of the content currently visible in the viewport.
    pub fn visible_rect(&self) -> Rect {
        Rect::from_origin_size(self.content_offset, self.viewport_size)
    }
}

/// Tuning for the end threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdConfig {
    /// Lower bound of the viewport multiplier used to pull the end threshold
    /// up from the content end.
    pub minimum_multiplier: f32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            minimum_multiplier: 1.5,
        }
    }
}

/// Notifications produced by a single scroll observation.
#[derive(Debug, Default)]
pub struct ThresholdEvents {
    pub beginning: Option<FetchCompletion>,
    pub end: Option<FetchCompletion>,
}

impl ThresholdEvents {
    pub fn is_empty(&self) -> bool {
        self.beginning.is_none() && self.end.is_none()
    }
}

#[derive(Debug, Default)]
struct RefreshState {
    generation: u64,
    refreshing_beginning: bool,
    refreshing_end: bool,
}

/// Handle given to the fetch consumer; running it re-arms its edge.
///
/// Handles outlive resets: completing a handle issued before the last
/// [`ScrollThresholdDetector::reset`] does nothing.
#[derive(Debug)]
#[must_use = "the edge stays suppressed until the completion runs"]
pub struct FetchCompletion {
    edge: Edge,
    generation: u64,
    state: Rc<RefCell<RefreshState>>,
}

impl FetchCompletion {
    pub fn edge(&self) -> Edge {
        self.edge
    }

    pub fn complete(self) {
        let mut state = self.state.borrow_mut();
        if state.generation != self.generation {
            log::debug!(
                "ScrollThresholdDetector: ignoring {:?} completion from a discarded generation",
                self.edge
            );
            return;
        }
        match self.edge {
            Edge::Beginning => state.refreshing_beginning = false,
            Edge::End => state.refreshing_end = false,
        }
    }
}

/// Edge detector driven by host scroll notifications.
#[derive(Debug)]
pub struct ScrollThresholdDetector {
    config: ThresholdConfig,
    metrics: ScrollMetrics,
    pending_thresholds: SmallVec<[f32; 8]>,
    state: Rc<RefCell<RefreshState>>,
}

impl Default for ScrollThresholdDetector {
    fn default() -> Self {
        Self::new(ThresholdConfig::default())
    }
}

impl ScrollThresholdDetector {
    pub fn new(config: ThresholdConfig) -> Self {
        Self {
            config,
            metrics: ScrollMetrics::default(),
            pending_thresholds: SmallVec::new(),
            state: Rc::new(RefCell::new(RefreshState::default())),
        }
    }

    pub fn metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    pub fn phase(&self) -> ThresholdPhase {
        let state = self.state.borrow();
        match (state.refreshing_beginning, state.refreshing_end) {
            (false, false) => ThresholdPhase::Idle,
            (true, false) => ThresholdPhase::PendingBeginning,
            (false, true) => ThresholdPhase::PendingEnd,
            (true, true) => ThresholdPhase::PendingBoth,
        }
    }

    pub fn is_refreshing(&self, edge: Edge) -> bool {
        let state = self.state.borrow();
        match edge {
            Edge::Beginning => state.refreshing_beginning,
            Edge::End => state.refreshing_end,
        }
    }

    /// Scroll offsets that triggered an end fetch for the current content,
    /// in the order they fired.
    pub fn pending_thresholds(&self) -> &[f32] {
        &self.pending_thresholds
    }

    /// Viewport multiplier for the next end threshold. Grows with every
    /// recorded trigger offset so later pages are requested earlier.
    pub fn end_multiplier(&self) -> f32 {
        (1.0 + self.pending_thresholds.len() as f32).max(self.config.minimum_multiplier)
    }

    /// Evaluates `metrics` and reports the edges that were crossed.
    pub fn observe(&mut self, metrics: ScrollMetrics) -> ThresholdEvents {
        self.metrics = metrics;
        let mut events = ThresholdEvents::default();

        let content_height = metrics.content_size.height;
        let viewport_height = metrics.viewport_size.height;
        if content_height <= 0.0 || viewport_height > content_height {
            return events;
        }

        if metrics.content_offset.y < 0.0 && !self.is_refreshing(Edge::Beginning) {
            log::debug!(
                "ScrollThresholdDetector: reached beginning at offset {}",
                metrics.content_offset.y
            );
            events.beginning = Some(self.begin_fetch(Edge::Beginning));
        }

        let trigger = metrics.content_offset.y;
        let visible_end = metrics.visible_rect().max_y();
        let threshold = content_height - viewport_height * self.end_multiplier();
        if visible_end > threshold
            && !self.is_refreshing(Edge::End)
            && !self.is_recorded(trigger)
        {
            log::debug!(
                "ScrollThresholdDetector: reached end at offset {} ({} > {}), content height {}",
                trigger,
                visible_end,
                threshold,
                content_height
            );
            self.pending_thresholds.push(trigger);
            events.end = Some(self.begin_fetch(Edge::End));
        }

        events
    }

    /// Forgets all thresholds and outstanding fetches. Completions issued
    /// before the reset become no-ops.
    pub fn reset(&mut self) {
        let mut state = self.state.borrow_mut();
        state.generation = state.generation.wrapping_add(1);
        state.refreshing_beginning = false;
        state.refreshing_end = false;
        drop(state);
        self.pending_thresholds.clear();
        self.metrics = ScrollMetrics::default();
    }

    fn is_recorded(&self, trigger: f32) -> bool {
        self.pending_thresholds
            .iter()
            .any(|recorded| (recorded - trigger).abs() < THRESHOLD_TOLERANCE)
    }

    fn begin_fetch(&mut self, edge: Edge) -> FetchCompletion {
        let mut state = self.state.borrow_mut();
        match edge {
            Edge::Beginning => state.refreshing_beginning = true,
            Edge::End => state.refreshing_end = true,
        }
        FetchCompletion {
            edge,
            generation: state.generation,
            state: Rc::clone(&self.state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(offset: f32, content: f32, viewport: f32) -> ScrollMetrics {
        ScrollMetrics::new(
            Point::new(0.0, offset),
            Size::new(320.0, content),
            Size::new(320.0, viewport),
        )
    }

    #[test]
    fn end_fires_once_per_threshold() {
        let mut detector = ScrollThresholdDetector::default();

        let events = detector.observe(metrics(850.0, 1000.0, 200.0));
        let completion = events.end.expect("end threshold crossed");
        assert_eq!(completion.edge(), Edge::End);
        assert_eq!(detector.phase(), ThresholdPhase::PendingEnd);

        assert!(detector.observe(metrics(850.0, 1000.0, 200.0)).is_empty());

        completion.complete();
        assert_eq!(detector.phase(), ThresholdPhase::Idle);
        // Same offset: already recorded.
        assert!(detector.observe(metrics(850.0, 1000.0, 200.0)).is_empty());
    }

    #[test]
    fn end_does_not_fire_above_threshold() {
        let mut detector = ScrollThresholdDetector::default();
        // 400 + 200 = 600, threshold 1000 - 200 * 1.5 = 700
        assert!(detector.observe(metrics(400.0, 1000.0, 200.0)).is_empty());
        assert!(detector.pending_thresholds().is_empty());
    }

    #[test]
    fn new_content_rearms_the_end_edge() {
        let mut detector = ScrollThresholdDetector::default();
        detector
            .observe(metrics(850.0, 1000.0, 200.0))
            .end
            .unwrap()
            .complete();
        assert_eq!(detector.end_multiplier(), 2.0);

        // More content arrived: threshold 2000 - 200 * 2 = 1600.
        assert!(detector.observe(metrics(1300.0, 2000.0, 200.0)).is_empty());
        let events = detector.observe(metrics(1500.0, 2000.0, 200.0));
        assert!(events.end.is_some());
        assert_eq!(detector.pending_thresholds(), &[850.0, 1500.0]);
    }

    #[test]
    fn completed_fetch_can_retry_from_another_offset() {
        let mut detector = ScrollThresholdDetector::default();
        detector
            .observe(metrics(850.0, 1000.0, 200.0))
            .end
            .unwrap()
            .complete();

        // The page came back empty: content height is unchanged.
        // Threshold is now 1000 - 200 * 2 = 600.
        let events = detector.observe(metrics(820.0, 1000.0, 200.0));
        assert!(events.end.is_some());
        assert_eq!(detector.pending_thresholds(), &[850.0, 820.0]);
    }

    #[test]
    fn beginning_fires_on_overscroll_until_completed() {
        let mut detector = ScrollThresholdDetector::default();
        let completion = detector
            .observe(metrics(-60.0, 1000.0, 200.0))
            .beginning
            .expect("overscroll past the top");
        assert!(detector.observe(metrics(-80.0, 1000.0, 200.0)).is_empty());

        completion.complete();
        assert!(detector.observe(metrics(-80.0, 1000.0, 200.0)).beginning.is_some());
    }

    #[test]
    fn both_edges_can_be_pending_together() {
        let mut detector = ScrollThresholdDetector::default();
        // Short content that still exceeds the viewport.
        let events = detector.observe(metrics(-10.0, 250.0, 200.0));
        assert!(events.beginning.is_some());
        assert!(events.end.is_some());
        assert_eq!(detector.phase(), ThresholdPhase::PendingBoth);
    }

    #[test]
    fn nothing_fires_without_scrollable_content() {
        let mut detector = ScrollThresholdDetector::default();
        assert!(detector.observe(metrics(-50.0, 0.0, 200.0)).is_empty());
        assert!(detector.observe(metrics(-50.0, 150.0, 200.0)).is_empty());
    }

    #[test]
    fn completions_from_before_a_reset_are_ignored() {
        let mut detector = ScrollThresholdDetector::default();
        let stale = detector.observe(metrics(850.0, 1000.0, 200.0)).end.unwrap();

        detector.reset();
        assert!(detector.pending_thresholds().is_empty());
        let fresh = detector.observe(metrics(850.0, 1000.0, 200.0)).end.unwrap();

        stale.complete();
        assert!(detector.is_refreshing(Edge::End));
        fresh.complete();
        assert!(!detector.is_refreshing(Edge::End));
    }
}
