//! End-to-end adapter behavior against an in-memory host container.

use cranpose_adapter::*;
use cranpose_testing::{
    assert_approx_eq, assert_item_indices, fixed_factory, DelegateEvent, FakeViewContainer,
    PayloadCell, RecordingDelegate,
};

const VIEWPORT: Size = Size {
    width: 320.0,
    height: 200.0,
};

fn registry() -> (CellRegistry<String>, cranpose_testing::ConfigureCounter) {
    let (row, configured) = fixed_factory(44.0);
    let (header, _) = fixed_factory(60.0);
    let registry = CellRegistry::new()
        .with("row", row)
        .with("header", header)
        .with("text", || {
            Box::new(PayloadCell::new(|text: &String| {
                20.0 * text.lines().count() as f32
            }))
        });
    (registry, configured)
}

fn controller() -> (
    Controller<String, FakeViewContainer>,
    RecordingDelegate<String>,
) {
    let (registry, _) = registry();
    let delegate = RecordingDelegate::new();
    let controller = Controller::new(
        FakeViewContainer::new(VIEWPORT),
        registry,
        AdapterConfig::new(),
    )
    .with_delegate(delegate.clone());
    (controller, delegate)
}

fn list(kind: &str, payloads: &[&str]) -> Component<String> {
    Component::new(kind, LayoutKind::List).with_items(
        payloads
            .iter()
            .map(|payload| Item::new((*payload).to_owned())),
    )
}

fn payloads(component: &Component<String>) -> Vec<&str> {
    component
        .items()
        .iter()
        .map(|item| item.payload.as_str())
        .collect()
}

#[test]
fn reload_installs_exactly_the_given_components() {
    let (mut controller, delegate) = controller();

    for round in [vec!["a", "b", "c"], vec!["d"], vec![]] {
        let components = vec![list("row", &round), list("text", &["x\ny"])];
        controller.reload(components).unwrap();

        assert_eq!(controller.components().len(), 2);
        assert_eq!(payloads(&controller.components()[0]), round);
        assert_eq!(payloads(&controller.components()[1]), vec!["x\ny"]);
        for component in controller.components() {
            assert_item_indices(component, "after reload");
        }
    }
    assert_eq!(
        delegate.events(),
        vec![DelegateEvent::ComponentsChanged(2); 3]
    );
}

#[test]
fn setup_of_unmeasured_items_sums_intrinsic_heights() {
    let (registry, configured) = registry();
    let mut controller = Controller::new(
        FakeViewContainer::new(VIEWPORT),
        registry,
        AdapterConfig::new(),
    );
    let component = list("row", &["a", "b", "c"]).with_hints(
        LayoutHints::default()
            .with_header_height(10.0)
            .with_footer_height(6.0),
    );
    controller.reload(vec![component]).unwrap();

    let component = controller.component(0).unwrap();
    for item in component.items() {
        assert_approx_eq(item.size().height, 44.0, 0.01, "item height");
        assert_approx_eq(item.size().width, 320.0, 0.01, "item width");
    }
    let cached = component.cached_size().unwrap();
    assert_approx_eq(cached.height, 3.0 * 44.0 + 16.0, 0.01, "component height");
    // One sizing cell measured each item exactly once.
    assert_eq!(configured.get(), 3);
}

#[test]
fn repeated_layout_does_not_drift() {
    let (mut controller, _) = controller();
    controller
        .reload(vec![list("text", &["one", "two\nlines", "three\nline\nitem"])])
        .unwrap();
    let first = controller.component(0).unwrap().cached_size();

    controller.layout_all(VIEWPORT).unwrap();
    controller.layout_all(VIEWPORT).unwrap();

    assert_eq!(controller.component(0).unwrap().cached_size(), first);
    assert_eq!(first, Some(Size::new(320.0, 120.0)));
}

#[test]
fn preferred_height_hint_wins_over_smaller_content() {
    let (mut controller, _) = controller();
    let hinted = list("row", &["a"]).with_hints(LayoutHints::default().with_preferred_height(500.0));
    controller.reload(vec![hinted]).unwrap();
    controller.layout_all(VIEWPORT).unwrap();

    assert_eq!(
        controller.component(0).unwrap().cached_size(),
        Some(Size::new(320.0, 500.0))
    );
}

#[test]
fn grid_and_carousel_heights() {
    let (mut controller, _) = controller();
    let grid = list("row", &["a", "b", "c", "d", "e"]);
    let grid = Component::new("row", LayoutKind::Grid)
        .with_hints(LayoutHints::default().with_span(2))
        .with_items(grid.items().iter().cloned());
    let carousel = Component::new("text", LayoutKind::Carousel).with_items([
        Item::new("short".to_owned()),
        Item::new("a\nb\nc".to_owned()),
    ]);
    controller.reload(vec![grid, carousel]).unwrap();

    let grid = controller.component(0).unwrap();
    assert_eq!(grid.cached_size(), Some(Size::new(320.0, 132.0)));
    assert_approx_eq(grid.items()[0].size().width, 160.0, 0.01, "grid cell width");
    let carousel = controller.component(1).unwrap();
    assert_eq!(carousel.cached_size(), Some(Size::new(320.0, 60.0)));
}

#[test]
fn end_threshold_fires_once_until_completed() {
    let (mut controller, delegate) = controller();
    controller.reload(vec![list("row", &["a"])]).unwrap();
    delegate.clear_events();

    controller.container_mut().scroll_to(850.0, 1000.0);
    controller.did_scroll().unwrap();
    controller.did_scroll().unwrap();
    assert_eq!(delegate.events(), vec![DelegateEvent::Reached(Edge::End)]);
    assert_eq!(delegate.pending_completions(), 1);

    delegate.complete_all();
    controller.did_scroll().unwrap();
    assert_eq!(delegate.events().len(), 1);

    // A new page arrived; the next threshold sits further down.
    controller.container_mut().scroll_to(1500.0, 2000.0);
    controller.did_scroll().unwrap();
    assert_eq!(delegate.events().len(), 2);
    assert_eq!(controller.threshold().pending_thresholds(), &[850.0, 1500.0]);
}

#[test]
fn overscroll_reports_the_beginning() {
    let (mut controller, delegate) = controller();
    controller.reload(vec![list("row", &["a"])]).unwrap();
    delegate.clear_events();

    controller.container_mut().scroll_to(-64.0, 1000.0);
    controller.did_scroll().unwrap();
    controller.did_scroll().unwrap();

    assert_eq!(
        delegate.events(),
        vec![DelegateEvent::Reached(Edge::Beginning)]
    );
    assert_eq!(controller.threshold().phase(), ThresholdPhase::PendingBeginning);
}

#[test]
fn reload_from_an_end_callback_resets_thresholds() {
    let (mut controller, delegate) = controller();
    controller.reload(vec![list("row", &["a"])]).unwrap();
    delegate.reload_on_end(vec![list("row", &["a", "b"])]);

    controller.container_mut().scroll_to(850.0, 1000.0);
    controller.did_scroll().unwrap();

    assert_eq!(controller.component(0).unwrap().len(), 2);
    assert!(controller.threshold().pending_thresholds().is_empty());
    // The outstanding completion predates the reload and changes nothing.
    delegate.complete_all();
    assert_eq!(controller.threshold().phase(), ThresholdPhase::Idle);
}

#[test]
fn selection_is_exclusive_within_a_view() {
    let (mut controller, delegate) = controller();
    controller
        .reload(vec![list("row", &["a", "b", "c"]), list("row", &["d"])])
        .unwrap();

    controller.select(0, 0).unwrap();
    controller.select(0, 1).unwrap();
    controller.select(1, 0).unwrap();

    assert_eq!(delegate.selections(), vec![(0, 0), (0, 1), (1, 0)]);
    let view = controller.component(0).unwrap().view().unwrap();
    assert_eq!(controller.container().deselected, vec![(view, 0)]);
    assert_eq!(controller.component(0).unwrap().selected_index(), Some(1));
    assert_eq!(controller.component(1).unwrap().selected_index(), Some(0));
}

#[test]
fn stale_events_are_ignored() {
    let (mut controller, delegate) = controller();
    controller.reload(vec![list("row", &["a", "b"])]).unwrap();
    controller.reload(vec![list("row", &["c"])]).unwrap();
    delegate.clear_events();

    assert!(!controller.select(0, 1).unwrap());
    assert!(!controller.select(3, 0).unwrap());
    assert!(controller.cell_for(0, 1).unwrap().is_none());
    assert!(controller.update_item(0, 4, Item::new("z".to_owned())).unwrap().is_none());
    assert!(delegate.events().is_empty());
}

#[test]
fn unregistered_identifier_is_a_configuration_error() {
    let (mut controller, _) = controller();
    let error = controller
        .reload(vec![list("unknown", &["a"])])
        .unwrap_err();

    assert_eq!(
        error,
        AdapterError::UnregisteredIdentifier {
            identifier: "unknown".to_owned(),
            index: 0
        }
    );
    assert_eq!(
        error.to_string(),
        "no cell registered for identifier `unknown` (item 0)"
    );
}

#[test]
fn registering_a_cell_later_fixes_the_error() {
    let (mut controller, _) = controller();
    assert!(controller.reload(vec![list("late", &["a"])]).is_err());

    let (late, _) = fixed_factory(30.0);
    controller.registry_mut().register("late", late);
    controller.reload(vec![list("late", &["a", "b"])]).unwrap();
    assert_eq!(
        controller.component(0).unwrap().cached_size(),
        Some(Size::new(320.0, 60.0))
    );
}

#[test]
fn composites_are_laid_out_from_parent_to_child() {
    let (mut controller, _) = controller();
    let child = Component::new("row", LayoutKind::Carousel)
        .with_items([Item::new("c0".to_owned()), Item::new("c1".to_owned())]);
    let parent = list("row", &["p0", "p1"])
        .with_composite(1, child)
        .with_hints(LayoutHints::default().with_header_height(8.0));
    controller.reload(vec![parent]).unwrap();

    let parent = controller.component(0).unwrap();
    let child = &parent.composites()[0].component;
    assert_eq!(parent.cached_size(), Some(Size::new(320.0, 96.0)));
    assert_eq!(child.cached_size(), Some(Size::new(320.0, 44.0)));
    assert_ne!(child.view(), parent.view());
    assert!(!controller.container().is_attached(child.view().unwrap()));

    // Inserting above the host item keeps the child attached to it.
    controller
        .prepend_items(0, [Item::new("new".to_owned())])
        .unwrap();
    assert_eq!(controller.component(0).unwrap().composites()[0].item_index, 2);
}

#[test]
fn mutations_keep_indices_and_sizes_in_sync() {
    let (mut controller, delegate) = controller();
    controller.reload(vec![list("row", &["b", "c"])]).unwrap();

    controller
        .prepend_items(0, [Item::new("a".to_owned())])
        .unwrap();
    controller
        .append_items(0, [Item::new("e".to_owned())])
        .unwrap();
    controller
        .insert_item(0, 3, Item::new("d".to_owned()))
        .unwrap();
    let component = controller.component(0).unwrap();
    assert_eq!(payloads(component), vec!["a", "b", "c", "d", "e"]);
    assert_item_indices(component, "after inserts");
    assert_eq!(component.cached_size(), Some(Size::new(320.0, 220.0)));

    let header = Item::new("H".to_owned()).with_kind("header");
    controller.update_item(0, 0, header).unwrap();
    controller.delete_item(0, 4).unwrap();
    let component = controller.component(0).unwrap();
    assert_eq!(payloads(component), vec!["H", "b", "c", "d"]);
    assert_eq!(component.cached_size(), Some(Size::new(320.0, 192.0)));

    let changes = delegate
        .events()
        .into_iter()
        .filter(|event| matches!(event, DelegateEvent::ComponentsChanged(_)))
        .count();
    assert_eq!(changes, 6);
}

#[test]
fn resize_remeasures_for_the_new_width() {
    let (mut controller, _) = controller();
    controller.reload(vec![list("row", &["a", "b"])]).unwrap();

    controller.did_resize(Size::new(480.0, 200.0)).unwrap();
    let component = controller.component(0).unwrap();
    assert_eq!(component.cached_size(), Some(Size::new(480.0, 88.0)));
    assert_approx_eq(component.items()[1].size().width, 480.0, 0.01, "row width");
}

#[test]
fn load_reads_components_from_a_source() {
    let (mut controller, _) = controller();
    let source = vec![list("row", &["a"]), list("text", &["b"])];
    controller.load(&source).unwrap();

    assert_eq!(controller.components().len(), 2);
    assert_eq!(source[0].view(), None);
}

#[test]
fn configure_hooks_run_for_cells_and_views() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let views = Rc::new(RefCell::new(Vec::new()));
    let cells = Rc::new(RefCell::new(Vec::new()));
    let (view_log, cell_log) = (Rc::clone(&views), Rc::clone(&cells));
    let config = AdapterConfig::new()
        .with_on_configure_view(move |view, component: &Component<String>| {
            view_log.borrow_mut().push((view, component.len()));
        })
        .with_on_configure_cell(move |_cell, item: &Item<String>| {
            cell_log.borrow_mut().push(item.payload.clone());
        });
    let (registry, _) = registry();
    let mut controller = Controller::new(FakeViewContainer::new(VIEWPORT), registry, config);
    controller.reload(vec![list("row", &["a", "b"])]).unwrap();
    controller.cell_for(0, 1).unwrap();

    assert_eq!(*views.borrow(), vec![(ViewId(0), 2)]);
    assert_eq!(*cells.borrow(), vec!["b".to_owned()]);
}
