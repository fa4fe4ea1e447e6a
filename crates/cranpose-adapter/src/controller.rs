//! Adapter controller: owns the component collection and drives it against a
//! host view container.
//!
//! The controller is the only writer of the component collection. Structural
//! changes go through it so that item indices, cached sizes, reuse pools and
//! the selection stay in sync, and so that the delegate hears about them.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::component::Component;
use crate::config::AdapterConfig;
use crate::delegate::{AdapterDelegate, DelegateContext};
use crate::error::AdapterError;
use crate::host::{Cell, CellProvider, ComponentSource, ViewContainer, ViewId, ViewObserver};
use crate::item::Item;
use crate::registry::{CellPool, CellRegistry};
use crate::reuse;
use crate::sizing;
use crate::threshold::{ScrollMetrics, ScrollThresholdDetector};
use cranpose_ui_graphics::Size;

pub struct Controller<P, C> {
    config: AdapterConfig<P>,
    container: C,
    registry: CellRegistry<P>,
    pools: FxHashMap<ViewId, CellPool<P>>,
    components: Vec<Component<P>>,
    delegate: Option<Box<dyn AdapterDelegate<P>>>,
    threshold: ScrollThresholdDetector,
    next_view: u64,
}

impl<P, C> std::fmt::Debug for Controller<P, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("components", &self.components.len())
            .field("views", &self.pools.len())
            .field("has_delegate", &self.delegate.is_some())
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl<P, C: ViewContainer> Controller<P, C> {
    pub fn new(container: C, registry: CellRegistry<P>, config: AdapterConfig<P>) -> Self {
        let threshold = ScrollThresholdDetector::new(config.threshold());
        Self {
            config,
            container,
            registry,
            pools: FxHashMap::default(),
            components: Vec::new(),
            delegate: None,
            threshold,
            next_view: 0,
        }
    }

    pub fn with_delegate(mut self, delegate: impl AdapterDelegate<P> + 'static) -> Self {
        self.set_delegate(delegate);
        self
    }

    pub fn set_delegate(&mut self, delegate: impl AdapterDelegate<P> + 'static) {
        self.delegate = Some(Box::new(delegate));
    }

    pub fn take_delegate(&mut self) -> Option<Box<dyn AdapterDelegate<P>>> {
        self.delegate.take()
    }

    pub fn components(&self) -> &[Component<P>] {
        &self.components
    }

    pub fn component(&self, index: usize) -> Option<&Component<P>> {
        self.components.get(index)
    }

    pub fn item(&self, component: usize, index: usize) -> Option<&Item<P>> {
        self.components.get(component)?.item(index)
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    pub fn registry_mut(&mut self) -> &mut CellRegistry<P> {
        &mut self.registry
    }

    /// Reuse pool of a component view, if that view is alive.
    pub fn pool(&self, view: ViewId) -> Option<&CellPool<P>> {
        self.pools.get(&view)
    }

    pub fn threshold(&self) -> &ScrollThresholdDetector {
        &self.threshold
    }

    /// Attaches, registers and sizes the component at `index`.
    ///
    /// Returns the component's resulting size, or `None` if there is no
    /// component at `index`.
    pub fn setup_component(&mut self, index: usize) -> Result<Option<Size>, AdapterError> {
        let width = self.container.viewport_size().width;
        let Self {
            components,
            container,
            pools,
            registry,
            config,
            next_view,
            ..
        } = self;
        let Some(component) = components.get_mut(index) else {
            log::warn!("Controller: setup of missing component {}", index);
            return Ok(None);
        };
        let mut env = SetupEnv {
            container,
            pools,
            registry,
            config,
            next_view,
        };
        env.setup(component, index, width, true).map(Some)
    }

    /// Replaces the whole component collection.
    ///
    /// Every current view is detached and its cells dropped before the new
    /// components are attached, and scroll thresholds start over.
    pub fn reload(&mut self, components: Vec<Component<P>>) -> Result<(), AdapterError> {
        log::debug!(
            "Controller: reloading {} components (replacing {})",
            components.len(),
            self.components.len()
        );
        for component in self.components.drain(..) {
            if let Some(view) = component.view {
                self.container.detach(view);
            }
        }
        self.pools.clear();
        self.threshold.reset();

        self.components = components;
        for component in &mut self.components {
            component.reset_view_state();
        }
        for index in 0..self.components.len() {
            self.setup_component(index)?;
        }
        self.container.invalidate_layout();
        self.notify_components_changed()
    }

    /// Reloads from a model source.
    pub fn load<S>(&mut self, source: &S) -> Result<(), AdapterError>
    where
        S: ComponentSource<P> + ?Sized,
    {
        self.reload(source.components())
    }

    /// Re-runs layout for every component, then sets up composite children
    /// from parent to child.
    pub fn layout_all(&mut self, viewport: Size) -> Result<(), AdapterError> {
        let Self {
            components,
            container,
            pools,
            registry,
            config,
            next_view,
            ..
        } = self;
        let mut env = SetupEnv {
            container,
            pools,
            registry,
            config,
            next_view,
        };
        for (index, component) in components.iter_mut().enumerate() {
            if component.view.is_some() {
                env.layout(component, viewport.width)?;
            } else {
                env.setup(component, index, viewport.width, true)?;
            }
        }
        self.container.invalidate_layout();
        Ok(())
    }

    /// Re-measures components laid out for a different width, then lays
    /// everything out again.
    pub fn resize(&mut self, viewport: Size) -> Result<(), AdapterError> {
        for component in &mut self.components {
            let stale = component
                .cached_size
                .is_some_and(|size| size.width != viewport.width);
            if stale {
                component.invalidate_sizes();
            }
        }
        self.layout_all(viewport)
    }

    /// Dequeues and configures the cell for item `index` of `component`.
    ///
    /// Returns `Ok(None)` when the indices no longer exist. An identifier
    /// without a registered cell is a configuration error.
    pub fn cell_for(
        &mut self,
        component: usize,
        index: usize,
    ) -> Result<Option<&mut dyn Cell<P>>, AdapterError> {
        let component_index = component;
        let Self {
            components,
            container,
            pools,
            registry,
            config,
            ..
        } = self;
        let Some(component) = components.get_mut(component_index) else {
            log::warn!(
                "Controller: cell requested for missing component {}",
                component_index
            );
            return Ok(None);
        };
        if component.item(index).is_none() {
            log::warn!(
                "Controller: cell requested for stale item {} of component {}",
                index,
                component_index
            );
            return Ok(None);
        }
        let Some(view) = component.view else {
            log::warn!(
                "Controller: component {} has no view yet",
                component_index
            );
            return Ok(None);
        };

        let identifier = reuse::resolve_identifier(component, index)
            .map(str::to_owned)
            .ok_or(AdapterError::EmptyIdentifier {
                component: component_index,
                index,
            })?;
        let pool = pools.entry(view).or_default();
        register_identifier(registry, pool, &identifier, index)?;
        let cell = pool
            .dequeue(&identifier, index)
            .ok_or_else(|| AdapterError::UnregisteredIdentifier {
                identifier: identifier.clone(),
                index,
            })?;

        log::trace!(
            "Controller: configuring `{}` cell for item {} of {}",
            identifier,
            index,
            view
        );
        reuse::configure_cell(component, index, cell, container);
        if let Some(hook) = &config.on_configure_cell {
            hook(&mut *cell, &component.items[index]);
        }
        Ok(Some(cell))
    }

    /// Returns the cell bound to item `index` of `component` to its pool.
    pub fn recycle_cell(&mut self, component: usize, index: usize) {
        let view = self.components.get(component).and_then(|c| c.view);
        if let Some(pool) = view.and_then(|view| self.pools.get_mut(&view)) {
            pool.recycle(index);
        }
    }

    /// Handles a selection of item `index` in `component`.
    ///
    /// Any other selected item of that component is cleared in the host
    /// first; the delegate then hears about the new selection only. Returns
    /// `false` for stale indices.
    pub fn select(&mut self, component: usize, index: usize) -> Result<bool, AdapterError> {
        let Some(target) = self.components.get_mut(component) else {
            log::warn!("Controller: select on missing component {}", component);
            return Ok(false);
        };
        if target.item(index).is_none() {
            log::warn!(
                "Controller: select on stale item {} of component {}",
                index,
                component
            );
            return Ok(false);
        }

        let change = target.selection.select(index);
        if let (Some(previous), Some(view)) = (change.deselected, target.view) {
            self.container.deselect(view, previous);
        }

        let mut cx = DelegateContext::default();
        if let Some(delegate) = self.delegate.as_mut() {
            let target = &self.components[component];
            delegate.on_select(target, &target.items[index], &mut cx);
        }
        self.apply(cx)?;
        Ok(true)
    }

    /// Records that the host cleared the selection of item `index`.
    pub fn deselect(&mut self, component: usize, index: usize) -> bool {
        self.components
            .get_mut(component)
            .is_some_and(|target| target.selection.deselect(index))
    }

    pub fn append_items(
        &mut self,
        component: usize,
        items: impl IntoIterator<Item = Item<P>>,
    ) -> Result<(), AdapterError> {
        self.mutate(component, |target| target.insert_items(target.len(), items))
            .map(drop)
    }

    pub fn prepend_items(
        &mut self,
        component: usize,
        items: impl IntoIterator<Item = Item<P>>,
    ) -> Result<(), AdapterError> {
        self.mutate(component, |target| target.insert_items(0, items))
            .map(drop)
    }

    pub fn insert_item(
        &mut self,
        component: usize,
        index: usize,
        item: Item<P>,
    ) -> Result<(), AdapterError> {
        self.mutate(component, |target| target.insert_item(index, item))
            .map(drop)
    }

    /// Replaces item `index`, returning the previous item.
    pub fn update_item(
        &mut self,
        component: usize,
        index: usize,
        item: Item<P>,
    ) -> Result<Option<Item<P>>, AdapterError> {
        if self.item(component, index).is_none() {
            log::warn!(
                "Controller: update of stale item {} of component {}",
                index,
                component
            );
            return Ok(None);
        }
        self.mutate(component, |target| target.replace_item(index, item))
            .map(Option::flatten)
    }

    pub fn delete_item(
        &mut self,
        component: usize,
        index: usize,
    ) -> Result<Option<Item<P>>, AdapterError> {
        if self.item(component, index).is_none() {
            log::warn!(
                "Controller: delete of stale item {} of component {}",
                index,
                component
            );
            return Ok(None);
        }
        self.mutate(component, |target| target.remove_item(index))
            .map(Option::flatten)
    }

    /// Feeds the container's current scroll geometry to the threshold
    /// detector and forwards crossed edges to the delegate.
    pub fn observe_scroll(&mut self) -> Result<(), AdapterError> {
        let metrics = ScrollMetrics::new(
            self.container.offset(),
            self.container.content_size(),
            self.container.viewport_size(),
        );
        let events = self.threshold.observe(metrics);
        if events.is_empty() {
            return Ok(());
        }

        let mut cx = DelegateContext::default();
        if let Some(completion) = events.beginning {
            match self.delegate.as_mut() {
                Some(delegate) => delegate.on_reached_beginning(completion, &mut cx),
                None => completion.complete(),
            }
        }
        if let Some(completion) = events.end {
            match self.delegate.as_mut() {
                Some(delegate) => delegate.on_reached_end(completion, &mut cx),
                None => completion.complete(),
            }
        }
        self.apply(cx)
    }

    fn mutate<F, R>(&mut self, component: usize, mutation: F) -> Result<Option<R>, AdapterError>
    where
        F: FnOnce(&mut Component<P>) -> R,
    {
        let width = self.container.viewport_size().width;
        let Self {
            components,
            container,
            pools,
            registry,
            config,
            next_view,
            ..
        } = self;
        let Some(target) = components.get_mut(component) else {
            log::warn!("Controller: mutation of missing component {}", component);
            return Ok(None);
        };

        let width = target.cached_size.map_or(width, |size| size.width);
        let mut before = SmallVec::<[ViewId; 4]>::new();
        collect_views(target, &mut before);
        let result = mutation(target);
        if let Some(pool) = target.view.and_then(|view| pools.get_mut(&view)) {
            pool.recycle_all();
        }

        let mut env = SetupEnv {
            container,
            pools: &mut *pools,
            registry,
            config,
            next_view,
        };
        if target.view.is_some() {
            env.layout(target, width)?;
        } else {
            env.setup(target, component, width, true)?;
        }

        let mut after = SmallVec::<[ViewId; 4]>::new();
        collect_views(target, &mut after);
        for view in before.iter().filter(|view| !after.contains(view)) {
            log::trace!("Controller: dropping cell pool of removed {}", view);
            pools.remove(view);
        }
        self.container.invalidate_layout();
        self.notify_components_changed()?;
        Ok(Some(result))
    }

    fn notify_components_changed(&mut self) -> Result<(), AdapterError> {
        let mut cx = DelegateContext::default();
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.on_components_changed(&self.components, &mut cx);
        }
        self.apply(cx)
    }

    fn apply(&mut self, mut cx: DelegateContext<P>) -> Result<(), AdapterError> {
        match cx.take_reload() {
            Some(components) => self.reload(components),
            None => Ok(()),
        }
    }
}

impl<P, C: ViewContainer> ViewObserver for Controller<P, C> {
    fn did_scroll(&mut self) -> Result<(), AdapterError> {
        self.observe_scroll()
    }

    fn did_resize(&mut self, viewport: Size) -> Result<(), AdapterError> {
        self.resize(viewport)
    }
}

/// Disjoint borrows of the controller needed to set components up while one
/// of its components is borrowed mutably.
struct SetupEnv<'a, P, C> {
    container: &'a mut C,
    pools: &'a mut FxHashMap<ViewId, CellPool<P>>,
    registry: &'a CellRegistry<P>,
    config: &'a AdapterConfig<P>,
    next_view: &'a mut u64,
}

impl<P, C: ViewContainer> SetupEnv<'_, P, C> {
    fn setup(
        &mut self,
        component: &mut Component<P>,
        index: usize,
        width: f32,
        attach: bool,
    ) -> Result<Size, AdapterError> {
        let view = match component.view {
            Some(view) => view,
            None => {
                let view = ViewId(*self.next_view);
                *self.next_view += 1;
                component.view = Some(view);
                if attach {
                    self.container.attach(view);
                }
                view
            }
        };
        component.index = index;
        component.reindex();

        let size = self.layout(component, width)?;
        if let Some(hook) = &self.config.on_configure_view {
            hook(view, component);
        }
        log::trace!(
            "Controller: set up component {} ({}) in {} at {:?}",
            index,
            component.kind,
            view,
            size
        );
        Ok(size)
    }

    /// Sizes `component` for `width`, then sets up its composite children
    /// with the widths of the items hosting them.
    fn layout(&mut self, component: &mut Component<P>, width: f32) -> Result<Size, AdapterError> {
        let Some(view) = component.view else {
            return Ok(component.cached_size.unwrap_or_default());
        };
        let pool = self.pools.entry(view).or_default();
        register_cells(self.registry, pool, component)?;
        sizing::layout(component, Size::new(width, 0.0), |identifier, item| {
            let cell = pool.sizing_cell(identifier).ok_or_else(|| {
                AdapterError::UnregisteredIdentifier {
                    identifier: identifier.to_owned(),
                    index: item.index(),
                }
            })?;
            cell.configure(item);
            Ok(cell.intrinsic_size())
        })?;
        let size = sizing::reconcile_preferred_height(component).unwrap_or_default();

        let Component {
            items, composites, ..
        } = component;
        for (position, composite) in composites.iter_mut().enumerate() {
            let child_width = items
                .get(composite.item_index)
                .map(|host| host.size().width)
                .filter(|host_width| *host_width > 0.0)
                .unwrap_or(width);
            self.setup(&mut composite.component, position, child_width, false)?;
        }
        Ok(size)
    }
}

/// Collects the views of `component` and of every composite below it.
fn collect_views<P>(component: &Component<P>, views: &mut SmallVec<[ViewId; 4]>) {
    views.extend(component.view);
    for composite in &component.composites {
        collect_views(&composite.component, views);
    }
}

fn register_cells<P>(
    registry: &CellRegistry<P>,
    pool: &mut CellPool<P>,
    component: &Component<P>,
) -> Result<(), AdapterError> {
    for item in component.items() {
        let identifier = reuse::item_identifier(item, component.kind()).ok_or(
            AdapterError::EmptyIdentifier {
                component: component.index(),
                index: item.index(),
            },
        )?;
        register_identifier(registry, pool, identifier, item.index())?;
    }
    Ok(())
}

fn register_identifier<P>(
    registry: &CellRegistry<P>,
    pool: &mut CellPool<P>,
    identifier: &str,
    index: usize,
) -> Result<(), AdapterError> {
    if pool.is_registered(identifier) {
        return Ok(());
    }
    let factory = registry
        .factory(identifier)
        .ok_or_else(|| AdapterError::UnregisteredIdentifier {
            identifier: identifier.to_owned(),
            index,
        })?;
    pool.register(identifier, factory);
    Ok(())
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
