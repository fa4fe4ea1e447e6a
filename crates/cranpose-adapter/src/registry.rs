//! Cell registration and per-view reuse pools.
//!
//! [`CellRegistry`] maps reuse identifiers to factories. Each component view
//! gets a [`CellPool`] holding the factories it registered plus the cells it
//! has produced: cells bound to a slot, cells waiting for reuse, and one
//! off-screen sizing cell per identifier used for measurement.

use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::host::{Cell, CellProvider};

/// Builds a fresh cell for one reuse identifier.
pub type CellFactory<P> = Rc<dyn Fn() -> Box<dyn Cell<P>>>;

/// Identifier-to-factory table, in registration order.
pub struct CellRegistry<P> {
    factories: IndexMap<String, CellFactory<P>>,
}

impl<P> Default for CellRegistry<P> {
    fn default() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }
}

impl<P> std::fmt::Debug for CellRegistry<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellRegistry")
            .field("identifiers", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<P> CellRegistry<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `identifier`, replacing any earlier entry.
    pub fn register<F>(&mut self, identifier: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Cell<P>> + 'static,
    {
        let identifier = identifier.into();
        if self
            .factories
            .insert(identifier.clone(), Rc::new(factory))
            .is_some()
        {
            log::debug!("CellRegistry: replaced factory for `{}`", identifier);
        }
    }

    pub fn with<F>(mut self, identifier: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Cell<P>> + 'static,
    {
        self.register(identifier, factory);
        self
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.factories.contains_key(identifier)
    }

    pub fn factory(&self, identifier: &str) -> Option<CellFactory<P>> {
        self.factories.get(identifier).cloned()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

/// Reuse queue of a single component view.
pub struct CellPool<P> {
    factories: FxHashMap<String, CellFactory<P>>,
    in_use: FxHashMap<usize, (String, Box<dyn Cell<P>>)>,
    reusable: FxHashMap<String, Vec<Box<dyn Cell<P>>>>,
    sizing: FxHashMap<String, Box<dyn Cell<P>>>,
}

impl<P> Default for CellPool<P> {
    fn default() -> Self {
        Self {
            factories: FxHashMap::default(),
            in_use: FxHashMap::default(),
            reusable: FxHashMap::default(),
            sizing: FxHashMap::default(),
        }
    }
}

impl<P> std::fmt::Debug for CellPool<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CellPool")
            .field("registered", &self.factories.len())
            .field("in_use", &self.in_use.len())
            .field("reusable", &self.reusable_len())
            .finish()
    }
}

impl<P> CellPool<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, identifier: &str, factory: CellFactory<P>) {
        self.factories.insert(identifier.to_owned(), factory);
    }

    pub fn is_registered(&self, identifier: &str) -> bool {
        self.factories.contains_key(identifier)
    }

    /// Returns the off-screen cell used to measure items of `identifier`.
    pub fn sizing_cell(&mut self, identifier: &str) -> Option<&mut dyn Cell<P>> {
        if !self.sizing.contains_key(identifier) {
            let factory = self.factories.get(identifier)?;
            self.sizing.insert(identifier.to_owned(), factory());
        }
        let cell = self.sizing.get_mut(identifier)?;
        Some(&mut **cell)
    }

    /// Moves the cell bound to `index` back to its reuse queue.
    pub fn recycle(&mut self, index: usize) {
        if let Some((identifier, cell)) = self.in_use.remove(&index) {
            self.reusable.entry(identifier).or_default().push(cell);
        }
    }

    /// Releases every bound cell for reuse, e.g. after a structural change.
    pub fn recycle_all(&mut self) {
        for (_, (identifier, cell)) in self.in_use.drain() {
            self.reusable.entry(identifier).or_default().push(cell);
        }
    }

    pub fn in_use_len(&self) -> usize {
        self.in_use.len()
    }

    pub fn reusable_len(&self) -> usize {
        self.reusable.values().map(Vec::len).sum()
    }
}

impl<P> CellProvider<P> for CellPool<P> {
    fn dequeue(&mut self, identifier: &str, index: usize) -> Option<&mut dyn Cell<P>> {
        let bound_elsewhere = self
            .in_use
            .get(&index)
            .is_some_and(|(current, _)| current != identifier);
        if bound_elsewhere {
            self.recycle(index);
        }

        if !self.in_use.contains_key(&index) {
            let cell = match self.reusable.get_mut(identifier).and_then(Vec::pop) {
                Some(cell) => cell,
                None => {
                    let factory = self.factories.get(identifier)?;
                    factory()
                }
            };
            self.in_use.insert(index, (identifier.to_owned(), cell));
        }

        let (_, cell) = self.in_use.get_mut(&index)?;
        Some(&mut **cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;
    use cranpose_ui_graphics::Size;
    use std::cell::Cell as Counter;

    struct Row {
        height: f32,
    }

    impl Cell<()> for Row {
        fn configure(&mut self, _item: &mut Item<()>) {}

        fn intrinsic_size(&self) -> Size {
            Size::new(0.0, self.height)
        }
    }

    fn counting_factory(height: f32, built: Rc<Counter<usize>>) -> CellFactory<()> {
        Rc::new(move || {
            built.set(built.get() + 1);
            Box::new(Row { height }) as Box<dyn Cell<()>>
        })
    }

    #[test]
    fn unregistered_identifier_yields_nothing() {
        let mut pool = CellPool::<()>::new();
        assert!(pool.dequeue("row", 0).is_none());
        assert!(pool.sizing_cell("row").is_none());
    }

    #[test]
    fn recycled_cells_are_reused_instead_of_rebuilt() {
        let built = Rc::new(Counter::new(0));
        let mut pool = CellPool::new();
        pool.register("row", counting_factory(44.0, built.clone()));

        assert!(pool.dequeue("row", 0).is_some());
        assert!(pool.dequeue("row", 1).is_some());
        assert_eq!(built.get(), 2);

        pool.recycle(0);
        assert_eq!(pool.reusable_len(), 1);
        assert!(pool.dequeue("row", 2).is_some());
        assert_eq!(built.get(), 2);
        assert_eq!(pool.in_use_len(), 2);
    }

    #[test]
    fn same_slot_returns_the_bound_cell() {
        let built = Rc::new(Counter::new(0));
        let mut pool = CellPool::new();
        pool.register("row", counting_factory(44.0, built.clone()));

        pool.dequeue("row", 0);
        pool.dequeue("row", 0);
        assert_eq!(built.get(), 1);
    }

    #[test]
    fn identifier_change_rebinds_the_slot() {
        let built = Rc::new(Counter::new(0));
        let mut pool = CellPool::new();
        pool.register("row", counting_factory(44.0, built.clone()));
        pool.register("card", counting_factory(120.0, built.clone()));

        pool.dequeue("row", 0);
        let height = pool
            .dequeue("card", 0)
            .map(|cell| cell.intrinsic_size().height);
        assert_eq!(height, Some(120.0));
        assert_eq!(pool.reusable_len(), 1);
    }

    #[test]
    fn registry_preserves_registration_order() {
        let registry = CellRegistry::<()>::new()
            .with("row", || Box::new(Row { height: 44.0 }) as Box<dyn Cell<()>>)
            .with("card", || Box::new(Row { height: 120.0 }) as Box<dyn Cell<()>>);
        assert_eq!(registry.identifiers().collect::<Vec<_>>(), ["row", "card"]);
        assert!(registry.contains("card"));
        assert!(registry.factory("missing").is_none());
    }
}
