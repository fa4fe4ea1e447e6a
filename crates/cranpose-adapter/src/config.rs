//! Explicit adapter configuration passed to the controller at construction.

use crate::component::Component;
use crate::host::{Cell, ViewId};
use crate::item::Item;
use crate::threshold::ThresholdConfig;

/// Runs after every cell configuration.
pub type ConfigureCellHook<P> = Box<dyn Fn(&mut dyn Cell<P>, &Item<P>)>;

/// Runs whenever a component view has been set up.
pub type ConfigureViewHook<P> = Box<dyn Fn(ViewId, &Component<P>)>;

pub struct AdapterConfig<P> {
    pub(crate) on_configure_cell: Option<ConfigureCellHook<P>>,
    pub(crate) on_configure_view: Option<ConfigureViewHook<P>>,
    pub(crate) threshold: ThresholdConfig,
}

impl<P> Default for AdapterConfig<P> {
    fn default() -> Self {
        Self {
            on_configure_cell: None,
            on_configure_view: None,
            threshold: ThresholdConfig::default(),
        }
    }
}

impl<P> std::fmt::Debug for AdapterConfig<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("on_configure_cell", &self.on_configure_cell.is_some())
            .field("on_configure_view", &self.on_configure_view.is_some())
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl<P> AdapterConfig<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_on_configure_cell<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut dyn Cell<P>, &Item<P>) + 'static,
    {
        self.on_configure_cell = Some(Box::new(hook));
        self
    }

    pub fn with_on_configure_view<F>(mut self, hook: F) -> Self
    where
        F: Fn(ViewId, &Component<P>) + 'static,
    {
        self.on_configure_view = Some(Box::new(hook));
        self
    }

    pub fn with_threshold(mut self, threshold: ThresholdConfig) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> ThresholdConfig {
        self.threshold
    }
}
