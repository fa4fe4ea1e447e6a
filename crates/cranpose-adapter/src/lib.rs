//! Data-driven adapter between item-model stores and recycling views
//!
//! The adapter binds an ordered collection of [`Component`]s, each an ordered
//! group of [`Item`]s, to a host view that recycles its cells. It covers three
//! concerns:
//!
//! - mapping model indices to reusable cells ([`reuse`], [`CellRegistry`]),
//! - negotiating and caching item and component sizes ([`sizing`]),
//! - detecting scroll thresholds for pagination and pull to refresh
//!   ([`ScrollThresholdDetector`]).
//!
//! [`Controller`] ties these together against a host [`ViewContainer`].
//! Everything runs on the host's UI thread; nothing here is `Send`.

mod component;
mod config;
mod controller;
mod delegate;
mod error;
mod host;
mod item;
mod registry;
pub mod reuse;
mod selection;
pub mod sizing;
mod threshold;

pub use component::{Component, Composite, LayoutHints, LayoutKind};
pub use config::{AdapterConfig, ConfigureCellHook, ConfigureViewHook};
pub use controller::Controller;
pub use delegate::{AdapterDelegate, DelegateContext};
pub use error::AdapterError;
pub use host::{Cell, CellProvider, ComponentSource, ViewContainer, ViewId, ViewObserver};
pub use item::{Item, UNMEASURED_HEIGHT};
pub use registry::{CellFactory, CellPool, CellRegistry};
pub use selection::{SelectionChange, SingleSelection};
pub use threshold::{
    Edge, FetchCompletion, ScrollMetrics, ScrollThresholdDetector, ThresholdConfig,
    ThresholdEvents, ThresholdPhase,
};

pub use cranpose_ui_graphics::{Point, Rect, Size};

pub mod prelude {
    pub use crate::{
        AdapterConfig, AdapterDelegate, AdapterError, Cell, Component, Controller,
        DelegateContext, FetchCompletion, Item, LayoutHints, LayoutKind, ViewContainer, ViewId,
        ViewObserver,
    };
    pub use cranpose_ui_graphics::{Point, Size};
}
