//! Test doubles and assertions for Cranpose adapters
//!
//! Provides an in-memory [`FakeViewContainer`], configurable cells and a
//! [`RecordingDelegate`] so adapter behavior can be driven without a real
//! host view.

pub mod assertions;
mod cells;
mod container;
mod delegate;

pub use assertions::{assert_approx_eq, assert_item_indices, assert_size_approx_eq};
pub use cells::{fixed_factory, ConfigureCounter, FixedCell, PayloadCell};
pub use container::FakeViewContainer;
pub use delegate::{DelegateEvent, RecordingDelegate};

pub mod prelude {
    pub use crate::assertions;
    pub use crate::{
        fixed_factory, ConfigureCounter, DelegateEvent, FakeViewContainer, FixedCell, PayloadCell,
        RecordingDelegate,
    };
}
