//! Geometry value types shared between Cranpose hosts and adapters
//!
//! Points and sizes are expressed in logical pixels. Hosts convert to and
//! from their native coordinate types at the boundary.

mod geometry;

pub use geometry::*;

pub mod prelude {
    pub use crate::geometry::{Point, Rect, Size};
}
