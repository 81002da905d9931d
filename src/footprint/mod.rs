//! Footprint rasterisation and manoeuvre sweep computation.

mod catalog;
mod engine;
mod polygon;

pub use catalog::{Manoeuvre, ManoeuvreCatalog, rotate_point};
pub use engine::{FootprintEngine, Part, RotationSense};
pub use polygon::rasterize;

pub(crate) use polygon::polygon_is_convex;
