//! Object registries
//!
//! The octree never owns the volumes it indexes. It reads them from an
//! [`ObjectRegistry`] during `rebuild` and refers to them afterwards by
//! [`ObjectId`] only.

mod object_registry;
mod bounding_object_manager;

pub use object_registry::{ObjectId, ObjectRegistry};
pub use bounding_object_manager::{BoundingObject, BoundingObjectManager};
