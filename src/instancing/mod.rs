//! Per-instance transforms: grid layout, CPU-side store, and the
//! GPU-resident instance buffer they are published to.

/// GPU instance buffer and its storage bind group.
pub mod buffer;
/// Square-grid placement of instance translations.
pub mod layout;
/// Bounded instance count, spacing, and dirty tracking.
pub mod store;

pub use buffer::InstanceBuffer;
pub use layout::{grid_layout, grid_side, InstanceTransform};
pub use store::InstanceStore;
