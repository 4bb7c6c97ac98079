//! Procedural mesh generation.
//!
//! Produces the single indexed mesh that every instance of the swarm shares.

/// UV-sphere tessellation and the packed GPU vertex record.
pub mod sphere;

pub use sphere::{SphereMesh, SphereParams, Vertex};
