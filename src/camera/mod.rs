//! Camera system for 3D scene viewing.
//!
//! Provides a perspective camera and the orbit controller that supplies the
//! per-frame view and projection matrices.

/// Orbit controller managing rotation and zoom around the origin.
pub mod controller;
/// Core camera struct and matrix pair.
pub mod core;

pub use controller::OrbitCamera;
pub use self::core::{Camera, CameraMatrices};
