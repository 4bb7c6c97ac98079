//! Shared utilities for the engine.

/// Smoothed FPS and the periodic title-bar report.
pub mod frame_timing;
