//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation, whether triggered by a key press, a mouse
//! gesture or a programmatic call, is a `SwarmCommand`. Consumers construct
//! commands and pass them to
//! [`SwarmEngine::execute`](super::SwarmEngine::execute).

use glam::Vec2;

use crate::renderer::DrawStrategy;

/// A discrete change to the camera, the scene, or the draw strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwarmCommand {
    /// Orbit by a cursor delta in pixels.
    RotateCamera {
        /// Cursor movement since the last event.
        delta: Vec2,
    },
    /// Zoom by scroll amount (positive = closer).
    Zoom {
        /// Scroll amount.
        delta: f32,
    },
    /// Return the camera to its starting orbit.
    ResetCamera,
    /// Switch to the next draw strategy.
    CycleStrategy,
    /// Switch to a specific draw strategy.
    SetStrategy(DrawStrategy),
    /// Set the instance count (ignored outside `1..=max_count`).
    SetInstanceCount(u32),
    /// Double or halve the instance count, clamped to `1..=max_count`.
    StepInstanceCount {
        /// `true` doubles, `false` halves.
        increase: bool,
    },
    /// Replace the sphere parameters.
    SetSphereParams {
        /// New radius.
        radius: f32,
        /// New segment count.
        segments: u32,
    },
    /// Add or remove two segments.
    StepSegments {
        /// Direction of the step.
        increase: bool,
    },
    /// Scale the radius by a fixed ratio.
    StepRadius {
        /// Direction of the step.
        increase: bool,
    },
    /// Set the grid spacing.
    SetSpacing(f32),
    /// Scale the grid spacing by a fixed ratio.
    StepSpacing {
        /// Direction of the step.
        increase: bool,
    },
    /// Toggle normal visualization.
    ToggleNormals,
}

impl SwarmCommand {
    /// Whether the command only moves the camera.
    #[must_use]
    pub fn is_camera(&self) -> bool {
        matches!(
            self,
            Self::RotateCamera { .. } | Self::Zoom { .. } | Self::ResetCamera
        )
    }
}
