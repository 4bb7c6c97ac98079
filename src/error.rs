//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// A rejected configuration value.
///
/// Returned synchronously by the mesh generator, the instance store and the
/// options loader. The rejecting component keeps its last-good state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterError {
    /// Sphere segment count below the minimum of 2.
    SegmentsTooFew(u32),
    /// Sphere segment count whose mesh would overflow 32-bit indices.
    SegmentsTooMany {
        /// Requested segments.
        segments: u32,
        /// Largest accepted value.
        max: u32,
    },
    /// Sphere radius that is zero, negative, or not finite.
    NonPositiveRadius(f32),
    /// Grid spacing that is zero, negative, or not finite.
    NonPositiveSpacing(f32),
    /// Instance ceiling of zero.
    ZeroMaxCount,
    /// Instance ceiling larger than one storage binding can hold.
    MaxCountTooLarge {
        /// Requested ceiling.
        max_count: u32,
        /// Largest accepted ceiling.
        limit: u32,
    },
    /// Instance count outside `1..=max`.
    CountOutOfRange {
        /// Requested count.
        count: u32,
        /// Configured ceiling.
        max: u32,
    },
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SegmentsTooFew(segments) => {
                write!(f, "sphere needs at least 2 segments, got {segments}")
            }
            Self::SegmentsTooMany { segments, max } => {
                write!(f, "sphere segments {segments} above the maximum of {max}")
            }
            Self::NonPositiveRadius(radius) => {
                write!(f, "sphere radius must be positive, got {radius}")
            }
            Self::NonPositiveSpacing(spacing) => {
                write!(f, "grid spacing must be positive, got {spacing}")
            }
            Self::ZeroMaxCount => write!(f, "instance ceiling must be at least 1"),
            Self::MaxCountTooLarge { max_count, limit } => {
                write!(f, "instance ceiling {max_count} above the limit of {limit}")
            }
            Self::CountOutOfRange { count, max } => {
                write!(f, "instance count {count} outside 1..={max}")
            }
        }
    }
}

impl std::error::Error for ParameterError {}

/// Errors produced by the sphere-swarm crate.
#[derive(Debug)]
pub enum SwarmError {
    /// A configuration value was rejected.
    InvalidParameter(ParameterError),
    /// A draw-dispatcher operation ran before GPU buffers were acquired.
    NotInitialized,
    /// A GPU buffer could not be created or grown.
    BufferAllocation {
        /// Debug label of the buffer.
        label: String,
        /// Driver or validation message.
        reason: String,
    },
    /// WGSL composition failure.
    Shader(String),
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for SwarmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter(e) => write!(f, "invalid parameter: {e}"),
            Self::NotInitialized => {
                write!(f, "draw dispatcher used before initialization")
            }
            Self::BufferAllocation { label, reason } => {
                write!(f, "failed to allocate GPU buffer '{label}': {reason}")
            }
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for SwarmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidParameter(e) => Some(e),
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParameterError> for SwarmError {
    fn from(e: ParameterError) -> Self {
        Self::InvalidParameter(e)
    }
}

impl From<RenderContextError> for SwarmError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for SwarmError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
