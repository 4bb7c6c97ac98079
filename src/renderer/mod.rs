//! Draw strategies and the dispatcher that issues the swarm's draws.
//!
//! A [`DrawStrategy`] picks how the shared mesh is batched across all
//! instances. [`DrawPlan`] turns the strategy into concrete draw calls and
//! [`DrawDispatcher`] owns the GPU buffers those calls read.

/// GPU buffer ownership and per-frame dispatch.
pub mod dispatcher;
/// Indirect draw command record and buffer.
pub mod indirect;
pub(crate) mod pipeline_util;
/// Strategy-to-draw-call planning and the recorder seam.
pub mod plan;
/// The three batching strategies.
pub mod strategy;

pub use dispatcher::{DrawDispatcher, DrawStats};
pub use indirect::{IndirectBuffer, IndirectCommand};
pub use plan::{DrawPlan, DrawRecorder, PassRecorder};
pub use strategy::{DrawStrategy, InstanceSource};
