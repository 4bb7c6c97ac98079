//! Per-frame draw planning.
//!
//! [`DrawPlan::new`] is the one place a [`DrawStrategy`] turns into concrete
//! draw calls. The plan is plain data; [`DrawPlan::encode`] replays it into
//! any [`DrawRecorder`], which is a `wgpu::RenderPass` at runtime and a
//! recording stub in tests.

use std::ops::Range;

use crate::renderer::indirect::IndirectCommand;
use crate::renderer::strategy::DrawStrategy;

/// Sink for the draw calls a [`DrawPlan`] emits.
pub trait DrawRecorder {
    /// Indexed draw of `indices` for each instance ID in `instances`.
    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32, instances: Range<u32>);

    /// `count` indirect commands read from the bound indirect buffer at
    /// byte `offset`.
    fn multi_draw_indexed_indirect(&mut self, offset: u64, count: u32);
}

/// The draw calls one frame issues for the swarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawPlan {
    /// Nothing to draw (empty mesh or zero instances).
    Skip,
    /// One instanced draw.
    Instanced {
        /// Indices per instance.
        index_count: u32,
        /// Instance repetitions.
        instance_count: u32,
    },
    /// One sub-draw per instance, each covering a single instance ID.
    MultiDraw {
        /// Indices per sub-draw.
        index_count: u32,
        /// Number of sub-draws.
        draw_count: u32,
    },
    /// One command read from the indirect buffer.
    Indirect {
        /// Command the indirect buffer must hold before the pass.
        command: IndirectCommand,
    },
}

impl DrawPlan {
    /// Plan the frame's draws for `strategy`.
    #[must_use]
    pub fn new(strategy: DrawStrategy, index_count: u32, instance_count: u32) -> Self {
        if index_count == 0 || instance_count == 0 {
            return Self::Skip;
        }
        match strategy {
            DrawStrategy::Instanced => Self::Instanced {
                index_count,
                instance_count,
            },
            DrawStrategy::MultiDraw => Self::MultiDraw {
                index_count,
                draw_count: instance_count,
            },
            DrawStrategy::MultiDrawIndirect => Self::Indirect {
                command: IndirectCommand::whole_mesh(index_count, instance_count),
            },
        }
    }

    /// Strategy the plan draws with, `None` for [`DrawPlan::Skip`].
    #[must_use]
    pub fn strategy(&self) -> Option<DrawStrategy> {
        match self {
            Self::Skip => None,
            Self::Instanced { .. } => Some(DrawStrategy::Instanced),
            Self::MultiDraw { .. } => Some(DrawStrategy::MultiDraw),
            Self::Indirect { .. } => Some(DrawStrategy::MultiDrawIndirect),
        }
    }

    /// Commands the indirect buffer must hold for this plan.
    pub fn indirect_commands(&self) -> &[IndirectCommand] {
        match self {
            Self::Indirect { command } => std::slice::from_ref(command),
            _ => &[],
        }
    }

    /// API calls the plan records into the pass.
    #[must_use]
    pub fn driver_calls(&self) -> u32 {
        match *self {
            Self::Skip => 0,
            Self::Instanced { .. } | Self::Indirect { .. } => 1,
            Self::MultiDraw { draw_count, .. } => draw_count,
        }
    }

    /// Instances the plan renders.
    #[must_use]
    pub fn instance_count(&self) -> u32 {
        match *self {
            Self::Skip => 0,
            Self::Instanced { instance_count, .. } => instance_count,
            Self::MultiDraw { draw_count, .. } => draw_count,
            Self::Indirect { command } => command.instance_count,
        }
    }

    /// Replay the plan into `recorder`.
    pub fn encode(&self, recorder: &mut impl DrawRecorder) {
        match *self {
            Self::Skip => {}
            Self::Instanced {
                index_count,
                instance_count,
            } => recorder.draw_indexed(0..index_count, 0, 0..instance_count),
            Self::MultiDraw {
                index_count,
                draw_count,
            } => {
                for draw_id in 0..draw_count {
                    recorder.draw_indexed(0..index_count, 0, draw_id..draw_id + 1);
                }
            }
            Self::Indirect { .. } => recorder.multi_draw_indexed_indirect(0, 1),
        }
    }
}

/// [`DrawRecorder`] over a live render pass.
pub struct PassRecorder<'p, 'e> {
    pass: &'p mut wgpu::RenderPass<'e>,
    indirect: &'p wgpu::Buffer,
}

impl<'p, 'e> PassRecorder<'p, 'e> {
    /// Record into `pass`, reading indirect commands from `indirect`.
    pub fn new(pass: &'p mut wgpu::RenderPass<'e>, indirect: &'p wgpu::Buffer) -> Self {
        Self { pass, indirect }
    }
}

impl DrawRecorder for PassRecorder<'_, '_> {
    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32, instances: Range<u32>) {
        self.pass.draw_indexed(indices, base_vertex, instances);
    }

    fn multi_draw_indexed_indirect(&mut self, offset: u64, count: u32) {
        self.pass
            .multi_draw_indexed_indirect(self.indirect, offset, count);
    }
}
