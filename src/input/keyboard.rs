use serde::{Deserialize, Serialize};

use crate::engine::command::SwarmCommand;
use crate::renderer::DrawStrategy;

/// Engine-level actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// cycle_strategy = "Tab"
/// more_instances = "Equal"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Switch to the next draw strategy.
    CycleStrategy,
    /// Draw with one instanced call.
    SelectInstanced,
    /// Draw with per-instance sub-draws.
    SelectMultiDraw,
    /// Draw from the indirect command buffer.
    SelectIndirect,
    /// Double the instance count.
    MoreInstances,
    /// Halve the instance count.
    FewerInstances,
    /// Finer sphere tessellation.
    MoreSegments,
    /// Coarser sphere tessellation.
    FewerSegments,
    /// Grow the sphere radius.
    LargerRadius,
    /// Shrink the sphere radius.
    SmallerRadius,
    /// Spread the grid out.
    WiderSpacing,
    /// Pull the grid together.
    NarrowerSpacing,
    /// Toggle normal visualization.
    ToggleNormals,
    /// Return the camera to its starting orbit.
    ResetCamera,
}

impl KeyAction {
    /// The command this action issues.
    #[must_use]
    pub fn to_command(self) -> SwarmCommand {
        match self {
            Self::CycleStrategy => SwarmCommand::CycleStrategy,
            Self::SelectInstanced => {
                SwarmCommand::SetStrategy(DrawStrategy::Instanced)
            }
            Self::SelectMultiDraw => {
                SwarmCommand::SetStrategy(DrawStrategy::MultiDraw)
            }
            Self::SelectIndirect => {
                SwarmCommand::SetStrategy(DrawStrategy::MultiDrawIndirect)
            }
            Self::MoreInstances => {
                SwarmCommand::StepInstanceCount { increase: true }
            }
            Self::FewerInstances => {
                SwarmCommand::StepInstanceCount { increase: false }
            }
            Self::MoreSegments => SwarmCommand::StepSegments { increase: true },
            Self::FewerSegments => {
                SwarmCommand::StepSegments { increase: false }
            }
            Self::LargerRadius => SwarmCommand::StepRadius { increase: true },
            Self::SmallerRadius => SwarmCommand::StepRadius { increase: false },
            Self::WiderSpacing => SwarmCommand::StepSpacing { increase: true },
            Self::NarrowerSpacing => {
                SwarmCommand::StepSpacing { increase: false }
            }
            Self::ToggleNormals => SwarmCommand::ToggleNormals,
            Self::ResetCamera => SwarmCommand::ResetCamera,
        }
    }
}
