use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a shader reads the per-instance transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceSource {
    /// Per-instance vertex attributes (buffer slot 1, instance step mode).
    VertexAttribute,
    /// Storage buffer indexed by the instance index, which carries the
    /// draw ID when each sub-draw covers a single instance.
    StorageBuffer,
}

/// Batching strategy used to issue the swarm's draws.
///
/// The choice only affects how draws are submitted and which program runs;
/// every strategy renders the same triangles at the same positions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DrawStrategy {
    /// One instanced draw of `instance_count` repetitions.
    #[default]
    Instanced,
    /// `instance_count` single-instance sub-draws recorded in one pass.
    MultiDraw,
    /// One GPU-resident indirect command consumed by a multi-draw-indirect
    /// call.
    MultiDrawIndirect,
}

impl DrawStrategy {
    /// All strategies, in cycling order.
    pub const ALL: [Self; 3] = [Self::Instanced, Self::MultiDraw, Self::MultiDrawIndirect];

    /// Human-readable name for titles and logs.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Instanced => "Instanced Rendering",
            Self::MultiDraw => "MultiDraw Rendering",
            Self::MultiDrawIndirect => "MultiDraw Indirect Rendering",
        }
    }

    /// The strategy after this one, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Instanced => Self::MultiDraw,
            Self::MultiDraw => Self::MultiDrawIndirect,
            Self::MultiDrawIndirect => Self::Instanced,
        }
    }

    /// Where this strategy's program reads instance transforms from.
    #[must_use]
    pub fn instance_source(self) -> InstanceSource {
        match self {
            Self::Instanced => InstanceSource::VertexAttribute,
            Self::MultiDraw | Self::MultiDrawIndirect => InstanceSource::StorageBuffer,
        }
    }
}

impl fmt::Display for DrawStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_cycles_through_all() {
        let mut s = DrawStrategy::Instanced;
        for expected in DrawStrategy::ALL.iter().cycle().skip(1).take(6) {
            s = s.next();
            assert_eq!(s, *expected);
        }
    }

    #[test]
    fn indirect_shares_storage_program() {
        assert_eq!(
            DrawStrategy::MultiDraw.instance_source(),
            DrawStrategy::MultiDrawIndirect.instance_source()
        );
        assert_ne!(
            DrawStrategy::Instanced.instance_source(),
            DrawStrategy::MultiDraw.instance_source()
        );
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&DrawStrategy::MultiDrawIndirect).unwrap();
        assert_eq!(json, "\"multi_draw_indirect\"");
        let parsed: DrawStrategy = serde_json::from_str("\"multi_draw\"").unwrap();
        assert_eq!(parsed, DrawStrategy::MultiDraw);
    }
}
