use std::fmt;

use crate::renderer::DrawStrategy;

/// Mesh and instance totals for diagnostics.
///
/// Totals are 64-bit so the largest meshes at the instance ceiling do not
/// overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStats {
    /// Vertices in the shared mesh.
    pub vertex_count: u32,
    /// Indices in the shared mesh.
    pub index_count: u32,
    /// Instances drawn.
    pub instance_count: u32,
    /// `vertex_count * instance_count`.
    pub total_vertices: u64,
    /// `(index_count / 3) * instance_count`.
    pub total_triangles: u64,
    /// Active draw strategy.
    pub strategy: DrawStrategy,
}

impl SceneStats {
    /// Derive totals from per-mesh counts.
    #[must_use]
    pub fn new(
        vertex_count: u32,
        index_count: u32,
        instance_count: u32,
        strategy: DrawStrategy,
    ) -> Self {
        Self {
            vertex_count,
            index_count,
            instance_count,
            total_vertices: u64::from(vertex_count) * u64::from(instance_count),
            total_triangles: u64::from(index_count / 3)
                * u64::from(instance_count),
            strategy,
        }
    }

    /// Vertices in one sphere.
    pub fn vertices_per_instance(&self) -> u32 {
        self.vertex_count
    }

    /// Triangles in one sphere.
    pub fn triangles_per_instance(&self) -> u32 {
        self.index_count / 3
    }
}

impl fmt::Display for SceneStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} instances | {} vertices | {} triangles",
            self.strategy,
            self.instance_count,
            self.total_vertices,
            self.total_triangles
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_for_reference_scene() {
        let stats = SceneStats::new(512, 2790, 10_000, DrawStrategy::Instanced);
        assert_eq!(stats.total_vertices, 5_120_000);
        assert_eq!(stats.total_triangles, 9_300_000);
        assert_eq!(stats.triangles_per_instance(), 930);
        assert_eq!(stats.vertices_per_instance(), 512);
    }

    #[test]
    fn totals_do_not_overflow_u32() {
        let stats =
            SceneStats::new(u32::MAX, 3 * 1000, 100_000, DrawStrategy::MultiDraw);
        assert_eq!(stats.total_vertices, u64::from(u32::MAX) * 100_000);
    }

    #[test]
    fn display_names_strategy_and_totals() {
        let stats = SceneStats::new(4, 6, 3, DrawStrategy::MultiDrawIndirect);
        assert_eq!(
            stats.to_string(),
            "MultiDraw Indirect Rendering | 3 instances | 12 vertices | 6 triangles"
        );
    }
}
