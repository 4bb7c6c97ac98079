use std::f64::consts::PI;

use crate::error::ParameterError;

/// Smallest segment count that yields a non-degenerate tessellation.
pub const MIN_SEGMENTS: u32 = 2;

/// Largest segment count accepted. Its index count,
/// `(s - 1) * (2s - 1) * 6`, stays well inside `u32`.
pub const MAX_SEGMENTS: u32 = 4096;

/// Packed per-vertex record: `[px, py, pz, nx, ny, nz, u, v]`.
///
/// Must match the `VertexInput` struct in the sphere WGSL shaders.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position (unit direction scaled by the radius).
    pub position: [f32; 3],
    /// Unit-sphere direction, independent of radius.
    pub normal: [f32; 3],
    /// Texture coordinate `(v_lon, v_lat)`, both in `[0, 1]`.
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // normal
        2 => Float32x2, // uv
    ];

    /// Vertex buffer layout for buffer slot 0.
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Validated sphere parameters.
///
/// Construction is the only place segment count and radius are checked, so a
/// `SphereParams` value can always be tessellated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereParams {
    radius: f32,
    segments: u32,
}

impl SphereParams {
    /// Validate a radius/segment pair.
    ///
    /// # Errors
    ///
    /// [`ParameterError::SegmentsTooFew`] when `segments < 2`,
    /// [`ParameterError::SegmentsTooMany`] above [`MAX_SEGMENTS`], and
    /// [`ParameterError::NonPositiveRadius`] when the radius is not a
    /// positive finite number.
    pub fn new(radius: f32, segments: u32) -> Result<Self, ParameterError> {
        if segments < MIN_SEGMENTS {
            return Err(ParameterError::SegmentsTooFew(segments));
        }
        if segments > MAX_SEGMENTS {
            return Err(ParameterError::SegmentsTooMany {
                segments,
                max: MAX_SEGMENTS,
            });
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ParameterError::NonPositiveRadius(radius));
        }
        Ok(Self { radius, segments })
    }

    /// Sphere radius.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Segment count (latitude rings; longitude uses twice as many).
    pub fn segments(&self) -> u32 {
        self.segments
    }

    /// Latitude band count.
    pub fn rings(&self) -> u32 {
        self.segments
    }

    /// Longitude band count.
    pub fn sectors(&self) -> u32 {
        self.segments * 2
    }
}

/// Indexed UV-sphere triangle mesh.
///
/// Immutable once generated; parameter changes produce a new mesh. Each pole
/// is a full ring of coincident vertices rather than a single shared vertex,
/// so the first and last ring emit zero-area triangles. Keeping those rows
/// preserves per-column texture coordinates and the
/// `rings * sectors` / `(rings - 1) * (sectors - 1) * 6` count formulas.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereMesh {
    params: SphereParams,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl SphereMesh {
    /// Tessellate a sphere from validated parameters.
    #[must_use]
    pub fn generate(params: SphereParams) -> Self {
        let rings = params.rings();
        let sectors = params.sectors();
        let radius = params.radius();

        let ring_step = 1.0 / f64::from(rings - 1);
        let sector_step = 1.0 / f64::from(sectors - 1);

        let mut vertices = Vec::with_capacity((rings * sectors) as usize);
        for r in 0..rings {
            let v_lat = f64::from(r) * ring_step;
            let polar = PI * v_lat;
            let y = (-PI / 2.0 + polar).sin();
            for s in 0..sectors {
                let v_lon = f64::from(s) * sector_step;
                let azimuth = 2.0 * PI * v_lon;
                let x = azimuth.cos() * polar.sin();
                let z = azimuth.sin() * polar.sin();

                let normal = [x as f32, y as f32, z as f32];
                vertices.push(Vertex {
                    position: normal.map(|c| c * radius),
                    normal,
                    uv: [v_lon as f32, v_lat as f32],
                });
            }
        }

        let mut indices =
            Vec::with_capacity(((rings - 1) * (sectors - 1) * 6) as usize);
        for r in 0..rings - 1 {
            let cur_row = r * sectors;
            let next_row = (r + 1) * sectors;
            for s in 0..sectors - 1 {
                indices.extend_from_slice(&[
                    cur_row + s,
                    next_row + s,
                    next_row + s + 1,
                ]);
                indices.extend_from_slice(&[
                    cur_row + s,
                    next_row + s + 1,
                    cur_row + s + 1,
                ]);
            }
        }

        log::debug!(
            "generated sphere: {} segments, radius {}, {} vertices, {} indices",
            params.segments(),
            radius,
            vertices.len(),
            indices.len()
        );

        Self {
            params,
            vertices,
            indices,
        }
    }

    /// Validate the inputs and tessellate.
    ///
    /// # Errors
    ///
    /// Propagates the validation failure from [`SphereParams::new`].
    pub fn try_generate(segments: u32, radius: f32) -> Result<Self, ParameterError> {
        SphereParams::new(radius, segments).map(Self::generate)
    }

    /// Parameters this mesh was generated from.
    pub fn params(&self) -> SphereParams {
        self.params
    }

    /// Vertices in generation order (ring-major, then sector).
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Triangle-list indices.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Number of indices.
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Number of triangles, degenerate pole triangles included.
    pub fn triangle_count(&self) -> u32 {
        self.index_count() / 3
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn mesh(segments: u32, radius: f32) -> SphereMesh {
        SphereMesh::try_generate(segments, radius).unwrap()
    }

    #[test]
    fn counts_follow_ring_sector_formula() {
        for segments in 2..=24 {
            let m = mesh(segments, 1.0);
            assert_eq!(m.vertices().len() as u32, segments * 2 * segments);
            assert_eq!(
                m.indices().len() as u32,
                (segments - 1) * (2 * segments - 1) * 6
            );
            assert_eq!(m.vertex_count(), m.vertices().len() as u32);
            assert_eq!(m.index_count(), m.indices().len() as u32);
        }
    }

    #[test]
    fn sixteen_segments_matches_reference_counts() {
        let m = mesh(16, 1.0);
        assert_eq!(m.vertex_count(), 512);
        assert_eq!(m.index_count(), 2790);
        assert_eq!(m.triangle_count(), 930);
    }

    #[test]
    fn positions_lie_on_radius_and_normals_are_unit() {
        for radius in [0.02_f32, 1.0, 7.5] {
            let m = mesh(12, radius);
            for v in m.vertices() {
                let p = Vec3::from(v.position);
                let n = Vec3::from(v.normal);
                assert!((p.length() - radius).abs() < 1e-5 * radius.max(1.0));
                assert!((n.length() - 1.0).abs() < 1e-5);
                assert!((p / radius - n).length() < 1e-5);
            }
        }
    }

    #[test]
    fn normals_do_not_depend_on_radius() {
        let small = mesh(8, 0.01);
        let large = mesh(8, 3.0);
        for (a, b) in small.vertices().iter().zip(large.vertices()) {
            assert_eq!(a.normal, b.normal);
            assert_eq!(a.uv, b.uv);
        }
    }

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(mesh(16, 0.5), mesh(16, 0.5));
    }

    #[test]
    fn texture_coordinates_span_unit_square() {
        let m = mesh(6, 1.0);
        let first = m.vertices()[0];
        let last = m.vertices()[m.vertices().len() - 1];
        assert_eq!(first.uv, [0.0, 0.0]);
        assert!((last.uv[0] - 1.0).abs() < 1e-6);
        assert!((last.uv[1] - 1.0).abs() < 1e-6);
        for v in m.vertices() {
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
    }

    #[test]
    fn indices_stay_in_bounds() {
        let m = mesh(9, 1.0);
        let max = m.vertex_count();
        assert!(m.indices().iter().all(|&i| i < max));
        assert_eq!(m.indices().len() % 3, 0);
    }

    #[test]
    fn pole_rows_are_duplicated_not_collapsed() {
        // Every vertex of the first and last ring sits on a pole. This is an
        // accepted artifact of the construction and the counts rely on it.
        let m = mesh(8, 2.0);
        let sectors = m.params().sectors() as usize;
        let south = &m.vertices()[..sectors];
        let north = &m.vertices()[m.vertices().len() - sectors..];
        for v in south {
            assert!((Vec3::from(v.position) - Vec3::new(0.0, -2.0, 0.0)).length() < 1e-5);
        }
        for v in north {
            assert!((Vec3::from(v.position) - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
        }

        // Triangle B of every quad in the first band spans two pole vertices
        // and therefore has zero area.
        let tri = |t: usize| {
            let i = &m.indices()[t * 3..t * 3 + 3];
            let p = |k: usize| Vec3::from(m.vertices()[i[k] as usize].position);
            (p(1) - p(0)).cross(p(2) - p(0)).length()
        };
        for quad in 0..sectors - 1 {
            assert!(tri(quad * 2 + 1) < 1e-6);
        }
    }

    #[test]
    fn triangles_wind_consistently_outward_or_degenerate() {
        let m = mesh(10, 1.0);
        let mut inward = 0;
        let mut outward = 0;
        for tri in m.indices().chunks(3) {
            let p = |k: usize| Vec3::from(m.vertices()[tri[k] as usize].position);
            let normal = (p(1) - p(0)).cross(p(2) - p(0));
            if normal.length() < 1e-7 {
                continue;
            }
            let centroid = (p(0) + p(1) + p(2)) / 3.0;
            if normal.dot(centroid) > 0.0 {
                outward += 1;
            } else {
                inward += 1;
            }
        }
        assert!(outward == 0 || inward == 0, "mixed winding: {outward} / {inward}");
    }

    #[test]
    fn rejects_degenerate_parameters() {
        assert_eq!(
            SphereMesh::try_generate(1, 1.0),
            Err(ParameterError::SegmentsTooFew(1))
        );
        assert_eq!(
            SphereMesh::try_generate(0, 1.0),
            Err(ParameterError::SegmentsTooFew(0))
        );
        assert!(matches!(
            SphereMesh::try_generate(8, 0.0),
            Err(ParameterError::NonPositiveRadius(_))
        ));
        assert!(matches!(
            SphereMesh::try_generate(8, -1.0),
            Err(ParameterError::NonPositiveRadius(_))
        ));
        assert!(SphereParams::new(f32::NAN, 8).is_err());
    }

    #[test]
    fn rejects_segment_counts_that_overflow_indices() {
        assert_eq!(
            SphereParams::new(0.1, 50_000),
            Err(ParameterError::SegmentsTooMany {
                segments: 50_000,
                max: MAX_SEGMENTS
            })
        );
        assert!(SphereParams::new(0.1, u32::MAX).is_err());
        assert!(SphereParams::new(0.1, MAX_SEGMENTS + 1).is_err());

        let params = SphereParams::new(0.1, MAX_SEGMENTS).unwrap();
        let vertices = params.rings().checked_mul(params.sectors());
        let indices = (params.rings() - 1)
            .checked_mul(params.sectors() - 1)
            .and_then(|quads| quads.checked_mul(6));
        assert!(vertices.is_some() && indices.is_some());
    }

    #[test]
    fn vertex_record_is_eight_packed_floats() {
        assert_eq!(size_of::<Vertex>(), 8 * 4);
        let v = Vertex {
            position: [1.0, 2.0, 3.0],
            normal: [4.0, 5.0, 6.0],
            uv: [7.0, 8.0],
        };
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&v));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(Vertex::layout().array_stride, 32);
    }
}
