use glam::{Mat4, Vec3};

/// Per-instance model matrix, 16 packed `f32`s in WGSL `mat4x4<f32>` column
/// order (translation in floats 12..=14).
///
/// Only translations can be constructed; the layout never rotates or scales.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceTransform {
    model: [[f32; 4]; 4],
}

impl InstanceTransform {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        3 => Float32x4, // model column 0
        4 => Float32x4, // model column 1
        5 => Float32x4, // model column 2
        6 => Float32x4, // model column 3
    ];

    /// Pure translation by `position`.
    #[must_use]
    pub fn translation(position: Vec3) -> Self {
        Self {
            model: Mat4::from_translation(position).to_cols_array_2d(),
        }
    }

    /// The translation this transform applies.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.model[3][0], self.model[3][1], self.model[3][2])
    }

    /// The full model matrix.
    #[must_use]
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }

    /// Vertex buffer layout for buffer slot 1 (one matrix per instance).
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Smallest square grid side whose area holds `count` cells.
#[must_use]
pub fn grid_side(count: u32) -> u32 {
    let count = u64::from(count);
    let mut side = (count as f64).sqrt() as u64;
    while side * side < count {
        side += 1;
    }
    while side > 0 && (side - 1) * (side - 1) >= count {
        side -= 1;
    }
    side as u32
}

/// Lay `count` instances out row by row on a square grid in the XZ plane,
/// centered on the origin.
///
/// Cells past `count` in the last row are left empty; no padding transforms
/// are emitted.
#[must_use]
pub fn grid_layout(count: u32, spacing: f32) -> Vec<InstanceTransform> {
    let side = grid_side(count);
    if side == 0 {
        return Vec::new();
    }
    let offset = (side - 1) as f32 * spacing * 0.5;

    (0..count)
        .map(|i| {
            let x = (i % side) as f32 * spacing - offset;
            let z = (i / side) as f32 * spacing - offset;
            InstanceTransform::translation(Vec3::new(x, 0.0, z))
        })
        .collect()
}
