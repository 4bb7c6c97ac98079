//! Every draw strategy must cover the same world-space triangles, and the
//! bundled presets must load.
//!
//! A recording [`DrawRecorder`] expands each recorded draw the way the GPU
//! would: indices select mesh vertices, the instance ID selects the model
//! matrix. Indirect draws read their commands from the plan, as the
//! dispatcher writes them into the indirect buffer before the pass.

use std::ops::Range;

use glam::Vec3;
use sphere_swarm::instancing::grid_layout;
use sphere_swarm::renderer::IndirectCommand;
use sphere_swarm::{DrawPlan, DrawRecorder, DrawStrategy, InstanceTransform, SphereMesh};

type Triangle = [[i64; 3]; 3];

struct Expander<'a> {
    mesh: &'a SphereMesh,
    transforms: &'a [InstanceTransform],
    commands: &'a [IndirectCommand],
    triangles: Vec<Triangle>,
    calls: u32,
}

impl<'a> Expander<'a> {
    fn new(
        mesh: &'a SphereMesh,
        transforms: &'a [InstanceTransform],
        commands: &'a [IndirectCommand],
    ) -> Self {
        Self {
            mesh,
            transforms,
            commands,
            triangles: Vec::new(),
            calls: 0,
        }
    }

    fn world(&self, index: u32, base_vertex: i32, instance: u32) -> [i64; 3] {
        let vertex = self.mesh.vertices()[(index as i64 + i64::from(base_vertex)) as usize];
        let model = self.transforms[instance as usize].to_mat4();
        let p = model.transform_point3(Vec3::from(vertex.position));
        // Quantize so float noise cannot split equal triangles.
        [p.x, p.y, p.z].map(|c| (f64::from(c) * 1e5).round() as i64)
    }

    fn expand(&mut self, indices: Range<u32>, base_vertex: i32, instances: Range<u32>) {
        let slice = &self.mesh.indices()[indices.start as usize..indices.end as usize];
        for instance in instances {
            for tri in slice.chunks_exact(3) {
                let mut corners = [
                    self.world(tri[0], base_vertex, instance),
                    self.world(tri[1], base_vertex, instance),
                    self.world(tri[2], base_vertex, instance),
                ];
                // Winding is identical across strategies; rotate so the
                // smallest corner leads, keeping orientation.
                let lead = (0..3).min_by_key(|&i| corners[i]).unwrap_or(0);
                corners.rotate_left(lead);
                self.triangles.push(corners);
            }
        }
    }
}

impl DrawRecorder for Expander<'_> {
    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32, instances: Range<u32>) {
        self.calls += 1;
        self.expand(indices, base_vertex, instances);
    }

    fn multi_draw_indexed_indirect(&mut self, offset: u64, count: u32) {
        self.calls += 1;
        let first = (offset / size_of::<IndirectCommand>() as u64) as usize;
        let commands = self.commands[first..first + count as usize].to_vec();
        for cmd in commands {
            self.expand(
                cmd.first_index..cmd.first_index + cmd.index_count,
                cmd.base_vertex as i32,
                cmd.base_instance..cmd.base_instance + cmd.instance_count,
            );
        }
    }
}

fn render(
    strategy: DrawStrategy,
    mesh: &SphereMesh,
    transforms: &[InstanceTransform],
) -> (Vec<Triangle>, u32) {
    let plan = DrawPlan::new(strategy, mesh.index_count(), transforms.len() as u32);
    let mut expander = Expander::new(mesh, transforms, plan.indirect_commands());
    plan.encode(&mut expander);
    let mut triangles = expander.triangles;
    triangles.sort_unstable();
    (triangles, expander.calls)
}

#[test]
fn all_strategies_draw_identical_triangles() {
    let mesh = SphereMesh::try_generate(6, 0.2).unwrap();
    // Seven instances leave the last grid row partly empty.
    let transforms = grid_layout(7, 0.5);

    let (reference, _) = render(DrawStrategy::Instanced, &mesh, &transforms);
    assert_eq!(reference.len(), mesh.triangle_count() as usize * 7);

    for strategy in [DrawStrategy::MultiDraw, DrawStrategy::MultiDrawIndirect] {
        let (triangles, _) = render(strategy, &mesh, &transforms);
        assert_eq!(triangles, reference, "{strategy} differs from instanced");
    }
}

#[test]
fn call_counts_differ_by_strategy() {
    let mesh = SphereMesh::try_generate(4, 0.1).unwrap();
    let transforms = grid_layout(9, 0.3);

    assert_eq!(render(DrawStrategy::Instanced, &mesh, &transforms).1, 1);
    assert_eq!(render(DrawStrategy::MultiDraw, &mesh, &transforms).1, 9);
    assert_eq!(render(DrawStrategy::MultiDrawIndirect, &mesh, &transforms).1, 1);
}

#[test]
fn zero_instances_issue_no_calls() {
    let mesh = SphereMesh::try_generate(4, 0.1).unwrap();
    for strategy in DrawStrategy::ALL {
        let (triangles, calls) = render(strategy, &mesh, &[]);
        assert!(triangles.is_empty());
        assert_eq!(calls, 0, "{strategy}");
    }
}

#[test]
fn instances_are_placed_at_grid_cells() {
    let mesh = SphereMesh::try_generate(8, 0.05).unwrap();
    let transforms = grid_layout(4, 1.0);
    let (triangles, _) = render(DrawStrategy::MultiDraw, &mesh, &transforms);

    // Every triangle lies within one radius of some grid cell center.
    let centers: Vec<Vec3> = transforms.iter().map(InstanceTransform::position).collect();
    for tri in &triangles {
        let p = Vec3::new(tri[0][0] as f32, tri[0][1] as f32, tri[0][2] as f32) / 1e5;
        assert!(
            centers.iter().any(|c| c.distance(p) <= 0.05 + 1e-4),
            "corner {p} far from every cell"
        );
    }
}

#[test]
fn bundled_presets_are_valid() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("presets");
    let names = sphere_swarm::Options::list_presets(&dir);
    assert_eq!(names, vec!["default", "dense"]);
    for name in names {
        let opts = sphere_swarm::Options::load(&dir.join(format!("{name}.toml"))).unwrap();
        assert!(opts.validate().is_ok(), "{name}");
    }
}
