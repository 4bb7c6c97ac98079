//! GPU-free scene state and the control handlers that mutate it.

use crate::engine::stats::SceneStats;
use crate::error::ParameterError;
use crate::geometry::sphere::MIN_SEGMENTS;
use crate::geometry::{SphereMesh, SphereParams};
use crate::instancing::InstanceStore;
use crate::options::Options;
use crate::renderer::DrawStrategy;

const SEGMENT_STEP: u32 = 2;
const SEGMENT_RANGE: (u32, u32) = (8, 32);
const RADIUS_RANGE: (f32, f32) = (0.01, 0.1);
const SPACING_RANGE: (f32, f32) = (0.01, 1.0);
const SCALE_STEP: f32 = 1.25;

/// Listener notified whenever a control handler changes the scene.
pub trait SceneObserver {
    /// Called with the scene's stats after each effective change.
    fn scene_changed(&mut self, stats: &SceneStats);
}

/// Mesh, instance set and draw strategy, independent of any GPU.
///
/// Handlers return whether the scene actually changed; a rejected or
/// no-op request leaves every field untouched and notifies nobody.
pub struct SwarmScene {
    mesh: SphereMesh,
    instances: InstanceStore,
    strategy: DrawStrategy,
    mesh_dirty: bool,
    observer: Option<Box<dyn SceneObserver>>,
}

impl SwarmScene {
    /// Build the initial mesh and grid.
    ///
    /// # Errors
    ///
    /// The sphere or instance section's [`ParameterError`].
    pub fn from_options(options: &Options) -> Result<Self, ParameterError> {
        let params = options.sphere.params()?;
        let instances = InstanceStore::new(
            options.instances.count,
            options.instances.spacing,
            options.instances.max_count,
        )?;
        Ok(Self::new(params, instances, options.render.strategy))
    }

    /// Assemble a scene from validated parts.
    #[must_use]
    pub fn new(
        params: SphereParams,
        instances: InstanceStore,
        strategy: DrawStrategy,
    ) -> Self {
        Self {
            mesh: SphereMesh::generate(params),
            instances,
            strategy,
            mesh_dirty: true,
            observer: None,
        }
    }

    /// Install the change listener, replacing any previous one.
    pub fn set_observer(&mut self, observer: Box<dyn SceneObserver>) {
        self.observer = Some(observer);
    }

    /// Remove the change listener.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    fn notify(&mut self) {
        let stats = self.stats();
        if let Some(observer) = self.observer.as_mut() {
            observer.scene_changed(&stats);
        }
    }

    // ── Control handlers ──

    /// Resize the instance set. Counts outside `1..=max_count` are ignored.
    pub fn on_instance_count_changed(&mut self, count: u32) -> bool {
        let changed = self.instances.set_count(count);
        if changed {
            self.notify();
        }
        changed
    }

    /// Regenerate the shared mesh.
    ///
    /// # Errors
    ///
    /// [`ParameterError`] for an invalid radius or segment count; the
    /// current mesh is kept.
    pub fn on_sphere_params_changed(
        &mut self,
        radius: f32,
        segments: u32,
    ) -> Result<bool, ParameterError> {
        let params = SphereParams::new(radius, segments)?;
        if params == self.mesh.params() {
            return Ok(false);
        }
        self.mesh = SphereMesh::generate(params);
        self.mesh_dirty = true;
        log::debug!(
            "sphere regenerated: radius {radius}, {segments} segments, {} triangles",
            self.mesh.triangle_count()
        );
        self.notify();
        Ok(true)
    }

    /// Switch the draw strategy.
    pub fn on_render_strategy_changed(&mut self, strategy: DrawStrategy) -> bool {
        if strategy == self.strategy {
            return false;
        }
        log::info!("draw strategy: {} -> {}", self.strategy, strategy);
        self.strategy = strategy;
        self.notify();
        true
    }

    /// Re-lay the grid with a new spacing.
    ///
    /// # Errors
    ///
    /// [`ParameterError::NonPositiveSpacing`]; the current layout is kept.
    pub fn on_spacing_changed(&mut self, spacing: f32) -> Result<bool, ParameterError> {
        let changed = self.instances.set_spacing(spacing)?;
        if changed {
            self.notify();
        }
        Ok(changed)
    }

    // ── Keyboard steps ──

    /// Switch to the strategy after the current one.
    pub fn cycle_strategy(&mut self) -> bool {
        self.on_render_strategy_changed(self.strategy.next())
    }

    /// Double or halve the instance count within `1..=max_count`.
    pub fn step_instance_count(&mut self, increase: bool) -> bool {
        let count = self.instances.count();
        let next = if increase {
            count.saturating_mul(2).min(self.instances.max_count())
        } else {
            (count / 2).max(1)
        };
        self.on_instance_count_changed(next)
    }

    /// Add or remove two segments, clamped to the panel's range unless the
    /// current count already lies outside it.
    ///
    /// # Errors
    ///
    /// See [`on_sphere_params_changed`](Self::on_sphere_params_changed).
    pub fn step_segments(&mut self, increase: bool) -> Result<bool, ParameterError> {
        let params = self.mesh.params();
        let segments = if increase {
            params.segments().saturating_add(SEGMENT_STEP)
        } else {
            params.segments().saturating_sub(SEGMENT_STEP)
        };
        let segments = if within(params.segments(), SEGMENT_RANGE) {
            segments.clamp(SEGMENT_RANGE.0, SEGMENT_RANGE.1)
        } else {
            segments.max(MIN_SEGMENTS)
        };
        self.on_sphere_params_changed(params.radius(), segments)
    }

    /// Scale the radius by 1.25, clamped like
    /// [`step_segments`](Self::step_segments).
    ///
    /// # Errors
    ///
    /// See [`on_sphere_params_changed`](Self::on_sphere_params_changed).
    pub fn step_radius(&mut self, increase: bool) -> Result<bool, ParameterError> {
        let params = self.mesh.params();
        let radius = scale(params.radius(), increase, RADIUS_RANGE);
        self.on_sphere_params_changed(radius, params.segments())
    }

    /// Scale the spacing by 1.25, clamped like
    /// [`step_segments`](Self::step_segments).
    ///
    /// # Errors
    ///
    /// See [`on_spacing_changed`](Self::on_spacing_changed).
    pub fn step_spacing(&mut self, increase: bool) -> Result<bool, ParameterError> {
        let spacing = scale(self.instances.spacing(), increase, SPACING_RANGE);
        self.on_spacing_changed(spacing)
    }

    // ── Queries ──

    /// Current mesh and instance totals.
    #[must_use]
    pub fn stats(&self) -> SceneStats {
        SceneStats::new(
            self.mesh.vertex_count(),
            self.mesh.index_count(),
            self.instances.count(),
            self.strategy,
        )
    }

    /// The shared sphere mesh.
    pub fn mesh(&self) -> &SphereMesh {
        &self.mesh
    }

    /// Parameters the mesh was generated from.
    pub fn sphere_params(&self) -> SphereParams {
        self.mesh.params()
    }

    /// The instance set.
    pub fn instances(&self) -> &InstanceStore {
        &self.instances
    }

    /// Mutable instance set, for publishing to the GPU.
    pub fn instances_mut(&mut self) -> &mut InstanceStore {
        &mut self.instances
    }

    /// Mesh and instance set borrowed together, for the initial GPU upload.
    pub fn gpu_parts(&mut self) -> (&SphereMesh, &mut InstanceStore) {
        (&self.mesh, &mut self.instances)
    }

    /// Active draw strategy.
    pub fn strategy(&self) -> DrawStrategy {
        self.strategy
    }

    /// Whether the mesh changed since the last upload.
    pub fn is_mesh_dirty(&self) -> bool {
        self.mesh_dirty
    }

    /// Clear the mesh-dirty flag, returning its previous value.
    pub fn take_mesh_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.mesh_dirty, false)
    }

    /// Force the next frame to re-upload the mesh.
    pub fn mark_mesh_dirty(&mut self) {
        self.mesh_dirty = true;
    }
}

fn scale(value: f32, increase: bool, range: (f32, f32)) -> f32 {
    let scaled = if increase {
        value * SCALE_STEP
    } else {
        value / SCALE_STEP
    };
    if within(value, range) {
        scaled.clamp(range.0, range.1)
    } else {
        scaled
    }
}

/// Steps only clamp values that start inside the keyboard range; preset
/// values outside it step relative to themselves.
fn within<T: PartialOrd>(value: T, (min, max): (T, T)) -> bool {
    min <= value && value <= max
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    struct Recorder(Rc<RefCell<Vec<SceneStats>>>);

    impl SceneObserver for Recorder {
        fn scene_changed(&mut self, stats: &SceneStats) {
            self.0.borrow_mut().push(*stats);
        }
    }

    fn scene() -> SwarmScene {
        SwarmScene::from_options(&Options::default()).unwrap()
    }

    fn observed(scene: &mut SwarmScene) -> Rc<RefCell<Vec<SceneStats>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        scene.set_observer(Box::new(Recorder(Rc::clone(&log))));
        log
    }

    #[test]
    fn default_scene_matches_reference_run() {
        let s = scene();
        let stats = s.stats();
        assert_eq!(stats.instance_count, 10_000);
        assert_eq!(stats.strategy, DrawStrategy::Instanced);
        assert_eq!(s.instances().transforms().len(), 10_000);
        assert!(s.is_mesh_dirty());
    }

    #[test]
    fn count_above_ceiling_is_a_no_op() {
        let mut s = scene();
        let log = observed(&mut s);
        assert!(!s.on_instance_count_changed(150_000));
        assert!(!s.on_instance_count_changed(0));
        assert_eq!(s.instances().count(), 10_000);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn count_change_notifies_with_new_totals() {
        let mut s = scene();
        let log = observed(&mut s);
        assert!(s.on_instance_count_changed(50));
        assert!(!s.on_instance_count_changed(50));
        let log = log.borrow();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].instance_count, 50);
        assert_eq!(
            log[0].total_triangles,
            u64::from(s.mesh().triangle_count()) * 50
        );
    }

    #[test]
    fn sphere_change_regenerates_and_marks_dirty() {
        let mut s = scene();
        assert!(s.take_mesh_dirty());
        assert!(!s.is_mesh_dirty());

        assert_eq!(s.on_sphere_params_changed(0.02, 16), Ok(false));
        assert!(!s.is_mesh_dirty());

        assert_eq!(s.on_sphere_params_changed(0.05, 8), Ok(true));
        assert!(s.is_mesh_dirty());
        assert_eq!(s.sphere_params().segments(), 8);
    }

    #[test]
    fn invalid_sphere_keeps_last_good_mesh() {
        let mut s = scene();
        let before = s.mesh().index_count();
        assert_eq!(
            s.on_sphere_params_changed(0.02, 1),
            Err(ParameterError::SegmentsTooFew(1))
        );
        assert!(s.on_sphere_params_changed(-1.0, 16).is_err());
        assert_eq!(s.mesh().index_count(), before);
    }

    #[test]
    fn strategy_switch_leaves_mesh_and_instances_alone() {
        let mut s = scene();
        let _ = s.take_mesh_dirty();
        let _ = s.instances_mut().take_dirty();
        let generation = s.instances().generation();

        assert!(s.on_render_strategy_changed(DrawStrategy::MultiDraw));
        assert!(!s.on_render_strategy_changed(DrawStrategy::MultiDraw));
        assert!(!s.is_mesh_dirty());
        assert!(!s.instances().is_dirty());
        assert_eq!(s.instances().generation(), generation);
    }

    #[test]
    fn cycle_visits_every_strategy() {
        let mut s = scene();
        let mut seen = vec![s.strategy()];
        for _ in 0..2 {
            assert!(s.cycle_strategy());
            seen.push(s.strategy());
        }
        assert_eq!(seen, DrawStrategy::ALL.to_vec());
        assert!(s.cycle_strategy());
        assert_eq!(s.strategy(), DrawStrategy::Instanced);
    }

    #[test]
    fn instance_steps_clamp_to_range() {
        let mut s = scene();
        assert!(s.step_instance_count(true));
        assert_eq!(s.instances().count(), 20_000);
        for _ in 0..5 {
            let _ = s.step_instance_count(true);
        }
        assert_eq!(s.instances().count(), 100_000);
        assert!(!s.step_instance_count(true));

        assert!(s.on_instance_count_changed(3));
        assert!(s.step_instance_count(false));
        assert_eq!(s.instances().count(), 1);
        assert!(!s.step_instance_count(false));
    }

    #[test]
    fn segment_steps_stay_in_slider_range() {
        let mut s = scene();
        assert_eq!(s.step_segments(true), Ok(true));
        assert_eq!(s.sphere_params().segments(), 18);
        for _ in 0..20 {
            let _ = s.step_segments(true);
        }
        assert_eq!(s.sphere_params().segments(), 32);
        for _ in 0..20 {
            let _ = s.step_segments(false);
        }
        assert_eq!(s.sphere_params().segments(), 8);
        assert_eq!(s.step_segments(false), Ok(false));
    }

    #[test]
    fn radius_and_spacing_steps_scale() {
        let mut s = scene();
        assert_eq!(s.step_radius(true), Ok(true));
        assert!((s.sphere_params().radius() - 0.025).abs() < 1e-6);
        assert_eq!(s.step_spacing(false), Ok(true));
        assert!((s.instances().spacing() - 0.08).abs() < 1e-6);
        for _ in 0..30 {
            let _ = s.step_spacing(true);
        }
        assert!((s.instances().spacing() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn preset_values_outside_the_key_range_step_from_themselves() {
        let mut opts = Options::default();
        opts.sphere.radius = 0.5;
        opts.sphere.segments = 64;
        opts.instances.spacing = 2.0;
        let mut s = SwarmScene::from_options(&opts).unwrap();

        assert_eq!(s.step_radius(true), Ok(true));
        assert!((s.sphere_params().radius() - 0.625).abs() < 1e-6);
        assert_eq!(s.step_radius(false), Ok(true));
        assert_eq!(s.step_radius(false), Ok(true));
        assert!((s.sphere_params().radius() - 0.4).abs() < 1e-6);

        assert_eq!(s.step_segments(false), Ok(true));
        assert_eq!(s.sphere_params().segments(), 62);

        assert_eq!(s.step_spacing(false), Ok(true));
        assert!((s.instances().spacing() - 1.6).abs() < 1e-6);
        assert_eq!(s.step_spacing(true), Ok(true));
        assert!((s.instances().spacing() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn bad_spacing_is_rejected() {
        let mut s = scene();
        assert_eq!(
            s.on_spacing_changed(0.0),
            Err(ParameterError::NonPositiveSpacing(0.0))
        );
        assert!((s.instances().spacing() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn cleared_observer_is_silent() {
        let mut s = scene();
        let log = observed(&mut s);
        s.clear_observer();
        assert!(s.on_instance_count_changed(7));
        assert!(log.borrow().is_empty());
    }
}
