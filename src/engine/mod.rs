//! The sphere-swarm engine: scene state plus the GPU objects that draw it.
//!
//! [`SwarmEngine`] owns the wgpu context, the draw dispatcher, the programs
//! and the orbit camera. Control flows in as [`SwarmCommand`]s (from key
//! bindings, mouse gestures or direct calls) and lands on the GPU-free
//! [`SwarmScene`]; each [`SwarmEngine::render`] call then pushes whatever
//! changed to the GPU before recording one pass.

/// Engine command vocabulary.
pub mod command;
mod input;
/// GPU-free scene state and control handlers.
pub mod scene;
/// Mesh and instance totals.
pub mod stats;

use glam::Vec3;

pub use self::command::SwarmCommand;
pub use self::scene::{SceneObserver, SwarmScene};
pub use self::stats::SceneStats;
use crate::camera::OrbitCamera;
use crate::error::SwarmError;
use crate::gpu::programs::{FrameUniforms, ProgramSet};
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::DepthTarget;
use crate::input::InputProcessor;
use crate::options::Options;
use crate::renderer::{DrawDispatcher, DrawPlan, DrawStats};
use crate::util::frame_timing::FrameTiming;

/// Renders a grid of identical spheres with a switchable draw strategy.
pub struct SwarmEngine {
    context: RenderContext,
    options: Options,
    scene: SwarmScene,
    dispatcher: DrawDispatcher,
    programs: ProgramSet,
    camera: OrbitCamera,
    depth: DepthTarget,
    input: InputProcessor,
    frame_timing: FrameTiming,
    last_draw: DrawStats,
    title_stale: bool,
    surface_visible: bool,
}

impl SwarmEngine {
    /// Create the GPU context, compile the programs, build the scene and
    /// upload it.
    ///
    /// # Errors
    ///
    /// [`SwarmError::InvalidParameter`] for rejected options,
    /// [`SwarmError::Gpu`] if the device cannot be created,
    /// [`SwarmError::Shader`] or [`SwarmError::BufferAllocation`] if GPU
    /// resources cannot be built.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        options: Options,
    ) -> Result<Self, SwarmError> {
        options.validate()?;
        let context =
            RenderContext::new(window, size, options.render.vsync).await?;

        let programs = ProgramSet::new(
            &context.device,
            context.format(),
            FrameUniforms::default(),
        )?;

        let mut scene = SwarmScene::from_options(&options)?;
        let mut dispatcher = DrawDispatcher::new();
        {
            let (mesh, instances) = scene.gpu_parts();
            dispatcher.initialize(
                &context.device,
                &context.queue,
                mesh,
                instances,
                programs.instance_layout(),
            )?;
        }
        let _ = scene.take_mesh_dirty();

        let camera = OrbitCamera::new(&options.camera, context.aspect_ratio());
        let depth = DepthTarget::new(
            &context.device,
            context.config.width,
            context.config.height,
        );
        let input = InputProcessor::with_key_bindings(options.keybindings.clone());

        let mut engine = Self {
            context,
            options,
            scene,
            dispatcher,
            programs,
            camera,
            depth,
            input,
            frame_timing: FrameTiming::new(),
            last_draw: DrawStats::default(),
            title_stale: true,
            surface_visible: has_area(size.0, size.1),
        };
        engine.apply_lighting();
        log::info!("engine ready: {}", engine.scene.stats());
        Ok(engine)
    }

    /// Push the lighting and debug options into the uniform block.
    fn apply_lighting(&mut self) {
        let lighting = &self.options.lighting;
        let debug_mode = i32::from(self.options.debug.show_normals);
        let uniforms = self.programs.uniforms_mut();
        let _ = uniforms.set_vec3("light_dir", Vec3::from(lighting.light_dir));
        let _ = uniforms.set_float("ambient", lighting.ambient);
        let _ = uniforms.set_vec3("base_color", Vec3::from(lighting.base_color));
        let _ = uniforms
            .set_float("variation_amplitude", lighting.variation_amplitude);
        let _ = uniforms
            .set_float("variation_frequency", lighting.variation_frequency);
        let _ = uniforms.set_int("debug_mode", debug_mode);
    }

    /// Sync CPU-side changes to the GPU and plan the frame's draws.
    fn prepare_frame(&mut self) -> Result<DrawPlan, SwarmError> {
        let device = &self.context.device;
        let queue = &self.context.queue;

        if self.scene.is_mesh_dirty() {
            self.dispatcher.upload_mesh(device, queue, self.scene.mesh())?;
            let _ = self.scene.take_mesh_dirty();
        }
        let _ = self.dispatcher.publish_instances(
            device,
            queue,
            self.scene.instances_mut(),
        )?;

        let plan = self.dispatcher.plan(self.scene.strategy())?;
        let _ = self.dispatcher.prepare_indirect(device, queue, &plan)?;

        let matrices = self.camera.matrices();
        let uniforms = self.programs.uniforms_mut();
        let _ = uniforms.set_matrix4("view", matrices.view);
        let _ = uniforms.set_matrix4("projection", matrices.projection);
        let _ = self.programs.flush_uniforms(queue);
        Ok(plan)
    }

    /// Render one frame.
    ///
    /// Frames are skipped while the surface has zero area, and when GPU
    /// buffers could not be updated (logged).
    ///
    /// # Errors
    ///
    /// [`wgpu::SurfaceError`] if the next swapchain texture cannot be
    /// acquired; callers reconfigure on `Lost`/`Outdated`.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if !self.surface_visible {
            return Ok(());
        }

        let plan = match self.prepare_frame() {
            Ok(plan) => plan,
            Err(SwarmError::NotInitialized) => {
                log::debug!("draw dispatcher not initialized, skipping frame");
                return Ok(());
            }
            Err(e) => {
                log::error!("skipping frame: {e}");
                return Ok(());
            }
        };

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();

        let [r, g, b] = self.options.render.clear_color;
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Swarm Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(r),
                            g: f64::from(g),
                            b: f64::from(b),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(
                    wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    },
                ),
                ..Default::default()
            });

            match self.dispatcher.dispatch(&mut pass, &self.programs, &plan) {
                Ok(stats) => self.last_draw = stats,
                Err(e) => log::debug!("dispatch skipped: {e}"),
            }
        }

        self.context.submit(encoder);
        frame.present();

        if self.frame_timing.end_frame().is_some() {
            self.title_stale = true;
        }
        Ok(())
    }

    /// Resize the surface, depth target and camera aspect.
    ///
    /// A zero-area size (a minimized window) keeps the last surface
    /// configuration and suspends rendering until a visible size arrives.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface_visible = has_area(width, height);
        if self.context.resize(width, height) {
            self.depth.resize(&self.context.device, width, height);
            self.camera.resize(width, height);
        }
    }

    /// Reconfigure the surface after it was lost or became outdated.
    /// Does nothing while the surface has no area.
    pub fn reconfigure(&self) {
        if self.surface_visible {
            self.context.reconfigure();
        }
    }

    /// Whether the last requested surface size has a non-zero area.
    pub fn is_surface_visible(&self) -> bool {
        self.surface_visible
    }

    /// Title text: smoothed FPS, strategy, instances and totals.
    #[must_use]
    pub fn window_title(&self) -> String {
        format!("{:.1} FPS | {}", self.frame_timing.fps(), self.scene.stats())
    }

    /// A fresh title after each FPS report or scene change, `None` between.
    pub fn take_title_update(&mut self) -> Option<String> {
        std::mem::take(&mut self.title_stale).then(|| self.window_title())
    }

    // ── Accessors ──

    /// Scene state and its control handlers.
    pub fn scene(&self) -> &SwarmScene {
        &self.scene
    }

    /// Mutable scene, e.g. to install a [`SceneObserver`].
    pub fn scene_mut(&mut self) -> &mut SwarmScene {
        &mut self.scene
    }

    /// Current options, updated as commands change them.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Orbit camera.
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// What the last frame issued.
    pub fn last_draw(&self) -> DrawStats {
        self.last_draw
    }

    /// Smoothed frames per second.
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }

    /// The wgpu context.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }
}

impl Drop for SwarmEngine {
    fn drop(&mut self) {
        let _ = self.dispatcher.release();
    }
}

fn has_area(width: u32, height: u32) -> bool {
    width > 0 && height > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_surfaces_are_hidden() {
        assert!(has_area(800, 600));
        assert!(has_area(1, 1));
        assert!(!has_area(0, 600));
        assert!(!has_area(800, 0));
        assert!(!has_area(0, 0));
    }
}
