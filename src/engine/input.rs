//! Input routing and command execution for SwarmEngine

use super::{SwarmCommand, SwarmEngine};
use crate::error::ParameterError;
use crate::input::InputEvent;

impl SwarmEngine {
    /// Process a platform-agnostic input event.
    ///
    /// Drags orbit the camera and scrolling zooms. Returns `true` if the
    /// event changed anything.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        self.input
            .handle_event(event)
            .is_some_and(|command| self.execute(command))
    }

    /// Run the command bound to `key` (a `winit` `KeyCode` debug name such
    /// as `"Tab"` or `"Digit2"`). Returns `true` if the key was bound and
    /// its command changed something.
    pub fn handle_key_press(&mut self, key: &str) -> bool {
        self.input
            .handle_key_press(key)
            .is_some_and(|command| self.execute(command))
    }

    /// Apply one command. Returns `true` if it changed the camera, the
    /// scene or the shading mode.
    ///
    /// Rejected parameters are logged and leave the scene as it was.
    pub fn execute(&mut self, command: SwarmCommand) -> bool {
        let changed = match command {
            SwarmCommand::RotateCamera { delta } => {
                self.camera.rotate(delta);
                true
            }
            SwarmCommand::Zoom { delta } => {
                self.camera.zoom(delta);
                true
            }
            SwarmCommand::ResetCamera => {
                self.camera.reset();
                true
            }
            SwarmCommand::CycleStrategy => self.scene.cycle_strategy(),
            SwarmCommand::SetStrategy(strategy) => {
                self.scene.on_render_strategy_changed(strategy)
            }
            SwarmCommand::SetInstanceCount(count) => {
                self.scene.on_instance_count_changed(count)
            }
            SwarmCommand::StepInstanceCount { increase } => {
                self.scene.step_instance_count(increase)
            }
            SwarmCommand::SetSphereParams { radius, segments } => {
                accepted(self.scene.on_sphere_params_changed(radius, segments))
            }
            SwarmCommand::StepSegments { increase } => {
                accepted(self.scene.step_segments(increase))
            }
            SwarmCommand::StepRadius { increase } => {
                accepted(self.scene.step_radius(increase))
            }
            SwarmCommand::SetSpacing(spacing) => {
                accepted(self.scene.on_spacing_changed(spacing))
            }
            SwarmCommand::StepSpacing { increase } => {
                accepted(self.scene.step_spacing(increase))
            }
            SwarmCommand::ToggleNormals => {
                self.toggle_normals();
                true
            }
        };

        if changed && !command.is_camera() {
            self.sync_options();
            self.title_stale = true;
        }
        changed
    }

    fn toggle_normals(&mut self) {
        let show = !self.options.debug.show_normals;
        self.options.debug.show_normals = show;
        let _ = self
            .programs
            .uniforms_mut()
            .set_int("debug_mode", i32::from(show));
        log::debug!("normal visualization {}", if show { "on" } else { "off" });
    }

    /// Mirror scene state back into the options so a saved preset
    /// reproduces the current run.
    fn sync_options(&mut self) {
        let params = self.scene.sphere_params();
        let instances = self.scene.instances();
        self.options.sphere.radius = params.radius();
        self.options.sphere.segments = params.segments();
        self.options.instances.count = instances.count();
        self.options.instances.spacing = instances.spacing();
        self.options.render.strategy = self.scene.strategy();
    }
}

fn accepted(result: Result<bool, ParameterError>) -> bool {
    result.unwrap_or_else(|e| {
        log::warn!("rejected: {e}");
        false
    })
}
