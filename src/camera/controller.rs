use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::camera::core::{Camera, CameraMatrices};
use crate::options::CameraOptions;

/// Elevation limit either side of the horizon, just under straight up/down.
pub const MAX_ELEVATION: f32 = PI * 0.49;

/// Orbit camera circling the origin at a clamped distance.
///
/// Dragging changes azimuth and elevation, scrolling changes distance.
/// Azimuth wraps to `[0, 2π)`; elevation is clamped to
/// `±`[`MAX_ELEVATION`]; distance is clamped to the configured range.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    center: Vec3,
    azimuth: f32,
    elevation: f32,
    distance: f32,
    min_distance: f32,
    max_distance: f32,
    rotate_speed: f32,
    zoom_speed: f32,
    home: (f32, f32, f32),
    camera: Camera,
}

impl OrbitCamera {
    /// Camera at the configured starting orbit.
    #[must_use]
    pub fn new(options: &CameraOptions, aspect: f32) -> Self {
        let min_distance = options.min_distance.max(0.1);
        let max_distance = options.max_distance.max(min_distance);
        let mut orbit = Self {
            center: Vec3::ZERO,
            azimuth: 0.0,
            elevation: 0.0,
            distance: options.distance,
            min_distance,
            max_distance,
            rotate_speed: options.rotate_speed,
            zoom_speed: options.zoom_speed,
            home: (
                options.azimuth.to_radians(),
                options.elevation.to_radians(),
                options.distance,
            ),
            camera: Camera {
                eye: Vec3::ZERO,
                target: Vec3::ZERO,
                up: Vec3::Y,
                aspect,
                fovy: options.fovy,
                znear: options.znear,
                zfar: options.zfar,
            },
        };
        orbit.reset();
        orbit
    }

    /// Return to the starting orbit.
    pub fn reset(&mut self) {
        let (azimuth, elevation, distance) = self.home;
        self.azimuth = azimuth;
        self.elevation = elevation;
        self.distance = distance;
        self.clamp();
        self.update_camera_pos();
    }

    /// Orbit by a cursor delta in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.azimuth -= delta.x * self.rotate_speed;
        self.elevation += delta.y * self.rotate_speed;
        self.clamp();
        self.update_camera_pos();
    }

    /// Zoom by scroll amount; positive moves closer.
    pub fn zoom(&mut self, scroll: f32) {
        let factor = 1.0 + scroll * self.zoom_speed * 0.1;
        if factor <= 0.0 {
            return;
        }
        self.distance /= factor;
        self.clamp();
        self.update_camera_pos();
    }

    /// Update the projection aspect ratio. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.camera.aspect = width as f32 / height as f32;
        }
    }

    fn clamp(&mut self) {
        self.azimuth = self.azimuth.rem_euclid(TAU);
        self.elevation = self.elevation.clamp(-MAX_ELEVATION, MAX_ELEVATION);
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
    }

    fn update_camera_pos(&mut self) {
        let (sin_el, cos_el) = self.elevation.sin_cos();
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        let offset = Vec3::new(cos_el * cos_az, sin_el, cos_el * sin_az);

        self.camera.eye = self.center + offset * self.distance;
        self.camera.target = self.center;
    }

    /// Current azimuth in radians, in `[0, 2π)`.
    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    /// Current elevation in radians.
    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    /// Current distance from the orbit center.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// The underlying perspective camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// View and projection for this frame.
    pub fn matrices(&self) -> CameraMatrices {
        self.camera.matrices()
    }
}
