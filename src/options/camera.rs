use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and orbit control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 90.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Initial orbit distance from the origin.
    #[schemars(skip)]
    pub distance: f32,
    /// Closest zoom distance.
    #[schemars(skip)]
    pub min_distance: f32,
    /// Farthest zoom distance.
    #[schemars(skip)]
    pub max_distance: f32,
    /// Initial azimuth in degrees.
    #[schemars(skip)]
    pub azimuth: f32,
    /// Initial elevation in degrees.
    #[schemars(skip)]
    pub elevation: f32,
    /// Radians of orbit per pixel of drag.
    #[schemars(title = "Rotate Speed", range(min = 0.001, max = 0.02), extend("step" = 0.001))]
    pub rotate_speed: f32,
    /// Zoom sensitivity multiplier.
    #[schemars(title = "Zoom Speed", range(min = 0.1, max = 5.0), extend("step" = 0.1))]
    pub zoom_speed: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 45.0,
            znear: 0.1,
            zfar: 100.0,
            distance: 10.0,
            min_distance: 1.0,
            max_distance: 50.0,
            azimuth: 45.0,
            elevation: 30.0,
            rotate_speed: 0.005,
            zoom_speed: 1.0,
        }
    }
}
