use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ParameterError;
use crate::geometry::SphereParams;

/// Shared sphere mesh parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Sphere", inline)]
#[serde(default)]
pub struct SphereOptions {
    /// Sphere radius in world units.
    #[schemars(title = "Radius", range(min = 0.01, max = 0.1), extend("step" = 0.005))]
    pub radius: f32,
    /// Latitude subdivisions; longitude uses twice as many.
    #[schemars(title = "Segments", range(min = 8, max = 32), extend("step" = 1))]
    pub segments: u32,
}

impl Default for SphereOptions {
    fn default() -> Self {
        Self {
            radius: 0.02,
            segments: 16,
        }
    }
}

impl SphereOptions {
    /// Validated mesh parameters.
    ///
    /// # Errors
    ///
    /// See [`SphereParams::new`].
    pub fn params(&self) -> Result<SphereParams, ParameterError> {
        SphereParams::new(self.radius, self.segments)
    }
}
