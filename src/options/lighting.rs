use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Directional light and surface colour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
pub struct LightingOptions {
    /// Direction towards the light.
    #[schemars(skip)]
    pub light_dir: [f32; 3],
    /// Ambient floor of the diffuse term.
    #[schemars(title = "Ambient", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub ambient: f32,
    /// Surface colour before lighting.
    #[schemars(skip)]
    pub base_color: [f32; 3],
    /// Amplitude of the positional colour ripple.
    #[schemars(title = "Variation", range(min = 0.0, max = 0.5), extend("step" = 0.01))]
    pub variation_amplitude: f32,
    /// Spatial frequency of the colour ripple.
    #[schemars(title = "Variation Frequency", range(min = 0.0, max = 20.0), extend("step" = 0.5))]
    pub variation_frequency: f32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            light_dir: [1.0, 1.0, 1.0],
            ambient: 0.3,
            base_color: [0.6, 0.8, 1.0],
            variation_amplitude: 0.1,
            variation_frequency: 5.0,
        }
    }
}
