use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::renderer::DrawStrategy;

/// Draw strategy and frame presentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Rendering", inline)]
#[serde(default)]
pub struct RenderOptions {
    /// Batching strategy used at startup.
    #[schemars(title = "Strategy")]
    pub strategy: DrawStrategy,
    /// Background colour.
    #[schemars(skip)]
    pub clear_color: [f32; 3],
    /// Cap presentation to the display refresh rate.
    #[schemars(title = "VSync")]
    pub vsync: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            strategy: DrawStrategy::Instanced,
            clear_color: [0.1, 0.1, 0.1],
            vsync: true,
        }
    }
}
