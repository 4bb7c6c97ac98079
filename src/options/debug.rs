use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Debug visualization toggles, mirrored into the `debug_mode` uniform.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[schemars(title = "Debug", inline)]
#[serde(default)]
pub struct DebugOptions {
    /// Colour fragments by their normal instead of lighting them.
    #[schemars(title = "Show Normals", extend("hotkey" = "KeyN"))]
    pub show_normals: bool,
}
