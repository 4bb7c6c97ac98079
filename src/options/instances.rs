use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Instance grid parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Instances", inline)]
#[serde(default)]
pub struct InstanceOptions {
    /// Number of sphere instances drawn.
    #[schemars(title = "Instance Count", range(min = 1, max = 100_000), extend("step" = 1))]
    pub count: u32,
    /// Ceiling on the instance count, fixed at startup.
    #[schemars(skip)]
    pub max_count: u32,
    /// Distance between neighbouring grid cells.
    #[schemars(title = "Spacing", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub spacing: f32,
}

impl Default for InstanceOptions {
    fn default() -> Self {
        Self {
            count: 10_000,
            max_count: 100_000,
            spacing: 0.1,
        }
    }
}
