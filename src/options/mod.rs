//! Centralized runtime options with TOML preset support.
//!
//! All tweakable settings (instance grid, sphere mesh, draw strategy,
//! camera, lighting, debug toggles, keybindings) are consolidated here.
//! Options serialize to/from TOML so a run can be reproduced from a preset
//! file.

mod camera;
mod debug;
mod instances;
mod keybindings;
mod lighting;
mod render;
mod sphere;

use std::path::Path;

pub use camera::CameraOptions;
pub use debug::DebugOptions;
pub use instances::InstanceOptions;
pub use keybindings::KeybindingOptions;
pub use lighting::LightingOptions;
pub use render::RenderOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use sphere::SphereOptions;

use crate::error::{ParameterError, SwarmError};
use crate::instancing::InstanceStore;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[instances]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Instance count and grid spacing.
    pub instances: InstanceOptions,
    /// Shared sphere mesh parameters.
    pub sphere: SphereOptions,
    /// Draw strategy and presentation.
    pub render: RenderOptions,
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Lighting and surface colour.
    pub lighting: LightingOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
    /// Debug visualization options.
    pub debug: DebugOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`SwarmError::Io`] if the file cannot be read,
    /// [`SwarmError::OptionsParse`] if it is not valid TOML for these
    /// options.
    pub fn load(path: &Path) -> Result<Self, SwarmError> {
        let content = std::fs::read_to_string(path).map_err(SwarmError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`SwarmError::OptionsParse`] on malformed input.
    pub fn from_toml(content: &str) -> Result<Self, SwarmError> {
        let mut opts: Self = toml::from_str(content)
            .map_err(|e| SwarmError::OptionsParse(e.to_string()))?;
        opts.keybindings.rebuild_reverse_map();
        Ok(opts)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// [`SwarmError::OptionsParse`] if serialization fails,
    /// [`SwarmError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), SwarmError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SwarmError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(SwarmError::Io)?;
        }
        std::fs::write(path, content).map_err(SwarmError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }

    /// Check the sphere and instance sections.
    ///
    /// # Errors
    ///
    /// The first [`ParameterError`] found.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let _ = self.sphere.params()?;
        let _ = InstanceStore::new(
            self.instances.count,
            self.instances.spacing,
            self.instances.max_count,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyAction;
    use crate::renderer::DrawStrategy;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn defaults_match_reference_run() {
        let opts = Options::default();
        assert_eq!(opts.instances.count, 10_000);
        assert_eq!(opts.instances.max_count, 100_000);
        assert_eq!(opts.instances.spacing, 0.1);
        assert_eq!(opts.sphere.radius, 0.02);
        assert_eq!(opts.sphere.segments, 16);
        assert_eq!(opts.render.strategy, DrawStrategy::Instanced);
        assert_eq!(opts.camera.fovy, 45.0);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[render]
strategy = "multi_draw_indirect"

[instances]
count = 2500
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.render.strategy, DrawStrategy::MultiDrawIndirect);
        assert_eq!(opts.instances.count, 2500);
        // Everything else should be default
        assert_eq!(opts.instances.spacing, 0.1);
        assert_eq!(opts.lighting.ambient, 0.3);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Options::from_toml("[render]\nstrategy = 7").unwrap_err();
        assert!(matches!(err, SwarmError::OptionsParse(_)));
    }

    #[test]
    fn validate_rejects_bad_sections() {
        let mut opts = Options::default();
        opts.sphere.segments = 1;
        assert_eq!(opts.validate(), Err(ParameterError::SegmentsTooFew(1)));

        let mut opts = Options::default();
        opts.instances.count = 200_000;
        assert!(matches!(
            opts.validate(),
            Err(ParameterError::CountOutOfRange { .. })
        ));

        let mut opts = Options::default();
        opts.instances.spacing = 0.0;
        assert!(opts.validate().is_err());

        let mut opts = Options::default();
        opts.instances.max_count = 3_000_000;
        assert!(matches!(
            opts.validate(),
            Err(ParameterError::MaxCountTooLarge { .. })
        ));

        let mut opts = Options::default();
        opts.sphere.segments = 50_000;
        assert!(matches!(
            opts.validate(),
            Err(ParameterError::SegmentsTooMany { .. })
        ));
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("KeyQ"),
            Some(KeyAction::ResetCamera)
        );
        assert_eq!(
            opts.keybindings.lookup("Tab"),
            Some(KeyAction::CycleStrategy)
        );
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn loaded_keybindings_are_searchable() {
        let toml_str = r#"
[keybindings.bindings]
cycle_strategy = "Space"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(
            opts.keybindings.lookup("Space"),
            Some(KeyAction::CycleStrategy)
        );
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = std::env::temp_dir()
            .join(format!("sphere-swarm-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.instances.count = 42;
        opts.save(&dir.join("small.toml")).unwrap();
        Options::default().save(&dir.join("default.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        assert_eq!(Options::list_presets(&dir), vec!["default", "small"]);
        let loaded = Options::load(&dir.join("small.toml")).unwrap();
        assert_eq!(loaded.instances.count, 42);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Options::load(Path::new("/nonexistent/sphere-swarm.toml"))
            .unwrap_err();
        assert!(matches!(err, SwarmError::Io(_)));
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        // UI-exposed sections should be present
        for section in
            ["instances", "sphere", "render", "camera", "lighting", "debug"]
        {
            assert!(props.contains_key(section), "missing {section}");
        }

        // Skipped sections should be absent
        assert!(!props.contains_key("keybindings"));

        // Slider ranges carried through
        let segments = &props["sphere"]["properties"]["segments"];
        assert_eq!(segments["minimum"].as_f64(), Some(8.0));
        assert_eq!(segments["maximum"].as_f64(), Some(32.0));
        let instances = &props["instances"]["properties"];
        assert!(instances.get("count").is_some());
        assert!(instances.get("max_count").is_none());
    }
}
