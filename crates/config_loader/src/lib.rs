//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Generate `ProjectBlueprint`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let blueprint = ConfigLoader::load_from_path(Path::new("project.toml")).unwrap();
//! println!("Master: {:?}", blueprint.master_scene());
//! ```

mod parser;
mod validator;

pub use contracts::ProjectBlueprint;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported extension
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<ProjectBlueprint, ContractError> {
        let content = Self::read_file(path)?;
        let format = Self::detect_format(path, &content)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<ProjectBlueprint, ContractError> {
        Self::parse_and_validate(content, format)
    }

    /// Serialize ProjectBlueprint to TOML string
    pub fn to_toml(blueprint: &ProjectBlueprint) -> Result<String, ContractError> {
        toml::to_string_pretty(blueprint)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize ProjectBlueprint to JSON string
    pub fn to_json(blueprint: &ProjectBlueprint) -> Result<String, ContractError> {
        serde_json::to_string_pretty(blueprint)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    ///
    /// Files without an extension are sniffed from their content.
    fn detect_format(path: &Path, content: &str) -> Result<ConfigFormat, ContractError> {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Ok(ConfigFormat::sniff(content));
        };

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        std::fs::read_to_string(path).map_err(|e| ContractError::ConfigParse {
            message: format!("cannot read {}: {e}", path.display()),
            source: Some(Box::new(e)),
        })
    }

    /// Parse and validate configuration content
    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<ProjectBlueprint, ContractError> {
        let blueprint = parser::parse(content, format)?;
        validator::validate(&blueprint)?;
        Ok(blueprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL_TOML: &str = r#"
[sync]
enabled = true
master_scene = "EDIT"
keep_gpencil_tool_settings = true

[[scenes]]
name = "EDIT"
frame_end = 500

[[scenes]]
name = "SH010"
cameras = ["Cam1", "Cam2"]
camera = "Cam1"
brush = "Pen"

[[scenes.objects]]
name = "Stroke"
kind = "gpencil"
mode = "paint_gpencil"
materials = ["Black", "White"]
active_material = "White"
active = true

[[scenes]]
name = "SH020"
frame_start = 1001
frame_end = 1100

[[timeline.channels]]
index = 2
mute = true

[[timeline.strips]]
name = "SH010"
scene = "SH010"
frame_start = 1
camera = "Cam2"

[[timeline.strips]]
name = "SH020"
scene = "SH020"
frame_start = 241
frame_offset_start = 10
"#;

    #[test]
    fn test_load_from_str_toml() {
        let result = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.master_scene().map(|s| s.as_str()), Some("EDIT"));
        assert!(bp.sync.keep_gpencil_tool_settings);
        assert_eq!(bp.scenes.len(), 3);
        let sh020 = &bp.timeline.strips[1];
        assert_eq!(
            sh020.final_range(bp.scene("SH020").unwrap().frame_range()),
            (251, 341)
        );
    }

    #[test]
    fn test_round_trip_toml() {
        let bp = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&bp).unwrap();
        let bp2 = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(bp.sync, bp2.sync);
        assert_eq!(bp.scenes.len(), bp2.scenes.len());
        assert_eq!(bp.timeline.strips[1].name, bp2.timeline.strips[1].name);
    }

    #[test]
    fn test_round_trip_json() {
        let bp = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&bp).unwrap();
        let bp2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(bp.sync, bp2.sync);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        // Duplicate scene name should fail validation
        let content = r#"
[[scenes]]
name = "EDIT"

[[scenes]]
name = "EDIT"
"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(MINIMAL_TOML.as_bytes()).unwrap();

        let bp = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(bp.timeline.strips.len(), 2);
    }

    #[test]
    fn test_load_from_path_without_extension_sniffs_json() {
        let bp = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(ConfigLoader::to_json(&bp).unwrap().as_bytes())
            .unwrap();

        let loaded = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(loaded.scenes.len(), 3);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = ConfigLoader::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::load_from_path(Path::new("/nonexistent/project.toml")).unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }
}
