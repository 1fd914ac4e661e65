use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::renderer::{
    check_raster, check_sampling, RenderOptions, ZOrder, DEFAULT_HUE, DEFAULT_LIGHTNESS,
    DEFAULT_MESH_COUNT, DEFAULT_MESH_THICKNESS, DEFAULT_SATURATION, MESH_SATURATION,
};
use crate::error::GraphError;
use crate::model::{Color, Segment};

const SETTINGS_VERSION: u32 = 1;

pub const DEFAULT_PANEL_SIZE: usize = 1000;
pub const DEFAULT_QUALITY: usize = 8000;

// ── Render settings ──────────────────────────────────────────────

/// Render configuration read from a JSON file. Every field is optional in the
/// file; missing ones take the built-in defaults. Command-line flags override
/// whatever the file says.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RenderSettings {
    pub version: u32,
    /// Width of each plot panel in pixels.
    pub width: usize,
    /// Height of each plot panel in pixels.
    pub height: usize,
    /// Samples per axis when drawing the image panel.
    pub quality: usize,
    pub z_order: ZOrder,
    /// Worker threads for rendering. None = rayon's default pool.
    pub threads: Option<usize>,
    pub hue: Segment,
    pub lightness: Segment,
    pub mesh_count: usize,
    /// Mesh line thickness relative to the larger side of the area.
    pub mesh_thickness: f64,
    pub saturation: f64,
    pub mesh_saturation: f64,
    pub background: Color,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            width: DEFAULT_PANEL_SIZE,
            height: DEFAULT_PANEL_SIZE,
            quality: DEFAULT_QUALITY,
            z_order: ZOrder::default(),
            threads: None,
            hue: DEFAULT_HUE,
            lightness: DEFAULT_LIGHTNESS,
            mesh_count: DEFAULT_MESH_COUNT,
            mesh_thickness: DEFAULT_MESH_THICKNESS,
            saturation: DEFAULT_SATURATION,
            mesh_saturation: MESH_SATURATION,
            background: Color::LIGHT_GRAY,
        }
    }
}

impl RenderSettings {
    /// Options for drawing one panel, sampling once per pixel.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            hue: self.hue,
            lightness: self.lightness,
            z_order: self.z_order,
            sampling: None,
            mesh_count: self.mesh_count,
            mesh_thickness: self.mesh_thickness,
            saturation: self.saturation,
            mesh_saturation: self.mesh_saturation,
            background: self.background,
        }
    }

    pub fn validate(&self) -> Result<(), GraphError> {
        if self.version > SETTINGS_VERSION {
            return Err(GraphError::Settings {
                message: format!(
                    "settings version {} is newer than supported version {SETTINGS_VERSION}",
                    self.version
                ),
            });
        }
        check_raster(self.width, self.height)?;
        check_sampling(self.quality, self.quality)?;
        self.render_options().validate()
    }
}

/// Load and validate settings from a JSON file.
pub fn load_settings(path: &Path) -> Result<RenderSettings, GraphError> {
    let settings: RenderSettings = read_json(path)?;
    settings.validate()?;
    log::debug!("loaded settings from {}", path.display());
    Ok(settings)
}

/// Settings from `path` if given, the defaults otherwise.
pub fn load_settings_or_default(path: Option<&Path>) -> Result<RenderSettings, GraphError> {
    match path {
        Some(path) => load_settings(path),
        None => Ok(RenderSettings::default()),
    }
}

/// Save settings as pretty JSON, creating the parent directory if needed.
pub fn save_settings(path: &Path, settings: &RenderSettings) -> Result<(), GraphError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_json(path, settings)
}

/// JSON schema of the settings file.
pub fn settings_schema() -> Result<String, GraphError> {
    let schema = schemars::schema_for!(RenderSettings);
    Ok(serde_json::to_string_pretty(&schema)?)
}

// ── JSON file helpers ────────────────────────────────────────────

/// Write via a sibling `.tmp` file and rename, so a crash never leaves a
/// half-written file behind.
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> Result<(), GraphError> {
    let mut tmp_name = OsString::from(path.file_name().unwrap_or_default());
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(&tmp_name);

    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), GraphError> {
    let json = serde_json::to_string_pretty(value)?;
    atomic_write(path, json.as_bytes())
}

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, GraphError> {
    let data = fs::read_to_string(path)?;
    let value = serde_json::from_str(&data)?;
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_settings_round_trip() {
        let dir = temp_dir("complex_graph_test_settings");
        let path = dir.join("render.json");

        let settings = RenderSettings {
            width: 320,
            quality: 640,
            z_order: ZOrder::Magnitude,
            threads: Some(2),
            ..RenderSettings::default()
        };
        save_settings(&path, &settings).unwrap();
        assert!(!dir.join("render.json.tmp").exists());

        let loaded = load_settings(&path).expect("should load");
        assert_eq!(loaded, settings);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let dir = temp_dir("complex_graph_test_partial");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("render.json");
        fs::write(&path, r#"{ "quality": 100, "z_order": "imaginary" }"#).unwrap();

        let loaded = load_settings(&path).unwrap();
        assert_eq!(loaded.quality, 100);
        assert_eq!(loaded.z_order, ZOrder::Imaginary);
        assert_eq!(loaded.width, DEFAULT_PANEL_SIZE);
        assert_eq!(loaded.hue, DEFAULT_HUE);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = temp_dir("complex_graph_test_invalid");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("render.json");

        fs::write(&path, r#"{ "hue": { "min": 0.9, "max": 0.1 } }"#).unwrap();
        assert!(matches!(load_settings(&path), Err(GraphError::Settings { .. })));

        fs::write(&path, r#"{ "lightness": { "min": 0.0, "max": 1.5 } }"#).unwrap();
        assert!(matches!(load_settings(&path), Err(GraphError::ColorOutOfRange { .. })));

        fs::write(&path, r#"{ "width": 0 }"#).unwrap();
        assert!(matches!(load_settings(&path), Err(GraphError::InvalidRaster { .. })));

        fs::write(&path, r#"{ "mesh_thickness": -0.5 }"#).unwrap();
        assert!(matches!(load_settings(&path), Err(GraphError::InvalidMesh { .. })));

        fs::write(&path, r#"{ "version": 99 }"#).unwrap();
        assert!(matches!(load_settings(&path), Err(GraphError::Settings { .. })));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_oversized_counts_are_rejected() {
        let dir = temp_dir("complex_graph_test_oversized");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("render.json");

        fs::write(
            &path,
            r#"{ "mesh_count": 18446744073709551615, "width": 4, "height": 4, "quality": 4 }"#,
        )
        .unwrap();
        assert!(matches!(load_settings(&path), Err(GraphError::InvalidMesh { .. })));

        fs::write(&path, r#"{ "quality": 18446744073709551615 }"#).unwrap();
        assert!(matches!(load_settings(&path), Err(GraphError::InvalidSampling { .. })));

        fs::write(&path, r#"{ "width": 18446744073709551615 }"#).unwrap();
        assert!(matches!(load_settings(&path), Err(GraphError::InvalidRaster { .. })));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = temp_dir("complex_graph_test_no_settings");
        assert!(matches!(
            load_settings(&dir.join("render.json")),
            Err(GraphError::Io { .. })
        ));
        assert_eq!(load_settings_or_default(None).unwrap(), RenderSettings::default());
    }

    #[test]
    fn test_schema_lists_fields() {
        let schema = settings_schema().unwrap();
        assert!(schema.contains("\"quality\""));
        assert!(schema.contains("\"z_order\""));
    }
}
