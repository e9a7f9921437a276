use crate::catalog::{Category, PriceFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use storewalk_controls::{LocomotionConfig, LookConfig};

/// Errors from loading or validating a store configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Room shell and ceiling lights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub floor_size: f32,
    pub wall_height: f32,
    /// Lights on each side of the center light.
    pub lights_per_side: i32,
    pub light_spacing: f32,
    pub light_height: f32,
    pub light_intensity: f32,
    pub light_range: f32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            floor_size: 160.0,
            wall_height: 50.0,
            lights_per_side: 3,
            light_spacing: 32.0,
            light_height: 48.0,
            light_intensity: 0.5,
            light_range: 200.0,
        }
    }
}

/// Shelf grid and the product slots on each shelf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelvingConfig {
    pub rows: usize,
    pub levels: usize,
    pub width: f32,
    pub thickness: f32,
    pub depth: f32,
    pub base_y: f32,
    pub level_spacing: f32,
    pub first_row_z: f32,
    pub row_spacing: f32,
    /// Front edge strip, relative to the shelf center.
    pub edge_offset: [f32; 2],
    pub edge_size: [f32; 3],
    /// Height of the department sign above the lowest shelf.
    pub sign_offset_y: f32,
    pub slots_per_shelf: usize,
    pub first_slot_x: f32,
    pub slot_spacing: f32,
    /// Nominal product height used to seat products on the shelf.
    pub product_height: f32,
    /// Department stocked on each level, cycled by level index.
    pub level_departments: Vec<Category>,
    /// Sign shown on each row, cycled by row index.
    pub row_signs: Vec<Category>,
}

impl Default for ShelvingConfig {
    fn default() -> Self {
        use Category::*;
        Self {
            rows: 3,
            levels: 6,
            width: 60.0,
            thickness: 2.5,
            depth: 10.0,
            base_y: 4.0,
            level_spacing: 7.0,
            first_row_z: -40.0,
            row_spacing: 30.0,
            edge_offset: [1.5, 4.5],
            edge_size: [60.0, 0.5, 1.2],
            sign_offset_y: 6.0,
            slots_per_shelf: 14,
            first_slot_x: -39.0,
            slot_spacing: 6.5,
            product_height: 4.5 * 1.25,
            level_departments: vec![
                Cosmetics,
                Cosmetics,
                Electronics,
                Electronics,
                Books,
                Books,
                Fruits,
                Fruits,
                Footwear,
                Footwear,
            ],
            row_signs: Category::ALL.to_vec(),
        }
    }
}

/// Price tag sprites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub title_chars: usize,
    pub offset_y: f32,
    pub shadow_offset_y: f32,
    pub empty_text: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            title_chars: 18,
            offset_y: 5.5,
            shadow_offset_y: 0.2,
            empty_text: "Coming Soon".to_string(),
        }
    }
}

/// Everything tunable about the store walkthrough.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub room: RoomConfig,
    pub shelving: ShelvingConfig,
    pub labels: LabelConfig,
    pub prices: PriceFormat,
    pub look: LookConfig,
    pub locomotion: LocomotionConfig,
}

impl StoreConfig {
    /// Load from a `.json` file, or YAML for any other extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&data)?,
            _ => serde_yaml::from_str(&data)?,
        };
        config.validate()?;
        tracing::debug!(path = %path.display(), "store config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.shelving;
        if s.slot_spacing <= 0.0 || s.level_spacing <= 0.0 {
            return Err(ConfigError::Invalid("shelf spacing must be positive".into()));
        }
        if s.level_departments.is_empty() {
            return Err(ConfigError::Invalid("level_departments is empty".into()));
        }
        if s.row_signs.is_empty() {
            return Err(ConfigError::Invalid("row_signs is empty".into()));
        }
        let l = &self.locomotion;
        if l.min_height > l.max_height || l.min_zoom_z > l.max_zoom_z {
            return Err(ConfigError::Invalid("locomotion range is inverted".into()));
        }
        Ok(())
    }
}
