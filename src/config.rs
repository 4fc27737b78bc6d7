use crate::rle::Placement;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Window size and tile size the default grid is derived from
pub const DEFAULT_WINDOW_WIDTH: usize = 1050;
pub const DEFAULT_WINDOW_HEIGHT: usize = 945;
pub const DEFAULT_TILE_SIZE: usize = 35;

/// Frames between generations
pub const DEFAULT_UPDATE_FREQUENCY: u32 = 60;

/// Number of whole tiles that fit in a window of the given size
pub fn grid_size_for_window(window_width: usize, window_height: usize, tile_size: usize) -> (usize, usize) {
    let tile = tile_size.max(1);
    (window_width / tile, window_height / tile)
}

/// Complete application configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    pub grid_width: usize,
    pub grid_height: usize,
    /// Frames between generations (>= 1)
    pub update_frequency: u32,
    /// Frame-driven runs start playing instead of paused
    pub start_playing: bool,
    /// Pattern loaded at startup (library name or file path)
    pub pattern: Option<String>,
    pub placement: Placement,
    /// Overrides the default user pattern directory
    pub pattern_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(path, json).map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let (grid_width, grid_height) =
            grid_size_for_window(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT, DEFAULT_TILE_SIZE);
        Self {
            version: 1,
            grid_width,
            grid_height,
            update_frequency: DEFAULT_UPDATE_FREQUENCY,
            start_playing: true,
            pattern: None,
            placement: Placement::default(),
            pattern_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_grid_matches_window() {
        let config = AppConfig::default();
        assert_eq!((config.grid_width, config.grid_height), (30, 27));
        assert_eq!(config.update_frequency, 60);
        assert!(config.start_playing);
    }

    #[test]
    fn test_grid_size_for_window() {
        assert_eq!(grid_size_for_window(100, 50, 10), (10, 5));
        assert_eq!(grid_size_for_window(105, 59, 10), (10, 5));
        assert_eq!(grid_size_for_window(3, 3, 0), (3, 3));
    }

    #[test]
    fn test_config_file_save_and_load() {
        let config = AppConfig {
            version: 1,
            grid_width: 64,
            grid_height: 48,
            update_frequency: 5,
            start_playing: false,
            pattern: Some("Gosper Glider Gun".to_string()),
            placement: Placement::at(2, 3).clearing(),
            pattern_dir: Some(PathBuf::from("/tmp/patterns")),
        };

        // Create temp file
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        config.save_to_file(&path).unwrap();
        let loaded = AppConfig::load_from_file(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: AppConfig = serde_json::from_str(r#"{ "grid_width": 12 }"#).unwrap();
        assert_eq!(parsed.grid_width, 12);
        assert_eq!(parsed.grid_height, 27);
        assert_eq!(parsed.placement, Placement::default());
        assert!(parsed.pattern.is_none());
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "not valid json").unwrap();

        let result = AppConfig::load_from_file(temp_file.path());
        assert!(result.unwrap_err().starts_with("Failed to parse"));
    }

    #[test]
    fn test_missing_config_file() {
        let result = AppConfig::load_from_file(Path::new("/nonexistent/path/config.json"));
        assert!(result.unwrap_err().starts_with("Failed to read"));
    }
}
