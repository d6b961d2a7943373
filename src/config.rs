use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::schedule::drag::DragConfig;
use crate::schedule::geometry::GridGeometry;
use crate::schedule::overlap::ColumnRules;
use crate::theme::ThemeConfig;

const APP_DIR: &str = "station-rota";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub data: DataConfig,
    pub theme: ThemeConfig,
}

/// Week grid settings. Distances are in terminal cells.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub hour_rows: u16,
    pub tolerance_minutes: u16,
    pub max_columns: usize,
    pub snap_minutes: u16,
    pub drag_threshold: f32,
    pub handle_rows: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            hour_rows: 4,
            tolerance_minutes: 30,
            max_columns: 4,
            snap_minutes: 15,
            drag_threshold: 0.5,
            handle_rows: 1.0,
        }
    }
}

impl LayoutConfig {
    pub fn grid(&self) -> GridGeometry {
        GridGeometry::with_hour_height(self.hour_rows as f32)
    }

    pub fn column_rules(&self) -> ColumnRules {
        ColumnRules {
            tolerance_minutes: self.tolerance_minutes,
            max_columns: self.max_columns,
        }
    }

    pub fn drag(&self) -> DragConfig {
        DragConfig {
            threshold: self.drag_threshold,
            handle_size: self.handle_rows,
            cell_surface: true,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.hour_rows == 0 {
            return Err(ConfigError::Invalid("layout.hour_rows must be at least 1".into()));
        }
        if !(1..=8).contains(&self.max_columns) {
            return Err(ConfigError::Invalid("layout.max_columns must be 1..=8".into()));
        }
        if self.snap_minutes == 0 || 60 % self.snap_minutes != 0 {
            return Err(ConfigError::Invalid(
                "layout.snap_minutes must divide an hour".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.layout.validate()?;
        Ok(config)
    }

    pub fn data_path(&self) -> PathBuf {
        self.data
            .path
            .clone()
            .unwrap_or_else(|| app_data_dir().join("schedule.json"))
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.layout.hour_rows, 4);
        assert_eq!(config.layout.column_rules(), ColumnRules::default());
        assert!(config.data.path.is_none());
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config = Config::from_toml(
            r#"
            [layout]
            hour_rows = 2
            tolerance_minutes = 10

            [data]
            path = "/tmp/rota.json"

            [theme]
            preset = "nord"
            "#,
        )
        .unwrap();
        assert_eq!(config.layout.grid().hour_height, 2.0);
        assert_eq!(config.layout.tolerance_minutes, 10);
        assert_eq!(config.layout.snap_minutes, 15);
        assert_eq!(config.data_path(), PathBuf::from("/tmp/rota.json"));
        assert_eq!(config.theme.preset.as_deref(), Some("nord"));
    }

    #[test]
    fn rejects_bad_layout() {
        assert!(matches!(
            Config::from_toml("[layout]\nsnap_minutes = 7"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml("[layout]\nhour_rows = \"four\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
