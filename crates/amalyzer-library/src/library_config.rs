use config::{Config, File, FileFormat};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::{error::ConfigError, extensions::default_extensions};

/// Anchos de columna de la tabla de consola
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TableWidths {
    /// Nombre de archivo en modo lista.
    pub name: usize,
    pub title: usize,
    pub artist: usize,
    pub album: usize,
    /// Nombre de archivo en modo análisis.
    pub analysis_name: usize,
}

impl Default for TableWidths {
    fn default() -> Self {
        TableWidths {
            name: 25,
            title: 20,
            artist: 15,
            album: 20,
            analysis_name: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Builder, PartialEq)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct AmalyzerConfig {
    pub table: TableWidths,
    pub extensions: Vec<String>,
    pub follow_symlinks: bool,
    /// Destino del CSV cuando no se pasa `-o`.
    pub csv_file: PathBuf,
    /// Destino del JSON cuando no se pasa `-o`.
    pub json_file: PathBuf,
}

impl Default for AmalyzerConfig {
    fn default() -> Self {
        AmalyzerConfig {
            table: TableWidths::default(),
            extensions: default_extensions(),
            follow_symlinks: true,
            csv_file: PathBuf::from("analysis_results.csv"),
            json_file: PathBuf::from("analysis_results.json"),
        }
    }
}

impl AmalyzerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_string_lossy().into_owned();
        let cfg = Config::builder()
            .add_source(File::new(&path, FileFormat::Toml))
            .build()
            .map_err(ConfigError::Parse)?;
        let ac = cfg.try_deserialize::<AmalyzerConfig>().map_err(ConfigError::Parse)?;
        Ok(ac)
    }

    /// Carga el archivo o, si no existe, lo crea con los valores por defecto.
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        let cfg = AmalyzerConfig::default();
        cfg.save(path)?;
        info!(path = %path.display(), "default configuration created");
        Ok(cfg)
    }

    /// `<config_dir>/settings.toml`, creado si falta.
    pub fn load_default() -> Result<Self, ConfigError> {
        let paths = amalyzer_paths::AmalyzerPaths::new()?;
        Self::load_or_create(&paths.settings_file)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
