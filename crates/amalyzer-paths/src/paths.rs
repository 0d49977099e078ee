use std::{env, path::PathBuf};

use directories::ProjectDirs;

use crate::{errors::Error, fs_utils};

/// Nombre de la ENV var para override de ruta base (modo “portable”)
pub const ENV_BASE_DIR: &str = "AMALYZER_BASE_DIR";

/// Rutas de configuración del analizador.
#[derive(Debug, Clone)]
pub struct AmalyzerPaths {
    pub config_dir: PathBuf,
    pub settings_file: PathBuf,
}

impl AmalyzerPaths {
    /// Resuelve las rutas y crea la carpeta de configuración.
    /// El archivo de settings lo crea quien lo carga, con sus valores por defecto.
    pub fn new() -> Result<Self, Error> {
        let config_dir = if let Ok(base) = env::var(ENV_BASE_DIR) {
            PathBuf::from(base).join("config")
        } else {
            let proj = ProjectDirs::from("com", "Amalyzer", "Amalyzer").ok_or(Error::NoHome)?;
            proj.config_dir().to_path_buf()
        };

        let paths = AmalyzerPaths {
            settings_file: config_dir.join("settings.toml"),
            config_dir,
        };

        paths.validate_structure()?;
        Ok(paths)
    }

    /// Crea la carpeta de configuración si falta y comprueba que es escribible.
    pub fn validate_structure(&self) -> Result<(), Error> {
        if !self.config_dir.exists() {
            fs_utils::ensure_dir(&self.config_dir)?;
        }
        fs_utils::check_writable(&self.config_dir)
    }
}
