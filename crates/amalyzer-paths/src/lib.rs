//! Crate `amalyzer_paths`: rutas de configuración de Amalyzer

mod errors;
mod fs_utils;
mod paths;

pub use errors::Error;
pub use paths::{AmalyzerPaths, ENV_BASE_DIR};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;

    // los tests tocan la misma variable de entorno
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// RAII-guard que setea y luego restaura (o elimina) una variable de entorno.
    struct EnvVarGuard {
        key: String,
        original: Option<String>,
    }

    impl EnvVarGuard {
        /// Guarda el valor actual de `key` (si existe), y luego la setea a `value`.
        fn new(key: &str, value: &str) -> Self {
            let original = std::env::var(key).ok();
            // set_var es unsafe en Unix:
            unsafe { std::env::set_var(key, value) };
            EnvVarGuard {
                key: key.to_owned(),
                original,
            }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match &self.original {
                Some(val) => unsafe { std::env::set_var(&self.key, val) },
                None => unsafe { std::env::remove_var(&self.key) },
            }
        }
    }

    #[test]
    fn base_dir_override_builds_portable_layout() {
        let _lock = ENV_LOCK.lock().unwrap();
        let tmp = tempdir().unwrap();
        let _env = EnvVarGuard::new(ENV_BASE_DIR, tmp.path().to_str().unwrap());

        let paths = AmalyzerPaths::new().unwrap();
        assert_eq!(paths.config_dir, tmp.path().join("config"));
        assert_eq!(paths.settings_file, tmp.path().join("config").join("settings.toml"));
        assert!(paths.config_dir.is_dir());
        // el archivo de settings no se crea aquí
        assert!(!paths.settings_file.exists());
    }

    #[test]
    fn validate_structure_recreates_missing_dir() {
        let _lock = ENV_LOCK.lock().unwrap();
        let tmp = tempdir().unwrap();
        let _env = EnvVarGuard::new(ENV_BASE_DIR, tmp.path().to_str().unwrap());

        let paths = AmalyzerPaths::new().unwrap();
        std::fs::remove_dir_all(&paths.config_dir).unwrap();
        assert!(!paths.config_dir.exists());

        paths.validate_structure().unwrap();
        assert!(paths.config_dir.exists());
    }
}
