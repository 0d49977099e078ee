use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    str::FromStr,
};

use tracing::{Level, debug, instrument, warn};
use walkdir::WalkDir;

use crate::extensions::{SupportedExtension, default_extensions, normalize_extension};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub recursive: bool,
    pub follow_symlinks: bool,
    /// Sufijos normalizados (`"mp3"`, `"aif"`...).
    pub extensions: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            recursive: false,
            follow_symlinks: true,
            extensions: default_extensions(),
        }
    }
}

pub struct LocalScanner {
    options: ScanOptions,
}

impl LocalScanner {
    pub fn new(mut options: ScanOptions) -> Self {
        options.extensions = options.extensions.iter().map(|e| normalize_extension(e)).collect();
        for ext in &options.extensions {
            if SupportedExtension::from_str(ext).is_err() {
                warn!(extension = %ext, "no decoder for this extension, files will likely fail analysis");
            }
        }
        LocalScanner { options }
    }

    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .map(|e| self.options.extensions.contains(&e.to_ascii_lowercase()))
            .unwrap_or(false)
    }

    /// Recorre las entradas en orden. Los errores de recorrido se registran y se saltan.
    #[instrument(level = Level::DEBUG, skip(self, roots), fields(roots = roots.len()))]
    pub fn scan(&self, roots: &[PathBuf]) -> Vec<PathBuf> {
        let mut files = Vec::new();
        for root in roots {
            self.scan_root(root, &mut files);
        }
        debug!(found = files.len(), "scan complete");
        files
    }

    fn scan_root(&self, root: &Path, out: &mut Vec<PathBuf>) {
        if root.is_file() {
            if self.accepts(root) {
                out.push(root.to_path_buf());
            }
            return;
        }

        if !root.is_dir() {
            warn!(path = %root.display(), "input path not found");
            return;
        }

        let max_depth = if self.options.recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(self.options.follow_symlinks)
            .sort_by_file_name();

        for entry in walker {
            match entry {
                Ok(e) if e.file_type().is_file() && self.accepts(e.path()) => out.push(e.into_path()),
                Ok(_) => {}
                Err(e) => warn!(root = %root.display(), error = %e, "error scanning"),
            }
        }
    }
}
