//! Salidas de un lote ya filtrado y ordenado: tabla de consola, CSV, arreglo JSON y `.meta.json`.
//! Ninguna modifica los descriptores.

pub mod csv;
pub mod json;
pub mod sidecar;
pub mod table;

pub use csv::{CSV_HEADER, render_csv, write_csv};
pub use json::{render_json, write_json};
pub use sidecar::{sidecar_path, write_sidecar};
pub use table::{TableLayout, render_table, write_table};

use std::{fs, path::Path};

use crate::error::ExportError;

pub(crate) fn write_file(path: &Path, contents: &str) -> Result<(), ExportError> {
    fs::write(path, contents).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// `m:ss`, o `h:mm:ss` a partir de una hora.
pub fn format_duration(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return "0:00".to_string();
    }
    let total = secs.round() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::format_duration;

    #[test]
    fn durations() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(f64::NAN), "0:00");
        assert_eq!(format_duration(59.6), "1:00");
        assert_eq!(format_duration(245.0), "4:05");
        assert_eq!(format_duration(3723.0), "1:02:03");
    }
}
