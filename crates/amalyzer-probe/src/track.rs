use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    analysis::{
        TrackAnalysis,
        keys::{UNKNOWN_KEY, UNKNOWN_KEY_INDEX, notate},
    },
    metadata::TrackMetadata,
};

pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Todo lo que se sabe de una pista: análisis, tags leídos y estado.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackDescriptor {
    pub path: PathBuf,

    pub duration_secs: f64,
    /// 0 = desconocido.
    pub tempo_bpm: f64,
    pub average_db: f64,
    /// RMS redondeado a 2 decimales, 0 = desconocido.
    pub energy: f64,
    /// [-1, 23], -1 = desconocido.
    pub key_index: i32,
    pub key_camelot: String,
    pub key_open: String,

    pub metadata: TrackMetadata,
    pub size_mb: f64,

    pub success: bool,
    pub error: Option<String>,
}

impl TrackDescriptor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TrackDescriptor {
            path: path.into(),
            duration_secs: 0.0,
            tempo_bpm: 0.0,
            average_db: 0.0,
            energy: 0.0,
            key_index: UNKNOWN_KEY_INDEX,
            key_camelot: UNKNOWN_KEY.to_string(),
            key_open: UNKNOWN_KEY.to_string(),
            metadata: TrackMetadata::default(),
            size_mb: 0.0,
            success: false,
            error: None,
        }
    }

    /// Nombre de archivo para mostrar; no se persiste.
    pub fn display_filename(&self) -> String {
        file_name_of(&self.path)
    }

    pub fn apply_analysis(&mut self, analysis: TrackAnalysis) {
        let (camelot, open_key) = notate(analysis.key_index);
        self.duration_secs = analysis.duration_secs;
        self.tempo_bpm = analysis.tempo_bpm;
        self.average_db = analysis.average_db;
        self.energy = analysis.energy;
        self.key_index = if camelot == UNKNOWN_KEY {
            UNKNOWN_KEY_INDEX
        } else {
            analysis.key_index
        };
        self.key_camelot = camelot.to_string();
        self.key_open = open_key.to_string();
        self.success = true;
        self.error = None;
    }

    /// Marca la pista como fallida y vuelve los campos de análisis a sus valores por defecto.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.duration_secs = 0.0;
        self.tempo_bpm = 0.0;
        self.average_db = 0.0;
        self.energy = 0.0;
        self.key_index = UNKNOWN_KEY_INDEX;
        self.key_camelot = UNKNOWN_KEY.to_string();
        self.key_open = UNKNOWN_KEY.to_string();
        self.success = false;
        self.error = Some(reason.into());
    }

    pub fn has_key(&self) -> bool {
        self.key_index != UNKNOWN_KEY_INDEX
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_descriptor_is_unknown() {
        let d = TrackDescriptor::new("/music/set/01 intro.mp3");
        assert_eq!(d.display_filename(), "01 intro.mp3");
        assert!(!d.success);
        assert!(!d.has_key());
        assert_eq!(d.key_camelot, "???");
    }

    #[test]
    fn fail_resets_analysis_but_keeps_metadata() {
        let mut d = TrackDescriptor::new("a.flac");
        d.metadata.title = "Title".into();
        d.size_mb = 3.2;
        d.apply_analysis(TrackAnalysis {
            duration_secs: 60.0,
            tempo_bpm: 120.0,
            average_db: -9.0,
            energy: 0.3,
            key_index: 4,
        });
        assert!(d.success);
        assert_eq!(d.key_camelot, "12B");

        d.fail("boom");
        assert!(!d.success);
        assert_eq!(d.error.as_deref(), Some("boom"));
        assert_eq!(d.tempo_bpm, 0.0);
        assert_eq!(d.energy, 0.0);
        assert_eq!(d.key_open, "???");
        assert_eq!(d.metadata.title, "Title");
        assert_eq!(d.size_mb, 3.2);
    }
}
