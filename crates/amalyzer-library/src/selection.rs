use std::{cmp::Ordering, convert::Infallible, fmt, str::FromStr};

use amalyzer_probe::TrackDescriptor;

/// Predicados de filtrado. Un límite numérico sólo cuenta si es > 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub min_tempo: f64,
    pub max_tempo: f64,
    pub min_size_mb: f64,
    pub max_size_mb: f64,
    /// Notación Camelot, sin distinguir mayúsculas.
    pub key: Option<String>,
}

impl FilterSpec {
    pub fn is_empty(&self) -> bool {
        self.min_tempo <= 0.0
            && self.max_tempo <= 0.0
            && self.min_size_mb <= 0.0
            && self.max_size_mb <= 0.0
            && self.key.as_deref().is_none_or(str::is_empty)
    }

    pub fn matches(&self, track: &TrackDescriptor) -> bool {
        if self.min_tempo > 0.0 && track.tempo_bpm < self.min_tempo {
            return false;
        }
        if self.max_tempo > 0.0 && track.tempo_bpm > self.max_tempo {
            return false;
        }
        if self.min_size_mb > 0.0 && track.size_mb < self.min_size_mb {
            return false;
        }
        if self.max_size_mb > 0.0 && track.size_mb > self.max_size_mb {
            return false;
        }
        match self.key.as_deref() {
            Some(key) if !key.is_empty() => track.key_camelot.eq_ignore_ascii_case(key),
            _ => true,
        }
    }
}

/// Deja sólo las pistas analizadas que cumplen el filtro; las fallidas nunca pasan.
pub fn apply_filter(tracks: Vec<TrackDescriptor>, filter: &FilterSpec) -> Vec<TrackDescriptor> {
    tracks
        .into_iter()
        .filter(|t| t.success && filter.matches(t))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    Tempo,
    Energy,
    Key,
    Size,
    Album,
    Artist,
    Title,
    #[default]
    Filename,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Tempo => "tempo",
            SortKey::Energy => "energy",
            SortKey::Key => "key",
            SortKey::Size => "size",
            SortKey::Album => "album",
            SortKey::Artist => "artist",
            SortKey::Title => "title",
            SortKey::Filename => "filename",
        }
    }

    /// Lista separada por comas; vacía => `[Filename]`.
    pub fn parse_list(s: &str) -> Vec<SortKey> {
        let keys: Vec<SortKey> = s
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .filter_map(|k| k.parse().ok())
            .collect();
        if keys.is_empty() { vec![SortKey::Filename] } else { keys }
    }

    pub fn compare(&self, a: &TrackDescriptor, b: &TrackDescriptor) -> Ordering {
        match self {
            SortKey::Tempo => a.tempo_bpm.total_cmp(&b.tempo_bpm),
            SortKey::Energy => a.energy.total_cmp(&b.energy),
            SortKey::Key => a.key_camelot.cmp(&b.key_camelot),
            SortKey::Size => a.size_mb.total_cmp(&b.size_mb),
            SortKey::Album => a.metadata.album.cmp(&b.metadata.album),
            SortKey::Artist => a.metadata.artist.cmp(&b.metadata.artist),
            SortKey::Title => a.metadata.title.cmp(&b.metadata.title),
            SortKey::Filename => a.display_filename().cmp(&b.display_filename()),
        }
    }
}

impl FromStr for SortKey {
    type Err = Infallible;

    /// Nunca falla: un nombre desconocido ordena por nombre de archivo.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "tempo" | "bpm" => SortKey::Tempo,
            "energy" => SortKey::Energy,
            "key" => SortKey::Key,
            "size" => SortKey::Size,
            "album" => SortKey::Album,
            "artist" => SortKey::Artist,
            "title" => SortKey::Title,
            _ => SortKey::Filename,
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Un sort estable por clave, recorriendo la lista al revés: la primera clave domina.
pub fn sort_descriptors(tracks: &mut [TrackDescriptor], keys: &[SortKey]) {
    for key in keys.iter().rev() {
        tracks.sort_by(|a, b| key.compare(a, b));
    }
}
