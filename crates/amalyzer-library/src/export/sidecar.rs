use std::path::{Path, PathBuf};

use amalyzer_probe::TrackDescriptor;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;
use tracing::debug;

use super::write_file;
use crate::error::ExportError;

pub const SIDECAR_SUFFIX: &str = ".meta.json";

/// `cancion.mp3` => `cancion.mp3.meta.json`, en el mismo directorio.
pub fn sidecar_path(source: &Path) -> PathBuf {
    let mut name = source.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(SIDECAR_SUFFIX);
    source.with_file_name(name)
}

/// Números con dos decimales fijos; NaN/inf salen como 0.00.
fn fixed2<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    let value = if value.is_finite() { *value } else { 0.0 };
    let raw = RawValue::from_string(format!("{value:.2}")).map_err(serde::ser::Error::custom)?;
    raw.serialize(serializer)
}

fn fixed2_opt<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    fixed2(&value.unwrap_or(0.0), serializer)
}

#[derive(Serialize)]
struct Sidecar<'a> {
    filename: String,
    path: String,
    title: &'a str,
    artist: &'a str,
    album: &'a str,
    genre: &'a str,
    year: &'a str,
    track_number: Option<u32>,
    #[serde(serialize_with = "fixed2")]
    bpm: f64,
    key: &'a str,
    open_key: &'a str,
    key_index: i32,
    #[serde(serialize_with = "fixed2")]
    energy: f64,
    #[serde(serialize_with = "fixed2")]
    average_db: f64,
    #[serde(serialize_with = "fixed2")]
    length: f64,
    #[serde(serialize_with = "fixed2")]
    size_mb: f64,
    bitrate_kbps: Option<u32>,
    sample_rate_hz: Option<u32>,
    channels: Option<u8>,
    #[serde(serialize_with = "fixed2_opt")]
    tag_duration: Option<f64>,
}

impl<'a> From<&'a TrackDescriptor> for Sidecar<'a> {
    fn from(t: &'a TrackDescriptor) -> Self {
        let m = &t.metadata;
        Sidecar {
            filename: t.display_filename(),
            path: t.path.to_string_lossy().into_owned(),
            title: &m.title,
            artist: &m.artist,
            album: &m.album,
            genre: &m.genre,
            year: &m.year,
            track_number: m.track_number,
            bpm: t.tempo_bpm,
            key: &t.key_camelot,
            open_key: &t.key_open,
            key_index: t.key_index,
            energy: t.energy,
            average_db: t.average_db,
            length: t.duration_secs,
            size_mb: t.size_mb,
            bitrate_kbps: m.bitrate_kbps,
            sample_rate_hz: m.sample_rate_hz,
            channels: m.channels,
            tag_duration: m.duration_secs,
        }
    }
}

pub fn render_sidecar(track: &TrackDescriptor) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&Sidecar::from(track))?)
}

pub fn write_sidecar(track: &TrackDescriptor) -> Result<PathBuf, ExportError> {
    let path = sidecar_path(&track.path);
    write_file(&path, &render_sidecar(track)?)?;
    debug!(path = %path.display(), "sidecar written");
    Ok(path)
}
