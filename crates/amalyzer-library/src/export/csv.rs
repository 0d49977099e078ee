use std::path::Path;

use amalyzer_probe::TrackDescriptor;
use tracing::info;

use super::write_file;
use crate::error::ExportError;

pub const CSV_HEADER: &str = "filename,path,bpm,energy,key,duration,size_mb,title,artist,album";

/// Entre comillas dobles, duplicando las comillas internas.
pub fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn row(t: &TrackDescriptor) -> String {
    [
        quote(&t.display_filename()),
        quote(&t.path.to_string_lossy()),
        format!("{:.2}", t.tempo_bpm),
        format!("{:.2}", t.energy),
        quote(&t.key_camelot),
        format!("{:.2}", t.duration_secs),
        format!("{:.2}", t.size_mb),
        quote(&t.metadata.title),
        quote(&t.metadata.artist),
        quote(&t.metadata.album),
    ]
    .join(",")
}

pub fn render_csv(tracks: &[TrackDescriptor]) -> String {
    let mut out = String::with_capacity(64 * (tracks.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');
    for t in tracks {
        out.push_str(&row(t));
        out.push('\n');
    }
    out
}

pub fn write_csv(tracks: &[TrackDescriptor], path: &Path) -> Result<(), ExportError> {
    write_file(path, &render_csv(tracks))?;
    info!(path = %path.display(), rows = tracks.len(), "CSV saved");
    Ok(())
}
