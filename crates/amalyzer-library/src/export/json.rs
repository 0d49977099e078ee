use std::path::Path;

use amalyzer_probe::TrackDescriptor;
use tracing::info;

use super::write_file;
use crate::error::ExportError;

/// Arreglo JSON con los descriptores completos, tal como los serializa serde.
pub fn render_json(tracks: &[TrackDescriptor]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(tracks)?)
}

pub fn write_json(tracks: &[TrackDescriptor], path: &Path) -> Result<(), ExportError> {
    write_file(path, &render_json(tracks)?)?;
    info!(path = %path.display(), tracks = tracks.len(), "JSON saved");
    Ok(())
}
