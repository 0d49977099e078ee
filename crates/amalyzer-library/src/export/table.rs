use std::path::Path;

use amalyzer_probe::TrackDescriptor;

use super::{format_duration, write_file};
use crate::{error::ExportError, library_config::TableWidths};

const EMPTY_CELL: &str = "---";
const ELLIPSIS: char = '…';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLayout {
    /// BPM, energía y tonalidad.
    Analysis,
    /// Sólo tags, sin análisis (`-l`).
    List,
}

struct Column {
    title: &'static str,
    width: usize,
    cell: fn(&TrackDescriptor) -> String,
}

fn columns(layout: TableLayout, widths: &TableWidths) -> Vec<Column> {
    match layout {
        TableLayout::Analysis => vec![
            Column { title: "FILE", width: widths.analysis_name, cell: |t| t.display_filename() },
            Column { title: "SIZE(MB)", width: 8, cell: |t| format!("{:.2}", t.size_mb) },
            Column { title: "BPM", width: 6, cell: |t| non_zero(t.tempo_bpm, |v| format!("{v:.0}")) },
            Column { title: "ENERGY", width: 6, cell: |t| non_zero(t.energy, |v| format!("{v:.2}")) },
            Column { title: "KEY", width: 4, cell: |t| t.key_camelot.clone() },
            Column { title: "OPENKEY", width: 7, cell: |t| t.key_open.clone() },
            Column { title: "ARTIST", width: widths.artist, cell: |t| t.metadata.artist.clone() },
            Column { title: "ALBUM", width: widths.album, cell: |t| t.metadata.album.clone() },
        ],
        TableLayout::List => vec![
            Column { title: "FILE", width: widths.name, cell: |t| t.display_filename() },
            Column { title: "TITLE", width: widths.title, cell: |t| t.metadata.title.clone() },
            Column { title: "ARTIST", width: widths.artist, cell: |t| t.metadata.artist.clone() },
            Column { title: "ALBUM", width: widths.album, cell: |t| t.metadata.album.clone() },
            Column { title: "DURATION", width: 8, cell: |t| format_duration(t.duration_secs) },
            Column { title: "SIZE(MB)", width: 8, cell: |t| format!("{:.2}", t.size_mb) },
        ],
    }
}

fn non_zero(value: f64, render: impl Fn(f64) -> String) -> String {
    if value > 0.0 { render(value) } else { String::new() }
}

/// Ajusta `value` a `width` caracteres: corta a width-1 más `…` y rellena a la derecha.
pub fn fit_cell(value: &str, width: usize) -> String {
    let value = if value.trim().is_empty() { EMPTY_CELL } else { value };
    let len = value.chars().count();

    if width == 0 {
        return String::new();
    }
    if len > width {
        let mut cut: String = value.chars().take(width - 1).collect();
        cut.push(ELLIPSIS);
        return cut;
    }
    format!("{value}{}", " ".repeat(width - len))
}

fn row(cells: impl Iterator<Item = String>) -> String {
    format!(" {} ", cells.collect::<Vec<_>>().join(" | "))
}

pub fn render_table(tracks: &[TrackDescriptor], layout: TableLayout, widths: &TableWidths) -> String {
    let cols = columns(layout, widths);
    let header = row(cols.iter().map(|c| fit_cell(c.title, c.width)));
    let rule = "-".repeat(header.chars().count());

    let mut out = String::new();
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&header);
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    for track in tracks {
        out.push_str(&row(cols.iter().map(|c| fit_cell(&(c.cell)(track), c.width))));
        out.push('\n');
    }
    out.push_str(&rule);
    out.push('\n');
    out
}

/// Imprime la tabla salvo en modo silencioso y, si hay `output`, guarda una copia.
pub fn write_table(
    tracks: &[TrackDescriptor],
    layout: TableLayout,
    widths: &TableWidths,
    quiet: bool,
    output: Option<&Path>,
) -> Result<(), ExportError> {
    let table = render_table(tracks, layout, widths);
    if !quiet {
        print!("{table}");
    }
    if let Some(path) = output {
        write_file(path, &table)?;
    }
    Ok(())
}
