use std::path::{Path, PathBuf};

use amalyzer_probe::{Probe, TrackDescriptor, metadata::merger::{TagCategory, TagMergeRequest}};
use anyhow::{Result, bail};
use derive_builder::Builder;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::{debug, error, info, warn};

use crate::{
    export::{TableLayout, write_csv, write_json, write_sidecar, write_table},
    library_config::AmalyzerConfig,
    scanner::{LocalScanner, ScanOptions},
    selection::{FilterSpec, SortKey, apply_filter, sort_descriptors},
};

/// Todo lo que decide una ejecución; se construye una vez y no cambia durante el lote.
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(setter(into), default)]
pub struct RunOptions {
    pub inputs: Vec<PathBuf>,
    pub recursive: bool,
    /// `None` usa la lista de la configuración.
    pub extensions: Option<Vec<String>>,
    /// Sólo tags, sin análisis.
    pub list_mode: bool,
    pub quiet: bool,
    pub output: Option<PathBuf>,
    pub csv: bool,
    /// Arreglo JSON; `csv` tiene prioridad si vienen los dos.
    pub json: bool,
    pub sidecars: bool,
    pub filter: FilterSpec,
    pub sort: Vec<SortKey>,
    pub put: Vec<TagCategory>,
    pub put_force: bool,
    /// 0 = sin límite.
    pub limit: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            inputs: Vec::new(),
            recursive: false,
            extensions: None,
            list_mode: false,
            quiet: false,
            output: None,
            csv: false,
            json: false,
            sidecars: false,
            filter: FilterSpec::default(),
            sort: vec![SortKey::Filename],
            put: Vec::new(),
            put_force: false,
            limit: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub discovered: usize,
    pub analyzed: usize,
    pub failed: usize,
    pub retained: usize,
    pub tags_written: usize,
    pub tag_failures: usize,
    /// Pistas filtradas, en el orden exportado.
    pub tracks: Vec<TrackDescriptor>,
}

pub struct BatchRunner {
    probe: Probe,
    config: AmalyzerConfig,
}

impl BatchRunner {
    pub fn new(probe: Probe, config: AmalyzerConfig) -> Self {
        BatchRunner { probe, config }
    }

    pub fn config(&self) -> &AmalyzerConfig {
        &self.config
    }

    /// Lista ordenada de archivos candidatos, ya recortada a `limit`.
    pub fn discover(&self, opts: &RunOptions) -> Vec<PathBuf> {
        let scanner = LocalScanner::new(ScanOptions {
            recursive: opts.recursive,
            follow_symlinks: self.config.follow_symlinks,
            extensions: opts
                .extensions
                .clone()
                .unwrap_or_else(|| self.config.extensions.clone()),
        });

        let mut files = scanner.scan(&opts.inputs);
        if opts.limit > 0 && files.len() > opts.limit {
            debug!(found = files.len(), limit = opts.limit, "truncating file list");
            files.truncate(opts.limit);
        }
        files
    }

    pub fn run(&self, opts: &RunOptions) -> Result<RunSummary> {
        if opts.inputs.is_empty() {
            bail!("no input paths given");
        }

        let files = self.discover(opts);
        let mut summary = RunSummary {
            discovered: files.len(),
            ..Default::default()
        };

        if files.is_empty() {
            info!("no audio files found, nothing to do");
            return Ok(summary);
        }

        if opts.list_mode && (!opts.put.is_empty() || opts.sidecars) {
            warn!("list mode does not analyze audio; tag writing and sidecars are ignored");
        }
        if opts.put_force && opts.put.is_empty() {
            warn!("--put-force has no effect without --put");
        }

        info!(files = files.len(), list = opts.list_mode, "processing");
        let tracks = self.describe_all(&files, opts);
        summary.failed = tracks.iter().filter(|t| !t.success).count();
        summary.analyzed = tracks.len() - summary.failed;

        let mut retained = apply_filter(tracks, &opts.filter);
        summary.retained = retained.len();

        if !opts.list_mode {
            if !opts.put.is_empty() {
                self.write_tags(&retained, &opts.put, opts.put_force, &mut summary);
            }
            if opts.sidecars {
                write_sidecars(&retained);
            }
        }

        sort_descriptors(&mut retained, &opts.sort);
        self.export(&retained, opts);

        info!(
            analyzed = summary.analyzed,
            failed = summary.failed,
            retained = summary.retained,
            "done"
        );
        summary.tracks = retained;
        Ok(summary)
    }

    fn describe_all(&self, files: &[PathBuf], opts: &RunOptions) -> Vec<TrackDescriptor> {
        let pb = progress_bar(files.len() as u64, opts.quiet);
        let mut tracks = Vec::with_capacity(files.len());

        for path in files {
            pb.set_message(file_label(path));
            let track = self.probe.describe(path, opts.list_mode);
            if let Some(reason) = &track.error {
                warn!(path = %path.display(), error = %reason, "analysis failed");
            }
            tracks.push(track);
            pb.inc(1);
        }

        pb.finish_and_clear();
        tracks
    }

    fn write_tags(&self, tracks: &[TrackDescriptor], put: &[TagCategory], overwrite: bool, summary: &mut RunSummary) {
        for track in tracks {
            let request = TagMergeRequest::new(&track.path, put.to_vec(), overwrite);
            match self.probe.merge_tags(&request, track) {
                Ok(true) => summary.tags_written += 1,
                Ok(false) => debug!(path = %track.path.display(), "nothing to write"),
                Err(e) => {
                    summary.tag_failures += 1;
                    warn!(path = %track.path.display(), error = %e, "tag write failed");
                }
            }
        }
    }

    fn export(&self, tracks: &[TrackDescriptor], opts: &RunOptions) {
        if opts.csv {
            let path = opts.output.as_deref().unwrap_or(&self.config.csv_file);
            if let Err(e) = write_csv(tracks, path) {
                error!(error = %e, "CSV export failed");
            }
            return;
        }

        if opts.json {
            let path = opts.output.as_deref().unwrap_or(&self.config.json_file);
            if let Err(e) = write_json(tracks, path) {
                error!(error = %e, "JSON export failed");
            }
            return;
        }

        let layout = if opts.list_mode {
            TableLayout::List
        } else {
            TableLayout::Analysis
        };
        if let Err(e) = write_table(tracks, layout, &self.config.table, opts.quiet, opts.output.as_deref()) {
            error!(error = %e, "table export failed");
        }
    }
}

fn write_sidecars(tracks: &[TrackDescriptor]) {
    for track in tracks {
        if let Err(e) = write_sidecar(track) {
            error!(path = %track.path.display(), error = %e, "sidecar not written");
        }
    }
}

fn progress_bar(len: u64, quiet: bool) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if quiet {
        pb.set_draw_target(ProgressDrawTarget::hidden());
        return pb;
    }
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{elapsed_precise}] [{wide_bar}] {pos}/{len} {msg}") {
        pb.set_style(style.progress_chars("=> "));
    }
    pb
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
