use std::path::PathBuf;

use amalyzer_library::{
    FilterSpec, RunOptions, SortKey, extensions::parse_extension_list,
};
use amalyzer_probe::metadata::merger::TagCategory;
use clap::Parser;

/// Analiza BPM, tonalidad y energía de archivos de audio.
#[derive(Parser, Debug)]
#[command(name = "amalyzer")]
#[command(about = "Batch BPM / key / energy analyzer for audio files")]
#[command(version)]
pub struct Args {
    /// Files or directories to analyze
    pub paths: Vec<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Comma separated extensions, e.g. `mp3,.flac`
    #[arg(short, long = "ext")]
    pub ext: Option<String>,

    /// Only errors, no table or progress bar
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    #[arg(short, long)]
    pub verbose: bool,

    /// List tags only, without audio analysis
    #[arg(short, long)]
    pub list: bool,

    /// Output file (table copy, or destination with --csv / --json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, conflicts_with = "json")]
    pub csv: bool,

    /// Write every track as one JSON array
    #[arg(long)]
    pub json: bool,

    /// Write `<file>.meta.json` next to every analyzed file
    #[arg(long)]
    pub meta: bool,

    /// Analyze at most N files (0 = all)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,

    #[arg(long, default_value_t = 0.0)]
    pub bpm_min: f64,

    #[arg(long, default_value_t = 0.0)]
    pub bpm_max: f64,

    /// Minimum size in MB
    #[arg(long, default_value_t = 0.0)]
    pub size_min: f64,

    #[arg(long, default_value_t = 0.0)]
    pub size_max: f64,

    /// Camelot key to keep, e.g. 8A
    #[arg(long)]
    pub key: Option<String>,

    /// Sort keys by priority: tempo, energy, key, size, album, artist, title, filename
    #[arg(long, value_delimiter = ',', default_value = "filename")]
    pub sort: Vec<SortKey>,

    /// Tags to write into the album field: bpm, energy, key
    #[arg(long, value_delimiter = ',')]
    pub put: Vec<TagCategory>,

    /// Replace the whole album field instead of keeping the original title
    #[arg(long)]
    pub put_force: bool,

    /// Settings file (default: <config dir>/settings.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the effective settings and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Args {
    pub fn default_filter(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            inputs: self.paths.clone(),
            recursive: self.recursive,
            extensions: self.ext.as_deref().map(parse_extension_list),
            list_mode: self.list,
            quiet: self.quiet,
            output: self.output.clone(),
            csv: self.csv,
            json: self.json,
            sidecars: self.meta,
            filter: FilterSpec {
                min_tempo: self.bpm_min,
                max_tempo: self.bpm_max,
                min_size_mb: self.size_min,
                max_size_mb: self.size_max,
                key: self.key.clone(),
            },
            sort: if self.sort.is_empty() {
                vec![SortKey::Filename]
            } else {
                self.sort.clone()
            },
            put: self.put.clone(),
            put_force: self.put_force,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_to_run_options() {
        let args = Args::try_parse_from([
            "amalyzer", "-r", "--ext", "mp3,.FLAC", "--bpm-min", "100", "--key", "8A", "--sort", "bpm,name,bogus",
            "--put", "bpm,key", "--put-force", "--limit", "5", "/music",
        ])
        .unwrap();

        let opts = args.run_options();
        assert!(opts.recursive);
        assert_eq!(opts.extensions, Some(vec!["mp3".to_string(), "flac".to_string()]));
        assert_eq!(opts.filter.min_tempo, 100.0);
        assert_eq!(opts.filter.key.as_deref(), Some("8A"));
        assert_eq!(opts.sort, vec![SortKey::Tempo, SortKey::Filename, SortKey::Filename]);
        assert_eq!(opts.put, vec![TagCategory::Tempo, TagCategory::Key]);
        assert!(opts.put_force);
        assert_eq!(opts.limit, 5);
        assert_eq!(opts.inputs, vec![PathBuf::from("/music")]);
        assert_eq!(args.default_filter(), "info");
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["amalyzer", "-q", "a.mp3"]).unwrap();
        let opts = args.run_options();
        assert_eq!(opts.sort, vec![SortKey::Filename]);
        assert!(opts.extensions.is_none());
        assert!(opts.put.is_empty());
        assert_eq!(args.default_filter(), "error");
    }

    #[test]
    fn json_and_csv_are_exclusive() {
        let args = Args::try_parse_from(["amalyzer", "--json", "-o", "out.json", "a.mp3"]).unwrap();
        let opts = args.run_options();
        assert!(opts.json && !opts.csv);
        assert_eq!(opts.output, Some(PathBuf::from("out.json")));
        assert!(Args::try_parse_from(["amalyzer", "--json", "--csv", "a.mp3"]).is_err());
    }

    #[test]
    fn unknown_put_category_is_rejected() {
        assert!(Args::try_parse_from(["amalyzer", "--put", "mood", "a.mp3"]).is_err());
    }
}
