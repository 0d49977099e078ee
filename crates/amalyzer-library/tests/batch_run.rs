use std::{fs, path::Path};

use amalyzer_library::{
    AmalyzerConfig, BatchRunner, RunOptionsBuilder, SortKey,
    export::CSV_HEADER,
};
use amalyzer_probe::Probe;

fn write_sine(path: &Path, seconds: f32, amplitude: f32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 22_050,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    let frames = (22_050.0 * seconds) as u32;
    for n in 0..frames {
        let t = n as f32 / 22_050.0;
        let v = amplitude * (2.0 * std::f32::consts::PI * 440.0 * t).sin();
        writer.write_sample((v * i16::MAX as f32) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_sine(&dir.path().join("quiet.wav"), 1.0, 0.2);
    write_sine(&dir.path().join("loud.wav"), 1.0, 0.5);
    fs::create_dir(dir.path().join("nested")).unwrap();
    write_sine(&dir.path().join("nested").join("deep.wav"), 1.0, 0.5);
    fs::write(dir.path().join("broken.mp3"), b"definitely not audio").unwrap();
    dir
}

#[test]
fn analyzes_filters_sorts_and_exports_csv() {
    let dir = fixture();
    let out = dir.path().join("results.csv");
    let runner = BatchRunner::new(Probe::default(), AmalyzerConfig::default());

    let opts = RunOptionsBuilder::default()
        .inputs(vec![dir.path().to_path_buf()])
        .quiet(true)
        .csv(true)
        .sidecars(true)
        .output(out.clone())
        .sort(vec![SortKey::Energy])
        .build()
        .unwrap();
    let summary = runner.run(&opts).unwrap();

    assert_eq!(summary.discovered, 3);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.retained, 2);

    let csv = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], CSV_HEADER);
    assert!(lines[1].starts_with("\"quiet.wav\""));
    assert!(lines[1].contains(",0.14,"));
    assert!(lines[2].starts_with("\"loud.wav\""));
    assert!(lines[2].contains(",0.35,"));

    let sidecar = fs::read_to_string(dir.path().join("loud.wav.meta.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&sidecar).unwrap();
    assert_eq!(json["filename"], "loud.wav");
    assert_eq!(json["energy"], 0.35);
    assert!(!dir.path().join("broken.mp3.meta.json").exists());
}

#[test]
fn recursive_list_mode_with_limit() {
    let dir = fixture();
    let runner = BatchRunner::new(Probe::default(), AmalyzerConfig::default());

    let opts = RunOptionsBuilder::default()
        .inputs(vec![dir.path().to_path_buf()])
        .recursive(true)
        .list_mode(true)
        .quiet(true)
        .extensions(vec!["wav".to_string()])
        .limit(2usize)
        .build()
        .unwrap();
    let summary = runner.run(&opts).unwrap();

    assert_eq!(summary.discovered, 2);
    assert_eq!(summary.retained, 2);
    for track in &summary.tracks {
        assert!(track.success);
        assert_eq!(track.tempo_bpm, 0.0);
        assert!(track.size_mb > 0.0);
    }
}

#[test]
fn tempo_filter_excludes_unknown_tempo() {
    let dir = fixture();
    let runner = BatchRunner::new(Probe::default(), AmalyzerConfig::default());

    let opts = RunOptionsBuilder::default()
        .inputs(vec![dir.path().join("loud.wav")])
        .quiet(true)
        .filter(amalyzer_library::FilterSpec {
            min_tempo: 300.0,
            ..Default::default()
        })
        .build()
        .unwrap();
    let summary = runner.run(&opts).unwrap();
    assert_eq!(summary.discovered, 1);
    assert_eq!(summary.analyzed, 1);
    assert_eq!(summary.retained, 0);
}
