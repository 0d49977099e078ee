use std::path::Path;

use amalyzer_probe::{
    Probe,
    audio::{AudioDecoder, decoder::SymphoniaDecoder},
};

fn write_sine(path: &Path, sample_rate: u32, channels: u16, seconds: f32, amplitude: f32) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    let frames = (sample_rate as f32 * seconds) as u32;
    for n in 0..frames {
        let t = n as f32 / sample_rate as f32;
        let v = amplitude * (2.0 * std::f32::consts::PI * 440.0 * t).sin();
        for _ in 0..channels {
            writer.write_sample((v * i16::MAX as f32) as i16).unwrap();
        }
    }
    writer.finalize().unwrap();
}

#[test]
fn symphonia_reports_stream_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tone.wav");
    write_sine(&path, 22_050, 2, 1.0, 0.5);

    let mut stream = SymphoniaDecoder::new().open(&path).unwrap();
    let info = stream.format().unwrap();
    assert_eq!(info.sample_rate, 22_050);
    assert_eq!(info.channels, 2);
    assert!(info.frames_per_chunk > 0);
    assert!((info.duration_secs.unwrap() - 1.0).abs() < 1e-6);

    let mut samples = 0;
    while let Some(chunk) = stream.next_chunk().unwrap() {
        samples += chunk.len();
    }
    assert_eq!(samples, 22_050 * 2);
}

#[test]
fn analyzes_a_real_wav_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tone.wav");
    write_sine(&path, 44_100, 2, 2.0, 0.5);

    let d = Probe::default().describe(&path, false);
    assert!(d.success, "{:?}", d.error);
    // rms de una senoide de amplitud 0.5
    assert_eq!(d.energy, 0.35);
    assert!((d.duration_secs - 2.0).abs() < 1e-3);
    assert!(d.size_mb > 0.3);
    assert!(d.average_db < 0.0);
    assert_eq!(d.display_filename(), "tone.wav");
}

#[test]
fn garbage_file_is_a_failed_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noise.mp3");
    std::fs::write(&path, b"definitely not audio").unwrap();

    let d = Probe::default().describe(&path, false);
    assert!(!d.success);
    assert!(d.error.unwrap().starts_with("decoder open failed"));
    assert_eq!(d.tempo_bpm, 0.0);
}
