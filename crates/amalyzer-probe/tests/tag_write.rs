#![cfg(feature = "lofty")]

use std::{borrow::Cow, fs::File, path::Path};

use amalyzer_probe::{
    Probe, TrackDescriptor,
    analysis::TrackAnalysis,
    metadata::merger::{TagCategory, TagMergeRequest},
};
use lofty::{
    config::{ParseOptions, WriteOptions},
    file::AudioFile,
    iff::wav::WavFile,
    id3::v2::{FrameId, Id3v2Tag},
    tag::{Accessor, TagExt},
};

fn write_tone(path: &Path) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for n in 0..8_000 {
        let v = 0.5 * (2.0 * std::f32::consts::PI * 440.0 * n as f32 / 8_000.0).sin();
        writer.write_sample((v * i16::MAX as f32) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

fn analyzed(path: &Path) -> TrackDescriptor {
    let mut d = TrackDescriptor::new(path);
    d.apply_analysis(TrackAnalysis {
        duration_secs: 1.0,
        tempo_bpm: 128.0,
        average_db: -9.0,
        energy: 0.5,
        key_index: 0,
    });
    d
}

fn read_id3(path: &Path) -> Id3v2Tag {
    let mut file = File::open(path).unwrap();
    let wav = WavFile::read_from(&mut file, ParseOptions::new()).unwrap();
    wav.id3v2().cloned().expect("id3v2 tag written")
}

fn text(tag: &Id3v2Tag, id: &'static str) -> Option<String> {
    tag.get_text(&FrameId::Valid(Cow::Borrowed(id))).map(str::to_owned)
}

fn merge(path: &Path) -> bool {
    let request = TagMergeRequest::new(path, TagCategory::ALL.to_vec(), false);
    Probe::default().merge_tags(&request, &analyzed(path)).unwrap()
}

#[test]
fn id3v2_album_and_fields_are_written_and_foreign_frames_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tagged.wav");
    write_tone(&path);

    let mut tag = Id3v2Tag::new();
    tag.set_album("Original".to_string());
    tag.insert_user_text("SERATO_MARKERS".to_string(), "cue-data".to_string());
    tag.save_to_path(&path, WriteOptions::default()).unwrap();

    assert!(merge(&path));

    let tag = read_id3(&path);
    assert_eq!(tag.album().as_deref(), Some("128 | 0.50 | 8B | Original"));
    assert_eq!(text(&tag, "TBPM").as_deref(), Some("128"));
    assert_eq!(text(&tag, "TKEY").as_deref(), Some("8B"));
    assert_eq!(tag.get_user_text("ENERGY"), Some("0.50"));
    assert_eq!(tag.get_user_text("SERATO_MARKERS"), Some("cue-data"));

    // segunda pasada: el prefijo viejo se reemplaza, no se acumula
    assert!(merge(&path));
    assert_eq!(read_id3(&path).album().as_deref(), Some("128 | 0.50 | 8B | Original"));
}

#[test]
fn file_without_tags_gets_a_new_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bare.wav");
    write_tone(&path);

    assert!(merge(&path));

    let tag = read_id3(&path);
    assert_eq!(tag.album().as_deref(), Some("128 | 0.50 | 8B"));
    assert_eq!(text(&tag, "TBPM").as_deref(), Some("128"));
    assert_eq!(tag.get_user_text("ENERGY"), Some("0.50"));

    // el audio sigue siendo decodificable después de escribir
    let d = Probe::default().describe(&path, false);
    assert!(d.success, "{:?}", d.error);
    assert_eq!(d.metadata.album, "128 | 0.50 | 8B");
}
