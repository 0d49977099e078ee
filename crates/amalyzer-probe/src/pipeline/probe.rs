use std::{fs, path::Path};

use tracing::trace;

use crate::{
    analysis::{analyzer::TrackAnalyzer, classifier::ClassifierFactory, spectral::SpectralClassifierFactory},
    audio::AudioDecoder,
    error::Error,
    metadata::{
        TrackMetadata,
        merger::{self, TagMergeRequest},
        reader::MetadataReader,
        tags::{TagError, TagLibrary},
    },
    pipeline::config::ProbeConfig,
    track::{BYTES_PER_MB, TrackDescriptor},
};

#[derive(Default)]
pub struct ProbeBuilder {
    cfg: ProbeConfig,
    reader: Option<Box<dyn MetadataReader + Send + Sync>>,
    decoder: Option<Box<dyn AudioDecoder + Send + Sync>>,
    tags: Option<Box<dyn TagLibrary + Send + Sync>>,
    classifier: Option<Box<dyn ClassifierFactory + Send + Sync>>,
}

impl ProbeBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn config(mut self, cfg: ProbeConfig) -> Self {
        self.cfg = cfg;
        self
    }
    pub fn read_metadata_on_failure(mut self, yes: bool) -> Self {
        self.cfg.read_metadata_on_failure = yes;
        self
    }

    pub fn with_reader<R: MetadataReader + Send + Sync + 'static>(mut self, r: R) -> Self {
        self.reader = Some(Box::new(r));
        self
    }
    pub fn with_decoder<D: AudioDecoder + Send + Sync + 'static>(mut self, d: D) -> Self {
        self.decoder = Some(Box::new(d));
        self
    }
    pub fn with_tags<T: TagLibrary + Send + Sync + 'static>(mut self, t: T) -> Self {
        self.tags = Some(Box::new(t));
        self
    }
    pub fn with_classifier<C: ClassifierFactory + Send + Sync + 'static>(mut self, c: C) -> Self {
        self.classifier = Some(Box::new(c));
        self
    }

    pub fn build(self) -> Probe {
        Probe {
            cfg: self.cfg,
            reader: self.reader.unwrap_or_else(default_reader),
            decoder: self.decoder.unwrap_or_else(default_decoder),
            tags: self.tags.unwrap_or_else(default_tags),
            classifier: self
                .classifier
                .unwrap_or_else(|| Box::new(SpectralClassifierFactory)),
        }
    }
}

pub struct Probe {
    cfg: ProbeConfig,
    reader: Box<dyn MetadataReader + Send + Sync>,
    decoder: Box<dyn AudioDecoder + Send + Sync>,
    tags: Box<dyn TagLibrary + Send + Sync>,
    classifier: Box<dyn ClassifierFactory + Send + Sync>,
}

pub fn default_reader() -> Box<dyn MetadataReader + Send + Sync> {
    #[cfg(feature = "lofty")]
    {
        Box::new(crate::metadata::reader::LoftyReader::new())
    }
    #[cfg(not(feature = "lofty"))]
    {
        Box::new(crate::metadata::reader::NoopReader)
    }
}

pub fn default_decoder() -> Box<dyn AudioDecoder + Send + Sync> {
    #[cfg(feature = "symphonia")]
    {
        Box::new(crate::audio::decoder::SymphoniaDecoder::new())
    }
    #[cfg(not(feature = "symphonia"))]
    {
        Box::new(crate::audio::decoder::NoopDecoder)
    }
}

pub fn default_tags() -> Box<dyn TagLibrary + Send + Sync> {
    #[cfg(feature = "lofty")]
    {
        Box::new(crate::metadata::tags::LoftyTagLibrary::new())
    }
    #[cfg(not(feature = "lofty"))]
    {
        Box::new(crate::metadata::tags::NoopTagLibrary)
    }
}

impl Probe {
    pub fn builder() -> ProbeBuilder {
        ProbeBuilder::default()
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.cfg
    }

    pub fn config_mut(&mut self) -> &mut ProbeConfig {
        &mut self.cfg
    }

    pub fn read_metadata<P: AsRef<Path>>(&self, path: P) -> Result<TrackMetadata, Error> {
        self.reader.read(path.as_ref())
    }

    /// Realiza análisis musical; la función depende más de la CPU.
    pub fn analyze<P: AsRef<Path>>(&self, path: P) -> TrackDescriptor {
        TrackAnalyzer::new(self.decoder.as_ref(), self.classifier.as_ref(), self.cfg.policy).analyze(path.as_ref())
    }

    /// Descriptor completo: tamaño, tags y, salvo en modo lista, análisis.
    /// Tags y análisis son independientes; un fallo en uno no afecta al otro.
    pub fn describe<P: AsRef<Path>>(&self, path: P, list_only: bool) -> TrackDescriptor {
        let path = path.as_ref();

        let mut descriptor = if list_only {
            let mut d = TrackDescriptor::new(path);
            d.success = true;
            d
        } else {
            self.analyze(path)
        };

        descriptor.size_mb = fs::metadata(path)
            .map(|m| m.len() as f64 / BYTES_PER_MB)
            .unwrap_or(0.0);

        if descriptor.success || self.cfg.read_metadata_on_failure {
            match self.read_metadata(path) {
                Ok(meta) => {
                    if list_only {
                        descriptor.duration_secs = meta.duration_secs.unwrap_or(0.0);
                    }
                    descriptor.metadata = meta;
                }
                // los tags son opcionales
                Err(e) => trace!(path = %path.display(), error = %e, "no metadata"),
            }
        }

        descriptor
    }

    pub fn merge_tags(&self, request: &TagMergeRequest, descriptor: &TrackDescriptor) -> Result<bool, TagError> {
        merger::merge_and_write(self.tags.as_ref(), request, descriptor)
    }
}

impl Default for Probe {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{PcmStream, StreamInfo};
    use std::io::Write;

    struct Silence;

    struct SilenceStream(u8);

    impl PcmStream for SilenceStream {
        fn next_chunk(&mut self) -> Result<Option<Vec<f32>>, Error> {
            if self.0 == 0 {
                return Ok(None);
            }
            self.0 -= 1;
            Ok(Some(vec![0.25; 512]))
        }

        fn format(&self) -> Option<StreamInfo> {
            Some(StreamInfo {
                sample_rate: 8_000,
                channels: 1,
                frames_per_chunk: 512,
                duration_secs: None,
            })
        }
    }

    impl AudioDecoder for Silence {
        fn open(&self, path: &Path) -> Result<Box<dyn PcmStream + Send>, Error> {
            if path.extension().is_some_and(|e| e == "bad") {
                return Err(Error::Unsupported("corrupt header"));
            }
            Ok(Box::new(SilenceStream(4)))
        }
    }

    struct FixedTags;

    impl MetadataReader for FixedTags {
        fn read(&self, _path: &Path) -> Result<TrackMetadata, Error> {
            Ok(TrackMetadata {
                title: "Night Drive".into(),
                artist: "Someone".into(),
                duration_secs: Some(181.0),
                ..Default::default()
            })
        }
    }

    fn probe() -> Probe {
        Probe::builder()
            .with_decoder(Silence)
            .with_reader(FixedTags)
            .with_tags(crate::metadata::tags::NoopTagLibrary)
            .build()
    }

    #[test]
    fn describe_combines_analysis_size_and_tags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.wav");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(&vec![0u8; 1024 * 1024]).unwrap();

        let d = probe().describe(&path, false);
        assert!(d.success);
        assert_eq!(d.energy, 0.25);
        assert_eq!(d.duration_secs, 2048.0 / 8_000.0);
        assert_eq!(d.size_mb, 1.0);
        assert_eq!(d.metadata.title, "Night Drive");
    }

    #[test]
    fn list_mode_skips_analysis_and_uses_tag_duration() {
        let d = probe().describe("missing/song.mp3", true);
        assert!(d.success);
        assert_eq!(d.energy, 0.0);
        assert_eq!(d.key_camelot, "???");
        assert_eq!(d.duration_secs, 181.0);
        assert_eq!(d.size_mb, 0.0);
    }

    #[test]
    fn failed_analysis_still_reads_tags() {
        let d = probe().describe("x/broken.bad", false);
        assert!(!d.success);
        assert_eq!(d.error.as_deref(), Some("decoder open failed: Unsupported format: corrupt header"));
        assert_eq!(d.metadata.artist, "Someone");
        assert_eq!(d.duration_secs, 0.0);

        let strict = Probe::builder()
            .with_decoder(Silence)
            .with_reader(FixedTags)
            .read_metadata_on_failure(false)
            .build();
        let d = strict.describe("x/broken.bad", false);
        assert!(d.metadata.artist.is_empty());
    }

    #[test]
    fn tag_writes_surface_library_errors() {
        let mut d = probe().analyze("a.wav");
        d.tempo_bpm = 120.0;
        let request = TagMergeRequest::new("a.wav", vec![crate::metadata::merger::TagCategory::Tempo], false);
        assert!(matches!(probe().merge_tags(&request, &d), Err(TagError::Unsupported)));
    }
}
