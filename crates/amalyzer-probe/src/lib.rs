//! Crate `amalyzer_probe`: decodificación, análisis de tempo/tonalidad/energía y escritura de tags.

pub mod analysis;
pub mod audio;
pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod track;

pub use error::Error;
pub use metadata::TrackMetadata;
pub use pipeline::probe::{Probe, ProbeBuilder};
pub use track::TrackDescriptor;

pub mod prelude {
    pub use crate::analysis::analyzer::TrackAnalyzer;
    pub use crate::analysis::classifier::{
        ClassifierFactory, ClassifierResult, DetectionPolicy, KeySensitivity, TempoKeyClassifier,
    };
    pub use crate::analysis::energy::EnergyAccumulator;
    pub use crate::analysis::keys::{UNKNOWN_KEY, UNKNOWN_KEY_INDEX, notate};
    pub use crate::audio::{AudioDecoder, PcmStream, StreamInfo};
    pub use crate::metadata::merger::{TagCategory, TagMergeRequest};
    pub use crate::metadata::reader::MetadataReader;
    pub use crate::metadata::tags::{TagError, TagField, TagFlavor, TagLibrary, TagStore};
    pub use crate::{Error, Probe, ProbeBuilder, TrackDescriptor, TrackMetadata};
}
