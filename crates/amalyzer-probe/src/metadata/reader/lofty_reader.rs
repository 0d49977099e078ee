use std::{borrow::Cow, path::Path};

use lofty::{
    error::LoftyError,
    file::{AudioFile, TaggedFile, TaggedFileExt},
    probe::Probe as LoftyProbe,
    tag::{Accessor, ItemKey, Tag, TagType},
};
use thiserror::Error;
use tracing::trace;

use crate::{error::Error, metadata::TrackMetadata, metadata::reader::MetadataReader};

#[derive(Debug, Error)]
pub enum LoftyReaderError {
    #[error(transparent)]
    Lofty(#[from] LoftyError),
}

impl From<LoftyReaderError> for Error {
    fn from(e: LoftyReaderError) -> Self {
        Error::Metadata(e.to_string())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyReader;

impl LoftyReader {
    pub fn new() -> Self {
        Self
    }

    fn find_best_tag<'a>(&self, tagged: &'a TaggedFile) -> Option<&'a Tag> {
        tagged
            .primary_tag()
            .filter(|t| matches!(t.tag_type(), TagType::Id3v2 | TagType::Ape | TagType::VorbisComments | TagType::Mp4Ilst))
            .or_else(|| tagged.tags().iter().find(|t| t.tag_type() == TagType::Id3v2))
            .or_else(|| tagged.first_tag())
    }

    /// Lee propiedades y tags; un archivo sin tags no es un error.
    pub fn process(&self, path: &Path) -> Result<TrackMetadata, LoftyReaderError> {
        let tagged = LoftyProbe::open(path)?.read()?;
        let props = tagged.properties();

        let mut meta = TrackMetadata {
            bitrate_kbps: props.audio_bitrate(),
            sample_rate_hz: props.sample_rate(),
            channels: props.channels(),
            duration_secs: Some(props.duration().as_secs_f64()),
            ..Default::default()
        };

        let Some(tag) = self.find_best_tag(&tagged) else {
            trace!(path = %path.display(), "no tags");
            return Ok(meta);
        };

        meta.title = tag.title().map(Cow::into_owned).unwrap_or_default();
        meta.artist = tag.artist().map(Cow::into_owned).unwrap_or_default();
        meta.album = tag.album().map(Cow::into_owned).unwrap_or_default();
        meta.genre = tag.genre().map(Cow::into_owned).unwrap_or_default();
        meta.year = tag
            .get_string(&ItemKey::Year)
            .or_else(|| tag.get_string(&ItemKey::RecordingDate))
            .map(str::to_owned)
            .unwrap_or_default();
        meta.track_number = tag.track();

        Ok(meta)
    }
}

impl MetadataReader for LoftyReader {
    fn read(&self, path: &Path) -> Result<TrackMetadata, Error> {
        Ok(self.process(path)?)
    }
}
