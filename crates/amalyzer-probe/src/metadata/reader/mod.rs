#[cfg(feature = "lofty")]
mod lofty_reader;

#[cfg(feature = "lofty")]
pub use lofty_reader::{LoftyReader, LoftyReaderError};

use crate::{error::Error, metadata::TrackMetadata};
use std::path::Path;

pub trait MetadataReader {
    fn read(&self, path: &Path) -> Result<TrackMetadata, Error>;
}

#[derive(Default)]
pub struct NoopReader;
impl MetadataReader for NoopReader {
    fn read(&self, _path: &Path) -> Result<TrackMetadata, Error> {
        Err(Error::Unsupported("metadata reader not enabled"))
    }
}
