#[cfg(feature = "symphonia")]
mod symphonia_native;

#[cfg(feature = "symphonia")]
pub use symphonia_native::SymphoniaDecoder;

use std::path::Path;

use crate::{
    audio::{AudioDecoder, PcmStream},
    error::Error,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDecoder;

impl AudioDecoder for NoopDecoder {
    fn open(&self, _path: &Path) -> Result<Box<dyn PcmStream + Send>, Error> {
        Err(Error::Unsupported("audio decoder not enabled"))
    }
}
