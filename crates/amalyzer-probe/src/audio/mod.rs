pub mod decoder;

use crate::error::Error;
use std::path::Path;

pub trait PcmStream {
    /// Devuelve frames intercalados (interleaved) en f32 [-1, 1].
    /// `None` o un chunk vacío marcan el final del stream.
    fn next_chunk(&mut self) -> Result<Option<Vec<f32>>, Error>;
    /// Info opcional: sample_rate, channels, etc.
    fn format(&self) -> Option<StreamInfo> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamInfo {
    pub sample_rate: u32,
    pub channels: u16,
    /// Tamaño de chunk preferido por el motor, en frames.
    pub frames_per_chunk: u32,
    /// Duración declarada por el contenedor, si la conoce.
    pub duration_secs: Option<f64>,
}

pub trait AudioDecoder {
    fn open(&self, path: &Path) -> Result<Box<dyn PcmStream + Send>, Error>;
}
