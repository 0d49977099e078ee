#[cfg(feature = "lofty")]
mod lofty_tags;

#[cfg(feature = "lofty")]
pub use lofty_tags::LoftyTagLibrary;

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TagError {
    #[error("tag library not enabled")]
    Unsupported,

    #[error("cannot open tags of {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    #[error("cannot save tags of {}: {reason}", path.display())]
    Save { path: PathBuf, reason: String },
}

/// Familia de tag nativa del archivo; decide dónde van los campos estructurados.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFlavor {
    /// Frames ID3v2 (`TBPM`, `TKEY`, `TXXX`).
    Id3v2,
    /// Vorbis/Xiph comments, campos planos.
    Xiph,
    /// Átomos iTunes.
    Mp4,
    Other,
}

/// Campos estructurados que se escriben además del álbum compuesto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagField {
    Tempo,
    InitialKey,
    Energy,
}

/// Tags abiertos de un archivo. Los cambios no tocan disco hasta `save`.
pub trait TagStore {
    fn flavor(&self) -> TagFlavor;
    fn album(&self) -> Option<String>;
    fn set_album(&mut self, album: &str);
    fn field(&self, field: TagField) -> Option<String>;
    fn set_field(&mut self, field: TagField, value: &str);
    fn save(&mut self) -> Result<(), TagError>;
}

pub trait TagLibrary {
    fn open(&self, path: &Path) -> Result<Box<dyn TagStore>, TagError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTagLibrary;

impl TagLibrary for NoopTagLibrary {
    fn open(&self, _path: &Path) -> Result<Box<dyn TagStore>, TagError> {
        Err(TagError::Unsupported)
    }
}
