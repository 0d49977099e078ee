use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use lofty::{
    TextEncoding,
    config::WriteOptions,
    file::TaggedFileExt,
    id3::v2::{Frame, FrameId, Id3v2Tag, TextInformationFrame},
    ogg::VorbisComments,
    probe::Probe as LoftyProbe,
    tag::{Accessor, ItemKey, Tag, TagExt, TagType},
};
use tracing::trace;

use crate::metadata::tags::{TagError, TagField, TagFlavor, TagLibrary, TagStore};

const ID3_TEMPO: &str = "TBPM";
const ID3_KEY: &str = "TKEY";
const ENERGY: &str = "ENERGY";
const XIPH_TEMPO: &str = "BPM";
const XIPH_KEY: &str = "INITIALKEY";
const MP4_ENERGY: &str = "----:com.apple.iTunes:energy";

#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagLibrary;

impl LoftyTagLibrary {
    pub fn new() -> Self {
        Self
    }
}

impl TagLibrary for LoftyTagLibrary {
    fn open(&self, path: &Path) -> Result<Box<dyn TagStore>, TagError> {
        let tagged = LoftyProbe::open(path)
            .and_then(|p| p.read())
            .map_err(|e| TagError::Open {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        // Sin tag previo se crea uno del tipo primario del formato
        let tag_type = tagged.primary_tag_type();
        let tag = tagged.tag(tag_type).cloned().unwrap_or_else(|| Tag::new(tag_type));
        trace!(path = %path.display(), ?tag_type, "tags opened");

        let native = match tag_type {
            TagType::Id3v2 => NativeTag::Id3v2(Id3v2Tag::from(tag)),
            TagType::VorbisComments => NativeTag::Xiph(VorbisComments::from(tag)),
            TagType::Mp4Ilst => NativeTag::Mp4(tag),
            _ => NativeTag::Other(tag),
        };

        Ok(Box::new(LoftyTagStore {
            path: path.to_path_buf(),
            native,
        }))
    }
}

enum NativeTag {
    Id3v2(Id3v2Tag),
    Xiph(VorbisComments),
    Mp4(Tag),
    Other(Tag),
}

struct LoftyTagStore {
    path: PathBuf,
    native: NativeTag,
}

fn id3_frame(id: &'static str) -> FrameId<'static> {
    FrameId::Valid(Cow::Borrowed(id))
}

fn generic_key(field: TagField, flavor: TagFlavor) -> ItemKey {
    match (field, flavor) {
        (TagField::Tempo, _) => ItemKey::IntegerBpm,
        (TagField::InitialKey, _) => ItemKey::InitialKey,
        (TagField::Energy, TagFlavor::Mp4) => ItemKey::Unknown(MP4_ENERGY.to_string()),
        (TagField::Energy, _) => ItemKey::Unknown(ENERGY.to_string()),
    }
}

impl TagStore for LoftyTagStore {
    fn flavor(&self) -> TagFlavor {
        match self.native {
            NativeTag::Id3v2(_) => TagFlavor::Id3v2,
            NativeTag::Xiph(_) => TagFlavor::Xiph,
            NativeTag::Mp4(_) => TagFlavor::Mp4,
            NativeTag::Other(_) => TagFlavor::Other,
        }
    }

    fn album(&self) -> Option<String> {
        let album = match &self.native {
            NativeTag::Id3v2(t) => t.album(),
            NativeTag::Xiph(t) => t.album(),
            NativeTag::Mp4(t) | NativeTag::Other(t) => t.album(),
        };
        album.map(Cow::into_owned)
    }

    fn set_album(&mut self, album: &str) {
        match &mut self.native {
            NativeTag::Id3v2(t) => t.set_album(album.to_string()),
            NativeTag::Xiph(t) => t.set_album(album.to_string()),
            NativeTag::Mp4(t) | NativeTag::Other(t) => t.set_album(album.to_string()),
        }
    }

    fn field(&self, field: TagField) -> Option<String> {
        let flavor = self.flavor();
        match &self.native {
            NativeTag::Id3v2(t) => match field {
                TagField::Tempo => t.get_text(&id3_frame(ID3_TEMPO)),
                TagField::InitialKey => t.get_text(&id3_frame(ID3_KEY)),
                TagField::Energy => t.get_user_text(ENERGY),
            }
            .map(str::to_owned),
            NativeTag::Xiph(t) => match field {
                TagField::Tempo => t.get(XIPH_TEMPO),
                TagField::InitialKey => t.get(XIPH_KEY),
                TagField::Energy => t.get(ENERGY),
            }
            .map(str::to_owned),
            NativeTag::Mp4(t) | NativeTag::Other(t) => t.get_string(&generic_key(field, flavor)).map(str::to_owned),
        }
    }

    fn set_field(&mut self, field: TagField, value: &str) {
        let flavor = self.flavor();
        match &mut self.native {
            NativeTag::Id3v2(t) => {
                let text = |id| Frame::Text(TextInformationFrame::new(id3_frame(id), TextEncoding::UTF8, value.to_string()));
                match field {
                    TagField::Tempo => {
                        t.insert(text(ID3_TEMPO));
                    }
                    TagField::InitialKey => {
                        t.insert(text(ID3_KEY));
                    }
                    TagField::Energy => {
                        t.insert_user_text(ENERGY.to_string(), value.to_string());
                    }
                }
            }
            NativeTag::Xiph(t) => {
                let key = match field {
                    TagField::Tempo => XIPH_TEMPO,
                    TagField::InitialKey => XIPH_KEY,
                    TagField::Energy => ENERGY,
                };
                t.insert(key.to_string(), value.to_string());
            }
            NativeTag::Mp4(t) | NativeTag::Other(t) => {
                t.insert_text(generic_key(field, flavor), value.to_string());
            }
        }
    }

    fn save(&mut self) -> Result<(), TagError> {
        let options = WriteOptions::default();
        let result = match &self.native {
            NativeTag::Id3v2(t) => t.save_to_path(&self.path, options),
            NativeTag::Xiph(t) => t.save_to_path(&self.path, options),
            NativeTag::Mp4(t) | NativeTag::Other(t) => t.save_to_path(&self.path, options),
        };
        result.map_err(|e| TagError::Save {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }
}
