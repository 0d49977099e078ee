use std::{fmt, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::debug;

use crate::{
    metadata::tags::{TagError, TagField, TagLibrary},
    track::TrackDescriptor,
};

/// Separador entre fragmentos generados y el resto del álbum.
pub const PREFIX_SEPARATOR: &str = " | ";

/// Máximo de prefijos viejos que se quitan del álbum.
const MAX_PREFIX_STRIPS: usize = 3;

/// Categorías que se pueden escribir en los tags. El orden de `ALL` es el del prefijo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagCategory {
    Tempo,
    Energy,
    Key,
}

impl TagCategory {
    pub const ALL: [TagCategory; 3] = [TagCategory::Tempo, TagCategory::Energy, TagCategory::Key];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagCategory::Tempo => "bpm",
            TagCategory::Energy => "energy",
            TagCategory::Key => "key",
        }
    }

    pub fn field(&self) -> TagField {
        match self {
            TagCategory::Tempo => TagField::Tempo,
            TagCategory::Energy => TagField::Energy,
            TagCategory::Key => TagField::InitialKey,
        }
    }

    /// Texto que representa la categoría, tanto en el prefijo como en el campo estructurado.
    pub fn render(&self, descriptor: &TrackDescriptor) -> String {
        match self {
            TagCategory::Tempo => format!("{}", descriptor.tempo_bpm.round() as i64),
            TagCategory::Energy => format!("{:.2}", descriptor.energy),
            TagCategory::Key => descriptor.key_camelot.clone(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown tag category: {0}")]
pub struct UnknownTagCategory(pub String);

impl FromStr for TagCategory {
    type Err = UnknownTagCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bpm" | "tempo" => Ok(TagCategory::Tempo),
            "energy" => Ok(TagCategory::Energy),
            "key" => Ok(TagCategory::Key),
            _ => Err(UnknownTagCategory(s.to_string())),
        }
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pedido de escritura para una pista; se consume una sola vez.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMergeRequest {
    pub path: PathBuf,
    pub categories: Vec<TagCategory>,
    pub overwrite: bool,
}

impl TagMergeRequest {
    pub fn new(path: impl Into<PathBuf>, categories: Vec<TagCategory>, overwrite: bool) -> Self {
        TagMergeRequest {
            path: path.into(),
            categories,
            overwrite,
        }
    }

    fn requested(&self) -> impl Iterator<Item = TagCategory> + '_ {
        TagCategory::ALL.into_iter().filter(|c| self.categories.contains(c))
    }
}

/// Quita hasta tres segmentos iniciales formados solo por alfanuméricos ASCII, `.` o `#`
/// seguidos de `" | "`. Lo que queda es el álbum original.
///
/// Un álbum legítimo como `"Disc1 | Live"` también pierde su primer segmento.
pub fn clean_album_prefix(album: &str) -> &str {
    let mut rest = album;
    for _ in 0..MAX_PREFIX_STRIPS {
        let Some(pos) = rest.find(PREFIX_SEPARATOR) else {
            break;
        };
        let head = &rest[..pos];
        if !head.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '#') {
            break;
        }
        rest = &rest[pos + PREFIX_SEPARATOR.len()..];
    }
    rest
}

/// Fragmentos pedidos, en orden tempo, energía, tonalidad, unidos por `" | "`.
pub fn generated_prefix(descriptor: &TrackDescriptor, categories: &[TagCategory]) -> String {
    TagCategory::ALL
        .iter()
        .filter(|c| categories.contains(c))
        .map(|c| c.render(descriptor))
        .collect::<Vec<_>>()
        .join(PREFIX_SEPARATOR)
}

pub fn compose_album(prefix: &str, existing: &str, overwrite: bool) -> String {
    if overwrite {
        return prefix.to_string();
    }
    let tail = clean_album_prefix(existing);
    if tail.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix}{PREFIX_SEPARATOR}{tail}")
    }
}

/// Nada que persistir: sin categorías, o tempo y energía prácticamente en cero.
pub fn should_skip(descriptor: &TrackDescriptor, categories: &[TagCategory]) -> bool {
    categories.is_empty() || (descriptor.tempo_bpm < 0.1 && descriptor.energy < 0.01)
}

/// Compone el álbum y los campos estructurados y guarda. `Ok(false)` si no había nada que escribir.
pub fn merge_and_write(
    tags: &dyn TagLibrary,
    request: &TagMergeRequest,
    descriptor: &TrackDescriptor,
) -> Result<bool, TagError> {
    if should_skip(descriptor, &request.categories) {
        return Ok(false);
    }

    let prefix = generated_prefix(descriptor, &request.categories);
    let mut store = tags.open(&request.path)?;

    let existing = store.album().unwrap_or_default();
    let album = compose_album(&prefix, &existing, request.overwrite);
    store.set_album(&album);

    for category in request.requested() {
        store.set_field(category.field(), &category.render(descriptor));
    }

    store.save()?;
    debug!(path = %request.path.display(), flavor = ?store.flavor(), album = %album, "tags written");
    Ok(true)
}
