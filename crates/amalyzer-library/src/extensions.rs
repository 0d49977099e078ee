use serde::{Deserialize, Serialize};

/// Formatos que el decodificador por defecto sabe abrir.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SupportedExtension {
    Mp3,
    Flac,
    Ogg,
    Opus,
    Wav,
    M4a,
    Aiff,
}

impl SupportedExtension {
    pub const ALL: &'static [SupportedExtension] = &[
        SupportedExtension::Mp3,
        SupportedExtension::Flac,
        SupportedExtension::Ogg,
        SupportedExtension::Opus,
        SupportedExtension::Wav,
        SupportedExtension::M4a,
        SupportedExtension::Aiff,
    ];

    /// Lo que se escanea si no se pide otra cosa.
    pub const DEFAULT: &'static [SupportedExtension] = &[
        SupportedExtension::Mp3,
        SupportedExtension::Flac,
        SupportedExtension::Ogg,
        SupportedExtension::Wav,
        SupportedExtension::M4a,
        SupportedExtension::Aiff,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SupportedExtension::Mp3 => "mp3",
            SupportedExtension::Flac => "flac",
            SupportedExtension::Ogg => "ogg",
            SupportedExtension::Opus => "opus",
            SupportedExtension::Wav => "wav",
            SupportedExtension::M4a => "m4a",
            SupportedExtension::Aiff => "aiff",
        }
    }

    /// Sufijos de archivo que corresponden a este formato.
    pub fn suffixes(&self) -> &'static [&'static str] {
        match self {
            SupportedExtension::Mp3 => &["mp3"],
            SupportedExtension::Flac => &["flac"],
            SupportedExtension::Ogg => &["ogg"],
            SupportedExtension::Opus => &["opus"],
            SupportedExtension::Wav => &["wav"],
            SupportedExtension::M4a => &["m4a"],
            SupportedExtension::Aiff => &["aif", "aiff"],
        }
    }
}

impl std::str::FromStr for SupportedExtension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = normalize_extension(s);
        SupportedExtension::ALL
            .iter()
            .find(|ext| ext.suffixes().contains(&lower.as_str()))
            .cloned()
            .ok_or_else(|| format!("Extension not supported: {}", s))
    }
}

impl std::fmt::Display for SupportedExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `".FLAC "` → `"flac"`.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Lista separada por comas (`"mp3,.FLAC"`) a sufijos normalizados, sin vacíos ni duplicados.
pub fn parse_extension_list(list: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for ext in list.split(',').map(normalize_extension) {
        if !ext.is_empty() && !out.contains(&ext) {
            out.push(ext);
        }
    }
    out
}

pub fn default_extensions() -> Vec<String> {
    SupportedExtension::DEFAULT
        .iter()
        .flat_map(|e| e.suffixes().iter().map(|s| s.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_both_aiff_suffixes() {
        assert_eq!(default_extensions(), vec!["mp3", "flac", "ogg", "wav", "m4a", "aif", "aiff"]);
    }

    #[test]
    fn parsing_normalizes_and_dedups() {
        assert_eq!(parse_extension_list("mp3, .FLAC,,mp3,.aif"), vec!["mp3", "flac", "aif"]);
        assert!(parse_extension_list(" , ").is_empty());
    }

    #[test]
    fn from_str_accepts_aliases() {
        assert_eq!(".AIF".parse::<SupportedExtension>(), Ok(SupportedExtension::Aiff));
        assert_eq!("opus".parse::<SupportedExtension>(), Ok(SupportedExtension::Opus));
        assert!("txt".parse::<SupportedExtension>().is_err());
    }
}
