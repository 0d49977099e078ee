pub mod merger;
pub mod reader;
pub mod tags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tags y propiedades leídos del archivo. Los textos ausentes quedan vacíos.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub year: String,
    pub track_number: Option<u32>,
    pub bitrate_kbps: Option<u32>,
    pub sample_rate_hz: Option<u32>,
    pub channels: Option<u8>,
    pub duration_secs: Option<f64>,
}
