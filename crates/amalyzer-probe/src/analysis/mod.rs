pub mod analyzer;
pub mod classifier;
pub mod energy;
pub mod keys;
pub mod spectral;

/// Resultado numérico del análisis de una pista.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackAnalysis {
    pub duration_secs: f64,
    pub tempo_bpm: f64,
    pub average_db: f64,
    pub energy: f64,
    pub key_index: i32,
}

/// Redondea a dos decimales.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
