/// Sensibilidad del detector de tonalidad: cuánta correlación mínima exige
/// antes de aceptar una tonalidad en lugar de devolver "desconocida".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeySensitivity {
    Low,
    #[default]
    Normal,
    High,
}

impl KeySensitivity {
    pub fn min_correlation(self) -> f64 {
        match self {
            KeySensitivity::Low => 0.6,
            KeySensitivity::Normal => 0.3,
            KeySensitivity::High => 0.0,
        }
    }
}

/// Política de detección con la que se cierra el análisis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionPolicy {
    pub min_bpm: f64,
    pub max_bpm: f64,
    /// Forzar alineación al primer tiempo fuerte. Los motores sin rejilla de beats lo ignoran.
    pub align_downbeat: bool,
    pub key_sensitivity: KeySensitivity,
}

impl Default for DetectionPolicy {
    fn default() -> Self {
        DetectionPolicy {
            min_bpm: 60.0,
            max_bpm: 200.0,
            align_downbeat: false,
            key_sensitivity: KeySensitivity::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierResult {
    /// 0 = desconocido.
    pub tempo_bpm: f64,
    pub average_db: f64,
    /// -1 = desconocido.
    pub key_index: i32,
}

/// Motor de tempo/tonalidad: recibe PCM en orden y entrega un resultado al final.
pub trait TempoKeyClassifier: Send {
    fn feed(&mut self, interleaved: &[f32], channels: u16);
    fn finalize(self: Box<Self>, policy: &DetectionPolicy) -> ClassifierResult;
}

pub trait ClassifierFactory {
    /// Inicializa un clasificador para una pista con `sample_rate` y una ventana de `window_secs`.
    fn create(&self, sample_rate: u32, window_secs: u32) -> Box<dyn TempoKeyClassifier>;
}
