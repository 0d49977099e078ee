use crate::analysis::classifier::DetectionPolicy;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeConfig {
    pub policy: DetectionPolicy,
    /// Leer tags aunque el análisis falle.
    pub read_metadata_on_failure: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            policy: DetectionPolicy::default(),
            read_metadata_on_failure: true,
        }
    }
}
