use std::path::Path;

use thiserror::Error;
use tracing::{Level, debug, instrument};

use crate::{
    analysis::{
        TrackAnalysis,
        classifier::{ClassifierFactory, DetectionPolicy},
        energy::EnergyAccumulator,
        keys::{UNKNOWN_KEY_INDEX, is_valid_key_index},
    },
    audio::AudioDecoder,
    error::Error,
    track::TrackDescriptor,
};

/// Ventana mínima que necesita el clasificador para dar resultados estables.
pub const MIN_ANALYSIS_WINDOW_SECS: u32 = 5;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("decoder open failed: {0}")]
    Open(#[source] Error),

    #[error("invalid stream parameters")]
    InvalidStream,
}

/// `max(5, floor(duration) + 1)` segundos.
pub fn analysis_window_secs(duration_secs: f64) -> u32 {
    let whole = if duration_secs.is_finite() && duration_secs > 0.0 {
        duration_secs.floor().min(u32::MAX as f64 - 1.0) as u32
    } else {
        0
    };
    (whole + 1).max(MIN_ANALYSIS_WINDOW_SECS)
}

/// Decodifica una pista una sola vez alimentando a la vez al clasificador y al acumulador de energía.
pub struct TrackAnalyzer<'a> {
    decoder: &'a dyn AudioDecoder,
    classifier: &'a dyn ClassifierFactory,
    policy: DetectionPolicy,
}

impl<'a> TrackAnalyzer<'a> {
    pub fn new(decoder: &'a dyn AudioDecoder, classifier: &'a dyn ClassifierFactory, policy: DetectionPolicy) -> Self {
        TrackAnalyzer {
            decoder,
            classifier,
            policy,
        }
    }

    /// Nunca falla: los errores quedan en el descriptor con `success = false`.
    pub fn analyze(&self, path: &Path) -> TrackDescriptor {
        let mut descriptor = TrackDescriptor::new(path);
        match self.run(path) {
            Ok(analysis) => descriptor.apply_analysis(analysis),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "analysis failed");
                descriptor.fail(e.to_string());
            }
        }
        descriptor
    }

    #[instrument(level = Level::TRACE, skip(self), err)]
    pub fn run(&self, path: &Path) -> Result<TrackAnalysis, AnalysisError> {
        let mut stream = self.decoder.open(path).map_err(AnalysisError::Open)?;

        let info = stream.format().ok_or(AnalysisError::InvalidStream)?;
        if info.sample_rate == 0 || info.frames_per_chunk == 0 {
            return Err(AnalysisError::InvalidStream);
        }

        let window = analysis_window_secs(info.duration_secs.unwrap_or(0.0));
        let mut classifier = self.classifier.create(info.sample_rate, window);
        let mut energy = EnergyAccumulator::new();
        let mut frames: u64 = 0;

        loop {
            let chunk = match stream.next_chunk() {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                // un error de decodificación cierra el stream igual que un EOF
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "decode stopped");
                    break;
                }
            };

            // algunos contenedores solo conocen el layout tras el primer paquete
            let channels = stream
                .format()
                .map(|f| f.channels)
                .filter(|&c| c > 0)
                .unwrap_or(info.channels.max(1));
            let chunk_frames = chunk.len() / channels as usize;
            if chunk_frames < 1 {
                break;
            }

            classifier.feed(&chunk, channels);
            energy.push(&chunk);
            frames += chunk_frames as u64;
        }

        let result = classifier.finalize(&self.policy);
        let duration_secs = info
            .duration_secs
            .unwrap_or(frames as f64 / info.sample_rate as f64);

        Ok(TrackAnalysis {
            duration_secs,
            tempo_bpm: result.tempo_bpm.max(0.0),
            average_db: result.average_db,
            energy: energy.finalize(),
            key_index: if is_valid_key_index(result.key_index) {
                result.key_index
            } else {
                UNKNOWN_KEY_INDEX
            },
        })
    }
}
