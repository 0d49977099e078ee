use crate::analysis::round2;

/// RMS en streaming: suma de cuadrados y cuenta de muestras, memoria constante.
#[derive(Debug, Clone, Default)]
pub struct EnergyAccumulator {
    sum_squares: f64,
    count: u64,
}

impl EnergyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acepta chunks intercalados de cualquier tamaño, en orden de llegada.
    pub fn push(&mut self, samples: &[f32]) {
        for &s in samples {
            let v = s as f64;
            self.sum_squares += v * v;
        }
        self.count += samples.len() as u64;
    }

    pub fn sample_count(&self) -> u64 {
        self.count
    }

    /// `round(sqrt(sum / count), 2)`, o `0.0` si no llegó ninguna muestra.
    pub fn finalize(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        round2((self.sum_squares / self.count as f64).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunking_does_not_change_result() {
        let mut split = EnergyAccumulator::new();
        split.push(&[1.0, 1.0, 1.0, 1.0]);
        split.push(&[1.0, 1.0]);

        let mut whole = EnergyAccumulator::new();
        whole.push(&[1.0; 6]);

        assert_eq!(split.finalize(), whole.finalize());
        assert_eq!(whole.finalize(), 1.0);
        assert_eq!(split.sample_count(), 6);
    }

    #[test]
    fn empty_stream_is_zero() {
        let acc = EnergyAccumulator::new();
        let e = acc.finalize();
        assert_eq!(e, 0.0);
        assert!(!e.is_nan());

        let mut acc = EnergyAccumulator::new();
        acc.push(&[]);
        assert_eq!(acc.finalize(), 0.0);
    }

    #[test]
    fn rounds_to_two_decimals() {
        let mut acc = EnergyAccumulator::new();
        // rms = sqrt((0.25 + 0) / 2) = 0.3535...
        acc.push(&[0.5, 0.0]);
        assert_eq!(acc.finalize(), 0.35);
    }
}
