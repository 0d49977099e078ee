use std::sync::Arc;

use apodize::hanning_iter;
use rustfft::{Fft, FftPlanner, num_complex::Complex};

use crate::analysis::{
    classifier::{ClassifierFactory, ClassifierResult, DetectionPolicy, KeySensitivity, TempoKeyClassifier},
    keys::UNKNOWN_KEY_INDEX,
};

// =================== Config / Constantes ===================

pub const ONSET_FRAME_SIZE: usize = 1024;
pub const ONSET_HOP: usize = 512;
pub const CHROMA_FRAME_SIZE: usize = 4096;
pub const CHROMA_MIN_HZ: f32 = 55.0;
pub const CHROMA_MAX_HZ: f32 = 2_000.0;
pub const SILENCE_DB: f64 = -100.0;

// prior log-gaussiano sobre el tempo, evita saltos de octava
const TEMPO_PRIOR_CENTER_BPM: f64 = 120.0;
const TEMPO_PRIOR_OCTAVES: f64 = 1.0;

// perfiles Krumhansl-Kessler, índice 0 = tónica
const MAJOR_PROFILE: [f64; 12] = [6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88];
const MINOR_PROFILE: [f64; 12] = [6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17];

// =================== Factory ===================

/// Clasificador por defecto: envolvente de onsets para el tempo y croma para la tonalidad.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpectralClassifierFactory;

impl ClassifierFactory for SpectralClassifierFactory {
    fn create(&self, sample_rate: u32, window_secs: u32) -> Box<dyn TempoKeyClassifier> {
        Box::new(SpectralClassifier::new(sample_rate, window_secs))
    }
}

// =================== STFT en streaming ===================

/// FIFO mono + FFT con ventana de Hann; procesa cada ventana completa y avanza `hop`.
struct StftStage {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    fifo: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    size: usize,
    hop: usize,
}

impl StftStage {
    fn new(planner: &mut FftPlanner<f32>, size: usize, hop: usize) -> Self {
        let fft = planner.plan_fft_forward(size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        StftStage {
            fft,
            window: hanning_iter(size).map(|x| x as f32).collect(),
            fifo: Vec::with_capacity(size * 2),
            buffer: vec![Complex::new(0.0, 0.0); size],
            scratch,
            size,
            hop,
        }
    }

    fn push(&mut self, mono: &[f32], mut on_frame: impl FnMut(&[Complex<f32>])) {
        self.fifo.extend_from_slice(mono);
        while self.fifo.len() >= self.size {
            for ((bin, &s), &w) in self.buffer.iter_mut().zip(&self.fifo).zip(&self.window) {
                *bin = Complex::new(s * w, 0.0);
            }
            self.fifo.drain(0..self.hop);

            self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);
            on_frame(&self.buffer[..self.size / 2]);
        }
    }
}

// =================== Clasificador ===================

pub struct SpectralClassifier {
    sample_rate: u32,

    // sonoridad media
    sum_squares: f64,
    samples: u64,

    // tempo
    onset: StftStage,
    prev_log_mag: Vec<f32>,
    envelope: Vec<f32>,
    envelope_capacity: usize,

    // tonalidad
    chroma_stage: StftStage,
    bin_pitch_class: Vec<Option<usize>>,
    chroma: [f64; 12],

    mono: Vec<f32>,
}

impl SpectralClassifier {
    pub fn new(sample_rate: u32, window_secs: u32) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let onset = StftStage::new(&mut planner, ONSET_FRAME_SIZE, ONSET_HOP);
        let chroma_stage = StftStage::new(&mut planner, CHROMA_FRAME_SIZE, CHROMA_FRAME_SIZE);

        let envelope_capacity = (window_secs as usize * sample_rate as usize) / ONSET_HOP + 1;

        SpectralClassifier {
            sample_rate,
            sum_squares: 0.0,
            samples: 0,
            onset,
            prev_log_mag: vec![0.0; ONSET_FRAME_SIZE / 2],
            envelope: Vec::with_capacity(envelope_capacity),
            envelope_capacity,
            chroma_stage,
            bin_pitch_class: pitch_class_map(sample_rate, CHROMA_FRAME_SIZE),
            chroma: [0.0; 12],
            mono: Vec::new(),
        }
    }

    fn envelope_rate(&self) -> f64 {
        self.sample_rate as f64 / ONSET_HOP as f64
    }
}

impl TempoKeyClassifier for SpectralClassifier {
    fn feed(&mut self, interleaved: &[f32], channels: u16) {
        let ch = channels.max(1) as usize;

        for &s in interleaved {
            self.sum_squares += (s as f64) * (s as f64);
        }
        self.samples += interleaved.len() as u64;

        // mezclar a mono (promedio por frame)
        self.mono.clear();
        for frame in interleaved.chunks_exact(ch) {
            let sum: f32 = frame.iter().copied().sum();
            self.mono.push(sum / ch as f32);
        }

        // flujo espectral positivo sobre magnitud log-comprimida
        let prev = &mut self.prev_log_mag;
        let envelope = &mut self.envelope;
        let capacity = self.envelope_capacity;
        self.onset.push(&self.mono, |spectrum| {
            let mut flux = 0.0_f32;
            for (bin, last) in spectrum.iter().zip(prev.iter_mut()) {
                let mag = (1.0 + 100.0 * bin.norm()).ln();
                let diff = mag - *last;
                if diff > 0.0 {
                    flux += diff;
                }
                *last = mag;
            }
            if envelope.len() < capacity {
                envelope.push(flux);
            }
        });

        let chroma = &mut self.chroma;
        let pitch = &self.bin_pitch_class;
        self.chroma_stage.push(&self.mono, |spectrum| {
            for (bin, pc) in spectrum.iter().zip(pitch) {
                if let Some(pc) = pc {
                    chroma[*pc] += bin.norm() as f64;
                }
            }
        });
    }

    fn finalize(self: Box<Self>, policy: &DetectionPolicy) -> ClassifierResult {
        let average_db = if self.samples == 0 {
            SILENCE_DB
        } else {
            (10.0 * (self.sum_squares / self.samples as f64).log10()).max(SILENCE_DB)
        };

        ClassifierResult {
            tempo_bpm: estimate_tempo(&self.envelope, self.envelope_rate(), policy.min_bpm, policy.max_bpm),
            average_db,
            key_index: estimate_key(&self.chroma, policy.key_sensitivity),
        }
    }
}

/// Clase de altura (Do = 0) de cada bin útil de una FFT de `size` puntos.
fn pitch_class_map(sample_rate: u32, size: usize) -> Vec<Option<usize>> {
    (0..size / 2)
        .map(|k| {
            let freq = k as f32 * sample_rate as f32 / size as f32;
            if !(CHROMA_MIN_HZ..=CHROMA_MAX_HZ).contains(&freq) {
                return None;
            }
            let midi = 69.0 + 12.0 * (freq / 440.0).log2();
            Some((midi.round() as i64).rem_euclid(12) as usize)
        })
        .collect()
}

fn tempo_prior(bpm: f64) -> f64 {
    let octaves = (bpm / TEMPO_PRIOR_CENTER_BPM).log2() / TEMPO_PRIOR_OCTAVES;
    (-0.5 * octaves * octaves).exp()
}

/// Autocorrelación de la envolvente de onsets dentro de la banda `[min_bpm, max_bpm]`.
/// Devuelve 0 si no hay suficiente señal para decidir.
pub fn estimate_tempo(envelope: &[f32], envelope_rate: f64, min_bpm: f64, max_bpm: f64) -> f64 {
    if envelope_rate <= 0.0 || min_bpm <= 0.0 || max_bpm <= min_bpm {
        return 0.0;
    }

    let min_lag = ((60.0 * envelope_rate / max_bpm).floor() as usize).max(1);
    let max_lag = (60.0 * envelope_rate / min_bpm).ceil() as usize;
    let n = envelope.len();
    if n < max_lag * 2 {
        return 0.0;
    }

    let mean = envelope.iter().map(|&v| v as f64).sum::<f64>() / n as f64;
    let centered: Vec<f64> = envelope.iter().map(|&v| v as f64 - mean).collect();
    let variance = centered.iter().map(|v| v * v).sum::<f64>() / n as f64;
    if variance <= 1e-12 {
        return 0.0;
    }

    let acf: Vec<f64> = (min_lag..=max_lag)
        .map(|lag| {
            let sum: f64 = centered[..n - lag].iter().zip(&centered[lag..]).map(|(a, b)| a * b).sum();
            sum / (n - lag) as f64
        })
        .collect();

    let mut best: Option<(usize, f64)> = None;
    for (i, &r) in acf.iter().enumerate() {
        if r <= 0.0 {
            continue;
        }
        let bpm = 60.0 * envelope_rate / (min_lag + i) as f64;
        let score = r * tempo_prior(bpm);
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((i, score));
        }
    }
    let Some((i, _)) = best else {
        return 0.0;
    };

    // interpolación parabólica alrededor del pico
    let mut lag = (min_lag + i) as f64;
    if i > 0 && i + 1 < acf.len() {
        let (a, b, c) = (acf[i - 1], acf[i], acf[i + 1]);
        let denom = a - 2.0 * b + c;
        if denom.abs() > f64::EPSILON {
            let delta = 0.5 * (a - c) / denom;
            if delta.abs() < 1.0 {
                lag += delta;
            }
        }
    }

    (60.0 * envelope_rate / lag).clamp(min_bpm, max_bpm)
}

fn pearson(x: &[f64; 12], y: &[f64; 12]) -> f64 {
    let mx = x.iter().sum::<f64>() / 12.0;
    let my = y.iter().sum::<f64>() / 12.0;
    let (mut num, mut dx, mut dy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        num += (a - mx) * (b - my);
        dx += (a - mx) * (a - mx);
        dy += (b - my) * (b - my);
    }
    if dx <= f64::EPSILON || dy <= f64::EPSILON {
        return 0.0;
    }
    num / (dx * dy).sqrt()
}

/// Correlación del croma con los perfiles mayor/menor en las 12 tónicas.
/// El índice sigue el orden de la tabla de notaciones: `(tónica * 7) % 12`, +12 si es menor.
pub fn estimate_key(chroma: &[f64; 12], sensitivity: KeySensitivity) -> i32 {
    if chroma.iter().sum::<f64>() <= 1e-9 {
        return UNKNOWN_KEY_INDEX;
    }

    let mut best = (0.0_f64, UNKNOWN_KEY_INDEX);
    for tonic in 0..12 {
        for (profile, offset) in [(&MAJOR_PROFILE, 0), (&MINOR_PROFILE, 12)] {
            let rotated: [f64; 12] = std::array::from_fn(|pc| profile[(pc + 12 - tonic) % 12]);
            let r = pearson(chroma, &rotated);
            if r > best.0 {
                best = (r, ((tonic * 7) % 12) as i32 + offset);
            }
        }
    }

    if best.0 < sensitivity.min_correlation() {
        return UNKNOWN_KEY_INDEX;
    }
    best.1
}
