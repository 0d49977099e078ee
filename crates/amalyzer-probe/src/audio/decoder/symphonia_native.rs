use std::{fs::File, io, path::Path};

use symphonia::core::{
    audio::{SampleBuffer, SignalSpec},
    codecs::{CODEC_TYPE_NULL, Decoder, DecoderOptions},
    errors::Error as SymphError,
    formats::{FormatOptions, FormatReader},
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};
use symphonia::default::{get_codecs, get_probe};
use tracing::{debug, trace};

use crate::{
    audio::{AudioDecoder, PcmStream, StreamInfo},
    error::Error,
};

/// Frames por chunk cuando el contenedor no declara `max_frames_per_packet`.
const FALLBACK_CHUNK_FRAMES: u32 = 4096;

#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl AudioDecoder for SymphoniaDecoder {
    fn open(&self, path: &Path) -> Result<Box<dyn PcmStream + Send>, Error> {
        let file = File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Hint para detección de formato basada en extensión
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
            hint.with_extension(ext);
        }

        let probed = get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| Error::Decode(format!("probing format: {e}")))?;
        let format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(Error::Unsupported("no audio track"))?;
        let track_id = track.id;
        let params = track.codec_params.clone();

        let decoder = get_codecs()
            .make(&params, &DecoderOptions::default())
            .map_err(|e| Error::Decode(format!("creating decoder: {e}")))?;

        let sample_rate = params.sample_rate.unwrap_or(0);
        let info = StreamInfo {
            sample_rate,
            channels: params.channels.map(|c| c.count() as u16).unwrap_or(0),
            frames_per_chunk: params
                .max_frames_per_packet
                .map(|n| n.min(u32::MAX as u64) as u32)
                .unwrap_or(FALLBACK_CHUNK_FRAMES),
            duration_secs: match params.n_frames {
                Some(n) if sample_rate > 0 => Some(n as f64 / sample_rate as f64),
                _ => None,
            },
        };

        debug!(
            path = %path.display(),
            sample_rate = info.sample_rate,
            channels = info.channels,
            frames_per_chunk = info.frames_per_chunk,
            "decoder opened"
        );

        Ok(Box::new(SymphoniaStream {
            format,
            decoder,
            track_id,
            sample_buf: None,
            info,
        }))
    }
}

struct SymphoniaStream {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    // buffer reutilizado mientras la capacidad y el layout no cambien
    sample_buf: Option<(SampleBuffer<f32>, usize, SignalSpec)>,
    info: StreamInfo,
}

fn is_eof(err: &SymphError) -> bool {
    matches!(err, SymphError::IoError(e) if e.kind() == io::ErrorKind::UnexpectedEof)
}

impl PcmStream for SymphoniaStream {
    fn next_chunk(&mut self) -> Result<Option<Vec<f32>>, Error> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(e) if is_eof(&e) => return Ok(None),
                Err(SymphError::ResetRequired) => return Ok(None),
                Err(e) => return Err(Error::Decode(e.to_string())),
            };

            // Solo paquetes de la pista seleccionada
            if packet.track_id() != self.track_id {
                continue;
            }

            match self.decoder.decode(&packet) {
                Ok(audio_buf) => {
                    if audio_buf.frames() == 0 {
                        continue;
                    }

                    let spec = *audio_buf.spec();
                    let capacity = audio_buf.capacity();
                    self.info.channels = spec.channels.count() as u16;

                    let reusable = matches!(&self.sample_buf, Some((_, cap, s)) if *cap >= capacity && *s == spec);
                    if !reusable {
                        self.sample_buf = Some((SampleBuffer::new(capacity as u64, spec), capacity, spec));
                    }

                    if let Some((sb, _, _)) = self.sample_buf.as_mut() {
                        sb.copy_interleaved_ref(audio_buf);
                        return Ok(Some(sb.samples().to_vec()));
                    }
                }
                // Paquetes corruptos se descartan y se sigue
                Err(SymphError::DecodeError(e)) => {
                    trace!(error = %e, "skipping undecodable packet");
                    continue;
                }
                Err(e) if is_eof(&e) => return Ok(None),
                Err(e) => return Err(Error::Decode(e.to_string())),
            }
        }
    }

    fn format(&self) -> Option<StreamInfo> {
        Some(self.info)
    }
}
