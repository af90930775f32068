use anyhow::{Context, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decoded mono clip at its native sample rate.
pub struct AudioData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioData {
    pub fn duration(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Decodes the first audio track of `path`, averaging channels to mono.
/// No resampling is done.
pub fn decode_audio(path: &Path) -> Result<AudioData> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .with_context(|| format!("Unsupported or corrupt audio file: {}", path.display()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio tracks found")?;

    let track_id = track.id;
    let channels = track.codec_params.channels.map_or(1, |c| c.count());
    let sample_rate = track.codec_params.sample_rate.context("Unknown sample rate")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let mut mono: Vec<f32> = Vec::new();
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(e).context("Failed to read audio packet"),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(msg)) => {
                log::debug!("Skipping undecodable packet: {}", msg);
                skipped_packets += 1;
                continue;
            }
            Err(e) => return Err(e).context("Audio decoder failed"),
        };

        let spec = *decoded.spec();
        let mut sample_buf = SampleBuffer::<f32>::new(decoded.frames() as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        downmix_into(&mut mono, sample_buf.samples(), channels);
    }

    if skipped_packets > 0 {
        log::warn!("{}: skipped {} corrupt packets", path.display(), skipped_packets);
    }

    let audio = AudioData {
        samples: mono,
        sample_rate,
    };
    log::info!(
        "Decoded {}: {} samples, {}Hz, {} channel(s), {:.2}s",
        path.display(),
        audio.samples.len(),
        sample_rate,
        channels,
        audio.duration()
    );
    Ok(audio)
}

/// Appends the per-frame channel mean of interleaved `samples` to `out`.
fn downmix_into(out: &mut Vec<f32>, samples: &[f32], channels: usize) {
    if channels <= 1 {
        out.extend_from_slice(samples);
        return;
    }
    out.extend(
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32),
    );
}
