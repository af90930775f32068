use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};
use thiserror::Error;

pub const FFT_SIZE: usize = 2048;
pub const HOP_SIZE: usize = 512;

const FMIN_HZ: f32 = 150.0;
const FMAX_HZ: f32 = 4000.0;
/// Peaks below this fraction of the frame's loudest bin are ignored.
const PEAK_THRESHOLD: f32 = 0.1;

/// One spectral peak in one analysis frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PitchCandidate {
    pub frequency: f32,
    pub magnitude: f32,
}

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("sample rate must be positive")]
    ZeroSampleRate,
    #[error("non-finite sample at index {index}")]
    NonFiniteSample { index: usize },
}

/// Frame-wise pitch candidate source.
///
/// Returns one entry per analysis frame, in frame order. A frame may carry
/// any number of candidates, including none.
pub trait PitchTracker: Send + Sync {
    /// Samples between the starts of consecutive frames.
    fn hop_length(&self) -> usize;

    fn track(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<Vec<Vec<PitchCandidate>>, TrackError>;
}

/// STFT peak picker with parabolic interpolation between bins.
///
/// Frames are centered on `frame * HOP_SIZE` with zero padding at both ends,
/// so a buffer of `n` samples yields `1 + n / HOP_SIZE` frames.
#[derive(Clone, Debug)]
pub struct SpectralPeakTracker {
    pub fmin: f32,
    pub fmax: f32,
    pub threshold: f32,
}

impl Default for SpectralPeakTracker {
    fn default() -> Self {
        Self {
            fmin: FMIN_HZ,
            fmax: FMAX_HZ,
            threshold: PEAK_THRESHOLD,
        }
    }
}

impl PitchTracker for SpectralPeakTracker {
    fn hop_length(&self) -> usize {
        HOP_SIZE
    }

    fn track(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<Vec<Vec<PitchCandidate>>, TrackError> {
        if sample_rate == 0 {
            return Err(TrackError::ZeroSampleRate);
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(TrackError::NonFiniteSample { index });
        }

        let total_frames = frame_count(samples.len());
        let bin_hz = sample_rate as f32 / FFT_SIZE as f32;
        let fmax = self.fmax.min(sample_rate as f32 / 2.0);
        let hann = hann_window(FFT_SIZE);

        log::trace!(
            "Tracking {} frames (fft={}, hop={}, band {:.0}-{:.0}Hz)",
            total_frames, FFT_SIZE, HOP_SIZE, self.fmin, fmax
        );

        // One planner per rayon worker; collect() keeps frame order
        let frames = (0..total_frames)
            .into_par_iter()
            .map_init(
                || FftPlanner::<f32>::new().plan_fft_forward(FFT_SIZE),
                |fft, frame_idx| {
                    let mut buffer = centered_frame(samples, frame_idx, &hann);
                    fft.process(&mut buffer);
                    let spectrum: Vec<f32> =
                        buffer[..=FFT_SIZE / 2].iter().map(|c| c.norm()).collect();
                    self.frame_candidates(&spectrum, bin_hz, fmax)
                },
            )
            .collect();

        Ok(frames)
    }
}

impl SpectralPeakTracker {
    fn frame_candidates(&self, spectrum: &[f32], bin_hz: f32, fmax: f32) -> Vec<PitchCandidate> {
        let n = spectrum.len();
        let floor = self.threshold * spectrum.iter().copied().fold(0.0f32, f32::max);
        let gated = |i: usize| if spectrum[i] > floor { spectrum[i] } else { 0.0 };

        let mut candidates = Vec::new();
        for i in 1..n {
            let freq = i as f32 * bin_hz;
            if freq < self.fmin || freq >= fmax {
                continue;
            }

            let here = gated(i);
            let right = if i + 1 < n { gated(i + 1) } else { here };
            if here <= gated(i - 1) || here < right {
                continue;
            }

            let (shift, skew) = if i + 1 < n {
                parabolic_peak(spectrum[i - 1], spectrum[i], spectrum[i + 1])
            } else {
                (0.0, 0.0)
            };
            candidates.push(PitchCandidate {
                frequency: (i as f32 + shift) * bin_hz,
                magnitude: spectrum[i] + skew,
            });
        }
        candidates
    }
}

/// Number of centered frames the tracker produces for `len` samples.
pub fn frame_count(len: usize) -> usize {
    1 + len / HOP_SIZE
}

/// Vertex offset (in bins) and height correction of the parabola through
/// three neighbouring magnitudes.
fn parabolic_peak(prev: f32, cur: f32, next: f32) -> (f32, f32) {
    let avg = 0.5 * (next - prev);
    let curvature = 2.0 * cur - next - prev;
    let denom = if curvature.abs() < f32::MIN_POSITIVE {
        curvature + 1.0
    } else {
        curvature
    };
    let shift = avg / denom;
    (shift, 0.5 * avg * shift)
}

fn centered_frame(samples: &[f32], frame_idx: usize, window: &[f32]) -> Vec<Complex<f32>> {
    let start = (frame_idx * HOP_SIZE) as isize - (FFT_SIZE / 2) as isize;
    window
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let pos = start + i as isize;
            let s = if pos >= 0 && (pos as usize) < samples.len() {
                samples[pos as usize]
            } else {
                0.0
            };
            Complex::new(s * w, 0.0)
        })
        .collect()
}

/// Periodic Hann window.
fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / size as f32).cos()))
        .collect()
}
