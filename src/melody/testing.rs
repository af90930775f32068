use crate::audio::pitch_track::{PitchCandidate, PitchTracker, TrackError};

/// Tracker that replays fixed frames regardless of the audio it is given.
pub struct ScriptedTracker {
    frames: Option<Vec<Vec<PitchCandidate>>>,
}

impl ScriptedTracker {
    pub fn new(frames: Vec<Vec<PitchCandidate>>) -> Self {
        Self { frames: Some(frames) }
    }

    /// One loud candidate per frame.
    pub fn from_frequencies(freqs: &[f32]) -> Self {
        Self::new(
            freqs
                .iter()
                .map(|&frequency| vec![PitchCandidate { frequency, magnitude: 100.0 }])
                .collect(),
        )
    }

    pub fn failing() -> Self {
        Self { frames: None }
    }
}

impl PitchTracker for ScriptedTracker {
    fn hop_length(&self) -> usize {
        512
    }

    fn track(&self, _samples: &[f32], _sample_rate: u32) -> Result<Vec<Vec<PitchCandidate>>, TrackError> {
        self.frames
            .clone()
            .ok_or(TrackError::NonFiniteSample { index: 0 })
    }
}

/// Phase-continuous sine sequence, `secs_each` seconds per frequency.
pub fn tone_sequence(freqs: &[f32], sample_rate: u32, secs_each: f32) -> Vec<f32> {
    let per_tone = (sample_rate as f32 * secs_each) as usize;
    let mut phase = 0.0f64;
    let mut out = Vec::with_capacity(per_tone * freqs.len());
    for &f in freqs {
        let step = 2.0 * std::f64::consts::PI * f as f64 / sample_rate as f64;
        for _ in 0..per_tone {
            out.push((0.5 * phase.sin()) as f32);
            phase += step;
        }
    }
    out
}

/// Frequency `semitones` above `base`.
pub fn transpose(base: f32, semitones: i32) -> f32 {
    base * 2f32.powf(semitones as f32 / 12.0)
}
