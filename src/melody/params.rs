use serde::{Deserialize, Serialize};

use super::error::ClassifyError;
use super::interval::DEFAULT_INTERVAL_TOLERANCE;

/// How surviving contour frames are placed on the time axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameTiming {
    /// Spread the surviving frames evenly over `[0, duration]`, ignoring the
    /// gaps left by frames that were filtered out.
    #[default]
    Interpolated,
    /// Use each frame's own start time, `frame_index * hop / sample_rate`.
    HopAligned,
}

/// Tuning for one classification call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    /// Minimum number of note shifts for a melodic verdict.
    pub max_note_shifts: u32,
    /// Gates both the tracker magnitude and the frequency (Hz) of each frame,
    /// and is the minimum Hz jump that counts as a note shift. The magnitude
    /// comparison mixes units; kept as one knob for compatibility.
    pub pitch_change_threshold: f32,
    /// Observations at or before this many seconds of elapsed time are dropped.
    pub min_note_duration: f32,
    /// Harmonic ratio must be strictly above this for a melodic verdict.
    pub harmony_ratio_threshold: f32,
    pub interval_tolerance: u32,
    pub timing: FrameTiming,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            max_note_shifts: 10,
            pitch_change_threshold: 25.0,
            min_note_duration: 0.25,
            harmony_ratio_threshold: 0.5,
            interval_tolerance: DEFAULT_INTERVAL_TOLERANCE,
            timing: FrameTiming::Interpolated,
        }
    }
}

impl ClassifierParams {
    pub fn validate(&self) -> Result<(), ClassifyError> {
        non_negative("pitch_change_threshold", self.pitch_change_threshold)?;
        non_negative("min_note_duration", self.min_note_duration)?;
        if !(0.0..=1.0).contains(&self.harmony_ratio_threshold) {
            return Err(ClassifyError::InvalidInput(format!(
                "harmony_ratio_threshold must be within [0, 1], got {}",
                self.harmony_ratio_threshold
            )));
        }
        Ok(())
    }
}

fn non_negative(name: &str, value: f32) -> Result<(), ClassifyError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ClassifyError::InvalidInput(format!(
            "{} must be a finite non-negative number, got {}",
            name, value
        )))
    }
}
