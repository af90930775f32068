use serde::Serialize;

/// Strongest tracker candidate for one analysis frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PitchFrame {
    pub frame_index: usize,
    pub frequency: f32,
    pub magnitude: f32,
}

/// A contour frequency that survived duration gating.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    pub frequency: f32,
    /// Synthesized timestamp in seconds
    pub time: f32,
    /// Running sum of inter-observation intervals, in seconds
    pub elapsed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Melodic,
    NonMelodic,
}

/// Why a clip was labelled non-melodic without being scored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsufficientSignal {
    NoPitchedFrames,
    TooFewObservations,
    TooFewNotes,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    pub note_shifts: u32,
    pub harmonic_changes: u32,
    pub harmonic_ratio: f32,
    pub contour_frames: usize,
    pub valid_observations: usize,
    pub notes: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Classification {
    pub label: Label,
    pub diagnostics: Diagnostics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insufficient: Option<InsufficientSignal>,
}

impl Classification {
    pub fn insufficient(reason: InsufficientSignal) -> Self {
        Self {
            label: Label::NonMelodic,
            diagnostics: Diagnostics::default(),
            insufficient: Some(reason),
        }
    }

    pub fn is_melodic(&self) -> bool {
        self.label == Label::Melodic
    }
}
