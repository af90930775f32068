use thiserror::Error;

use crate::audio::pitch_track::TrackError;

/// Reasons a call could not be analyzed at all.
///
/// Running out of pitched material is not an error; see
/// [`InsufficientSignal`](super::types::InsufficientSignal).
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("pitch extraction failed")]
    Extraction(#[from] TrackError),
}
