use crate::audio::pitch_track::{PitchCandidate, PitchTracker, TrackError};

use super::types::PitchFrame;

/// Runs the tracker and keeps each frame's strongest candidate when both its
/// magnitude and its frequency exceed `threshold`.
///
/// The same value gates two different units (tracker magnitude and Hz).
/// Output is in frame order.
pub fn extract_contour<T: PitchTracker + ?Sized>(
    tracker: &T,
    samples: &[f32],
    sample_rate: u32,
    threshold: f32,
) -> Result<Vec<PitchFrame>, TrackError> {
    let frames = tracker.track(samples, sample_rate)?;
    let total = frames.len();

    let contour: Vec<PitchFrame> = frames
        .iter()
        .enumerate()
        .map(|(frame_index, candidates)| strongest(frame_index, candidates))
        .filter(|f| f.magnitude > threshold && f.frequency > threshold)
        .collect();

    log::debug!(
        "Contour: {}/{} frames above threshold {:.2}",
        contour.len(),
        total,
        threshold
    );
    Ok(contour)
}

/// Loudest candidate, earliest one on ties. An empty frame reads as a zero
/// magnitude at 0 Hz.
fn strongest(frame_index: usize, candidates: &[PitchCandidate]) -> PitchFrame {
    let mut best = PitchFrame {
        frame_index,
        frequency: 0.0,
        magnitude: 0.0,
    };
    for (i, c) in candidates.iter().enumerate() {
        if i == 0 || c.magnitude > best.magnitude {
            best.frequency = c.frequency;
            best.magnitude = c.magnitude;
        }
    }
    best
}
