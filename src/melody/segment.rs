use super::params::FrameTiming;
use super::types::{Observation, PitchFrame};

/// Time axis facts about the clip the contour came from.
#[derive(Clone, Copy, Debug)]
pub struct ClipClock {
    pub sample_count: usize,
    pub sample_rate: u32,
    pub hop_length: usize,
}

impl ClipClock {
    pub fn duration(&self) -> f32 {
        self.sample_count as f32 / self.sample_rate as f32
    }
}

/// One timestamp per contour frame.
pub fn synthesize_timestamps(contour: &[PitchFrame], timing: FrameTiming, clock: &ClipClock) -> Vec<f32> {
    match timing {
        FrameTiming::Interpolated => linspace(0.0, clock.duration(), contour.len()),
        FrameTiming::HopAligned => {
            let hop_secs = clock.hop_length as f32 / clock.sample_rate as f32;
            contour.iter().map(|f| f.frame_index as f32 * hop_secs).collect()
        }
    }
}

/// Pairs each contour frequency with its timestamp and running elapsed time,
/// keeping only those whose elapsed time exceeds `min_note_duration`.
///
/// Returns `None` when fewer than two observations survive.
pub fn segment(contour: &[PitchFrame], timestamps: &[f32], min_note_duration: f32) -> Option<Vec<Observation>> {
    let mut elapsed = 0.0f32;
    let mut prev = 0.0f32;
    let mut kept = Vec::with_capacity(contour.len());

    for (frame, &time) in contour.iter().zip(timestamps) {
        elapsed += time - prev;
        prev = time;
        if elapsed > min_note_duration {
            kept.push(Observation {
                frequency: frame.frequency,
                time,
                elapsed,
            });
        }
    }

    log::debug!(
        "Segmenter: {}/{} observations past {:.2}s",
        kept.len(),
        contour.len(),
        min_note_duration
    );
    if let Some(first) = kept.first() {
        log::trace!("First observation at {:.3}s (elapsed {:.3}s)", first.time, first.elapsed);
    }

    if kept.len() < 2 {
        None
    } else {
        Some(kept)
    }
}

/// `n` evenly spaced points over `[start, stop]`, both ends included.
fn linspace(start: f32, stop: f32, n: usize) -> Vec<f32> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f32;
            let mut points: Vec<f32> = (0..n).map(|i| start + i as f32 * step).collect();
            points[n - 1] = stop;
            points
        }
    }
}
