use crate::audio::pitch_track::{PitchTracker, SpectralPeakTracker};

use super::contour::extract_contour;
use super::error::ClassifyError;
use super::interval::is_harmonic_interval;
use super::note::pitch_to_note;
use super::params::ClassifierParams;
use super::segment::{segment, synthesize_timestamps, ClipClock};
use super::types::{Classification, Diagnostics, InsufficientSignal, Label};

/// Classifies a mono clip with the default spectral peak tracker.
pub fn classify(
    samples: &[f32],
    sample_rate: u32,
    params: &ClassifierParams,
) -> Result<Classification, ClassifyError> {
    classify_with(&SpectralPeakTracker::default(), samples, sample_rate, params)
}

/// Classifies a mono clip using `tracker` for frame-wise pitch candidates.
///
/// Running out of pitched material at any stage yields a non-melodic result
/// with zeroed diagnostics and the reason in `insufficient`. Bad input and
/// tracker failures are errors.
pub fn classify_with<T: PitchTracker + ?Sized>(
    tracker: &T,
    samples: &[f32],
    sample_rate: u32,
    params: &ClassifierParams,
) -> Result<Classification, ClassifyError> {
    if samples.is_empty() {
        return Err(ClassifyError::InvalidInput("audio buffer is empty".into()));
    }
    if sample_rate == 0 {
        return Err(ClassifyError::InvalidInput("sample rate must be positive".into()));
    }
    params.validate()?;

    let contour = extract_contour(tracker, samples, sample_rate, params.pitch_change_threshold)?;
    if contour.is_empty() {
        return Ok(Classification::insufficient(InsufficientSignal::NoPitchedFrames));
    }

    let clock = ClipClock {
        sample_count: samples.len(),
        sample_rate,
        hop_length: tracker.hop_length(),
    };
    let timestamps = synthesize_timestamps(&contour, params.timing, &clock);
    let Some(observations) = segment(&contour, &timestamps, params.min_note_duration) else {
        return Ok(Classification::insufficient(InsufficientSignal::TooFewObservations));
    };

    // Each note keeps the frequency it was quantized from
    let notes: Vec<(f32, i32)> = observations
        .iter()
        .filter_map(|o| pitch_to_note(o.frequency).map(|n| (o.frequency, n)))
        .collect();
    if notes.len() < 2 {
        return Ok(Classification::insufficient(InsufficientSignal::TooFewNotes));
    }

    let mut note_shifts = 0u32;
    let mut harmonic_changes = 0u32;
    for pair in notes.windows(2) {
        let (prev_freq, prev_note) = pair[0];
        let (freq, note) = pair[1];
        if (freq - prev_freq).abs() > params.pitch_change_threshold {
            note_shifts += 1;
            if is_harmonic_interval(note.abs_diff(prev_note), params.interval_tolerance) {
                harmonic_changes += 1;
            }
        }
    }

    let harmonic_ratio = if note_shifts > 0 {
        harmonic_changes as f32 / note_shifts as f32
    } else {
        0.0
    };

    let label = if note_shifts >= params.max_note_shifts
        && harmonic_ratio > params.harmony_ratio_threshold
    {
        Label::Melodic
    } else {
        Label::NonMelodic
    };

    log::debug!(
        "Classified {:?}: shifts={} harmonic={} ratio={:.3} (contour={}, observations={}, notes={})",
        label,
        note_shifts,
        harmonic_changes,
        harmonic_ratio,
        contour.len(),
        observations.len(),
        notes.len()
    );

    Ok(Classification {
        label,
        diagnostics: Diagnostics {
            note_shifts,
            harmonic_changes,
            harmonic_ratio,
            contour_frames: contour.len(),
            valid_observations: observations.len(),
            notes: notes.len(),
        },
        insufficient: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::pitch_track::PitchCandidate;
    use crate::melody::params::FrameTiming;
    use crate::melody::testing::{tone_sequence, transpose, ScriptedTracker};

    const SR: u32 = 22050;

    /// One second of (ignored) audio, so frame times are `i / (frames - 1)`.
    fn one_second() -> Vec<f32> {
        vec![0.0; SR as usize]
    }

    fn alternating(a: f32, b: f32, frames: usize) -> Vec<f32> {
        (0..frames).map(|i| if i % 2 == 0 { a } else { b }).collect()
    }

    fn params() -> ClassifierParams {
        ClassifierParams {
            harmony_ratio_threshold: 0.5,
            // Between frame 10 (0.25s) and frame 11 (0.275s) of a 41-frame contour
            min_note_duration: 0.2625,
            ..Default::default()
        }
    }

    fn run(freqs: &[f32], params: &ClassifierParams) -> Classification {
        classify_with(&ScriptedTracker::from_frequencies(freqs), &one_second(), SR, params).unwrap()
    }

    #[test]
    fn alternating_fifths_are_melodic() {
        let result = run(&alternating(440.0, transpose(440.0, 7), 41), &params());
        assert_eq!(result.label, Label::Melodic);
        assert_eq!(result.insufficient, None);
        assert_eq!(result.diagnostics.valid_observations, 30);
        assert_eq!(result.diagnostics.note_shifts, 29);
        assert_eq!(result.diagnostics.harmonic_changes, 29);
        assert_eq!(result.diagnostics.harmonic_ratio, 1.0);
    }

    #[test]
    fn wide_leaps_are_not_harmonic() {
        let result = run(&alternating(200.0, transpose(200.0, 17), 41), &params());
        assert_eq!(result.label, Label::NonMelodic);
        assert_eq!(result.diagnostics.note_shifts, 29);
        assert_eq!(result.diagnostics.harmonic_changes, 0);
        assert_eq!(result.diagnostics.harmonic_ratio, 0.0);
    }

    #[test]
    fn semitone_steps_depend_on_tolerance() {
        let rising: Vec<f32> = (0..41).map(|k| transpose(500.0, k)).collect();

        let strict = ClassifierParams {
            interval_tolerance: 0,
            ..params()
        };
        let result = run(&rising, &strict);
        assert_eq!(result.label, Label::NonMelodic);
        assert_eq!(result.diagnostics.note_shifts, 29);
        assert_eq!(result.diagnostics.harmonic_ratio, 0.0);

        // One semitone is within the default tolerance of a major second
        let result = run(&rising, &params());
        assert_eq!(result.label, Label::Melodic);
        assert_eq!(result.diagnostics.harmonic_ratio, 1.0);
    }

    #[test]
    fn small_wobble_is_not_a_shift() {
        let result = run(&alternating(440.0, 450.0, 41), &params());
        assert_eq!(result.label, Label::NonMelodic);
        assert_eq!(result.insufficient, None);
        assert_eq!(result.diagnostics.note_shifts, 0);
        assert_eq!(result.diagnostics.harmonic_ratio, 0.0);
    }

    #[test]
    fn too_few_shifts_is_not_melodic() {
        let result = run(&alternating(440.0, transpose(440.0, 7), 41), &ClassifierParams {
            max_note_shifts: 30,
            ..params()
        });
        assert_eq!(result.label, Label::NonMelodic);
        assert_eq!(result.diagnostics.harmonic_ratio, 1.0);
    }

    #[test]
    fn shift_count_equal_to_minimum_is_enough() {
        let result = run(&alternating(440.0, transpose(440.0, 7), 41), &ClassifierParams {
            max_note_shifts: 29,
            ..params()
        });
        assert_eq!(result.label, Label::Melodic);
    }

    #[test]
    fn ratio_must_exceed_threshold() {
        // Fifth, then two wide leaps, repeating: about a third of the shifts are harmonic
        let pattern = [300.0, transpose(300.0, 7), transpose(300.0, 24)];
        let freqs: Vec<f32> = (0..41).map(|i| pattern[i % 3]).collect();
        let result = run(&freqs, &params());
        let ratio = result.diagnostics.harmonic_ratio;
        assert!(ratio > 0.3 && ratio < 0.4, "{ratio}");

        let at = ClassifierParams {
            harmony_ratio_threshold: ratio,
            ..params()
        };
        assert_eq!(run(&freqs, &at).label, Label::NonMelodic);
    }

    #[test]
    fn fewer_than_two_observations_is_never_melodic() {
        let lenient = [
            ClassifierParams {
                max_note_shifts: 0,
                pitch_change_threshold: 0.0,
                min_note_duration: 0.0,
                harmony_ratio_threshold: 0.0,
                ..Default::default()
            },
            ClassifierParams::default(),
        ];
        for p in &lenient {
            let result = run(&[440.0], p);
            assert_eq!(result.label, Label::NonMelodic);
            assert_eq!(result.insufficient, Some(InsufficientSignal::TooFewObservations));
            assert_eq!(result.diagnostics, Diagnostics::default());
        }
    }

    #[test]
    fn long_min_duration_gates_everything() {
        let result = run(&alternating(440.0, transpose(440.0, 7), 41), &ClassifierParams {
            min_note_duration: 2.0,
            ..params()
        });
        assert_eq!(result.insufficient, Some(InsufficientSignal::TooFewObservations));
    }

    #[test]
    fn unquantizable_frequencies_are_dropped() {
        let mut freqs = vec![f32::INFINITY; 41];
        freqs[40] = 440.0;
        let result = run(&freqs, &params());
        assert_eq!(result.label, Label::NonMelodic);
        assert_eq!(result.insufficient, Some(InsufficientSignal::TooFewNotes));
    }

    #[test]
    fn empty_contour_short_circuits() {
        let tracker = ScriptedTracker::new(vec![vec![]; 20]);
        let result = classify_with(&tracker, &one_second(), SR, &params()).unwrap();
        assert_eq!(result.insufficient, Some(InsufficientSignal::NoPitchedFrames));
        assert_eq!(result.diagnostics.note_shifts, 0);
    }

    #[test]
    fn quiet_candidates_do_not_count() {
        let frames = vec![vec![PitchCandidate { frequency: 440.0, magnitude: 10.0 }]; 41];
        let result = classify_with(&ScriptedTracker::new(frames), &one_second(), SR, &params()).unwrap();
        assert_eq!(result.insufficient, Some(InsufficientSignal::NoPitchedFrames));
    }

    #[test]
    fn hop_aligned_timing_uses_frame_positions() {
        // Frames 0..=40 at 512/22050 s each: only frames past 0.2625s (index 12+) survive
        let freqs = alternating(440.0, transpose(440.0, 7), 41);
        let hop = ClassifierParams {
            timing: FrameTiming::HopAligned,
            ..params()
        };
        let result = run(&freqs, &hop);
        assert_eq!(result.diagnostics.valid_observations, 41 - 12);
        assert_eq!(result.label, Label::Melodic);
    }

    #[test]
    fn raising_thresholds_never_makes_melodic() {
        let pattern = [300.0, transpose(300.0, 7), transpose(300.0, 24), transpose(300.0, 12)];
        let freqs: Vec<f32> = (0..41).map(|i| pattern[i % 4]).collect();

        let mut seen_non_melodic = false;
        for step in 0..=20 {
            let p = ClassifierParams {
                harmony_ratio_threshold: step as f32 / 20.0,
                ..params()
            };
            let melodic = run(&freqs, &p).is_melodic();
            assert!(!(seen_non_melodic && melodic), "flipped at ratio step {step}");
            seen_non_melodic |= !melodic;
        }
        assert!(seen_non_melodic);

        let mut seen_non_melodic = false;
        for shifts in 0..=40 {
            let p = ClassifierParams {
                max_note_shifts: shifts,
                ..params()
            };
            let melodic = run(&freqs, &p).is_melodic();
            assert!(!(seen_non_melodic && melodic), "flipped at {shifts} shifts");
            seen_non_melodic |= !melodic;
        }
        assert!(seen_non_melodic);
    }

    #[test]
    fn harmonic_ratio_stays_in_unit_range() {
        let clips = [
            alternating(440.0, transpose(440.0, 7), 41),
            alternating(200.0, transpose(200.0, 17), 41),
            (0..41).map(|i| 150.0 + 37.0 * (i % 7) as f32).collect(),
        ];
        for freqs in &clips {
            let d = run(freqs, &params()).diagnostics;
            assert!((0.0..=1.0).contains(&d.harmonic_ratio));
            assert!(d.harmonic_changes <= d.note_shifts);
            if d.note_shifts == 0 {
                assert_eq!(d.harmonic_ratio, 0.0);
            }
        }
    }

    #[test]
    fn rejects_invalid_input() {
        let tracker = ScriptedTracker::from_frequencies(&[440.0]);
        let err = classify_with(&tracker, &[], SR, &params()).unwrap_err();
        assert!(matches!(err, ClassifyError::InvalidInput(_)));

        let err = classify_with(&tracker, &one_second(), 0, &params()).unwrap_err();
        assert!(matches!(err, ClassifyError::InvalidInput(_)));

        let negative = ClassifierParams {
            pitch_change_threshold: -5.0,
            ..params()
        };
        let err = classify_with(&tracker, &one_second(), SR, &negative).unwrap_err();
        assert!(matches!(err, ClassifyError::InvalidInput(_)));
    }

    #[test]
    fn tracker_failure_is_an_error() {
        let err = classify_with(&ScriptedTracker::failing(), &one_second(), SR, &params()).unwrap_err();
        assert!(matches!(err, ClassifyError::Extraction(_)));
    }

    #[test]
    fn silence_is_non_melodic() {
        let result = classify(&one_second(), SR, &ClassifierParams::default()).unwrap();
        assert_eq!(result.label, Label::NonMelodic);
        assert_eq!(result.diagnostics.note_shifts, 0);
        assert_eq!(result.insufficient, Some(InsufficientSignal::NoPitchedFrames));
    }

    #[test]
    fn non_finite_audio_is_an_extraction_error() {
        let mut samples = one_second();
        samples[100] = f32::INFINITY;
        let err = classify(&samples, SR, &ClassifierParams::default()).unwrap_err();
        assert!(matches!(err, ClassifyError::Extraction(_)));
    }

    #[test]
    fn synthesized_fifths_are_melodic() {
        let fifth = transpose(440.0, 7);
        let freqs: Vec<f32> = (0..20).map(|i| if i % 2 == 0 { 440.0 } else { fifth }).collect();
        let samples = tone_sequence(&freqs, SR, 0.2);

        let result = classify(&samples, SR, &ClassifierParams::default()).unwrap();
        assert_eq!(result.label, Label::Melodic, "{:?}", result.diagnostics);
        assert!(result.diagnostics.note_shifts >= 10);
        assert_eq!(result.diagnostics.harmonic_ratio, 1.0);
    }

    #[test]
    fn synthesized_wide_leaps_are_not_melodic() {
        let high = transpose(200.0, 17);
        let freqs: Vec<f32> = (0..20).map(|i| if i % 2 == 0 { 200.0 } else { high }).collect();
        let samples = tone_sequence(&freqs, SR, 0.2);

        let result = classify(&samples, SR, &ClassifierParams::default()).unwrap();
        assert_eq!(result.label, Label::NonMelodic);
        assert!(result.diagnostics.note_shifts >= 10, "{:?}", result.diagnostics);
        assert!(result.diagnostics.harmonic_ratio < 0.5);
    }

    #[test]
    fn repeated_calls_agree() {
        let freqs = [330.0, 440.0, 495.0, 660.0, 440.0, 330.0];
        let samples = tone_sequence(&freqs, SR, 0.3);
        let params = ClassifierParams::default();
        let first = classify(&samples, SR, &params).unwrap();
        let second = classify(&samples, SR, &params).unwrap();
        assert_eq!(first, second);
    }
}
