/// Reference pitch for semitone numbering (A4).
pub const REFERENCE_HZ: f32 = 440.0;
/// Semitone index of the reference pitch.
pub const REFERENCE_NOTE: i32 = 69;

/// Nearest equal-tempered semitone index for a frequency.
///
/// Returns `None` for non-positive (or non-finite) frequencies. The result is
/// not clamped to the MIDI range, so very low or very high inputs yield
/// negative or large indices.
pub fn pitch_to_note(frequency: f32) -> Option<i32> {
    if frequency <= 0.0 || !frequency.is_finite() {
        return None;
    }
    let semitones = 12.0 * (frequency / REFERENCE_HZ).log2();
    Some(REFERENCE_NOTE + semitones.round() as i32)
}
