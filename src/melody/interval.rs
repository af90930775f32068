/// Semitone distances treated as familiar melodic leaps: major second, major
/// third, perfect fourth, perfect fifth, major sixth, major seventh, octave.
pub const HARMONIC_INTERVALS: [u32; 7] = [2, 4, 5, 7, 9, 11, 12];

pub const DEFAULT_INTERVAL_TOLERANCE: u32 = 2;

/// True if `distance` lies within `tolerance` semitones of any entry in
/// [`HARMONIC_INTERVALS`].
///
/// Tolerance windows overlap: at the default tolerance every distance from 0
/// through 14 matches something in the set.
pub fn is_harmonic_interval(distance: u32, tolerance: u32) -> bool {
    HARMONIC_INTERVALS
        .iter()
        .any(|&h| distance.abs_diff(h) <= tolerance)
}
