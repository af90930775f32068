use clap::Parser;
use std::path::PathBuf;

use crate::melody::{ClassifierParams, FrameTiming};

/// Flags left unset fall back to the config file, then to built-in defaults.
#[derive(Parser, Debug)]
#[command(name = "melodica", about = "Classify audio clips as melodic or non-melodic")]
pub struct Cli {
    /// Audio files to analyze (WAV, MP3, FLAC, OGG, AAC)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Minimum number of note shifts for a melodic verdict [default: 10]
    #[arg(long)]
    pub max_note_shifts: Option<u32>,

    /// Pitch threshold in Hz; also gates tracker magnitude [default: 25]
    #[arg(long)]
    pub pitch_threshold: Option<f32>,

    /// Ignore pitches within this many seconds of the start [default: 0.25]
    #[arg(long)]
    pub min_note_duration: Option<f32>,

    /// Harmonic ratio that must be exceeded (0.0-1.0) [default: 0.5]
    #[arg(long)]
    pub harmony_threshold: Option<f32>,

    /// Semitones of slack when matching harmonic intervals [default: 2]
    #[arg(long)]
    pub interval_tolerance: Option<u32>,

    /// Time frames by hop position instead of spreading them over the clip
    #[arg(long)]
    pub hop_timing: bool,

    /// Open each analyzed file with the system player
    #[arg(long)]
    pub play: bool,

    /// Print one JSON object per input
    #[arg(long)]
    pub json: bool,

    /// Config file (default: ./melodica.toml or ~/.config/melodica/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn apply_overrides(&self, params: &mut ClassifierParams) {
        if let Some(v) = self.max_note_shifts {
            params.max_note_shifts = v;
        }
        if let Some(v) = self.pitch_threshold {
            params.pitch_change_threshold = v;
        }
        if let Some(v) = self.min_note_duration {
            params.min_note_duration = v;
        }
        if let Some(v) = self.harmony_threshold {
            params.harmony_ratio_threshold = v;
        }
        if let Some(v) = self.interval_tolerance {
            params.interval_tolerance = v;
        }
        if self.hop_timing {
            params.timing = FrameTiming::HopAligned;
        }
    }
}
