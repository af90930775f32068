use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::melody::{Classification, Label};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Green,
    Red,
}

impl Color {
    fn ansi(self) -> &'static str {
        match self {
            Color::Green => "\x1b[1;32m",
            Color::Red => "\x1b[1;31m",
        }
    }
}

/// What gets shown for one analyzed file.
#[derive(Debug, Serialize)]
pub struct ClipReport {
    pub file: PathBuf,
    pub duration_secs: f32,
    pub headline: &'static str,
    pub color: Color,
    #[serde(flatten)]
    pub classification: Classification,
}

impl ClipReport {
    pub fn new(file: &Path, duration_secs: f32, classification: Classification) -> Self {
        Self {
            file: file.to_path_buf(),
            duration_secs,
            headline: headline(classification.label),
            color: if classification.is_melodic() { Color::Green } else { Color::Red },
            classification,
        }
    }

    /// Multi-line summary; `ansi` colours the headline.
    pub fn render_text(&self, ansi: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.file.display());
        if ansi {
            let _ = writeln!(out, "{}{}\x1b[0m", self.color.ansi(), self.headline);
        } else {
            let _ = writeln!(out, "{}", self.headline);
        }
        let _ = writeln!(out, "Audio duration: {:.2} seconds", self.duration_secs);

        // Unscored clips show no counters
        if self.classification.insufficient.is_none() {
            let d = &self.classification.diagnostics;
            let _ = writeln!(out, "Number of valid note shifts = {}", d.note_shifts);
            let _ = writeln!(out, "Number of harmonic changes = {}", d.harmonic_changes);
            let _ = writeln!(out, "Harmonic ratio = {:.2}", d.harmonic_ratio);
        }
        out
    }
}

pub fn headline(label: Label) -> &'static str {
    match label {
        Label::Melodic => "Melodic Sound ✅",
        Label::NonMelodic => "Non-melodic Sound ❌",
    }
}
