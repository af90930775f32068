mod audio;
mod cli;
mod config;
mod melody;
mod playback;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::io::IsTerminal;
use std::path::Path;

use cli::Cli;
use config::Config;
use melody::ClassifierParams;
use report::ClipReport;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let cfg = match config::find_config(cli.config.as_deref()) {
        Some(path) => match config::load_config(&path) {
            Ok(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            Err(err) => {
                log::warn!("{:#}", err);
                Config::default()
            }
        },
        None => Config::default(),
    };

    let mut params = cfg.classifier;
    cli.apply_overrides(&mut params);
    params.validate().context("Invalid classifier parameters")?;
    let play = cli.play || cfg.playback.enabled;

    log::info!(
        "Parameters: max_note_shifts={}, pitch_threshold={:.2}, min_note_duration={:.2}s, harmony_threshold={:.2}, interval_tolerance={}, timing={:?}",
        params.max_note_shifts,
        params.pitch_change_threshold,
        params.min_note_duration,
        params.harmony_ratio_threshold,
        params.interval_tolerance,
        params.timing
    );

    let pb = if cli.inputs.len() > 1 {
        let pb = ProgressBar::new(cli.inputs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files")
                .context("Invalid progress bar template")?
                .progress_chars("=>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    // Every file is classified independently; output keeps input order
    let outcomes: Vec<Result<ClipReport>> = cli
        .inputs
        .par_iter()
        .map(|path| {
            let outcome = analyze_file(path, &params);
            pb.inc(1);
            outcome
        })
        .collect();
    pb.finish_and_clear();

    let ansi = std::io::stdout().is_terminal();
    let mut failures = 0usize;

    for (path, outcome) in cli.inputs.iter().zip(outcomes) {
        match outcome {
            Ok(report) => {
                if cli.json {
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    println!("{}", report.render_text(ansi));
                }
                if play {
                    playback::play_detached(path);
                }
            }
            Err(err) => {
                failures += 1;
                eprintln!("Could not analyze {}: {:#}", path.display(), err);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} inputs could not be analyzed", failures, cli.inputs.len());
    }
    Ok(())
}

fn analyze_file(path: &Path, params: &ClassifierParams) -> Result<ClipReport> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let audio = audio::decode::decode_audio(path)?;
    let classification = melody::classify(&audio.samples, audio.sample_rate, params)
        .with_context(|| format!("Failed to classify {}", path.display()))?;

    log::info!(
        "{}: {:?} ({} shifts, ratio {:.2})",
        path.display(),
        classification.label,
        classification.diagnostics.note_shifts,
        classification.diagnostics.harmonic_ratio
    );

    Ok(ClipReport::new(path, audio.duration(), classification))
}
