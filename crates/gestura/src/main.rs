//! Command-line frontend.
//!
//! Usage:
//!   gestura replay <RECORDING> [--config <FILE>]   # Run the trackers on recorded landmarks
//!   gestura dataset <DATASET_ROOT> <OUTPUT_ROOT>   # Export face landmark CSV files
//!   gestura init-config <FILE>                     # Write the default configuration

use std::{collections::BTreeMap, fs, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use itertools::Itertools;

use gestura::config::Config;
use gestura::dataset::{self, RecordingFaceSource};
use gestura::pipeline::{Tracker, Trackers};
use gestura::replay::{Recording, ReplayBackend};
use gestura::timer::FpsCounter;

#[derive(Parser, Debug)]
#[command(name = "gestura")]
#[command(author, version, long_about = None)]
#[command(about = "Hand gesture and facial expression recognition")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the trackers on a JSON lines recording of landmark detections
    Replay {
        /// Recording file
        recording: PathBuf,

        /// Configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Enable a tracker regardless of the configuration (hand, body, face)
        #[arg(long)]
        enable: Vec<Tracker>,

        /// Disable a tracker regardless of the configuration (hand, body, face)
        #[arg(long)]
        disable: Vec<Tracker>,

        /// Directory to write the rendered overlay of every frame to
        #[arg(long)]
        overlay_dir: Option<PathBuf>,
    },

    /// Export face landmarks of every label directory in `<DATASET_ROOT>/train` to CSV
    ///
    /// The landmarks of each image `<name>.<ext>` are read from the recording `<name>.jsonl`
    /// next to it.
    Dataset {
        dataset_root: PathBuf,
        output_root: PathBuf,
    },

    /// Write the default configuration to a file
    InitConfig { path: PathBuf },
}

fn main() -> anyhow::Result<()> {
    gestura::init_logger!();

    let args = Args::parse();
    match args.command {
        Command::Replay {
            recording,
            config,
            enable,
            disable,
            overlay_dir,
        } => replay(recording, config, &enable, &disable, overlay_dir),
        Command::Dataset {
            dataset_root,
            output_root,
        } => {
            let mut source = RecordingFaceSource::new()?;
            let summaries =
                dataset::generate_for_all_labels(&mut source, &dataset_root, &output_root)?;
            for summary in summaries {
                println!(
                    "{}: {}/{} images -> {}",
                    summary.label,
                    summary.rows,
                    summary.images,
                    summary.output.display()
                );
            }
            Ok(())
        }
        Command::InitConfig { path } => Config::default().save(path),
    }
}

fn replay(
    recording: PathBuf,
    config: Option<PathBuf>,
    enable: &[Tracker],
    disable: &[Tracker],
    overlay_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = match config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let recording = Recording::load(recording)?;

    let backend = ReplayBackend::new();
    let mut trackers = Trackers::new(Arc::new(backend.clone()), &config)?;
    for tracker in enable {
        trackers.set_enabled(*tracker, true);
    }
    for tracker in disable {
        trackers.set_enabled(*tracker, false);
    }
    if let Some(dir) = &overlay_dir {
        fs::create_dir_all(dir).with_context(|| format!("failed to create '{}'", dir.display()))?;
    }

    let mut fps = FpsCounter::new("replay");
    let mut counts = BTreeMap::<&str, usize>::new();
    for (i, frame) in recording.frames().iter().enumerate() {
        let mut image = backend.advance(frame);
        let result = trackers
            .process_frame(&image)
            .with_context(|| format!("failed to process frame {i}"))?;

        let labels = result.recognized().collect::<Vec<_>>();
        if !labels.is_empty() {
            log::info!("frame {i}: {}", labels.iter().join(", "));
        }
        for label in labels {
            *counts.entry(label).or_default() += 1;
        }

        if let Some(dir) = &overlay_dir {
            result.overlay.render(&mut image);
            image.save(dir.join(format!("frame_{i:06}.png")))?;
        }
        fps.tick_with(trackers.timers());
    }
    trackers.stop();

    println!("{} frames", recording.len());
    for (label, count) in counts {
        println!("{label:<14} {count}");
    }
    Ok(())
}
