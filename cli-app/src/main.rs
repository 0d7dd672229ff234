// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use clap::{Args, Parser, Subcommand};
use directories::ProjectDirs;
use log::LevelFilter;

use beatgrid::{
    BeatTimeline, EditOperation, EditOutcome, PointId,
    desktop_app::{SaveTarget, Session, settings},
    prelude::*,
    rekordbox_xml::TrackPath,
};

/// Default log level for debug builds.
#[cfg(debug_assertions)]
const DEFAULT_LOG_FILTER_LEVEL: LevelFilter = LevelFilter::Info;

/// Reduce log verbosity for release builds.
#[cfg(not(debug_assertions))]
const DEFAULT_LOG_FILTER_LEVEL: LevelFilter = LevelFilter::Warn;

/// Maximum distance when addressing beats by position.
const POSITION_TOLERANCE_SECS: f64 = 0.005;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// The rekordbox XML collection file.
    ///
    /// Defaults to the file that has been loaded or written most recently.
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all tracks with their number of tempo markers.
    Tracks,

    /// Show the beat timeline of a track.
    Show {
        #[command(flatten)]
        track: TrackArgs,

        /// Print the timeline as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Edit the beat timeline of a track and save it.
    ///
    /// Beats are addressed by their position in seconds. Edits are
    /// applied in the order promote, drag, demote, recompute.
    Edit {
        #[command(flatten)]
        track: TrackArgs,

        /// Turn the beat at this position into a tempo marker.
        #[arg(long, value_name = "POSITION")]
        promote: Vec<f64>,

        /// Move the tempo marker at FROM to TO.
        #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
        drag: Vec<f64>,

        /// Turn the tempo marker at this position back into a beat.
        #[arg(long, value_name = "POSITION")]
        demote: Vec<f64>,

        /// Recompute segment tempos from the actual beat spacing.
        #[arg(long)]
        recompute: bool,

        /// Save into a new file instead of overwriting.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct TrackArgs {
    /// The file path of the track, as stored in the collection.
    #[arg(long)]
    track: PathBuf,

    /// The duration of the track in seconds.
    #[arg(long)]
    duration: f64,
}

impl TrackArgs {
    fn track_path(&self) -> anyhow::Result<TrackPath> {
        TrackPath::from_file_path(&self.track).with_context(|| {
            format!("invalid track path: {path}", path = self.track.display())
        })
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::new()
        .filter_level(DEFAULT_LOG_FILTER_LEVEL)
        // Parse environment variables after configuring all default option(s).
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_dir = app_config_dir();
    let mut settings = config_dir
        .as_deref()
        .map(settings::State::restore_from_parent_dir)
        .unwrap_or_default();
    let file = match cli.file {
        Some(file) => {
            settings.update_beatgrid_file(&file);
            file
        }
        None => {
            let Some(file) = settings.current_file() else {
                bail!("no beatgrid file specified");
            };
            file.to_path_buf()
        }
    };

    let session = Session::new();
    session.load_file(file).await?;

    match cli.command {
        Command::Tracks => {
            let state = session.read();
            let mut tracks = state.tracks().iter().collect::<Vec<_>>();
            tracks.sort_unstable_by_key(|(track, _)| *track);
            for (track, markers) in tracks {
                println!("{num_markers:>4}  {track}", num_markers = markers.len());
            }
        }
        Command::Show { track, json } => {
            let track_path = track.track_path()?;
            session.open_track(&track_path, track.duration)?;
            let state = session.read();
            let Some(timeline) = state.timeline(&track_path) else {
                bail!("track {track_path} has not been opened");
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&timeline.view())?);
            } else {
                print_timeline(timeline);
            }
        }
        Command::Edit {
            track,
            promote,
            drag,
            demote,
            recompute,
            output,
        } => {
            let track_path = track.track_path()?;
            session.open_track(&track_path, track.duration)?;
            for position in promote {
                let id = point_id_at(&session, &track_path, position)?;
                apply(&session, &track_path, EditOperation::Promote(id))?;
            }
            for positions in drag.chunks_exact(2) {
                let id = point_id_at(&session, &track_path, positions[0])?;
                let operation = EditOperation::Drag {
                    id,
                    position: positions[1],
                };
                apply(&session, &track_path, operation)?;
            }
            for position in demote {
                let id = point_id_at(&session, &track_path, position)?;
                apply(&session, &track_path, EditOperation::Demote(id))?;
            }
            if recompute {
                apply(&session, &track_path, EditOperation::RecomputeSegments)?;
            }
            let target = output.map_or(SaveTarget::Overwrite, SaveTarget::SaveAs);
            let written_file = session.save(&track_path, target).await?;
            println!("{}", written_file.display());
            settings.update_last_written_file(&written_file);
        }
    }

    if let Some(config_dir) = config_dir {
        settings.save_spawn_blocking(config_dir).await?;
    }
    Ok(())
}

fn point_id_at(
    session: &Session,
    track: &TrackPath,
    position: PositionInSeconds,
) -> anyhow::Result<PointId> {
    let state = session.read();
    let Some(point) = state
        .timeline(track)
        .and_then(|timeline| timeline.point_at(position, POSITION_TOLERANCE_SECS))
    else {
        bail!("no beat at {position} s");
    };
    Ok(point.id)
}

fn apply(session: &Session, track: &TrackPath, operation: EditOperation) -> anyhow::Result<()> {
    match session.edit(track, operation)? {
        EditOutcome::Applied => Ok(()),
        EditOutcome::Rejected(rejection) => bail!("{operation:?} rejected: {rejection}"),
    }
}

fn print_timeline(timeline: &BeatTimeline) {
    let view = timeline.view();
    for segment in &view.segments {
        println!(
            "{start:>9.3} - {end:>9.3}  {color}  {label}",
            start = segment.start,
            end = segment.end,
            color = segment.color,
            label = segment.label,
        );
    }
    println!();
    for point in view.points.iter().filter(|point| point.editable) {
        println!(
            "{position:>9.3}  {label}",
            position = point.position,
            label = point.label,
        );
    }
}

#[must_use]
const fn app_name() -> &'static str {
    env!("CARGO_PKG_NAME")
}

#[must_use]
fn app_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", app_name())
}

fn init_app_dir(app_dir: &Path) {
    if let Err(err) = std::fs::create_dir_all(app_dir) {
        log::error!(
            "Failed to create app directory '{dir}': {err}",
            dir = app_dir.display(),
        );
    } else {
        debug_assert!(app_dir.exists());
    }
}

#[must_use]
fn init_config_dir(app_dirs: &ProjectDirs) -> &Path {
    let app_config_dir = app_dirs.config_local_dir();
    init_app_dir(app_config_dir);
    app_config_dir
}

#[must_use]
fn app_config_dir() -> Option<PathBuf> {
    app_dirs()
        .as_ref()
        .map(init_config_dir)
        .map(Path::to_path_buf)
}
