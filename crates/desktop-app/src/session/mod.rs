// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::{Path, PathBuf};

use discro::Subscriber;

use beatgrid_core::{BeatTimeline, EditOperation, EditOutcome, TempoMarker, prelude::*};
use beatgrid_rekordbox_xml::{
    DecodedTracks, TrackPath, encode_merged,
    io::{decode_file, read_file, write_file},
};

use crate::{BeatgridStore, Error, Observable, ObservableRef, Result};

pub const BEATGRID_FILE_EXTENSION: &str = "xml";

#[derive(Debug, Default)]
pub struct State {
    source_file: Option<PathBuf>,
    last_written_file: Option<PathBuf>,
    tracks: DecodedTracks,
    store: BeatgridStore,
}

impl State {
    /// The collection file that has been loaded.
    #[must_use]
    pub fn source_file(&self) -> Option<&Path> {
        self.source_file.as_deref()
    }

    /// The file that has been written most recently.
    #[must_use]
    pub fn last_written_file(&self) -> Option<&Path> {
        self.last_written_file.as_deref()
    }

    /// The file that is merged and overwritten on save.
    #[must_use]
    pub fn current_file(&self) -> Option<&Path> {
        self.last_written_file().or_else(|| self.source_file())
    }

    /// Tempo markers of all tracks as last loaded or saved.
    #[must_use]
    pub fn tracks(&self) -> &DecodedTracks {
        &self.tracks
    }

    #[must_use]
    pub fn store(&self) -> &BeatgridStore {
        &self.store
    }

    #[must_use]
    pub fn timeline(&self, track: &TrackPath) -> Option<&BeatTimeline> {
        self.store.get(track)
    }

    fn reset_file(&mut self, source_file: PathBuf, tracks: DecodedTracks) {
        let mut store = BeatgridStore::new();
        for (track, timeline) in self.store.iter() {
            let Some(markers) = tracks.get(track) else {
                log::info!(
                    "Closing track {track} that is missing in file {path}",
                    path = source_file.display()
                );
                continue;
            };
            if let Err(err) = store.load(track.clone(), markers, timeline.duration()) {
                log::warn!("Closing track {track}: {err}");
            }
        }
        self.source_file = Some(source_file);
        self.last_written_file = None;
        self.tracks = tracks;
        self.store = store;
    }
}

/// Where to write the merged collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    /// The current file, i.e. the file that has been written
    /// most recently or the source file otherwise.
    Overwrite,

    /// A new file. The extension is replaced by `.xml`.
    SaveAs(PathBuf),
}

/// Editing session of a single collection file.
///
/// All modifications are published to subscribers. Failed
/// operations leave the state unmodified.
#[derive(Debug, Default)]
pub struct Session {
    state: Observable<State>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Default::default()
    }

    #[must_use]
    pub fn read(&self) -> ObservableRef<'_, State> {
        self.state.read()
    }

    #[must_use]
    pub fn subscribe_changed(&self) -> Subscriber<State> {
        self.state.subscribe_changed()
    }

    /// Loads a collection file.
    ///
    /// Opened tracks are rebuilt from the new file with their
    /// current duration and closed if they are missing.
    pub async fn load_file(&self, path: PathBuf) -> Result<usize> {
        let (path, tracks) = tokio::task::spawn_blocking(move || {
            decode_file(&path).map(|tracks| (path, tracks))
        })
        .await??;
        let num_tracks = tracks.len();
        log::info!(
            "Loaded {num_tracks} track(s) from file {path}",
            path = path.display()
        );
        self.state.modify(|state| {
            state.reset_file(path, tracks);
            true
        });
        Ok(num_tracks)
    }

    /// Builds the timeline of a track from its loaded markers.
    pub fn open_track(&self, track: &TrackPath, duration: DurationInSeconds) -> Result<()> {
        let timeline = {
            let state = self.state.read();
            if state.source_file.is_none() {
                return Err(Error::NoBeatgridFile);
            }
            let Some(markers) = state.tracks.get(track) else {
                return Err(Error::TrackNotFound(track.clone()));
            };
            BeatTimeline::build(markers, duration)?
        };
        self.state.modify(|state| {
            state.store.commit(track.clone(), timeline);
            true
        });
        Ok(())
    }

    pub fn close_track(&self, track: &TrackPath) -> bool {
        self.state.modify(|state| state.store.remove(track).is_some())
    }

    /// Applies an edit operation to the timeline of an opened track.
    ///
    /// Only applied edits modify the state.
    pub fn edit(&self, track: &TrackPath, operation: EditOperation) -> Result<EditOutcome> {
        let mut timeline = {
            let state = self.state.read();
            let Some(timeline) = state.store.get(track) else {
                return Err(Error::TrackNotFound(track.clone()));
            };
            timeline.clone()
        };
        let outcome = timeline.apply(operation)?;
        match outcome {
            EditOutcome::Applied => {
                log::debug!("Applied {operation:?} on track {track}");
                self.state.modify(|state| {
                    state.store.commit(track.clone(), timeline);
                    true
                });
            }
            EditOutcome::Rejected(rejection) => {
                log::info!("Rejected {operation:?} on track {track}: {rejection}");
            }
        }
        Ok(outcome)
    }

    /// Merges the tempo markers of an opened track into the current
    /// file and writes the result.
    ///
    /// Returns the path of the written file.
    pub async fn save(&self, track: &TrackPath, target: SaveTarget) -> Result<PathBuf> {
        let (markers, current_file) = {
            let state = self.state.read();
            let Some(timeline) = state.store.get(track) else {
                return Err(Error::TrackNotFound(track.clone()));
            };
            let Some(current_file) = state.current_file() else {
                return Err(Error::NoBeatgridFile);
            };
            (timeline.tempo_markers(), current_file.to_path_buf())
        };
        let target_file = match target {
            SaveTarget::Overwrite => current_file.clone(),
            SaveTarget::SaveAs(path) => path.with_extension(BEATGRID_FILE_EXTENSION),
        };
        let written_file = {
            let track = track.clone();
            let markers = markers.clone();
            tokio::task::spawn_blocking(move || {
                merge_into_file(&current_file, &target_file, &track, &markers)
                    .map(|()| target_file)
            })
            .await??
        };
        self.state.modify(|state| {
            state.last_written_file = Some(written_file.clone());
            state.tracks.insert(track.clone(), markers);
            true
        });
        Ok(written_file)
    }
}

fn merge_into_file(
    source_file: &Path,
    target_file: &Path,
    track: &TrackPath,
    markers: &[TempoMarker],
) -> beatgrid_rekordbox_xml::Result<()> {
    let original = read_file(source_file)?;
    let merged = encode_merged(&original, track, markers)?;
    write_file(target_file, &merged)
}

#[cfg(test)]
mod tests;
