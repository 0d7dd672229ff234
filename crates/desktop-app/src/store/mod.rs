// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    collections::{HashMap, hash_map::Entry},
    result::Result as StdResult,
};

use beatgrid_core::{BeatTimeline, BuildError, TempoMarker, prelude::*};
use beatgrid_rekordbox_xml::TrackPath;

use crate::{Error, Result};

/// Beat timelines of all opened tracks, keyed by track.
///
/// At most one timeline exists per track. Loading a track again
/// replaces its timeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeatgridStore {
    timelines: HashMap<TrackPath, BeatTimeline>,
}

impl BeatgridStore {
    #[must_use]
    pub fn new() -> Self {
        Default::default()
    }

    /// Builds and stores the timeline of a track.
    ///
    /// A previously stored timeline is only replaced if building
    /// the new one succeeds.
    pub fn load(
        &mut self,
        track: TrackPath,
        markers: &[TempoMarker],
        duration: DurationInSeconds,
    ) -> StdResult<&mut BeatTimeline, BuildError> {
        let timeline = BeatTimeline::build(markers, duration)?;
        log::debug!(
            "Loaded beat timeline of track {track} with {num_points} point(s)",
            num_points = timeline.points().len()
        );
        let timeline = match self.timelines.entry(track) {
            Entry::Occupied(mut entry) => {
                entry.insert(timeline);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(timeline),
        };
        Ok(timeline)
    }

    #[must_use]
    pub fn get(&self, track: &TrackPath) -> Option<&BeatTimeline> {
        self.timelines.get(track)
    }

    #[must_use]
    pub fn get_mut(&mut self, track: &TrackPath) -> Option<&mut BeatTimeline> {
        self.timelines.get_mut(track)
    }

    /// Rebuilds the timeline of an opened track from new markers.
    ///
    /// The duration of the existing timeline is kept.
    pub fn replace(
        &mut self,
        track: &TrackPath,
        markers: &[TempoMarker],
    ) -> Result<&mut BeatTimeline> {
        let Some(timeline) = self.timelines.get_mut(track) else {
            return Err(Error::TrackNotFound(track.clone()));
        };
        *timeline = BeatTimeline::build(markers, timeline.duration())?;
        Ok(timeline)
    }

    /// Stores an already built timeline, e.g. after editing a copy.
    pub fn commit(&mut self, track: TrackPath, timeline: BeatTimeline) -> Option<BeatTimeline> {
        self.timelines.insert(track, timeline)
    }

    pub fn remove(&mut self, track: &TrackPath) -> Option<BeatTimeline> {
        self.timelines.remove(track)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    pub fn tracks(&self) -> impl Iterator<Item = &TrackPath> {
        self.timelines.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TrackPath, &BeatTimeline)> {
        self.timelines.iter()
    }
}

#[cfg(test)]
mod tests;
