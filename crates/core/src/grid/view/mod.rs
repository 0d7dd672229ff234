// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Presentation of a timeline for rendering.
//!
//! Plain data without behavior. Renderers must not modify the
//! timeline directly but issue edits by [`PointId`].

use crate::{
    prelude::*,
    util::color::{
        DOWNBEAT_COLOR, OTHER_BEAT_COLOR, RgbColor, TEMPO_MARKER_COLOR, UNKNOWN_TEMPO_COLOR,
        tempo_color,
    },
};

use super::{BeatPoint, BeatRole, PointId, TempoSegment, timeline::BeatTimeline};

/// Label of segments with an unknown tempo.
pub const UNKNOWN_TEMPO_LABEL: &str = "N/A";

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointView {
    pub id: PointId,
    pub position: PositionInSeconds,

    /// "bar.beat"
    pub label: String,

    pub color: RgbColor,

    /// Only tempo markers could be dragged or demoted.
    pub editable: bool,
}

impl From<&BeatPoint> for PointView {
    fn from(from: &BeatPoint) -> Self {
        let color = match from.role {
            BeatRole::TempoMarker => TEMPO_MARKER_COLOR,
            BeatRole::Downbeat => DOWNBEAT_COLOR,
            BeatRole::OtherBeat => OTHER_BEAT_COLOR,
        };
        Self {
            id: from.id,
            position: from.position,
            label: from.label.to_string(),
            color,
            editable: from.is_editable(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentView {
    pub start: PositionInSeconds,
    pub end: PositionInSeconds,

    /// The tempo in bpm or "N/A" if unknown.
    pub label: String,

    pub color: RgbColor,
}

impl From<&TempoSegment> for SegmentView {
    fn from(from: &TempoSegment) -> Self {
        let (label, color) = from.bpm.map_or_else(
            || (UNKNOWN_TEMPO_LABEL.to_owned(), UNKNOWN_TEMPO_COLOR),
            |bpm| (bpm.to_string(), tempo_color(bpm)),
        );
        Self {
            start: from.start,
            end: from.end,
            label,
            color,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimelineView {
    pub duration: DurationInSeconds,
    pub points: Vec<PointView>,
    pub segments: Vec<SegmentView>,
}

impl BeatTimeline {
    #[must_use]
    pub fn view(&self) -> TimelineView {
        TimelineView {
            duration: self.duration(),
            points: self.points().iter().map(Into::into).collect(),
            segments: self.segments().iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests;
