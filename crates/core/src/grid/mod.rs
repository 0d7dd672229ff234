// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

use strum::IntoStaticStr;

use crate::{
    audio::is_valid_position,
    music::{
        beat::{BeatLabel, BeatNumber, TimeSignature, TimeSignatureInvalidity},
        tempo::{TempoBpm, TempoBpmInvalidity},
    },
    prelude::*,
};

pub mod timeline;
pub mod view;

/// Maximum deviation of a beat from its expected position.
pub const BEAT_POSITION_TOLERANCE_SECS: DurationInSeconds = 0.01;

///////////////////////////////////////////////////////////////////////
// TempoMarker
///////////////////////////////////////////////////////////////////////

/// An explicitly authored anchor of the beatgrid.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoMarker {
    pub position: PositionInSeconds,

    /// The tempo from this marker onwards.
    pub bpm: TempoBpm,

    pub time_signature: TimeSignature,

    /// The beat within the measure at `position`, starting at 1.
    pub beat: BeatNumber,
}

impl TempoMarker {
    /// Checks that consecutive beats are distinguishable.
    ///
    /// Beats that are closer than [`BEAT_POSITION_TOLERANCE_SECS`]
    /// could not be placed on the grid.
    #[must_use]
    pub fn has_resolvable_tempo(&self) -> bool {
        self.bpm.is_valid() && self.bpm.beat_interval() >= BEAT_POSITION_TOLERANCE_SECS
    }
}

#[derive(Copy, Clone, Debug)]
pub enum TempoMarkerInvalidity {
    Position,
    Bpm(TempoBpmInvalidity),
    BeatIntervalTooShort,
    TimeSignature(TimeSignatureInvalidity),
    BeatOutOfRange,
}

impl Validate for TempoMarker {
    type Invalidity = TempoMarkerInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(
                !is_valid_position(self.position),
                Self::Invalidity::Position,
            )
            .validate_with(&self.bpm, Self::Invalidity::Bpm)
            .invalidate_if(
                self.bpm.is_valid() && !self.has_resolvable_tempo(),
                Self::Invalidity::BeatIntervalTooShort,
            )
            .validate_with(&self.time_signature, Self::Invalidity::TimeSignature)
            .invalidate_if(
                self.beat < 1 || self.beat > self.time_signature.beats_per_measure,
                Self::Invalidity::BeatOutOfRange,
            )
            .into()
    }
}

///////////////////////////////////////////////////////////////////////
// BeatPoint
///////////////////////////////////////////////////////////////////////

#[derive(Copy, Clone, Debug, PartialEq, Eq, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "kebab-case")]
pub enum BeatRole {
    /// Anchor of the grid that could be moved or removed.
    TempoMarker,

    /// The first beat of a measure.
    Downbeat,

    OtherBeat,
}

impl BeatRole {
    /// The role of an interpolated beat.
    #[must_use]
    pub const fn of_interpolated(label: BeatLabel) -> Self {
        if label.is_downbeat() {
            Self::Downbeat
        } else {
            Self::OtherBeat
        }
    }
}

impl fmt::Display for BeatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.into())
    }
}

/// Handle of a beat point within a timeline.
///
/// Ids are allocated by the owning timeline and are never reused.
/// Interpolated points are replaced by new ones when a region of
/// the grid is regenerated, so handles need to be resolved again
/// after each edit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct PointId(u64);

impl PointId {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single beat tick, either a tempo marker or interpolated.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BeatPoint {
    pub id: PointId,
    pub position: PositionInSeconds,
    pub label: BeatLabel,
    pub role: BeatRole,
}

impl BeatPoint {
    /// Only tempo markers could be edited.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.role == BeatRole::TempoMarker
    }
}

///////////////////////////////////////////////////////////////////////
// TempoSegment
///////////////////////////////////////////////////////////////////////

/// A time range with a constant tempo.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TempoSegment {
    pub start: PositionInSeconds,
    pub end: PositionInSeconds,

    /// `None` if the tempo is unknown.
    pub bpm: Option<TempoBpm>,
}

impl TempoSegment {
    #[must_use]
    pub fn duration(&self) -> DurationInSeconds {
        self.end - self.start
    }

    /// Checks if the position falls into the half-open range `[start, end)`.
    #[must_use]
    pub fn contains(&self, position: PositionInSeconds) -> bool {
        self.start <= position && position < self.end
    }
}
