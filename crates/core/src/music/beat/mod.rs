// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::prelude::*;

///////////////////////////////////////////////////////////////////////
// TimeSignature
///////////////////////////////////////////////////////////////////////

// For counting beats within a measure
pub type BeatNumber = u16;

pub type BeatsPerMeasure = BeatNumber;

#[must_use]
pub fn is_valid_beats_per_measure(beats_per_measure: BeatsPerMeasure) -> bool {
    beats_per_measure > 0
}

pub type BeatUnit = BeatNumber;

#[must_use]
pub fn is_valid_beat_unit(beat_unit: BeatUnit) -> bool {
    beat_unit > 0
}

/// Musical time signature, i.e. the meter
///
/// <https://en.wikipedia.org/wiki/Time_signature>
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    /// The number of beats in each measure or bar
    ///
    /// This number appears as the nominator/upper value in the stacked notation.
    pub beats_per_measure: BeatsPerMeasure,

    /// The note value that counts as one beat
    ///
    /// This number appears as the denominator/lower value in the stacked notation.
    ///
    /// Example: 4 for a quarter-note
    pub beat_unit: BeatUnit,
}

impl TimeSignature {
    pub const COMMON_TIME: Self = Self::new(4, 4);

    #[must_use]
    pub const fn new(beats_per_measure: BeatsPerMeasure, beat_unit: BeatUnit) -> Self {
        Self {
            beats_per_measure,
            beat_unit,
        }
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::COMMON_TIME
    }
}

#[derive(Copy, Clone, Debug)]
pub enum TimeSignatureInvalidity {
    BeatsPerMeasure,
    BeatUnit,
}

impl Validate for TimeSignature {
    type Invalidity = TimeSignatureInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(
                !is_valid_beats_per_measure(self.beats_per_measure),
                Self::Invalidity::BeatsPerMeasure,
            )
            .invalidate_if(
                !is_valid_beat_unit(self.beat_unit),
                Self::Invalidity::BeatUnit,
            )
            .into()
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.beats_per_measure, self.beat_unit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time signature \"{0}\"")]
pub struct ParseTimeSignatureError(String);

/// Parses the stacked notation "N/D".
impl FromStr for TimeSignature {
    type Err = ParseTimeSignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseTimeSignatureError(s.to_owned());
        let (beats_per_measure, beat_unit) = s.split_once('/').ok_or_else(invalid)?;
        let beats_per_measure = beats_per_measure.trim().parse().map_err(|_| invalid())?;
        let beat_unit = beat_unit.trim().parse().map_err(|_| invalid())?;
        let time_signature = Self::new(beats_per_measure, beat_unit);
        if !time_signature.is_valid() {
            return Err(invalid());
        }
        Ok(time_signature)
    }
}

///////////////////////////////////////////////////////////////////////
// BeatLabel
///////////////////////////////////////////////////////////////////////

/// Measure or bar number
///
/// Counting starts with +1 for the first measure. Measures before
/// the first measure are counted backwards starting with -1, i.e.
/// the measure number 0 never occurs.
/// ...
/// measure number -2
/// measure number -1
/// measure number +1
/// measure number +2
/// ...
pub type MeasureNumber = i32;

#[must_use]
pub fn is_valid_measure_number(measure_number: MeasureNumber) -> bool {
    measure_number != 0
}

#[must_use]
const fn next_measure_number(measure_number: MeasureNumber) -> MeasureNumber {
    if measure_number == -1 {
        1
    } else {
        measure_number + 1
    }
}

#[must_use]
const fn prev_measure_number(measure_number: MeasureNumber) -> MeasureNumber {
    if measure_number == 1 {
        -1
    } else {
        measure_number - 1
    }
}

/// Position of a beat in measures and beats, displayed as "bar.beat"
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BeatLabel {
    pub measure: MeasureNumber,

    /// The beat within the measure, starting at 1 for the downbeat.
    pub beat: BeatNumber,
}

impl BeatLabel {
    #[must_use]
    pub const fn new(measure: MeasureNumber, beat: BeatNumber) -> Self {
        Self { measure, beat }
    }

    #[must_use]
    pub const fn is_downbeat(self) -> bool {
        self.beat == 1
    }

    /// The label of the following beat.
    #[must_use]
    pub const fn next(self, beats_per_measure: BeatsPerMeasure) -> Self {
        let Self { measure, beat } = self;
        if beat >= beats_per_measure {
            Self::new(next_measure_number(measure), 1)
        } else {
            Self::new(measure, beat + 1)
        }
    }

    /// The label of the preceding beat.
    #[must_use]
    pub const fn prev(self, beats_per_measure: BeatsPerMeasure) -> Self {
        let Self { measure, beat } = self;
        if beat <= 1 {
            Self::new(prev_measure_number(measure), beats_per_measure)
        } else {
            Self::new(measure, beat - 1)
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub enum BeatLabelInvalidity {
    MeasureNumber,
    BeatNumber,
}

impl Validate for BeatLabel {
    type Invalidity = BeatLabelInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(
                !is_valid_measure_number(self.measure),
                Self::Invalidity::MeasureNumber,
            )
            .invalidate_if(self.beat == 0, Self::Invalidity::BeatNumber)
            .into()
    }
}

impl fmt::Display for BeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.measure, self.beat)
    }
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests;
