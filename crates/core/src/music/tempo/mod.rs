// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

use crate::prelude::*;

pub type TempoBpmValue = f64;

const SECONDS_PER_MINUTE: f64 = 60.0;

#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct TempoBpm(TempoBpmValue);

impl TempoBpm {
    pub const UNIT_OF_MEASURE: &'static str = "bpm";

    pub const MIN: Self = Self(TempoBpmValue::MIN_POSITIVE);
    pub const MAX: Self = Self(TempoBpmValue::MAX);

    #[must_use]
    pub const fn new(value: TempoBpmValue) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> TempoBpmValue {
        let Self(value) = self;
        value
    }

    /// The tempo that places one beat per `interval`.
    #[must_use]
    pub fn from_beat_interval(interval: DurationInSeconds) -> Self {
        debug_assert!(interval > 0.0);
        Self(SECONDS_PER_MINUTE / interval)
    }

    /// The uniform tempo that places `beat_count` beat intervals
    /// between two positions.
    #[must_use]
    pub fn from_beat_count(beat_count: usize, duration: DurationInSeconds) -> Self {
        debug_assert!(beat_count > 0);
        debug_assert!(duration > 0.0);
        Self(beat_count as TempoBpmValue * SECONDS_PER_MINUTE / duration)
    }

    /// The time between two consecutive beats.
    #[must_use]
    pub fn beat_interval(self) -> DurationInSeconds {
        debug_assert!(self.is_valid());
        SECONDS_PER_MINUTE / self.value()
    }

    /// Rounds to 2 decimal places, i.e. the precision of labels.
    #[must_use]
    pub fn round_to_hundredths(self) -> Self {
        Self((self.value() * 100.0).round() / 100.0)
    }

    /// The tempo in hundredths of a beat per minute.
    ///
    /// Equal tempos at label precision share the same key.
    #[must_use]
    pub fn hundredths(self) -> i64 {
        (self.value() * 100.0).round() as i64
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        <Self as IsValid>::is_valid(self)
    }
}

#[derive(Copy, Clone, Debug)]
pub enum TempoBpmInvalidity {
    OutOfRange,
}

impl Validate for TempoBpm {
    type Invalidity = TempoBpmInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(
                !(*self >= Self::MIN && *self <= Self::MAX),
                Self::Invalidity::OutOfRange,
            )
            .into()
    }
}

/// Formats the plain value, e.g. "128" or "127.93".
///
/// This is the textual representation used for segment labels
/// and in the exchange format.
impl fmt::Display for TempoBpm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value().fmt(f)
    }
}
