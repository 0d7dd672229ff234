// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

///////////////////////////////////////////////////////////////////////
// Position
///////////////////////////////////////////////////////////////////////

/// Offset from the start of a track in seconds.
pub type PositionInSeconds = f64;

/// Rounds a position to the nearest millisecond.
///
/// All positions that are produced by editing operations are rounded
/// like this before they are stored.
#[must_use]
pub fn round_to_millis(position: PositionInSeconds) -> PositionInSeconds {
    (position * 1000.0).round() / 1000.0
}

#[must_use]
pub fn is_valid_position(position: PositionInSeconds) -> bool {
    position.is_finite() && position >= 0.0
}

///////////////////////////////////////////////////////////////////////
// Duration
///////////////////////////////////////////////////////////////////////

pub type DurationInSeconds = f64;

#[must_use]
pub fn is_valid_duration(duration: DurationInSeconds) -> bool {
    duration.is_finite() && duration > 0.0
}
