// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use thiserror::Error;

use crate::{
    audio::round_to_millis, grid::BEAT_POSITION_TOLERANCE_SECS, music::tempo::TempoBpm,
    prelude::*,
};

use super::{BeatRole, BeatTimeline, PointId, TempoSegment, UNLABELED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("point {0} not found")]
    PointNotFound(PointId),
}

/// Reason for refusing an edit, leaving the timeline unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    #[error("already a tempo marker")]
    AlreadyTempoMarker,

    #[error("not a tempo marker")]
    NotATempoMarker,

    /// The target position is not strictly between the neighboring
    /// tempo markers, or the bounds of the track.
    #[error("position must be between {min} and {max}")]
    OutOfBounds {
        min: PositionInSeconds,
        max: PositionInSeconds,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub enum EditOutcome {
    Applied,
    Rejected(Rejection),
}

impl EditOutcome {
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// A single editing operation, addressed by point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EditOperation {
    Promote(PointId),
    Demote(PointId),
    Drag {
        id: PointId,
        position: PositionInSeconds,
    },
    RecomputeSegments,
}

fn uniform_segment(
    start: PositionInSeconds,
    end: PositionInSeconds,
    beat_count: usize,
) -> TempoSegment {
    TempoSegment {
        start,
        end,
        bpm: Some(TempoBpm::from_beat_count(beat_count, end - start).round_to_hundredths()),
    }
}

impl BeatTimeline {
    pub fn apply(&mut self, operation: EditOperation) -> Result<EditOutcome, EditError> {
        match operation {
            EditOperation::Promote(id) => self.promote(id),
            EditOperation::Demote(id) => self.demote(id),
            EditOperation::Drag { id, position } => self.drag(id, position),
            EditOperation::RecomputeSegments => {
                self.recompute_segments();
                Ok(EditOutcome::Applied)
            }
        }
    }

    /// Turns an interpolated beat into a tempo marker.
    ///
    /// The segment that contains the point is split at its position.
    /// Both parts keep the tempo. Labels are not affected.
    pub fn promote(&mut self, id: PointId) -> Result<EditOutcome, EditError> {
        let index = self.point_index(id)?;
        let point = self.points[index];
        if point.is_editable() {
            return Ok(EditOutcome::Rejected(Rejection::AlreadyTempoMarker));
        }
        let time_signature = self
            .prev_marker_index(index)
            .map_or(self.time_signature, |index| {
                self.marker_time_signature(self.points[index].id)
            });
        self.points[index].role = BeatRole::TempoMarker;
        self.marker_time_signatures.insert(id, time_signature);
        self.split_segment_at(point.position);
        log::debug!(
            "Promoted beat {label} at {position} s to tempo marker",
            label = point.label,
            position = point.position,
        );
        self.debug_assert_valid();
        Ok(EditOutcome::Applied)
    }

    /// Turns a tempo marker into an interpolated beat.
    ///
    /// All beats between the neighboring tempo markers are spread evenly
    /// and the segments in between are merged into a single segment.
    pub fn demote(&mut self, id: PointId) -> Result<EditOutcome, EditError> {
        let index = self.point_index(id)?;
        let point = self.points[index];
        if !point.is_editable() {
            return Ok(EditOutcome::Rejected(Rejection::NotATempoMarker));
        }
        let (start, end) = self.marker_window(index);
        self.marker_time_signatures.remove(&id);
        if point.position <= start {
            // A first marker at 0 stays in place as an ordinary beat
            self.points[index].role = BeatRole::of_interpolated(point.label);
        }
        debug_assert!(point.position < end);
        let inner_count = self
            .points
            .iter()
            .filter(|point| start < point.position && point.position < end)
            .count();
        let beat_count = inner_count + 1;
        // No other tempo markers exist within the window
        self.points
            .retain(|point| !(start < point.position && point.position < end));
        self.regenerate_beats(start, end, beat_count);
        self.sort_points();
        let segment = uniform_segment(start, end, beat_count);
        self.replace_segments(start, end, [segment]);
        self.relabel();
        log::debug!(
            "Demoted tempo marker at {position} s and respaced {beat_count} beat(s) between \
             {start} s and {end} s",
            position = point.position,
        );
        self.debug_assert_valid();
        Ok(EditOutcome::Applied)
    }

    /// Moves a tempo marker and respaces the beats around it.
    ///
    /// The number of beats between the marker and its neighbors is
    /// preserved. Moving the first tempo marker also respaces all
    /// beats before it with the tempo after it.
    pub fn drag(
        &mut self,
        id: PointId,
        position: PositionInSeconds,
    ) -> Result<EditOutcome, EditError> {
        let index = self.point_index(id)?;
        if !self.points[index].is_editable() {
            return Ok(EditOutcome::Rejected(Rejection::NotATempoMarker));
        }
        let prev_index = self.prev_marker_index(index);
        let next_index = self.next_marker_index(index);
        let min = prev_index.map_or(0.0, |index| self.points[index].position);
        let max = next_index.map_or(self.duration, |index| self.points[index].position);
        let is_within_bounds = |position: PositionInSeconds| min < position && position < max;
        let rejected = Ok(EditOutcome::Rejected(Rejection::OutOfBounds { min, max }));
        if !is_within_bounds(position) {
            return rejected;
        }
        let position = round_to_millis(position);
        if !is_within_bounds(position) {
            return rejected;
        }
        let old_position = self.points[index].position;
        // Beat intervals on each side
        let left_count = prev_index.map(|prev_index| index - prev_index);
        let right_count = next_index.unwrap_or(self.points.len()) - index;
        self.points[index].position = position;
        // The first marker also owns all beats before it and the last
        // marker all beats after it
        let lower = prev_index.map(|_| min);
        let upper = next_index.map(|_| max);
        self.points.retain(|point| {
            point.is_editable()
                || !(lower.is_none_or(|lower| lower < point.position)
                    && upper.is_none_or(|upper| point.position < upper))
        });
        if let Some(left_count) = left_count {
            self.regenerate_beats(min, position, left_count);
            self.replace_segments(min, position, [uniform_segment(min, position, left_count)]);
        }
        self.regenerate_beats(position, max, right_count);
        let right_segment = uniform_segment(position, max, right_count);
        self.replace_segments(position, max, [right_segment]);
        if prev_index.is_none() {
            let interval = (max - position) / right_count as f64;
            self.backfill_beats(position, interval);
            self.replace_segments(
                0.0,
                position,
                [TempoSegment {
                    start: 0.0,
                    end: position,
                    bpm: right_segment.bpm,
                }],
            );
        }
        self.sort_points();
        self.relabel();
        log::debug!("Dragged tempo marker from {old_position} s to {position} s");
        self.debug_assert_valid();
        Ok(EditOutcome::Applied)
    }

    fn backfill_beats(&mut self, position: PositionInSeconds, interval: DurationInSeconds) {
        let label = self.first_label.unwrap_or(UNLABELED);
        for beat_offset in 1.. {
            let backfill_position = position - f64::from(beat_offset) * interval;
            if backfill_position < 0.0 {
                break;
            }
            let backfill_position = round_to_millis(backfill_position);
            if backfill_position < position {
                self.push_interpolated_point(backfill_position, label);
            }
        }
    }

    /// Derives all segments from the spacing of consecutive points.
    ///
    /// A new segment starts whenever a point deviates from its expected
    /// position by more than the tolerance. Labels are not affected.
    /// Nothing is changed if there are less than 2 points.
    pub fn recompute_segments(&mut self) {
        let [first, second, rest @ ..] = self.points.as_slice() else {
            log::debug!("Not enough points for recomputing segments");
            return;
        };
        let bpm_of = |interval: DurationInSeconds| {
            Some(TempoBpm::from_beat_interval(interval).round_to_hundredths())
        };
        let mut segments = Vec::new();
        let mut start = 0.0;
        let mut interval = second.position - first.position;
        let mut prev_position = second.position;
        for point in rest {
            let expected_position = prev_position + interval;
            if (expected_position - point.position).abs() > BEAT_POSITION_TOLERANCE_SECS {
                segments.push(TempoSegment {
                    start,
                    end: prev_position,
                    bpm: bpm_of(interval),
                });
                start = prev_position;
                interval = point.position - prev_position;
            }
            prev_position = point.position;
        }
        segments.push(TempoSegment {
            start,
            end: self.duration,
            bpm: bpm_of(interval),
        });
        log::debug!(
            "Recomputed {num_segments} segment(s) from {num_points} point(s)",
            num_segments = segments.len(),
            num_points = self.points.len(),
        );
        self.segments = segments;
        self.debug_assert_valid();
    }
}
