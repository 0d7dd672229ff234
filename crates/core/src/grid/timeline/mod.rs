// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The beat timeline of a single track.
//!
//! Points are kept sorted by position. Segments are kept sorted by
//! their start and partition the range `[0, duration]` without gaps
//! or overlaps. Both invariants are re-checked in debug builds after
//! every mutation.

use std::collections::BTreeMap;

use crate::{
    audio::round_to_millis,
    music::beat::{BeatLabel, TimeSignature},
    prelude::*,
};

use super::{BeatPoint, BeatRole, PointId, TempoMarker, TempoSegment};

/// Temporary label of new points until relabeling.
const UNLABELED: BeatLabel = BeatLabel::new(1, 1);

mod build;
pub use self::build::BuildError;

mod edit;
pub use self::edit::{EditError, EditOperation, EditOutcome, Rejection};

#[derive(Debug, Clone, PartialEq)]
pub struct BeatTimeline {
    duration: DurationInSeconds,

    /// The meter for counting beats when relabeling.
    time_signature: TimeSignature,

    /// The label of the first point, captured when building.
    first_label: Option<BeatLabel>,

    points: Vec<BeatPoint>,

    segments: Vec<TempoSegment>,

    /// The meter of each tempo marker.
    marker_time_signatures: BTreeMap<PointId, TimeSignature>,

    next_point_id: u64,
}

impl BeatTimeline {
    fn empty(duration: DurationInSeconds, time_signature: TimeSignature) -> Self {
        Self {
            duration,
            time_signature,
            first_label: None,
            points: Vec::new(),
            segments: Vec::new(),
            marker_time_signatures: BTreeMap::new(),
            next_point_id: 0,
        }
    }

    #[must_use]
    pub fn duration(&self) -> DurationInSeconds {
        self.duration
    }

    #[must_use]
    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    #[must_use]
    pub fn first_label(&self) -> Option<BeatLabel> {
        self.first_label
    }

    /// All points, ordered by position.
    #[must_use]
    pub fn points(&self) -> &[BeatPoint] {
        &self.points
    }

    /// All segments, ordered by start.
    #[must_use]
    pub fn segments(&self) -> &[TempoSegment] {
        &self.segments
    }

    /// The points that are tempo markers, ordered by position.
    pub fn tempo_marker_points(&self) -> impl Iterator<Item = &BeatPoint> + '_ {
        self.points.iter().filter(|point| point.is_editable())
    }

    #[must_use]
    pub fn point(&self, id: PointId) -> Option<&BeatPoint> {
        self.points.iter().find(|point| point.id == id)
    }

    /// Resolves the point that is closest to `position`.
    ///
    /// Returns `None` if no point lies within `tolerance`.
    #[must_use]
    pub fn point_at(
        &self,
        position: PositionInSeconds,
        tolerance: DurationInSeconds,
    ) -> Option<&BeatPoint> {
        let closest = match self
            .points
            .binary_search_by(|point| point.position.total_cmp(&position))
        {
            Ok(index) => return self.points.get(index),
            Err(index) => {
                let before = index.checked_sub(1).and_then(|index| self.points.get(index));
                let after = self.points.get(index);
                match (before, after) {
                    (Some(before), Some(after)) => {
                        if position - before.position <= after.position - position {
                            before
                        } else {
                            after
                        }
                    }
                    (Some(point), None) | (None, Some(point)) => point,
                    (None, None) => return None,
                }
            }
        };
        ((closest.position - position).abs() <= tolerance).then_some(closest)
    }

    /// The segment that covers `position`.
    ///
    /// The end of the last segment, i.e. the duration, is covered
    /// by the last segment.
    #[must_use]
    pub fn segment_at(&self, position: PositionInSeconds) -> Option<&TempoSegment> {
        self.segments
            .iter()
            .find(|segment| segment.contains(position))
            .or_else(|| {
                self.segments
                    .last()
                    .filter(|segment| segment.end == position)
            })
    }

    /// The tempo markers for storing the current state of the grid.
    ///
    /// Positions are rounded to milliseconds. The tempo of each marker
    /// is the tempo of the segment at its position.
    #[must_use]
    pub fn tempo_markers(&self) -> Vec<TempoMarker> {
        self.tempo_marker_points()
            .filter_map(|point| {
                let Some(bpm) = self.segment_at(point.position).and_then(|segment| segment.bpm)
                else {
                    log::warn!(
                        "Skipping tempo marker {id} at {position} s with unknown tempo",
                        id = point.id,
                        position = point.position,
                    );
                    return None;
                };
                let time_signature = self.marker_time_signature(point.id);
                // Labels are counted in the meter of the timeline
                let beat = (point.label.beat - 1) % time_signature.beats_per_measure + 1;
                Some(TempoMarker {
                    position: round_to_millis(point.position),
                    bpm,
                    time_signature,
                    beat,
                })
            })
            .collect()
    }

    /// Relabels all points, starting with the first label.
    ///
    /// Tempo markers keep their role. The role of all other points
    /// is updated according to their new label.
    pub fn relabel(&mut self) {
        let Some(first_label) = self.first_label else {
            debug_assert!(self.points.is_empty());
            return;
        };
        let beats_per_measure = self.time_signature.beats_per_measure;
        let mut label = first_label;
        for point in &mut self.points {
            point.label = label;
            if !point.is_editable() {
                point.role = BeatRole::of_interpolated(label);
            }
            label = label.next(beats_per_measure);
        }
    }

    fn marker_time_signature(&self, id: PointId) -> TimeSignature {
        self.marker_time_signatures
            .get(&id)
            .copied()
            .unwrap_or(self.time_signature)
    }

    fn new_point(
        &mut self,
        position: PositionInSeconds,
        label: BeatLabel,
        role: BeatRole,
    ) -> BeatPoint {
        let id = PointId(self.next_point_id);
        self.next_point_id += 1;
        BeatPoint {
            id,
            position,
            label,
            role,
        }
    }

    fn push_interpolated_point(&mut self, position: PositionInSeconds, label: BeatLabel) {
        let point = self.new_point(position, label, BeatRole::of_interpolated(label));
        self.points.push(point);
    }

    fn push_tempo_marker_point(
        &mut self,
        position: PositionInSeconds,
        label: BeatLabel,
        time_signature: TimeSignature,
    ) {
        let point = self.new_point(position, label, BeatRole::TempoMarker);
        self.marker_time_signatures.insert(point.id, time_signature);
        self.points.push(point);
    }

    /// Restores the ordering of points after appending new ones.
    ///
    /// Points with equal positions are collapsed, tempo markers
    /// take precedence.
    fn sort_points(&mut self) {
        self.points.sort_by(|lhs, rhs| {
            lhs.position
                .total_cmp(&rhs.position)
                .then_with(|| rhs.is_editable().cmp(&lhs.is_editable()))
        });
        self.points.dedup_by(|next, prev| next.position == prev.position);
    }

    fn point_index(&self, id: PointId) -> Result<usize, EditError> {
        self.points
            .iter()
            .position(|point| point.id == id)
            .ok_or(EditError::PointNotFound(id))
    }

    fn prev_marker_index(&self, index: usize) -> Option<usize> {
        self.points[..index].iter().rposition(BeatPoint::is_editable)
    }

    fn next_marker_index(&self, index: usize) -> Option<usize> {
        self.points[index + 1..]
            .iter()
            .position(BeatPoint::is_editable)
            .map(|offset| index + 1 + offset)
    }

    /// The range between the neighboring tempo markers of a point.
    ///
    /// Bounded by the start and the end of the track if there is no
    /// tempo marker before or after the point.
    fn marker_window(&self, index: usize) -> (PositionInSeconds, PositionInSeconds) {
        let start = self
            .prev_marker_index(index)
            .map_or(0.0, |index| self.points[index].position);
        let end = self
            .next_marker_index(index)
            .map_or(self.duration, |index| self.points[index].position);
        (start, end)
    }

    /// Replaces the segments in the range `[start, end]`.
    ///
    /// Segments that only overlap the range are clipped.
    fn replace_segments(
        &mut self,
        start: PositionInSeconds,
        end: PositionInSeconds,
        replacement: impl IntoIterator<Item = TempoSegment>,
    ) {
        debug_assert!(start < end);
        let mut segments = Vec::with_capacity(self.segments.len() + 2);
        for segment in self.segments.drain(..) {
            if segment.start < start {
                segments.push(TempoSegment {
                    end: segment.end.min(start),
                    ..segment
                });
            }
            if segment.end > end {
                segments.push(TempoSegment {
                    start: segment.start.max(end),
                    ..segment
                });
            }
        }
        segments.extend(replacement);
        segments.sort_by(|lhs, rhs| lhs.start.total_cmp(&rhs.start));
        self.segments = segments;
    }

    /// Splits the segment that strictly contains `position` in two.
    ///
    /// Both parts inherit the tempo of the split segment.
    fn split_segment_at(&mut self, position: PositionInSeconds) {
        let Some(index) = self
            .segments
            .iter()
            .position(|segment| segment.start < position && position < segment.end)
        else {
            // Already a boundary
            return;
        };
        let segment = self.segments[index];
        self.segments[index].end = position;
        self.segments.insert(
            index + 1,
            TempoSegment {
                start: position,
                ..segment
            },
        );
    }

    /// Inserts `beat_count - 1` evenly spaced points between `start` and `end`.
    ///
    /// The new points are labeled and sorted afterwards by the caller.
    fn regenerate_beats(
        &mut self,
        start: PositionInSeconds,
        end: PositionInSeconds,
        beat_count: usize,
    ) {
        debug_assert!(start < end);
        debug_assert!(beat_count > 0);
        let interval = (end - start) / beat_count as f64;
        let label = self.first_label.unwrap_or(UNLABELED);
        for k in 1..beat_count {
            let position = round_to_millis(start + k as f64 * interval);
            if start < position && position < end {
                self.push_interpolated_point(position, label);
            }
        }
    }

    fn debug_assert_valid(&self) {
        debug_assert!(self.is_valid(), "{:?}", self.validate().err());
    }
}

#[derive(Copy, Clone, Debug)]
pub enum BeatTimelineInvalidity {
    Duration,
    SegmentsEmpty,
    SegmentsStart,
    SegmentsEnd,
    SegmentEmpty(usize),
    SegmentGap(usize),
    PointsOrder(usize),
    PointOutOfRange(usize),
}

impl Validate for BeatTimeline {
    type Invalidity = BeatTimelineInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        let mut context = ValidationContext::new()
            .invalidate_if(
                !crate::audio::is_valid_duration(self.duration),
                Self::Invalidity::Duration,
            )
            .invalidate_if(self.segments.is_empty(), Self::Invalidity::SegmentsEmpty)
            .invalidate_if(
                self.segments
                    .first()
                    .is_some_and(|segment| segment.start != 0.0),
                Self::Invalidity::SegmentsStart,
            )
            .invalidate_if(
                self.segments
                    .last()
                    .is_some_and(|segment| segment.end != self.duration),
                Self::Invalidity::SegmentsEnd,
            );
        for (index, segment) in self.segments.iter().enumerate() {
            context = context.invalidate_if(
                segment.start >= segment.end,
                Self::Invalidity::SegmentEmpty(index),
            );
        }
        for (index, pair) in self.segments.windows(2).enumerate() {
            context = context.invalidate_if(
                pair[0].end != pair[1].start,
                Self::Invalidity::SegmentGap(index + 1),
            );
        }
        for (index, pair) in self.points.windows(2).enumerate() {
            context = context.invalidate_if(
                pair[0].position >= pair[1].position,
                Self::Invalidity::PointsOrder(index + 1),
            );
        }
        for (index, point) in self.points.iter().enumerate() {
            context = context.invalidate_if(
                !(point.position >= 0.0 && point.position <= self.duration),
                Self::Invalidity::PointOutOfRange(index),
            );
        }
        context.into()
    }
}
