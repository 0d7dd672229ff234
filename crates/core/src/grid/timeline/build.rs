// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use thiserror::Error;

use crate::{
    audio::is_valid_duration,
    grid::BEAT_POSITION_TOLERANCE_SECS,
    music::{
        beat::{BeatLabel, BeatsPerMeasure, MeasureNumber, TimeSignature},
        tempo::TempoBpm,
    },
    prelude::*,
};

use super::{BeatRole, BeatTimeline, TempoMarker, TempoSegment};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("invalid duration: {0} s")]
    InvalidDuration(DurationInSeconds),

    #[error("invalid tempo marker at index {index}: {marker:?}")]
    InvalidTempoMarker { index: usize, marker: TempoMarker },
}

impl BeatTimeline {
    /// Expands a sparse list of tempo markers into a timeline.
    ///
    /// The markers don't need to be ordered. Markers at or beyond the
    /// end of the track and markers with duplicate positions are
    /// ignored.
    pub fn build(
        markers: &[TempoMarker],
        duration: DurationInSeconds,
    ) -> Result<Self, BuildError> {
        if !is_valid_duration(duration) {
            return Err(BuildError::InvalidDuration(duration));
        }
        if let Some((index, marker)) = markers
            .iter()
            .enumerate()
            .find(|(_, marker)| !marker.is_valid())
        {
            return Err(BuildError::InvalidTempoMarker {
                index,
                marker: *marker,
            });
        }
        let markers = sorted_markers(markers, duration);
        let time_signature = markers
            .first()
            .map(|marker| marker.time_signature)
            .unwrap_or_default();
        let mut builder = Builder::new(BeatTimeline::empty(duration, time_signature));
        for marker in &markers {
            builder.add_marker(marker);
        }
        let timeline = builder.finish();
        log::debug!(
            "Built timeline with {num_points} point(s) and {num_segments} segment(s) from \
             {num_markers} tempo marker(s)",
            num_points = timeline.points.len(),
            num_segments = timeline.segments.len(),
            num_markers = markers.len(),
        );
        Ok(timeline)
    }
}

fn sorted_markers(markers: &[TempoMarker], duration: DurationInSeconds) -> Vec<TempoMarker> {
    let mut sorted = markers.to_vec();
    // Stable sort: the first of multiple markers at the same position wins
    sorted.sort_by(|lhs, rhs| lhs.position.total_cmp(&rhs.position));
    sorted.retain(|marker| {
        if marker.position < duration {
            return true;
        }
        log::warn!(
            "Ignoring tempo marker at {position} s beyond the end of the track at {duration} s",
            position = marker.position,
        );
        false
    });
    sorted.dedup_by(|next, prev| {
        if next.position != prev.position {
            return false;
        }
        log::warn!(
            "Ignoring duplicate tempo marker at {position} s",
            position = next.position,
        );
        true
    });
    sorted
}

/// The most recent tempo marker while building.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    position: PositionInSeconds,
    bpm: TempoBpm,
    time_signature: TimeSignature,
}

impl Anchor {
    fn beats_per_measure(&self) -> BeatsPerMeasure {
        self.time_signature.beats_per_measure
    }

    fn beat_position(&self, beat_offset: i32) -> PositionInSeconds {
        self.position + f64::from(beat_offset) * self.bpm.beat_interval()
    }
}

/// Walks through the sorted tempo markers.
///
/// Segments are appended when the next marker is reached, i.e.
/// the segment starting at the current anchor is still open.
#[derive(Debug)]
struct Builder {
    timeline: BeatTimeline,
    anchor: Option<Anchor>,
    label: BeatLabel,
}

impl Builder {
    fn new(timeline: BeatTimeline) -> Self {
        Self {
            timeline,
            anchor: None,
            label: BeatLabel::new(1, 1),
        }
    }

    fn add_marker(&mut self, marker: &TempoMarker) {
        match self.anchor {
            None => self.add_first_marker(marker),
            Some(anchor) => self.add_next_marker(anchor, marker),
        }
        self.anchor = Some(Anchor {
            position: marker.position,
            bpm: marker.bpm,
            time_signature: marker.time_signature,
        });
    }

    fn add_first_marker(&mut self, marker: &TempoMarker) {
        let label = BeatLabel::new(first_measure_number(marker), marker.beat);
        let anchor = Anchor {
            position: marker.position,
            bpm: marker.bpm,
            time_signature: marker.time_signature,
        };
        // Fill backwards until the start of the track
        let mut backfill = Vec::new();
        let mut backfill_label = label;
        for beat_offset in 1.. {
            let position = anchor.beat_position(-beat_offset);
            if position < 0.0 {
                break;
            }
            backfill_label = backfill_label.prev(anchor.beats_per_measure());
            backfill.push((position, backfill_label));
        }
        for (position, label) in backfill.into_iter().rev() {
            self.timeline.push_interpolated_point(position, label);
        }
        if marker.position > 0.0 {
            self.timeline.segments.push(TempoSegment {
                start: 0.0,
                end: marker.position,
                bpm: Some(marker.bpm),
            });
        }
        self.timeline
            .push_tempo_marker_point(marker.position, label, marker.time_signature);
        self.label = label;
    }

    fn add_next_marker(&mut self, anchor: Anchor, marker: &TempoMarker) {
        self.timeline.segments.push(TempoSegment {
            start: anchor.position,
            end: marker.position,
            bpm: Some(anchor.bpm),
        });
        self.fill_forward(anchor, |position| {
            position < marker.position - BEAT_POSITION_TOLERANCE_SECS
        });
        if marker.beat == self.label.beat {
            self.reconcile_drift(anchor, marker.position);
        }
        let label = BeatLabel::new(self.label.measure, marker.beat);
        self.timeline
            .push_tempo_marker_point(marker.position, label, marker.time_signature);
        self.label = label;
    }

    /// Appends interpolated points after the anchor while `is_before_end`
    /// holds.
    fn fill_forward(
        &mut self,
        anchor: Anchor,
        is_before_end: impl Fn(PositionInSeconds) -> bool,
    ) {
        for beat_offset in 1.. {
            let position = anchor.beat_position(beat_offset);
            if !is_before_end(position) {
                break;
            }
            self.label = self.label.next(anchor.beats_per_measure());
            self.timeline.push_interpolated_point(position, self.label);
        }
    }

    /// Handles an interpolated beat that lands next to the following
    /// marker with the same beat number.
    ///
    /// The interpolated beat is dropped and the beat before it becomes
    /// a tempo marker. The tempo between this beat and the following
    /// marker is derived from their distance.
    fn reconcile_drift(&mut self, anchor: Anchor, marker_position: PositionInSeconds) {
        let Some(open_start) = self.timeline.segments.last().map(|segment| segment.start) else {
            return;
        };
        let [.., before, last] = self.timeline.points.as_slice() else {
            return;
        };
        if last.is_editable() || before.position <= open_start {
            return;
        }
        let drifted_position = last.position;
        let anchored_position = before.position;
        self.timeline.points.pop();
        let Some(anchored) = self.timeline.points.last_mut() else {
            return;
        };
        anchored.role = BeatRole::TempoMarker;
        let anchored_id = anchored.id;
        self.timeline
            .marker_time_signatures
            .insert(anchored_id, anchor.time_signature);
        if let Some(open_segment) = self.timeline.segments.last_mut() {
            open_segment.end = anchored_position;
        }
        let bpm = TempoBpm::from_beat_interval(marker_position - anchored_position)
            .round_to_hundredths();
        self.timeline.segments.push(TempoSegment {
            start: anchored_position,
            end: marker_position,
            bpm: Some(bpm),
        });
        log::debug!(
            "Dropped drifted beat at {drifted_position} s and anchored tempo {bpm} bpm at \
             {anchored_position} s"
        );
    }

    fn finish(mut self) -> BeatTimeline {
        let duration = self.timeline.duration;
        if let Some(anchor) = self.anchor {
            self.fill_forward(anchor, |position| position <= duration);
            self.timeline.segments.push(TempoSegment {
                start: anchor.position,
                end: duration,
                bpm: Some(anchor.bpm),
            });
        } else {
            self.timeline.segments.push(TempoSegment {
                start: 0.0,
                end: duration,
                bpm: None,
            });
        }
        self.timeline.first_label = self.timeline.points.first().map(|point| point.label);
        self.timeline.debug_assert_valid();
        self.timeline
    }
}

/// The measure number of the first marker.
///
/// Derived from the number of whole beats that fit between the start
/// of the track and the marker.
fn first_measure_number(marker: &TempoMarker) -> MeasureNumber {
    let beats_before = (marker.position / marker.bpm.beat_interval()).floor() as i64;
    let beats_per_measure = i64::from(marker.time_signature.beats_per_measure);
    let measure = (beats_before - i64::from(marker.beat - 1)).div_euclid(beats_per_measure) + 1;
    let measure = if measure <= 0 { measure - 1 } else { measure };
    measure as MeasureNumber
}
