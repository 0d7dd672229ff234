// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::{
    grid::TempoMarker,
    music::{beat::TimeSignature, tempo::TempoBpm},
};

use super::*;

fn timeline() -> BeatTimeline {
    BeatTimeline::build(
        &[TempoMarker {
            position: 1.0,
            bpm: TempoBpm::new(120.0),
            time_signature: TimeSignature::COMMON_TIME,
            beat: 1,
        }],
        3.0,
    )
    .unwrap()
}

#[test]
fn points_are_colored_by_role() {
    let view = timeline().view();
    assert_eq!(3.0, view.duration);
    let labels = view
        .points
        .iter()
        .map(|point| point.label.as_str())
        .collect::<Vec<_>>();
    assert_eq!(vec!["-1.3", "-1.4", "1.1", "1.2", "1.3", "1.4", "2.1"], labels);
    let marker = &view.points[2];
    assert!(marker.editable);
    assert_eq!(TEMPO_MARKER_COLOR, marker.color);
    assert!(view.points.iter().filter(|point| point.editable).count() == 1);
    assert_eq!(OTHER_BEAT_COLOR, view.points[0].color);
    assert_eq!(DOWNBEAT_COLOR, view.points[6].color);
}

#[test]
fn segments_are_labeled_with_tempo() {
    let view = timeline().view();
    assert_eq!(2, view.segments.len());
    for segment in &view.segments {
        assert_eq!("120", segment.label);
        assert_eq!(tempo_color(TempoBpm::new(120.0)), segment.color);
    }
}

#[test]
fn segment_with_unknown_tempo() {
    let view = BeatTimeline::build(&[], 60.0).unwrap().view();
    assert!(view.points.is_empty());
    assert_eq!(
        vec![SegmentView {
            start: 0.0,
            end: 60.0,
            label: UNKNOWN_TEMPO_LABEL.to_owned(),
            color: UNKNOWN_TEMPO_COLOR,
        }],
        view.segments
    );
}

#[test]
fn equal_tempos_share_color() {
    let lhs = SegmentView::from(&TempoSegment {
        start: 0.0,
        end: 1.0,
        bpm: Some(TempoBpm::new(127.93)),
    });
    let rhs = SegmentView::from(&TempoSegment {
        start: 5.0,
        end: 9.0,
        bpm: Some(TempoBpm::new(127.93)),
    });
    assert_eq!(lhs.color, rhs.color);
    assert_eq!("127.93", rhs.label);
}

#[cfg(feature = "serde")]
#[test]
fn serialize_view() {
    let json = serde_json::to_value(timeline().view()).unwrap();
    assert_eq!(3.0, json["duration"]);
    assert_eq!("1.1", json["points"][2]["label"]);
    assert_eq!(true, json["points"][2]["editable"]);
    assert_eq!(
        u64::from(TEMPO_MARKER_COLOR.code()),
        json["points"][2]["color"]
    );
    assert_eq!("120", json["segments"][1]["label"]);
}
