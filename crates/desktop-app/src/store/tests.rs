// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use beatgrid_core::music::{beat::TimeSignature, tempo::TempoBpm};

use super::*;

fn marker(position: PositionInSeconds, bpm: f64) -> TempoMarker {
    TempoMarker {
        position,
        bpm: TempoBpm::new(bpm),
        time_signature: TimeSignature::COMMON_TIME,
        beat: 1,
    }
}

fn track() -> TrackPath {
    TrackPath::new("/Music/One.mp3")
}

#[test]
#[allow(clippy::float_cmp)]
fn load_and_get() {
    let mut store = BeatgridStore::new();
    assert!(store.is_empty());
    let timeline = store
        .load(track(), &[marker(2.0, 120.0)], 10.0)
        .unwrap();
    assert_eq!(10.0, timeline.duration());
    assert_eq!(1, store.len());
    assert!(store.get(&track()).is_some());
    assert!(store.get(&TrackPath::new("/Music/Two.mp3")).is_none());
    assert_eq!(vec![&track()], store.tracks().collect::<Vec<_>>());
}

#[test]
#[allow(clippy::float_cmp)]
fn load_replaces_existing_timeline() {
    let mut store = BeatgridStore::new();
    store.load(track(), &[marker(2.0, 120.0)], 10.0).unwrap();
    store.load(track(), &[marker(1.0, 90.0)], 20.0).unwrap();
    assert_eq!(1, store.len());
    let timeline = store.get(&track()).unwrap();
    assert_eq!(20.0, timeline.duration());
    assert_eq!(vec![marker(1.0, 90.0)], timeline.tempo_markers());
}

#[test]
#[allow(clippy::float_cmp)]
fn failed_load_keeps_existing_timeline() {
    let mut store = BeatgridStore::new();
    store.load(track(), &[marker(2.0, 120.0)], 10.0).unwrap();
    assert!(matches!(
        store.load(track(), &[marker(1.0, 90.0)], -1.0),
        Err(BuildError::InvalidDuration(_))
    ));
    assert_eq!(10.0, store.get(&track()).unwrap().duration());
}

#[test]
#[allow(clippy::float_cmp)]
fn replace_keeps_duration() {
    let mut store = BeatgridStore::new();
    store.load(track(), &[marker(2.0, 120.0)], 10.0).unwrap();
    let timeline = store.replace(&track(), &[marker(0.5, 100.0)]).unwrap();
    assert_eq!(10.0, timeline.duration());
    assert_eq!(vec![marker(0.5, 100.0)], timeline.tempo_markers());
}

#[test]
fn replace_unknown_track() {
    let mut store = BeatgridStore::new();
    assert!(matches!(
        store.replace(&track(), &[]),
        Err(Error::TrackNotFound(not_found)) if not_found == track()
    ));
}

#[test]
fn remove() {
    let mut store = BeatgridStore::new();
    store.load(track(), &[], 10.0).unwrap();
    assert!(store.remove(&track()).is_some());
    assert!(store.remove(&track()).is_none());
    assert!(store.is_empty());
}
