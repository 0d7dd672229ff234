// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fs;

use beatgrid_core::{PointId, Rejection};

use super::*;

const COLLECTION: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\r\n",
    "<DJ_PLAYLISTS Version=\"1.0.0\">\r\n",
    "  <COLLECTION Entries=\"2\">\r\n",
    "    <TRACK TrackID=\"1\" Name=\"One\" Location=\"file://localhost/Music/One.mp3\">\r\n",
    "      <TEMPO Inizio=\"2\" Bpm=\"120\" Metro=\"4/4\" Battito=\"1\"/>\r\n",
    "      <TEMPO Inizio=\"6\" Bpm=\"140\" Metro=\"4/4\" Battito=\"1\"/>\r\n",
    "    </TRACK>\r\n",
    "    <TRACK TrackID=\"2\" Name=\"Two\" Location=\"file://localhost/Music/Two.mp3\">\r\n",
    "    </TRACK>\r\n",
    "  </COLLECTION>\r\n",
    "</DJ_PLAYLISTS>\r\n",
);

fn track_one() -> TrackPath {
    TrackPath::new("/Music/One.mp3")
}

fn point_id_at(session: &Session, position: PositionInSeconds) -> PointId {
    session
        .read()
        .timeline(&track_one())
        .unwrap()
        .point_at(position, 0.001)
        .unwrap()
        .id
}

async fn loaded_session(dir: &Path) -> (Session, PathBuf) {
    let path = dir.join("collection.xml");
    fs::write(&path, COLLECTION).unwrap();
    let session = Session::new();
    assert_eq!(2, session.load_file(path.clone()).await.unwrap());
    session.open_track(&track_one(), 10.0).unwrap();
    (session, path)
}

#[tokio::test]
async fn open_track_without_file() {
    let session = Session::new();
    assert!(matches!(
        session.open_track(&track_one(), 10.0),
        Err(Error::NoBeatgridFile)
    ));
}

#[tokio::test]
async fn open_unknown_track() {
    let dir = tempfile::tempdir().unwrap();
    let (session, _) = loaded_session(dir.path()).await;
    let track = TrackPath::new("/Music/Three.mp3");
    assert!(matches!(
        session.open_track(&track, 10.0),
        Err(Error::TrackNotFound(not_found)) if not_found == track
    ));
}

#[tokio::test]
async fn load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::new();
    assert!(matches!(
        session.load_file(dir.path().join("missing.xml")).await,
        Err(Error::Codec(beatgrid_rekordbox_xml::Error::Io(_)))
    ));
    assert!(session.read().source_file().is_none());
}

#[tokio::test]
async fn rejected_edit_keeps_state() {
    let dir = tempfile::tempdir().unwrap();
    let (session, _) = loaded_session(dir.path()).await;
    let before = session.read().timeline(&track_one()).unwrap().clone();
    let id = point_id_at(&session, 2.0);
    assert_eq!(
        EditOutcome::Rejected(Rejection::AlreadyTempoMarker),
        session.edit(&track_one(), EditOperation::Promote(id)).unwrap()
    );
    assert_eq!(&before, session.read().timeline(&track_one()).unwrap());
}

#[tokio::test]
async fn save_overwrites_current_file() {
    let dir = tempfile::tempdir().unwrap();
    let (session, path) = loaded_session(dir.path()).await;
    let id = point_id_at(&session, 4.0);
    assert!(
        session
            .edit(&track_one(), EditOperation::Promote(id))
            .unwrap()
            .is_applied()
    );
    let written = session
        .save(&track_one(), SaveTarget::Overwrite)
        .await
        .unwrap();
    assert_eq!(path, written);
    assert_eq!(Some(path.as_path()), session.read().last_written_file());

    let reloaded = decode_file(&path).unwrap();
    assert_eq!(3, reloaded[&track_one()].len());
    assert_eq!(
        Some(&reloaded[&track_one()]),
        session.read().tracks().get(&track_one())
    );
}

#[tokio::test]
async fn save_as_forces_extension_and_becomes_current_file() {
    let dir = tempfile::tempdir().unwrap();
    let (session, path) = loaded_session(dir.path()).await;
    let written = session
        .save(&track_one(), SaveTarget::SaveAs(dir.path().join("edited.txt")))
        .await
        .unwrap();
    assert_eq!(dir.path().join("edited.xml"), written);
    assert_eq!(COLLECTION, fs::read_to_string(&written).unwrap());
    assert_eq!(Some(path.as_path()), session.read().source_file());
    assert_eq!(Some(written.as_path()), session.read().current_file());

    // Subsequent saves merge into the most recently written file
    let id = point_id_at(&session, 4.0);
    assert!(
        session
            .edit(&track_one(), EditOperation::Promote(id))
            .unwrap()
            .is_applied()
    );
    let overwritten = session
        .save(&track_one(), SaveTarget::Overwrite)
        .await
        .unwrap();
    assert_eq!(written, overwritten);
    assert_eq!(COLLECTION, fs::read_to_string(&path).unwrap());
    assert_eq!(3, decode_file(&written).unwrap()[&track_one()].len());
}

#[tokio::test]
async fn failed_save_keeps_state() {
    let dir = tempfile::tempdir().unwrap();
    let (session, path) = loaded_session(dir.path()).await;
    fs::remove_file(&path).unwrap();
    assert!(matches!(
        session.save(&track_one(), SaveTarget::Overwrite).await,
        Err(Error::Codec(beatgrid_rekordbox_xml::Error::Io(_)))
    ));
    assert!(session.read().last_written_file().is_none());
}

#[tokio::test]
#[allow(clippy::float_cmp)]
async fn reload_rebuilds_opened_tracks() {
    let dir = tempfile::tempdir().unwrap();
    let (session, path) = loaded_session(dir.path()).await;
    let id = point_id_at(&session, 4.0);
    assert!(
        session
            .edit(&track_one(), EditOperation::Promote(id))
            .unwrap()
            .is_applied()
    );
    assert_eq!(
        3,
        session.read().timeline(&track_one()).unwrap().tempo_markers().len()
    );

    // Unsaved edits are discarded
    session.load_file(path).await.unwrap();
    let state = session.read();
    let timeline = state.timeline(&track_one()).unwrap();
    assert_eq!(10.0, timeline.duration());
    assert_eq!(2, timeline.tempo_markers().len());
}

#[tokio::test]
async fn reload_closes_missing_tracks() {
    let dir = tempfile::tempdir().unwrap();
    let (session, _) = loaded_session(dir.path()).await;
    let other_path = dir.path().join("other.xml");
    fs::write(
        &other_path,
        COLLECTION.replace("/Music/One.mp3", "/Music/Three.mp3"),
    )
    .unwrap();
    session.load_file(other_path).await.unwrap();
    assert!(session.read().store().is_empty());
}
