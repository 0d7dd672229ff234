// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::*;

#[test]
fn load_defaults_if_missing() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(State::default(), State::load(dir.path()).unwrap());
}

#[test]
fn save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let parent_dir = dir.path().join("config");
    let mut state = State::default();
    assert!(state.update_beatgrid_file(Path::new("/Music/collection.xml")));
    assert!(state.update_last_written_file(Path::new("/Music/edited.xml")));
    state.save(&parent_dir).unwrap();
    assert!(parent_dir.join("beatgrid_settings.ron").is_file());
    assert_eq!(state, State::load(&parent_dir).unwrap());
}

#[test]
fn restore_defaults_from_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("beatgrid_settings.ron"), "(beatgrid_file: ").unwrap();
    assert!(State::load(dir.path()).is_err());
    assert_eq!(
        State::default(),
        State::restore_from_parent_dir(dir.path())
    );
}

#[test]
fn current_file() {
    let mut state = State::default();
    assert!(state.current_file().is_none());
    state.update_beatgrid_file(Path::new("/Music/collection.xml"));
    assert_eq!(
        Some(Path::new("/Music/collection.xml")),
        state.current_file()
    );
    state.update_last_written_file(Path::new("/Music/edited.xml"));
    assert_eq!(Some(Path::new("/Music/edited.xml")), state.current_file());
    assert!(!state.update_last_written_file(Path::new("/Music/edited.xml")));
    // Loading another file resets the written file
    assert!(state.update_beatgrid_file(Path::new("/Music/other.xml")));
    assert_eq!(Some(Path::new("/Music/other.xml")), state.current_file());
}

#[tokio::test]
async fn save_spawn_blocking() {
    let dir = tempfile::tempdir().unwrap();
    let state = State {
        beatgrid_file: Some("/Music/collection.xml".into()),
        last_written_file: None,
    };
    state.clone().save_spawn_blocking(dir.path().to_path_buf()).await.unwrap();
    assert_eq!(state, State::load(dir.path()).unwrap());
}
