// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::*;

#[test]
fn find_in_track_line() {
    let line = "    <TRACK TrackID=\"1\" Name=\"Intro\" \
                Location=\"file://localhost/Music/My%20Track.mp3\" Remixer=\"\">\r\n";
    assert_eq!(
        Some(TrackPath::new("/Music/My%20Track.mp3")),
        TrackPath::find_in_line(line)
    );
    assert_eq!(None, TrackPath::find_in_line("    <TRACK Key=\"1\"/>\n"));
    assert_eq!(
        None,
        TrackPath::find_in_line("<TRACK Location=\"file://localhost/unterminated")
    );
}

#[cfg(unix)]
#[test]
fn file_path_conversion() {
    let path = Path::new("/Music/My Track (Extended).mp3");
    let track = TrackPath::from_file_path(path).unwrap();
    assert_eq!("/Music/My%20Track%20(Extended).mp3", track.as_str());
    assert_eq!(Some(path.to_path_buf()), track.to_file_path());
    assert_eq!("file:///Music/My%20Track%20(Extended).mp3", track.to_url().unwrap().as_str());
    assert!(TrackPath::from_file_path(Path::new("relative.mp3")).is_none());
}
