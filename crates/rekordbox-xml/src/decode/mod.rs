// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashMap;

use beatgrid_core::TempoMarker;

use crate::{
    prelude::*,
    record::{TRACK_END_TAG, is_tempo_record, lines, parse_tempo_record},
    track::TrackPath,
};

/// The tempo markers of all tracks in a collection file.
///
/// Markers are stored in file order, which is not necessarily
/// sorted by position.
pub type DecodedTracks = HashMap<TrackPath, Vec<TempoMarker>>;

/// Decodes the tempo markers of all tracks.
///
/// Every track with a location is contained in the result, even
/// if it has no tempo records. Tempo records outside of a track
/// are ignored.
pub fn decode(text: &str) -> Result<DecodedTracks> {
    let mut tracks = DecodedTracks::new();
    let mut current_track = None;
    let mut num_markers = 0;
    for (index, line) in lines(text).enumerate() {
        if let Some(track) = TrackPath::find_in_line(line) {
            if tracks.insert(track.clone(), Vec::new()).is_some() {
                log::warn!("Replacing tempo markers of duplicate track {track}");
            }
            current_track = Some(track);
        }
        if is_tempo_record(line) {
            let marker = parse_tempo_record(line).map_err(|(attribute, reason)| {
                Error::MalformedRecord {
                    line: index + 1,
                    attribute,
                    reason,
                }
            })?;
            let Some(markers) = current_track
                .as_ref()
                .and_then(|track| tracks.get_mut(track))
            else {
                log::warn!(
                    "Ignoring tempo record outside of a track in line {line_number}",
                    line_number = index + 1
                );
                continue;
            };
            markers.push(marker);
            num_markers += 1;
        }
        if line.contains(TRACK_END_TAG) {
            current_track = None;
        }
    }
    log::info!(
        "Decoded {num_markers} tempo marker(s) of {num_tracks} track(s)",
        num_tracks = tracks.len()
    );
    Ok(tracks)
}
