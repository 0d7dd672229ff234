// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use beatgrid_core::TempoMarker;

use crate::{
    prelude::*,
    record::{TRACK_END_TAG, is_tempo_record, line_indentation, line_terminator, lines},
    track::TrackPath,
};

/// Indentation of inserted tempo records if no existing record
/// could be used as a template.
const DEFAULT_TEMPO_RECORD_INDENTATION: &str = "      ";

/// Formats a tempo record without indentation and line terminator.
#[must_use]
pub fn encode_tempo_record(marker: &TempoMarker) -> String {
    let TempoMarker {
        position,
        bpm,
        time_signature,
        beat,
    } = marker;
    format!(
        "<TEMPO Inizio=\"{position}\" Bpm=\"{bpm}\" Metro=\"{time_signature}\" \
         Battito=\"{beat}\"/>"
    )
}

fn push_tempo_records(
    encoded: &mut String,
    markers: &[TempoMarker],
    indentation: &str,
    terminator: &str,
) {
    for marker in markers {
        encoded.push_str(indentation);
        encoded.push_str(&encode_tempo_record(marker));
        encoded.push_str(terminator);
    }
}

/// Replaces the tempo records of a single track.
///
/// All other lines are preserved unmodified. The new records are
/// inserted at the position of the first replaced record or before
/// the end of the track if it had no tempo records.
pub fn encode_merged(
    original: &str,
    track: &TrackPath,
    markers: &[TempoMarker],
) -> Result<String> {
    let mut encoded = String::with_capacity(original.len());
    let mut found = false;
    let mut within_track = false;
    let mut inserted = false;
    let mut track_terminator = "\n";
    for line in lines(original) {
        if let Some(line_track) = TrackPath::find_in_line(line) {
            if within_track && !inserted && !markers.is_empty() {
                return Err(Error::UnterminatedTrack(track.clone()));
            }
            within_track = line_track == *track;
            if within_track {
                found = true;
                inserted = false;
                track_terminator = line_terminator(line);
            }
            encoded.push_str(line);
            continue;
        }
        if within_track {
            if is_tempo_record(line) {
                if !inserted {
                    let terminator = match line_terminator(line) {
                        "" => track_terminator,
                        terminator => terminator,
                    };
                    push_tempo_records(
                        &mut encoded,
                        markers,
                        line_indentation(line),
                        terminator,
                    );
                    inserted = true;
                }
                // Replaced
                continue;
            }
            if line.contains(TRACK_END_TAG) {
                if !inserted {
                    push_tempo_records(
                        &mut encoded,
                        markers,
                        DEFAULT_TEMPO_RECORD_INDENTATION,
                        track_terminator,
                    );
                    inserted = true;
                }
                within_track = false;
            }
        }
        encoded.push_str(line);
    }
    if !found {
        return Err(Error::TrackNotFound(track.clone()));
    }
    if within_track && !inserted && !markers.is_empty() {
        return Err(Error::UnterminatedTrack(track.clone()));
    }
    log::debug!(
        "Encoded {num_markers} tempo marker(s) of track {track}",
        num_markers = markers.len()
    );
    Ok(encoded)
}
