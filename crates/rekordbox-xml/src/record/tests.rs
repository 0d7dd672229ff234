// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::*;

#[test]
#[allow(clippy::float_cmp)]
fn parse_valid_record() {
    let marker = parse_tempo_record(
        "      <TEMPO Inizio=\"0.025\" Bpm=\"128.00\" Metro=\"4/4\" Battito=\"1\"/>\r\n",
    )
    .unwrap();
    assert_eq!(0.025, marker.position);
    assert_eq!(TempoBpm::new(128.0), marker.bpm);
    assert_eq!(TimeSignature::COMMON_TIME, marker.time_signature);
    assert_eq!(1, marker.beat);
}

#[test]
fn parse_record_with_reordered_attributes() {
    let marker =
        parse_tempo_record("<TEMPO Inizio=\"12.5\" Battito=\"3\" Metro=\"3/4\" Bpm=\"90\"/>")
            .unwrap();
    assert_eq!(TimeSignature::new(3, 4), marker.time_signature);
    assert_eq!(3, marker.beat);
}

#[test]
fn parse_record_with_missing_attribute() {
    assert_eq!(
        Err((TempoAttribute::Battito, MalformedReason::MissingAttribute)),
        parse_tempo_record("<TEMPO Inizio=\"1.0\" Bpm=\"120\" Metro=\"4/4\"/>")
    );
}

#[test]
fn parse_record_with_missing_closing_quote() {
    // The value must not be continued on the next line
    assert_eq!(
        Err((TempoAttribute::Battito, MalformedReason::MissingClosingQuote)),
        parse_tempo_record("<TEMPO Inizio=\"1.0\" Bpm=\"120\" Metro=\"4/4\" Battito=\"1/>\n")
    );
}

#[test]
fn parse_record_with_invalid_values() {
    assert_eq!(
        Err((
            TempoAttribute::Bpm,
            MalformedReason::InvalidValue("fast".to_owned())
        )),
        parse_tempo_record("<TEMPO Inizio=\"1.0\" Bpm=\"fast\" Metro=\"4/4\" Battito=\"1\"/>")
    );
    assert_eq!(
        Err((
            TempoAttribute::Metro,
            MalformedReason::InvalidValue("4".to_owned())
        )),
        parse_tempo_record("<TEMPO Inizio=\"1.0\" Bpm=\"120\" Metro=\"4\" Battito=\"1\"/>")
    );
    assert_eq!(
        Err((TempoAttribute::Battito, MalformedReason::InvalidTempoMarker)),
        parse_tempo_record("<TEMPO Inizio=\"1.0\" Bpm=\"120\" Metro=\"4/4\" Battito=\"5\"/>")
    );
    assert_eq!(
        Err((TempoAttribute::Bpm, MalformedReason::InvalidTempoMarker)),
        parse_tempo_record("<TEMPO Inizio=\"1.0\" Bpm=\"0\" Metro=\"4/4\" Battito=\"1\"/>")
    );
    assert_eq!(
        Err((TempoAttribute::Bpm, MalformedReason::InvalidTempoMarker)),
        parse_tempo_record("<TEMPO Inizio=\"1.0\" Bpm=\"1e9\" Metro=\"4/4\" Battito=\"1\"/>")
    );
    assert_eq!(
        Err((TempoAttribute::Inizio, MalformedReason::InvalidTempoMarker)),
        parse_tempo_record("<TEMPO Inizio=\"-1.0\" Bpm=\"120\" Metro=\"4/4\" Battito=\"1\"/>")
    );
}

#[test]
fn attribute_names_are_matched_as_a_whole() {
    let values = scan_attribute_values("<X AverageBpm=\"100\" Bpm=\"120\"/>");
    assert_eq!(Some(Some("120")), values[TempoAttribute::Bpm.index()]);
    assert_eq!(None, values[TempoAttribute::Inizio.index()]);
}

#[test]
fn split_lines_with_terminators() {
    let lines = lines("a\r\nb\nc").collect::<Vec<_>>();
    assert_eq!(vec!["a\r\n", "b\n", "c"], lines);
    assert_eq!("\r\n", line_terminator(lines[0]));
    assert_eq!("\n", line_terminator(lines[1]));
    assert_eq!("", line_terminator(lines[2]));
    assert_eq!("\t  ", line_indentation("\t  <TEMPO/>"));
}
