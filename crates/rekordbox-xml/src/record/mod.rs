// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Line-oriented access to tempo records.

use std::{fmt, sync::LazyLock};

use aho_corasick::AhoCorasick;

use beatgrid_core::{
    TempoMarker,
    music::{beat::TimeSignature, tempo::TempoBpm},
    prelude::*,
};

use crate::MalformedReason;

/// Marks the start of a tempo record.
pub(crate) const TEMPO_RECORD_PREFIX: &str = "<TEMPO Inizio=";

/// Closes an element that is not self-closing.
pub(crate) const TRACK_END_TAG: &str = "</TRACK>";

/// Splits text into lines, each including its terminator.
pub(crate) fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive('\n')
}

pub(crate) fn is_tempo_record(line: &str) -> bool {
    line.contains(TEMPO_RECORD_PREFIX)
}

/// The terminator of a line, i.e. `"\r\n"`, `"\n"`, or `""` for the last line.
pub(crate) fn line_terminator(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

pub(crate) fn line_indentation(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Attributes of a tempo record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TempoAttribute {
    /// Position in seconds
    Inizio,

    /// Tempo in beats per minute
    Bpm,

    /// Time signature "N/D"
    Metro,

    /// Beat number within the measure
    Battito,
}

impl TempoAttribute {
    const ALL: [Self; 4] = [Self::Inizio, Self::Bpm, Self::Metro, Self::Battito];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Inizio => "Inizio",
            Self::Bpm => "Bpm",
            Self::Metro => "Metro",
            Self::Battito => "Battito",
        }
    }

    const fn value_prefix(self) -> &'static str {
        match self {
            Self::Inizio => "Inizio=\"",
            Self::Bpm => "Bpm=\"",
            Self::Metro => "Metro=\"",
            Self::Battito => "Battito=\"",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TempoAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Finds all attribute value prefixes within a single pass.
///
/// Pattern ids correspond to the indexes of [`TempoAttribute::ALL`].
static ATTRIBUTE_MATCHER: LazyLock<AhoCorasick> = LazyLock::new(|| {
    AhoCorasick::new(TempoAttribute::ALL.map(TempoAttribute::value_prefix))
        .expect("valid patterns")
});

/// Locates the raw values of all attributes within a line.
///
/// Only the first occurrence of each attribute is considered. Values
/// end at the next quote within the same line, `Some(None)` indicates
/// that the closing quote is missing.
fn scan_attribute_values(line: &str) -> [Option<Option<&str>>; 4] {
    let mut values = [None; 4];
    for found in ATTRIBUTE_MATCHER.find_iter(line) {
        let index = found.pattern().as_usize();
        if values[index].is_some() {
            continue;
        }
        // Must not be the suffix of another attribute name
        let is_attribute_start = line[..found.start()]
            .chars()
            .next_back()
            .is_none_or(char::is_whitespace);
        if !is_attribute_start {
            continue;
        }
        let rest = &line[found.end()..];
        values[index] = Some(rest.find('"').map(|end| &rest[..end]));
    }
    values
}

/// Parses a tempo record from a single line.
pub(crate) fn parse_tempo_record(
    line: &str,
) -> Result<TempoMarker, (TempoAttribute, MalformedReason)> {
    let values = scan_attribute_values(line);
    let value_of = |attribute: TempoAttribute| match values[attribute.index()] {
        None => Err((attribute, MalformedReason::MissingAttribute)),
        Some(None) => Err((attribute, MalformedReason::MissingClosingQuote)),
        Some(Some(value)) => Ok(value.trim()),
    };
    let invalid_value =
        |attribute, value: &str| (attribute, MalformedReason::InvalidValue(value.to_owned()));
    let position = value_of(TempoAttribute::Inizio)?;
    let position = position
        .parse()
        .map_err(|_| invalid_value(TempoAttribute::Inizio, position))?;
    let bpm = value_of(TempoAttribute::Bpm)?;
    let bpm = bpm
        .parse()
        .map(TempoBpm::new)
        .map_err(|_| invalid_value(TempoAttribute::Bpm, bpm))?;
    let time_signature = value_of(TempoAttribute::Metro)?;
    let time_signature = time_signature
        .parse::<TimeSignature>()
        .map_err(|_| invalid_value(TempoAttribute::Metro, time_signature))?;
    let beat = value_of(TempoAttribute::Battito)?;
    let beat = beat
        .parse()
        .map_err(|_| invalid_value(TempoAttribute::Battito, beat))?;
    let marker = TempoMarker {
        position,
        bpm,
        time_signature,
        beat,
    };
    if let Err(err) = marker.validate() {
        log::debug!("Invalid tempo marker {marker:?}: {err:?}");
        let attribute = if marker.has_resolvable_tempo() {
            if marker.beat < 1 || marker.beat > time_signature.beats_per_measure {
                TempoAttribute::Battito
            } else {
                TempoAttribute::Inizio
            }
        } else {
            TempoAttribute::Bpm
        };
        return Err((attribute, MalformedReason::InvalidTempoMarker));
    }
    Ok(marker)
}

#[cfg(test)]
mod tests;
