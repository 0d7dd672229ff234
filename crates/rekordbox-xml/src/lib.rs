// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tempo markers of rekordbox XML collections.
//!
//! The collection file is processed line by line without parsing
//! the XML document. All lines that are not tempo records of the
//! edited track are preserved byte-for-byte when merging.

// Opt-in for allowed-by-default lints (in alphabetical order)
// See also: <https://doc.rust-lang.org/rustc/lints>
#![warn(future_incompatible)]
#![warn(let_underscore)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(unreachable_pub)]
#![warn(unsafe_code)]
#![warn(unused)]
// Clippy lints
#![warn(clippy::pedantic)]
// Additional restrictions
#![warn(clippy::clone_on_ref_ptr)]
#![warn(clippy::self_named_module_files)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

use std::{io::Error as IoError, result::Result as StdResult};

use thiserror::Error;

pub mod decode;
pub mod encode;
pub mod io;
pub mod track;

mod record;

pub use self::{
    decode::{DecodedTracks, decode},
    encode::{encode_merged, encode_tempo_record},
    record::TempoAttribute,
    track::TrackPath,
};

/// Reason for rejecting a tempo record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    #[error("is missing")]
    MissingAttribute,

    #[error("has no closing quote")]
    MissingClosingQuote,

    #[error("has an invalid value \"{0}\"")]
    InvalidValue(String),

    #[error("results in an invalid tempo marker")]
    InvalidTempoMarker,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed tempo record in line {line}: attribute {attribute} {reason}")]
    MalformedRecord {
        /// 1-based line number
        line: usize,
        attribute: TempoAttribute,
        reason: MalformedReason,
    },

    #[error("track {0} not found")]
    TrackNotFound(TrackPath),

    #[error("track {0} is not terminated")]
    UnterminatedTrack(TrackPath),

    #[error(transparent)]
    Io(#[from] IoError),
}

pub type Result<T> = StdResult<T, Error>;

pub mod prelude {
    pub use super::{Error, Result};
}
