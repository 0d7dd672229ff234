// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Domain model of beatgrids.
//!
//! A beatgrid is a dense, labeled sequence of beat points that is
//! expanded from a sparse list of tempo markers. Beat points are
//! grouped into tempo segments with a constant BPM that partition
//! the duration of a track.

#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(unreachable_pub)]
#![warn(unsafe_code)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(clippy::pedantic)]
// Additional restrictions
#![warn(clippy::clone_on_ref_ptr)]
#![warn(clippy::self_named_module_files)]
// Repetitions of module/type names occur frequently when using many
// modules for keeping the size of the source files handy. Often
// types have the same name as their parent module.
#![allow(clippy::module_name_repetitions)]
// Importing all enum variants into a narrow, local scope is acceptable.
#![allow(clippy::enum_glob_use)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::missing_errors_doc)]

pub mod audio;
pub mod grid;
pub mod music;
pub mod util;

pub use self::grid::{
    BeatPoint, BeatRole, PointId, TempoMarker, TempoSegment,
    timeline::{BeatTimeline, BuildError, EditError, EditOperation, EditOutcome, Rejection},
    view::{PointView, SegmentView, TimelineView},
};

pub mod prelude {
    pub(crate) use semval::prelude::*;
    // Re-export trait methods from semval
    pub use semval::{IsValid, Validate as _};

    pub use crate::audio::{DurationInSeconds, PositionInSeconds};
}
