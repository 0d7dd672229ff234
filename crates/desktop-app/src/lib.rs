// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::result::Result as StdResult;

use discro::{Publisher, Ref, Subscriber};
use thiserror::Error;

use beatgrid_core::{BuildError, EditError};
use beatgrid_rekordbox_xml::TrackPath;

/// Editing session of a single collection file
pub mod session;

/// Settings management
pub mod settings;

/// Beat timelines of opened tracks
pub mod store;

pub use self::{
    session::{SaveTarget, Session},
    store::BeatgridStore,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("track {0} not found")]
    TrackNotFound(TrackPath),

    #[error("no beatgrid file loaded")]
    NoBeatgridFile,

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Codec(#[from] beatgrid_rekordbox_xml::Error),

    #[error(transparent)]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = StdResult<T, Error>;

pub type ObservableRef<'a, T> = Ref<'a, T>;

/// Manages the mutable, observable state
#[derive(Debug, Default)]
pub struct Observable<T> {
    publisher: Publisher<T>,
}

impl<T> Observable<T> {
    #[must_use]
    pub fn new(initial_value: T) -> Self {
        let publisher = Publisher::new(initial_value);
        Self { publisher }
    }

    #[must_use]
    pub fn read(&self) -> ObservableRef<'_, T> {
        self.publisher.read()
    }

    #[must_use]
    pub fn subscribe_changed(&self) -> Subscriber<T> {
        self.publisher.subscribe_changed()
    }

    #[allow(clippy::must_use_candidate)]
    pub fn modify(&self, modify: impl FnOnce(&mut T) -> bool) -> bool {
        self.publisher.modify(modify)
    }
}
