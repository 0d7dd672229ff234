// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    fmt,
    path::{Path, PathBuf},
};

use url::Url;

/// Prefix of the attribute that starts a track.
pub(crate) const TRACK_LOCATION_PREFIX: &str = "Location=\"file://localhost";

const FILE_URL_PREFIX: &str = "file://localhost";

/// Identifies a track by its percent-encoded file path.
///
/// The path is stored exactly as it appears in the `Location` URL
/// of the collection file, e.g. `/Music/My%20Track.mp3`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackPath(String);

impl TrackPath {
    #[must_use]
    pub fn new(encoded_path: impl Into<String>) -> Self {
        Self(encoded_path.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extracts the track path from a line that starts a track.
    #[must_use]
    pub fn find_in_line(line: &str) -> Option<Self> {
        let (_, rest) = line.split_once(TRACK_LOCATION_PREFIX)?;
        let Some(end) = rest.find('"') else {
            log::warn!("Unterminated track location: {line}");
            return None;
        };
        Some(Self::new(&rest[..end]))
    }

    /// Encodes a local file path.
    ///
    /// Returns `None` for relative paths.
    #[must_use]
    pub fn from_file_path(path: &Path) -> Option<Self> {
        let url = Url::from_file_path(path).ok()?;
        Some(Self::new(url.path()))
    }

    /// The `file://` URL of the track.
    pub fn to_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("{FILE_URL_PREFIX}{path}", path = self.0))
    }

    /// Decodes the local file path.
    ///
    /// Returns `None` if the path could not be decoded.
    #[must_use]
    pub fn to_file_path(&self) -> Option<PathBuf> {
        self.to_url().ok()?.to_file_path().ok()
    }
}

impl AsRef<str> for TrackPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TrackPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests;
