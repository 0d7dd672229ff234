// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

pub const FILE_NAME: &str = "beatgrid_settings";

pub const FILE_SUFFIX: &str = "ron";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// The collection file that has been loaded most recently.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beatgrid_file: Option<PathBuf>,

    /// The file that has been written most recently.
    ///
    /// Might differ from the loaded file after saving into
    /// a new file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_written_file: Option<PathBuf>,
}

impl State {
    /// Restores saved settings, falling back to defaults.
    #[must_use]
    pub fn restore_from_parent_dir(parent_dir: &Path) -> Self {
        log::info!("Loading saved settings from: {}", parent_dir.display());
        Self::load(parent_dir)
            .map_err(|err| {
                log::warn!("Failed to load saved settings: {err}");
            })
            .unwrap_or_default()
    }

    pub fn load(parent_dir: &Path) -> anyhow::Result<State> {
        let file_path = new_settings_file_path(parent_dir.to_path_buf());
        log::info!("Loading settings from file: {}", file_path.display());
        match fs::read(&file_path) {
            Ok(bytes) => ron::de::from_bytes(&bytes).map_err(Into::into),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Default::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, parent_dir: &Path) -> anyhow::Result<()> {
        let file_path = new_settings_file_path(parent_dir.to_path_buf());
        log::info!("Saving current settings into file: {}", file_path.display());
        let text = ron::ser::to_string_pretty(self, Default::default())?;
        if let Some(parent_path) = file_path.parent() {
            fs::create_dir_all(parent_path)?;
        }
        fs::write(&file_path, text)?;
        Ok(())
    }

    pub async fn save_spawn_blocking(self, parent_dir: PathBuf) -> anyhow::Result<()> {
        match tokio::runtime::Handle::current()
            .spawn_blocking(move || self.save(&parent_dir))
            .await
        {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => {
                anyhow::bail!("failed to save: {err}");
            }
            Err(err) => {
                anyhow::bail!("failed to join blocking task after saving: {err}");
            }
        }
    }

    /// The file that should be loaded on startup.
    ///
    /// Edits that have been saved into a new file are continued
    /// from there.
    #[must_use]
    pub fn current_file(&self) -> Option<&Path> {
        self.last_written_file
            .as_deref()
            .or(self.beatgrid_file.as_deref())
    }

    pub fn update_beatgrid_file(&mut self, new_beatgrid_file: &Path) -> bool {
        if self.beatgrid_file.as_deref() == Some(new_beatgrid_file) {
            // No effect
            return false;
        }
        log::info!("Updating beatgrid file: {}", new_beatgrid_file.display());
        self.beatgrid_file = Some(new_beatgrid_file.to_path_buf());
        self.last_written_file = None;
        true
    }

    pub fn update_last_written_file(&mut self, new_last_written_file: &Path) -> bool {
        if self.last_written_file.as_deref() == Some(new_last_written_file) {
            // No effect
            return false;
        }
        self.last_written_file = Some(new_last_written_file.to_path_buf());
        true
    }
}

#[must_use]
fn new_settings_file_path(parent_dir: PathBuf) -> PathBuf {
    let mut path_buf = parent_dir;
    path_buf.push(FILE_NAME);
    path_buf.set_extension(FILE_SUFFIX);
    path_buf
}

#[cfg(test)]
mod tests;
