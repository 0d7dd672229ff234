// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fs, path::Path};

use crate::{decode::DecodedTracks, prelude::*};

pub fn read_file(path: &Path) -> Result<String> {
    let contents = fs::read_to_string(path)?;
    log::debug!(
        "Read {num_bytes} byte(s) from file {path}",
        num_bytes = contents.len(),
        path = path.display(),
    );
    Ok(contents)
}

pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)?;
    log::info!(
        "Wrote {num_bytes} byte(s) into file {path}",
        num_bytes = contents.len(),
        path = path.display(),
    );
    Ok(())
}

/// Reads and decodes a collection file.
pub fn decode_file(path: &Path) -> Result<DecodedTracks> {
    let contents = read_file(path)?;
    crate::decode(&contents)
}
