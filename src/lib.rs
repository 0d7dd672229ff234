// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Editing and persisting the beatgrids of rekordbox collections.

pub use beatgrid_core::*;

#[cfg(feature = "rekordbox-xml")]
pub use beatgrid_rekordbox_xml as rekordbox_xml;

#[cfg(feature = "desktop-app")]
pub use beatgrid_desktop_app as desktop_app;
