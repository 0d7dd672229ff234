// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{fmt, num::ParseIntError, str::FromStr};

use thiserror::Error;

use crate::{music::tempo::TempoBpm, prelude::*};

///////////////////////////////////////////////////////////////////////
// RgbColor
///////////////////////////////////////////////////////////////////////

pub type RgbColorCode = u32;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RgbColor(pub RgbColorCode); // 0xRRGGBB

impl RgbColor {
    const STRING_PREFIX: &'static str = "#";
    const STRING_LEN: usize = 1 + 2 + 2 + 2;

    pub const BLACK: Self = RgbColor(0);

    #[must_use]
    pub const fn code(self) -> RgbColorCode {
        self.0
    }

    #[must_use]
    pub const fn min_code() -> RgbColorCode {
        0x00_00_00
    }

    #[must_use]
    pub const fn max_code() -> RgbColorCode {
        0xff_ff_ff
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // "#RRGGBB"
        write!(f, "{}{:06X}", Self::STRING_PREFIX, self.code())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid input length: expected = {}", RgbColor::STRING_LEN)]
    InputLen,

    #[error("invalid input prefix: expected = {}", RgbColor::STRING_PREFIX)]
    InputPrefix,

    #[error(transparent)]
    ParseIntError(#[from] ParseIntError),
}

impl FromStr for RgbColor {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != Self::STRING_LEN {
            return Err(ParseError::InputLen);
        }
        let (prefix, hex_code) = s.split_at(Self::STRING_PREFIX.len());
        if prefix != Self::STRING_PREFIX {
            return Err(ParseError::InputPrefix);
        }
        u32::from_str_radix(hex_code, 16)
            .map(RgbColor)
            .map_err(ParseError::ParseIntError)
    }
}

#[derive(Copy, Clone, Debug)]
pub enum RgbColorInvalidity {
    CodeOutOfRange,
}

impl Validate for RgbColor {
    type Invalidity = RgbColorInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(
                self.code() < Self::min_code() || self.code() > Self::max_code(),
                Self::Invalidity::CodeOutOfRange,
            )
            .into()
    }
}

///////////////////////////////////////////////////////////////////////
// Beat and tempo colors
///////////////////////////////////////////////////////////////////////

pub const TEMPO_MARKER_COLOR: RgbColor = RgbColor(0x03_C0_4A);

pub const DOWNBEAT_COLOR: RgbColor = RgbColor(0xD3_00_00);

pub const OTHER_BEAT_COLOR: RgbColor = RgbColor(0x45_B6_FE);

/// Color of segments with an unknown tempo.
pub const UNKNOWN_TEMPO_COLOR: RgbColor = RgbColor::BLACK;

/// Fixed palette for coloring tempo segments.
pub const TEMPO_PALETTE: [RgbColor; 24] = [
    RgbColor(0xE6_19_4B),
    RgbColor(0x3C_B4_4B),
    RgbColor(0xFF_E1_19),
    RgbColor(0x43_63_D8),
    RgbColor(0xF5_82_31),
    RgbColor(0x91_1E_B4),
    RgbColor(0x46_F0_F0),
    RgbColor(0xF0_32_E6),
    RgbColor(0xBC_F6_0C),
    RgbColor(0xFA_BE_BE),
    RgbColor(0x00_80_80),
    RgbColor(0xE6_BE_FF),
    RgbColor(0x9A_63_24),
    RgbColor(0xFF_FA_C8),
    RgbColor(0x80_00_00),
    RgbColor(0xAA_FF_C3),
    RgbColor(0x80_80_00),
    RgbColor(0xFF_D8_B1),
    RgbColor(0x00_00_75),
    RgbColor(0x80_80_80),
    RgbColor(0x6A_3D_9A),
    RgbColor(0xB1_59_28),
    RgbColor(0x1F_78_B4),
    RgbColor(0xFB_9A_99),
];

/// Selects the palette color of a tempo.
///
/// Tempos that are equal when rounded to 2 decimal places
/// always share the same color.
#[must_use]
pub fn tempo_color(bpm: TempoBpm) -> RgbColor {
    let index = bpm.hundredths().rem_euclid(TEMPO_PALETTE.len() as i64);
    TEMPO_PALETTE[index as usize]
}

///////////////////////////////////////////////////////////////////////
// Tests
///////////////////////////////////////////////////////////////////////
