#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Color type and the fixed `ColorBrewer` ramps used by the jobs map.
//!
//! Every map swatch is one of the 5-class schemes below. Ramps are
//! limited to 5 classes so they stay distinguishable in print. The
//! 9-step grey ramp is used for borders, backgrounds, labels and the
//! reserved "no data" swatch.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Number of swatches in every choropleth ramp.
pub const CLASS_COUNT: usize = 5;

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    /// Creates a color from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns the `[r, g, b]` channels.
    #[must_use]
    pub const fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Error returned when a string is not a `#rrggbb` / `#rgb` hex color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex color '{input}'")]
pub struct ParseColorError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError {
            input: s.to_string(),
        };
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| err());

        match hex.len() {
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                // #abc is shorthand for #aabbcc
                let expand = |i: usize| channel(&hex[i..=i].repeat(2));
                Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(err()),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// `ColorBrewer` schemes available to the map, fixed at [`CLASS_COUNT`]
/// classes.
///
/// Diverging schemes are used for the change in location quotient,
/// sequential schemes for the 2015 level and job density.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Scheme {
    /// Red to blue (diverging).
    RdBu,
    /// Purple to green (diverging).
    PRGn,
    /// Brown to blue-green (diverging).
    BrBG,
    /// Red, yellow, blue (diverging).
    RdYlBu,
    /// Yellow, green, blue (sequential).
    YlGnBu,
    /// Purple to red (sequential).
    PuRd,
    /// Yellow to green (sequential).
    YlGn,
    /// Red to purple (sequential).
    RdPu,
    /// Green to blue (sequential).
    GnBu,
}

impl Scheme {
    /// All schemes.
    pub const ALL: &[Self] = &[
        Self::RdBu,
        Self::PRGn,
        Self::BrBG,
        Self::RdYlBu,
        Self::YlGnBu,
        Self::PuRd,
        Self::YlGn,
        Self::RdPu,
        Self::GnBu,
    ];

    /// Returns the 5 swatches of this scheme, lightest-to-darkest for
    /// sequential schemes and low-to-high for diverging ones.
    #[must_use]
    pub const fn colors(self) -> &'static [Color; CLASS_COUNT] {
        match self {
            Self::RdBu => &RD_BU,
            Self::PRGn => &PR_GN,
            Self::BrBG => &BR_BG,
            Self::RdYlBu => &RD_YL_BU,
            Self::YlGnBu => &YL_GN_BU,
            Self::PuRd => &PU_RD,
            Self::YlGn => &YL_GN,
            Self::RdPu => &RD_PU,
            Self::GnBu => &GN_BU,
        }
    }

    /// Whether this scheme diverges around a neutral midpoint.
    #[must_use]
    pub const fn is_diverging(self) -> bool {
        matches!(self, Self::RdBu | Self::PRGn | Self::BrBG | Self::RdYlBu)
    }
}

const RD_BU: [Color; CLASS_COUNT] = [
    Color::rgb(0xca, 0x00, 0x20),
    Color::rgb(0xf4, 0xa5, 0x82),
    Color::rgb(0xf7, 0xf7, 0xf7),
    Color::rgb(0x92, 0xc5, 0xde),
    Color::rgb(0x05, 0x71, 0xb0),
];

const PR_GN: [Color; CLASS_COUNT] = [
    Color::rgb(0x7b, 0x32, 0x94),
    Color::rgb(0xc2, 0xa5, 0xcf),
    Color::rgb(0xf7, 0xf7, 0xf7),
    Color::rgb(0xa6, 0xdb, 0xa0),
    Color::rgb(0x00, 0x88, 0x37),
];

const BR_BG: [Color; CLASS_COUNT] = [
    Color::rgb(0xa6, 0x61, 0x1a),
    Color::rgb(0xdf, 0xc2, 0x7d),
    Color::rgb(0xf5, 0xf5, 0xf5),
    Color::rgb(0x80, 0xcd, 0xc1),
    Color::rgb(0x01, 0x85, 0x71),
];

const RD_YL_BU: [Color; CLASS_COUNT] = [
    Color::rgb(0xd7, 0x19, 0x1c),
    Color::rgb(0xfd, 0xae, 0x61),
    Color::rgb(0xff, 0xff, 0xbf),
    Color::rgb(0xab, 0xd9, 0xe9),
    Color::rgb(0x2c, 0x7b, 0xb6),
];

const YL_GN_BU: [Color; CLASS_COUNT] = [
    Color::rgb(0xff, 0xff, 0xcc),
    Color::rgb(0xa1, 0xda, 0xb4),
    Color::rgb(0x41, 0xb6, 0xc4),
    Color::rgb(0x2c, 0x7f, 0xb8),
    Color::rgb(0x25, 0x34, 0x94),
];

const PU_RD: [Color; CLASS_COUNT] = [
    Color::rgb(0xf1, 0xee, 0xf6),
    Color::rgb(0xd7, 0xb5, 0xd8),
    Color::rgb(0xdf, 0x65, 0xb0),
    Color::rgb(0xdd, 0x1c, 0x77),
    Color::rgb(0x98, 0x00, 0x43),
];

const YL_GN: [Color; CLASS_COUNT] = [
    Color::rgb(0xff, 0xff, 0xcc),
    Color::rgb(0xc2, 0xe6, 0x99),
    Color::rgb(0x78, 0xc6, 0x79),
    Color::rgb(0x31, 0xa3, 0x54),
    Color::rgb(0x00, 0x68, 0x37),
];

const RD_PU: [Color; CLASS_COUNT] = [
    Color::rgb(0xfe, 0xeb, 0xe2),
    Color::rgb(0xfb, 0xb4, 0xb9),
    Color::rgb(0xf7, 0x68, 0xa1),
    Color::rgb(0xc5, 0x1b, 0x8a),
    Color::rgb(0x7a, 0x01, 0x77),
];

const GN_BU: [Color; CLASS_COUNT] = [
    Color::rgb(0xf0, 0xf9, 0xe8),
    Color::rgb(0xba, 0xe4, 0xbc),
    Color::rgb(0x7b, 0xcc, 0xc4),
    Color::rgb(0x43, 0xa2, 0xca),
    Color::rgb(0x08, 0x68, 0xac),
];

/// 9-step `ColorBrewer` Greys, white to black.
pub const GREYS: [Color; 9] = [
    Color::rgb(0xff, 0xff, 0xff),
    Color::rgb(0xf0, 0xf0, 0xf0),
    Color::rgb(0xd9, 0xd9, 0xd9),
    Color::rgb(0xbd, 0xbd, 0xbd),
    Color::rgb(0x96, 0x96, 0x96),
    Color::rgb(0x73, 0x73, 0x73),
    Color::rgb(0x52, 0x52, 0x52),
    Color::rgb(0x25, 0x25, 0x25),
    Color::rgb(0x00, 0x00, 0x00),
];

/// Reserved swatch for features whose value is absent.
pub const NO_DATA: Color = GREYS[1];
