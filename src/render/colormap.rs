//! Supported color maps.
//!
//! Each map is a short list of evenly spaced control colors, linearly
//! interpolated in RGB. The stops follow the matplotlib maps of the same name
//! closely enough for coloring words.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// `#rrggbb` notation.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(
            mix(self.0, other.0),
            mix(self.1, other.1),
            mix(self.2, other.2),
        )
    }
}

/// Named color mapping used to color words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMap {
    #[default]
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Cividis,
    Greys,
    Blues,
    Greens,
    Reds,
    Oranges,
    Purples,
    Coolwarm,
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl ColorMap {
    /// Every supported map, in display order.
    pub const ALL: [ColorMap; 16] = [
        ColorMap::Viridis,
        ColorMap::Plasma,
        ColorMap::Inferno,
        ColorMap::Magma,
        ColorMap::Cividis,
        ColorMap::Greys,
        ColorMap::Blues,
        ColorMap::Greens,
        ColorMap::Reds,
        ColorMap::Oranges,
        ColorMap::Purples,
        ColorMap::Coolwarm,
        ColorMap::Spring,
        ColorMap::Summer,
        ColorMap::Autumn,
        ColorMap::Winter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorMap::Viridis => "viridis",
            ColorMap::Plasma => "plasma",
            ColorMap::Inferno => "inferno",
            ColorMap::Magma => "magma",
            ColorMap::Cividis => "cividis",
            ColorMap::Greys => "greys",
            ColorMap::Blues => "blues",
            ColorMap::Greens => "greens",
            ColorMap::Reds => "reds",
            ColorMap::Oranges => "oranges",
            ColorMap::Purples => "purples",
            ColorMap::Coolwarm => "coolwarm",
            ColorMap::Spring => "spring",
            ColorMap::Summer => "summer",
            ColorMap::Autumn => "autumn",
            ColorMap::Winter => "winter",
        }
    }

    fn stops(self) -> &'static [Rgb] {
        match self {
            ColorMap::Viridis => &[
                Rgb(0x44, 0x01, 0x54),
                Rgb(0x3b, 0x52, 0x8b),
                Rgb(0x21, 0x91, 0x8c),
                Rgb(0x5e, 0xc9, 0x62),
                Rgb(0xfd, 0xe7, 0x25),
            ],
            ColorMap::Plasma => &[
                Rgb(0x0d, 0x08, 0x87),
                Rgb(0x7e, 0x03, 0xa8),
                Rgb(0xcc, 0x47, 0x78),
                Rgb(0xf8, 0x95, 0x40),
                Rgb(0xf0, 0xf9, 0x21),
            ],
            ColorMap::Inferno => &[
                Rgb(0x00, 0x00, 0x04),
                Rgb(0x57, 0x10, 0x6e),
                Rgb(0xbc, 0x37, 0x54),
                Rgb(0xf9, 0x8e, 0x09),
                Rgb(0xfc, 0xff, 0xa4),
            ],
            ColorMap::Magma => &[
                Rgb(0x00, 0x00, 0x04),
                Rgb(0x51, 0x12, 0x7c),
                Rgb(0xb7, 0x37, 0x79),
                Rgb(0xfc, 0x89, 0x61),
                Rgb(0xfc, 0xfd, 0xbf),
            ],
            ColorMap::Cividis => &[
                Rgb(0x00, 0x22, 0x4e),
                Rgb(0x35, 0x45, 0x6c),
                Rgb(0x66, 0x69, 0x70),
                Rgb(0x94, 0x8e, 0x77),
                Rgb(0xc8, 0xb8, 0x66),
                Rgb(0xfe, 0xe8, 0x38),
            ],
            ColorMap::Greys => &[Rgb(0xff, 0xff, 0xff), Rgb(0x00, 0x00, 0x00)],
            ColorMap::Blues => &[Rgb(0xf7, 0xfb, 0xff), Rgb(0x08, 0x30, 0x6b)],
            ColorMap::Greens => &[Rgb(0xf7, 0xfc, 0xf5), Rgb(0x00, 0x44, 0x1b)],
            ColorMap::Reds => &[Rgb(0xff, 0xf5, 0xf0), Rgb(0x67, 0x00, 0x0d)],
            ColorMap::Oranges => &[Rgb(0xff, 0xf5, 0xeb), Rgb(0x7f, 0x27, 0x04)],
            ColorMap::Purples => &[Rgb(0xfc, 0xfb, 0xfd), Rgb(0x3f, 0x00, 0x7d)],
            ColorMap::Coolwarm => &[
                Rgb(0x3b, 0x4c, 0xc0),
                Rgb(0xdd, 0xdd, 0xdd),
                Rgb(0xb4, 0x04, 0x26),
            ],
            ColorMap::Spring => &[Rgb(0xff, 0x00, 0xff), Rgb(0xff, 0xff, 0x00)],
            ColorMap::Summer => &[Rgb(0x00, 0x80, 0x66), Rgb(0xff, 0xff, 0x66)],
            ColorMap::Autumn => &[Rgb(0xff, 0x00, 0x00), Rgb(0xff, 0xff, 0x00)],
            ColorMap::Winter => &[Rgb(0x00, 0x00, 0xff), Rgb(0x00, 0xff, 0x80)],
        }
    }

    /// Color at position `t` in `[0, 1]`; values outside are clamped.
    pub fn sample(self, t: f64) -> Rgb {
        let stops = self.stops();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let scaled = t * (stops.len() - 1) as f64;
        let idx = (scaled.floor() as usize).min(stops.len() - 2);
        stops[idx].lerp(stops[idx + 1], scaled - idx as f64)
    }
}

impl fmt::Display for ColorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned for names outside [`ColorMap::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported color map: {0}")]
pub struct UnknownColorMap(pub String);

impl FromStr for ColorMap {
    type Err = UnknownColorMap;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ColorMap::ALL
            .into_iter()
            .find(|map| map.name() == lower)
            .ok_or_else(|| UnknownColorMap(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for map in ColorMap::ALL {
            assert_eq!(map.name().parse::<ColorMap>(), Ok(map));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Viridis".parse::<ColorMap>(), Ok(ColorMap::Viridis));
        assert_eq!("GREYS".parse::<ColorMap>(), Ok(ColorMap::Greys));
        assert!("jet".parse::<ColorMap>().is_err());
        assert!("".parse::<ColorMap>().is_err());
    }

    #[test]
    fn test_sample_endpoints() {
        assert_eq!(ColorMap::Viridis.sample(0.0), Rgb(0x44, 0x01, 0x54));
        assert_eq!(ColorMap::Viridis.sample(1.0), Rgb(0xfd, 0xe7, 0x25));
        assert_eq!(ColorMap::Greys.sample(0.5), Rgb(0x80, 0x80, 0x80));
    }

    #[test]
    fn test_sample_clamps() {
        assert_eq!(ColorMap::Reds.sample(-1.0), ColorMap::Reds.sample(0.0));
        assert_eq!(ColorMap::Reds.sample(7.0), ColorMap::Reds.sample(1.0));
        assert_eq!(ColorMap::Reds.sample(f64::NAN), ColorMap::Reds.sample(0.0));
    }

    #[test]
    fn test_hex() {
        assert_eq!(Rgb(0, 128, 255).to_hex(), "#0080ff");
    }
}
