//! RGB/HSL conversion and the HSL bands that identify a garment's original cloth.

use palette::{FromColor, Hsl, Srgb};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Hue in degrees `[0, 360)`, saturation and lightness in percent `[0, 100]`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct HslColor {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

/// Inclusive HSL ranges. `hue_min > hue_max` wraps through 0/360 (reds).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorBand {
    pub hue_min: f32,
    pub hue_max: f32,
    pub sat_min: f32,
    pub sat_max: f32,
    pub light_min: f32,
    pub light_max: f32,
}

impl ColorBand {
    pub const fn new(
        hue_min: f32,
        hue_max: f32,
        sat_min: f32,
        sat_max: f32,
        light_min: f32,
        light_max: f32,
    ) -> Self {
        Self {
            hue_min,
            hue_max,
            sat_min,
            sat_max,
            light_min,
            light_max,
        }
    }

    pub fn is_valid(&self) -> bool {
        [
            self.hue_min,
            self.hue_max,
            self.sat_min,
            self.sat_max,
            self.light_min,
            self.light_max,
        ]
        .iter()
        .all(|v| v.is_finite())
            && self.sat_min <= self.sat_max
            && self.light_min <= self.light_max
    }

    pub fn contains(&self, color: HslColor) -> bool {
        let hue_ok = if self.hue_min <= self.hue_max {
            color.h >= self.hue_min && color.h <= self.hue_max
        } else {
            color.h >= self.hue_min || color.h <= self.hue_max
        };

        hue_ok
            && color.s >= self.sat_min
            && color.s <= self.sat_max
            && color.l >= self.light_min
            && color.l <= self.light_max
    }

    /// Position of `l` inside the band's lightness range, 0.5 for a zero-width band.
    pub fn relative_lightness(&self, l: f32) -> f32 {
        let span = self.light_max - self.light_min;
        if span.abs() <= f32::EPSILON {
            return 0.5;
        }
        (l - self.light_min) / span
    }
}

pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> HslColor {
    let srgb = Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    let hsl: Hsl = Hsl::from_color(srgb);

    let mut h = hsl.hue.into_positive_degrees();
    if !(0.0..360.0).contains(&h) {
        h = 0.0;
    }

    HslColor {
        h,
        s: (hsl.saturation * 100.0).clamp(0.0, 100.0),
        l: (hsl.lightness * 100.0).clamp(0.0, 100.0),
    }
}

pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [u8; 3] {
    let hsl: Hsl = Hsl::new(
        h.rem_euclid(360.0),
        (s / 100.0).clamp(0.0, 1.0),
        (l / 100.0).clamp(0.0, 1.0),
    );
    let rgb: Srgb<f32> = Srgb::from_color(hsl);
    let rgb: Srgb<u8> = rgb.into_format();
    [rgb.red, rgb.green, rgb.blue]
}

fn hex_pattern() -> Option<&'static Regex> {
    static HEX_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    HEX_PATTERN
        .get_or_init(|| Regex::new(r"^#?([a-fA-F\d]{2})([a-fA-F\d]{2})([a-fA-F\d]{2})$").ok())
        .as_ref()
}

/// Parses `#rrggbb` / `rrggbb`. Anything else (shorthand, names, rgb()) is rejected.
pub fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let caps = hex_pattern()?.captures(hex.trim())?;
    let channel = |i: usize| u8::from_str_radix(caps.get(i)?.as_str(), 16).ok();
    Some([channel(1)?, channel(2)?, channel(3)?])
}

pub fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Every channel at or above `threshold`.
pub fn is_near_white(rgb: [u8; 3], threshold: u8) -> bool {
    rgb.iter().all(|&c| c >= threshold)
}
