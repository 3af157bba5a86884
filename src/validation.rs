//! Swatch color extraction, color-name classification and the combination
//! rule table that decides whether a chosen costume is traditional.

use crate::color::{parse_hex, rgb_to_hex};
use crate::parts::PartId;
use image::RgbaImage;
use palette::{color_difference::Ciede2000, white_point::D65, FromColor, Lab, Srgb};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

const OPAQUE_ALPHA: u8 = 200;
const FALLBACK_COLOR: [u8; 3] = [0x88, 0x88, 0x88];
/// Largest CIEDE2000 distance at which a color still takes a swatch's name.
const MAX_NAMED_DELTA_E: f32 = 25.0;

pub const INCOMPLETE_SELECTION_MESSAGE: &str =
    "Nejdříve vyberte všechny části kroje (sukně, fjertuch, šátek i pantle).";

/// Average RGB of the clearly opaque pixels (alpha > 200), `#888888` if none.
pub fn dominant_color(image: &RgbaImage) -> [u8; 3] {
    let (r, g, b, count) = image
        .as_raw()
        .par_chunks_exact(4)
        .filter(|px| px[3] > OPAQUE_ALPHA)
        .fold(
            || (0u64, 0u64, 0u64, 0u64),
            |acc, px| {
                (
                    acc.0 + px[0] as u64,
                    acc.1 + px[1] as u64,
                    acc.2 + px[2] as u64,
                    acc.3 + 1,
                )
            },
        )
        .reduce(
            || (0, 0, 0, 0),
            |a, b| (a.0 + b.0, a.1 + b.1, a.2 + b.2, a.3 + b.3),
        );

    if count == 0 {
        return FALLBACK_COLOR;
    }
    [(r / count) as u8, (g / count) as u8, (b / count) as u8]
}

pub fn dominant_color_hex(image: &RgbaImage) -> String {
    rgb_to_hex(dominant_color(image))
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Red,
    White,
    Yellow,
    Blue,
    Green,
    Pink,
    Purple,
    Colorful,
    Unknown,
}

impl ColorTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorTag::Red => "red",
            ColorTag::White => "white",
            ColorTag::Yellow => "yellow",
            ColorTag::Blue => "blue",
            ColorTag::Green => "green",
            ColorTag::Pink => "pink",
            ColorTag::Purple => "purple",
            ColorTag::Colorful => "colorful",
            ColorTag::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ColorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant swatch colors used by the costume artwork.
const NAMED_SWATCHES: &[(&str, ColorTag)] = &[
    ("#dc2626", ColorTag::Red),
    ("#ef4444", ColorTag::Red),
    ("#b91c1c", ColorTag::Red),
    ("#ffffff", ColorTag::White),
    ("#f9fafb", ColorTag::White),
    ("#fafafa", ColorTag::White),
    ("#eab308", ColorTag::Yellow),
    ("#fbbf24", ColorTag::Yellow),
    ("#f59e0b", ColorTag::Yellow),
    ("#3b82f6", ColorTag::Blue),
    ("#2563eb", ColorTag::Blue),
    ("#1d4ed8", ColorTag::Blue),
    ("#22c55e", ColorTag::Green),
    ("#16a34a", ColorTag::Green),
    ("#15803d", ColorTag::Green),
    ("#ec4899", ColorTag::Pink),
    ("#db2777", ColorTag::Pink),
    ("#be185d", ColorTag::Pink),
    ("#a855f7", ColorTag::Purple),
    ("#9333ea", ColorTag::Purple),
    ("#7c3aed", ColorTag::Purple),
];

/// Swatch table with precomputed LAB values
struct SwatchPalette {
    swatches: Vec<([u8; 3], ColorTag, Lab<D65, f32>)>,
}

static CACHED_SWATCHES: OnceLock<SwatchPalette> = OnceLock::new();

impl SwatchPalette {
    fn global() -> &'static Self {
        CACHED_SWATCHES.get_or_init(Self::new)
    }

    fn new() -> Self {
        let swatches = NAMED_SWATCHES
            .iter()
            .filter_map(|(hex, tag)| parse_hex(hex).map(|rgb| (rgb, *tag, rgb_to_lab(rgb))))
            .collect();
        Self { swatches }
    }

    fn exact(&self, rgb: [u8; 3]) -> Option<ColorTag> {
        self.swatches
            .iter()
            .find(|(swatch, _, _)| *swatch == rgb)
            .map(|(_, tag, _)| *tag)
    }

    fn nearest(&self, target: Lab<D65, f32>) -> Option<(ColorTag, f32)> {
        self.swatches
            .iter()
            .map(|(_, tag, lab)| (*tag, target.difference(*lab)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }
}

fn rgb_to_lab(rgb: [u8; 3]) -> Lab<D65, f32> {
    let srgb = Srgb::new(
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    );
    Lab::from_color(srgb)
}

/// How colors that are not an exact swatch get their name.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorMatching {
    /// Fixed per-channel RGB thresholds, `Colorful` when none apply.
    #[default]
    Thresholds,
    /// Closest swatch by CIEDE2000 within a ΔE of 25, else `Colorful`.
    NearestSwatch,
}

/// Names a hex color for rule matching with the default threshold rules.
pub fn classify_color(hex: &str) -> ColorTag {
    classify_color_with(hex, ColorMatching::Thresholds)
}

/// Known swatches map directly; everything else goes through `matching`.
pub fn classify_color_with(hex: &str, matching: ColorMatching) -> ColorTag {
    let Some(rgb) = parse_hex(hex) else {
        return ColorTag::Unknown;
    };
    let palette = SwatchPalette::global();
    if let Some(tag) = palette.exact(rgb) {
        return tag;
    }
    match matching {
        ColorMatching::Thresholds => threshold_tag(rgb),
        ColorMatching::NearestSwatch => match palette.nearest(rgb_to_lab(rgb)) {
            Some((tag, delta_e)) if delta_e <= MAX_NAMED_DELTA_E => tag,
            _ => ColorTag::Colorful,
        },
    }
}

/// Checked in order; the first rule that holds names the color.
fn threshold_tag([r, g, b]: [u8; 3]) -> ColorTag {
    if r > 200 && g < 100 && b < 100 {
        ColorTag::Red
    } else if r > 200 && g > 200 && b < 100 {
        ColorTag::Yellow
    } else if r < 100 && g > 150 && b < 100 {
        ColorTag::Green
    } else if r < 100 && g < 100 && b > 200 {
        ColorTag::Blue
    } else if r > 200 && g < 150 && b > 150 {
        ColorTag::Pink
    } else if r > 230 && g > 230 && b > 230 {
        ColorTag::White
    } else {
        ColorTag::Colorful
    }
}

/// One allowed combination of color names, as written in the rule file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combination {
    pub sukne: String,
    pub fjertuch: String,
    pub satek: String,
    pub pantle: String,
}

impl Combination {
    fn matches(&self, tags: &[ColorTag; 4]) -> bool {
        [&self.sukne, &self.fjertuch, &self.satek, &self.pantle]
            .iter()
            .zip(tags.iter())
            .all(|(expected, tag)| expected.trim().eq_ignore_ascii_case(tag.as_str()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(default)]
    pub allowed_combinations: Vec<Combination>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleMessages {
    #[serde(default)]
    pub success: Vec<String>,
    #[serde(default)]
    pub error: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTable {
    pub validation_rules: ValidationRules,
    #[serde(default)]
    pub messages: RuleMessages,
    #[serde(default)]
    pub color_matching: ColorMatching,
}

/// Swatch colors chosen for each part; `None` until the user picks a variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostumeSelection {
    pub sukne: Option<String>,
    pub fjertuch: Option<String>,
    pub satek: Option<String>,
    pub pantle: Option<String>,
}

impl CostumeSelection {
    pub fn get(&self, part: PartId) -> Option<&str> {
        match part {
            PartId::Sukne => self.sukne.as_deref(),
            PartId::Fjertuch => self.fjertuch.as_deref(),
            PartId::Satek => self.satek.as_deref(),
            PartId::Pantle => self.pantle.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub is_valid: bool,
    pub message: String,
}

impl RuleTable {
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse rule table: {}", e))
    }

    pub fn evaluate(&self, selection: &CostumeSelection) -> Verdict {
        let mut tags = [ColorTag::Unknown; 4];
        for (slot, part) in tags.iter_mut().zip(PartId::ALL) {
            let Some(hex) = selection.get(part) else {
                return Verdict {
                    is_valid: false,
                    message: INCOMPLETE_SELECTION_MESSAGE.to_string(),
                };
            };
            *slot = classify_color_with(hex, self.color_matching);
        }

        let is_valid = self
            .validation_rules
            .allowed_combinations
            .iter()
            .any(|combo| combo.matches(&tags));
        log::debug!("Combination {:?} valid={}", tags, is_valid);

        let messages = if is_valid {
            &self.messages.success
        } else {
            &self.messages.error
        };
        Verdict {
            is_valid,
            message: pick_message(messages, &tags),
        }
    }
}

/// Stable choice among `messages` so the same costume always reads the same.
fn pick_message(messages: &[String], tags: &[ColorTag; 4]) -> String {
    if messages.is_empty() {
        return String::new();
    }
    let seed = tags
        .iter()
        .fold(0usize, |acc, tag| acc.wrapping_mul(31).wrapping_add(*tag as usize));
    messages[seed % messages.len()].clone()
}
