//! Garment part registry: region polygons, original-cloth color bands and the
//! per-part policy record the engines consult.

use crate::color::ColorBand;
use crate::geometry::Polygon;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartId {
    /// Skirt.
    Sukne,
    /// Apron.
    Fjertuch,
    /// Headscarf.
    Satek,
    /// Ribbons.
    Pantle,
}

impl PartId {
    pub const ALL: [PartId; 4] = [
        PartId::Sukne,
        PartId::Fjertuch,
        PartId::Satek,
        PartId::Pantle,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PartId::Sukne => "sukne",
            PartId::Fjertuch => "fjertuch",
            PartId::Satek => "satek",
            PartId::Pantle => "pantle",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        PartId::ALL
            .into_iter()
            .find(|id| id.key().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// How a texture image becomes the patch stamped into a region.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum TextureLayout {
    /// Downscale to the configured cap and repeat in both directions.
    Tiled,
    /// Stretch to the region height; wrap horizontally, no vertical repeat.
    Stretched,
    /// Optional crop, rotate, then lay out like `Stretched`.
    Accessory { rotation_degrees: f32 },
}

/// Which destination pixels inside the polygon a texture may replace.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextureGate {
    /// Any non-transparent pixel.
    AlphaOnly,
    /// Leaves near-white background pixels so the cutout silhouette stays.
    SkipNearWhite,
    /// Only pixels inside the part's color band; embroidery and shadows stay.
    ColorBand,
}

/// Texture-local crop polygon for an asset id, normalized to `0..1` of the texture.
pub type CropLookup = fn(&str) -> Option<Polygon>;

#[derive(Copy, Clone)]
pub struct PartPolicy {
    /// Higher values sit on top where regions overlap.
    pub z_order: u8,
    /// Requested near-white colors leave the part untouched.
    pub skip_near_white_color: bool,
    pub texture_layout: TextureLayout,
    pub texture_gate: TextureGate,
    pub texture_crop: Option<CropLookup>,
}

impl fmt::Debug for PartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartPolicy")
            .field("z_order", &self.z_order)
            .field("skip_near_white_color", &self.skip_near_white_color)
            .field("texture_layout", &self.texture_layout)
            .field("texture_gate", &self.texture_gate)
            .field("texture_crop", &self.texture_crop.is_some())
            .finish()
    }
}

/// `region: None` means "whole image" for recoloring; textures need a region.
/// `color_band: None` means nothing matches.
#[derive(Debug, Clone)]
pub struct PartDefinition {
    pub id: PartId,
    pub display_name: &'static str,
    pub color_band: Option<ColorBand>,
    pub region: Option<Polygon>,
    pub policy: PartPolicy,
}

impl PartDefinition {
    pub fn valid_band(&self) -> Option<ColorBand> {
        self.color_band.filter(ColorBand::is_valid)
    }

    pub fn valid_region(&self) -> Option<&Polygon> {
        self.region.as_ref().filter(|poly| poly.is_valid())
    }
}

impl fmt::Display for PartDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.id)
    }
}

pub struct PartRegistry {
    parts: Vec<PartDefinition>,
}

static CACHED_REGISTRY: OnceLock<PartRegistry> = OnceLock::new();

impl PartRegistry {
    /// Built-in parts for the reference costume artwork (1000x1400 frame).
    pub fn global() -> &'static Self {
        CACHED_REGISTRY.get_or_init(Self::builtin)
    }

    pub fn new(parts: Vec<PartDefinition>) -> Self {
        Self { parts }
    }

    fn builtin() -> Self {
        Self::new(vec![
            PartDefinition {
                id: PartId::Sukne,
                display_name: "Sukně",
                color_band: Some(ColorBand::new(340.0, 20.0, 30.0, 100.0, 20.0, 75.0)),
                region: Some(Polygon::from_pairs(&[
                    (60.0, 840.0),
                    (240.0, 840.0),
                    (262.0, 1050.0),
                    (272.0, 1255.0),
                    (28.0, 1255.0),
                    (38.0, 1050.0),
                ])),
                policy: PartPolicy {
                    z_order: 0,
                    skip_near_white_color: false,
                    texture_layout: TextureLayout::Stretched,
                    texture_gate: TextureGate::ColorBand,
                    texture_crop: None,
                },
            },
            PartDefinition {
                id: PartId::Fjertuch,
                display_name: "Fjertuch",
                color_band: Some(ColorBand::new(80.0, 160.0, 20.0, 100.0, 15.0, 75.0)),
                region: Some(Polygon::from_pairs(&[
                    (330.0, 700.0),
                    (720.0, 700.0),
                    (745.0, 950.0),
                    (760.0, 1250.0),
                    (290.0, 1250.0),
                    (305.0, 950.0),
                ])),
                policy: PartPolicy {
                    z_order: 1,
                    skip_near_white_color: false,
                    texture_layout: TextureLayout::Tiled,
                    texture_gate: TextureGate::SkipNearWhite,
                    texture_crop: None,
                },
            },
            PartDefinition {
                id: PartId::Satek,
                display_name: "Šátek",
                color_band: Some(ColorBand::new(20.0, 40.0, 10.0, 50.0, 50.0, 85.0)),
                region: Some(Polygon::from_pairs(&[
                    (320.0, 100.0),
                    (680.0, 100.0),
                    (750.0, 300.0),
                    (720.0, 500.0),
                    (280.0, 500.0),
                    (250.0, 300.0),
                ])),
                policy: PartPolicy {
                    z_order: 2,
                    skip_near_white_color: true,
                    texture_layout: TextureLayout::Tiled,
                    texture_gate: TextureGate::ColorBand,
                    texture_crop: None,
                },
            },
            PartDefinition {
                id: PartId::Pantle,
                display_name: "Pantle",
                color_band: Some(ColorBand::new(45.0, 70.0, 55.0, 100.0, 40.0, 85.0)),
                region: Some(Polygon::from_pairs(&[
                    (625.0, 550.0),
                    (695.0, 556.0),
                    (700.0, 650.0),
                    (618.0, 644.0),
                ])),
                policy: PartPolicy {
                    z_order: 3,
                    skip_near_white_color: false,
                    texture_layout: TextureLayout::Accessory {
                        rotation_degrees: 80.0,
                    },
                    texture_gate: TextureGate::AlphaOnly,
                    texture_crop: Some(ribbon_crop),
                },
            },
        ])
    }

    pub fn get(&self, id: PartId) -> Option<&PartDefinition> {
        self.parts.iter().find(|part| part.id == id)
    }

    /// Registered parts among `ids`, lowest z first. Ties break on `PartId` order.
    pub fn by_z_order<I>(&self, ids: I) -> Vec<&PartDefinition>
    where
        I: IntoIterator<Item = PartId>,
    {
        let mut selected: Vec<&PartDefinition> =
            ids.into_iter().filter_map(|id| self.get(id)).collect();
        selected.sort_by_key(|part| (part.policy.z_order, part.id));
        selected.dedup_by_key(|part| part.id);
        selected
    }
}

/// Ribbon swatches are photographed as a single loop of ribbon on a plain
/// background; each entry outlines the usable straight run of ribbon.
const RIBBON_CROPS: &[(&str, &[(f32, f32)])] = &[
    (
        "pantle_cervena",
        &[(0.18, 0.10), (0.46, 0.08), (0.52, 0.92), (0.24, 0.94)],
    ),
    (
        "pantle_modra",
        &[(0.22, 0.06), (0.50, 0.06), (0.54, 0.90), (0.26, 0.92)],
    ),
    (
        "pantle_zelena",
        &[(0.30, 0.12), (0.58, 0.10), (0.60, 0.88), (0.32, 0.90)],
    ),
    (
        "pantle_bila",
        &[(0.20, 0.10), (0.50, 0.10), (0.50, 0.90), (0.20, 0.90)],
    ),
];

fn ribbon_crop(asset_id: &str) -> Option<Polygon> {
    let asset_id = asset_id.to_ascii_lowercase();
    RIBBON_CROPS
        .iter()
        .find(|(key, _)| asset_id.contains(key))
        .map(|(_, points)| Polygon::from_pairs(points))
}
