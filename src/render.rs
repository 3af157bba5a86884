use crate::geometry::FrameScale;
use crate::parts::{PartId, PartRegistry};
use crate::recolor::recolor;
use crate::texture::{apply_textures, TextureInput};
use crate::texture_cache::{TextureCache, TextureSource};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    /// Width of the frame the part polygons are authored in.
    pub reference_width: f32,
    pub reference_height: f32,
    /// Lightness range (in HSL percent) spread around the requested color.
    pub lightness_spread: f32,
    /// Longest side of a tiled texture patch.
    pub texture_tile_cap: u32,
    /// A pixel with every channel at or above this is near-white.
    pub near_white_threshold: u8,
    /// Requested colors at or above this lightness count as near-white.
    pub near_white_lightness: f32,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RenderPreset {
    Standard,
    FlatShading,
    HighContrast,
}

impl RenderConfig {
    /// Standard: tuned for the reference costume artwork.
    pub fn standard() -> Self {
        Self {
            reference_width: 1000.0,
            reference_height: 1400.0,
            lightness_spread: 15.0,
            texture_tile_cap: 200,
            near_white_threshold: 245,
            near_white_lightness: 95.0,
        }
    }

    /// FlatShading: every recolored pixel gets exactly the requested color.
    pub fn flat_shading() -> Self {
        Self {
            lightness_spread: 0.0,
            ..Self::standard()
        }
    }

    /// HighContrast: exaggerates folds and shadows of the source cloth.
    pub fn high_contrast() -> Self {
        Self {
            lightness_spread: 30.0,
            ..Self::standard()
        }
    }

    pub fn from_preset(preset: RenderPreset) -> Self {
        match preset {
            RenderPreset::Standard => Self::standard(),
            RenderPreset::FlatShading => Self::flat_shading(),
            RenderPreset::HighContrast => Self::high_contrast(),
        }
    }

    pub fn frame_scale(&self, width: u32, height: u32) -> FrameScale {
        FrameScale::between(self.reference_width, self.reference_height, width, height)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotRegistered,
    InvalidColor,
    MissingColorBand,
    NearWhiteRequest,
    MissingRegion,
    RegionOutsideImage,
    EmptyTexture,
    /// A texture request for the same part takes precedence over its color.
    SupersededByTexture,
    TextureDecodeFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedPart {
    pub part: PartId,
    pub reason: SkipReason,
}

impl SkippedPart {
    pub fn new(part: PartId, reason: SkipReason) -> Self {
        Self { part, reason }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderReport {
    pub width: u32,
    pub height: u32,
    pub recolored_pixels: usize,
    pub textured_pixels: usize,
    pub textured_parts: Vec<PartId>,
    pub recolored_parts: Vec<PartId>,
    pub skipped: Vec<SkippedPart>,
    pub processing_time_ms: u64,
}

impl RenderReport {
    pub fn changed(&self) -> bool {
        self.recolored_pixels > 0 || self.textured_pixels > 0
    }
}

#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub image: RgbaImage,
    pub report: RenderReport,
}

pub fn render(
    source: &RgbaImage,
    colors: &HashMap<PartId, String>,
    textures: &HashMap<PartId, TextureSource>,
    cache: &mut TextureCache,
    config: &RenderConfig,
) -> Result<RenderOutput, String> {
    render_with_registry(source, colors, textures, cache, config, PartRegistry::global())
}

/// Composites texture and color requests onto a copy of `source`.
///
/// Textures are stamped first; colors then apply only to parts without a
/// texture request, and never inside the region of a textured part. Per-part
/// problems are reported in the returned report instead of failing the render.
pub fn render_with_registry(
    source: &RgbaImage,
    colors: &HashMap<PartId, String>,
    textures: &HashMap<PartId, TextureSource>,
    cache: &mut TextureCache,
    config: &RenderConfig,
    registry: &PartRegistry,
) -> Result<RenderOutput, String> {
    let timing_enabled = render_timing_enabled();
    let t_total = Instant::now();
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Err("Source image dimensions must be non-zero".to_string());
    }

    let scale = config.frame_scale(width, height);
    let mut report = RenderReport {
        width,
        height,
        ..RenderReport::default()
    };

    if textures.is_empty() {
        let t_recolor = Instant::now();
        let outcome = recolor(source.clone(), colors, registry, scale, config, None);
        let recolor_ms = t_recolor.elapsed().as_millis() as u64;

        report.recolored_pixels = outcome.changed_pixels;
        report.recolored_parts = outcome.recolored_parts;
        report.skipped = outcome.skipped;
        report.processing_time_ms = t_total.elapsed().as_millis() as u64;
        if timing_enabled {
            log::debug!(
                "Render timing {}x{} recolor={}ms total={}ms",
                width,
                height,
                recolor_ms,
                report.processing_time_ms
            );
        }
        log_summary(&report);
        return Ok(RenderOutput {
            image: outcome.image,
            report,
        });
    }

    let t_decode = Instant::now();
    let decoded = cache.load_all(textures.values());
    let decode_ms = t_decode.elapsed().as_millis() as u64;

    let mut inputs: HashMap<PartId, TextureInput> = HashMap::new();
    let mut texture_ids: Vec<PartId> = textures.keys().copied().collect();
    texture_ids.sort();
    for id in texture_ids {
        let Some(texture) = textures.get(&id) else {
            continue;
        };
        let loaded = decoded
            .get(&texture.asset_id)
            .cloned()
            .unwrap_or_else(|| Err(format!("Texture {:?} was not loaded", texture.asset_id)));
        match loaded {
            Ok(image) => {
                inputs.insert(
                    id,
                    TextureInput {
                        asset_id: texture.asset_id.clone(),
                        image,
                    },
                );
            }
            Err(err) => {
                log::warn!("Skipping texture for {}: {}", id, err);
                report
                    .skipped
                    .push(SkippedPart::new(id, SkipReason::TextureDecodeFailed(err)));
            }
        }
    }

    let t_stamp = Instant::now();
    let textured = apply_textures(source.clone(), &inputs, registry, scale, config);
    let stamp_ms = t_stamp.elapsed().as_millis() as u64;
    report.textured_pixels = textured.changed_pixels;
    report.textured_parts = textured.textured_parts;
    report.skipped.extend(textured.skipped);

    let mut color_only: HashMap<PartId, String> = HashMap::new();
    let mut superseded: Vec<PartId> = Vec::new();
    for (id, hex) in colors {
        if textures.contains_key(id) {
            superseded.push(*id);
        } else {
            color_only.insert(*id, hex.clone());
        }
    }
    superseded.sort();
    for id in superseded {
        log::debug!("{} has both a color and a texture; texture wins", id);
        report
            .skipped
            .push(SkippedPart::new(id, SkipReason::SupersededByTexture));
    }

    let t_recolor = Instant::now();
    let outcome = recolor(
        textured.image,
        &color_only,
        registry,
        scale,
        config,
        Some(&textured.claimed),
    );
    let recolor_ms = t_recolor.elapsed().as_millis() as u64;
    report.recolored_pixels = outcome.changed_pixels;
    report.recolored_parts = outcome.recolored_parts;
    report.skipped.extend(outcome.skipped);

    let image = if report.changed() {
        outcome.image
    } else {
        source.clone()
    };

    report.processing_time_ms = t_total.elapsed().as_millis() as u64;
    if timing_enabled {
        log::debug!(
            "Render timing {}x{} textures={} decode={}ms stamp={}ms recolor={}ms total={}ms",
            width,
            height,
            inputs.len(),
            decode_ms,
            stamp_ms,
            recolor_ms,
            report.processing_time_ms
        );
    }
    log_summary(&report);

    Ok(RenderOutput { image, report })
}

fn log_summary(report: &RenderReport) {
    log::info!(
        "Rendered {}x{}: {} recolored px ({:?}), {} textured px ({:?}), {} skipped in {}ms",
        report.width,
        report.height,
        report.recolored_pixels,
        report.recolored_parts,
        report.textured_pixels,
        report.textured_parts,
        report.skipped.len(),
        report.processing_time_ms
    );
}

fn render_timing_enabled() -> bool {
    matches!(
        std::env::var("KROJ_DEBUG_TIMING").as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes") | Ok("YES")
    )
}
