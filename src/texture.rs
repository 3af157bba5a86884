//! Texture stamping: replaces the cloth pixels of a garment region with a
//! prepared patch cut from a variant's texture image.

use crate::color::{is_near_white, rgb_to_hsl, ColorBand};
use crate::geometry::{FrameScale, PixelRect, Polygon};
use crate::parts::{PartDefinition, PartId, PartPolicy, PartRegistry, TextureGate, TextureLayout};
use crate::render::{RenderConfig, SkipReason, SkippedPart};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use std::collections::HashMap;
use std::sync::Arc;

/// A decoded texture and the asset id it was loaded from.
#[derive(Debug, Clone)]
pub struct TextureInput {
    pub asset_id: String,
    pub image: Arc<RgbaImage>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum PatchMapping {
    /// `pixel % patch_size` on absolute raster coordinates, both axes.
    Tiled,
    /// Position relative to the region's bounding box; x wraps, y maps 1:1.
    Relative,
}

/// The prepared working copy of a texture for one part and one raster.
#[derive(Debug, Clone)]
pub struct TexturePatch {
    pub image: RgbaImage,
    mapping: PatchMapping,
}

impl TexturePatch {
    pub fn prepare(
        texture: &RgbaImage,
        asset_id: &str,
        policy: &PartPolicy,
        rect: PixelRect,
        config: &RenderConfig,
    ) -> Option<Self> {
        if texture.width() == 0 || texture.height() == 0 || rect.is_empty() {
            return None;
        }

        match policy.texture_layout {
            TextureLayout::Tiled => Some(Self {
                image: fit_within(texture, config.texture_tile_cap.max(1)),
                mapping: PatchMapping::Tiled,
            }),
            TextureLayout::Stretched => Some(Self {
                image: resize_exact(texture, texture.width(), rect.height()),
                mapping: PatchMapping::Relative,
            }),
            TextureLayout::Accessory { rotation_degrees } => {
                let cropped = policy
                    .texture_crop
                    .and_then(|lookup| lookup(asset_id))
                    .and_then(|crop| crop_to_polygon(texture, &crop));
                if cropped.is_none() {
                    log::debug!("No crop region for {:?}; using the whole texture", asset_id);
                }
                let cropped = cropped.unwrap_or_else(|| texture.clone());
                let rotated = rotate_expanded(&cropped, rotation_degrees);

                let scale = rect.height() as f32 / rotated.height() as f32;
                let width = ((rotated.width() as f32 * scale).round() as u32).max(1);
                Some(Self {
                    image: resize_exact(&rotated, width, rect.height()),
                    mapping: PatchMapping::Relative,
                })
            }
        }
    }

    pub fn sample(&self, x: u32, y: u32, rect: PixelRect) -> [u8; 4] {
        let (pw, ph) = self.image.dimensions();
        let (px, py) = match self.mapping {
            PatchMapping::Tiled => (x % pw, y % ph),
            PatchMapping::Relative => (
                x.saturating_sub(rect.x0) % pw,
                y.saturating_sub(rect.y0).min(ph - 1),
            ),
        };
        self.image.get_pixel(px, py).0
    }
}

pub struct TextureOutcome {
    pub image: RgbaImage,
    /// Row-major, 1 for every pixel inside the region of a textured part.
    pub claimed: Vec<u8>,
    pub changed_pixels: usize,
    pub textured_parts: Vec<PartId>,
    pub skipped: Vec<SkippedPart>,
}

/// Stamps every requested texture into its part's region.
///
/// Parts run sequentially from lowest to highest z-order so the topmost part
/// owns overlapping pixels, and only the polygon's bounding box is visited.
pub fn apply_textures(
    mut image: RgbaImage,
    textures: &HashMap<PartId, TextureInput>,
    registry: &PartRegistry,
    scale: FrameScale,
    config: &RenderConfig,
) -> TextureOutcome {
    let (width, height) = image.dimensions();
    let mut claimed = vec![0u8; width as usize * height as usize];
    let mut changed_pixels = 0usize;
    let mut textured_parts = Vec::new();
    let mut skipped = Vec::new();

    let mut requested: Vec<PartId> = textures.keys().copied().collect();
    requested.sort();
    for id in &requested {
        if registry.get(*id).is_none() {
            skipped.push(SkippedPart::new(*id, SkipReason::NotRegistered));
        }
    }

    for part in registry.by_z_order(requested) {
        let Some(input) = textures.get(&part.id) else {
            continue;
        };
        match stamp_part(&mut image, &mut claimed, part, input, scale, config) {
            Ok(count) => {
                log::debug!(
                    "Stamped {} with {:?}: {} pixels",
                    part,
                    input.asset_id,
                    count
                );
                changed_pixels += count;
                textured_parts.push(part.id);
            }
            Err(reason) => {
                log::warn!("Skipping texture for {}: {:?}", part, reason);
                skipped.push(SkippedPart::new(part.id, reason));
            }
        }
    }

    TextureOutcome {
        image,
        claimed,
        changed_pixels,
        textured_parts,
        skipped,
    }
}

fn stamp_part(
    image: &mut RgbaImage,
    claimed: &mut [u8],
    part: &PartDefinition,
    input: &TextureInput,
    scale: FrameScale,
    config: &RenderConfig,
) -> Result<usize, SkipReason> {
    let region = part.valid_region().ok_or(SkipReason::MissingRegion)?;
    let bounds = region.bounds().ok_or(SkipReason::MissingRegion)?;
    let (width, height) = image.dimensions();
    let rect = scale.to_pixel_rect(&bounds, width, height);
    if rect.is_empty() {
        return Err(SkipReason::RegionOutsideImage);
    }

    let band = match part.policy.texture_gate {
        TextureGate::ColorBand => Some(part.valid_band().ok_or(SkipReason::MissingColorBand)?),
        TextureGate::AlphaOnly | TextureGate::SkipNearWhite => None,
    };

    let patch =
        TexturePatch::prepare(&input.image, &input.asset_id, &part.policy, rect, config)
            .ok_or(SkipReason::EmptyTexture)?;

    let mut count = 0usize;
    for y in rect.y0..rect.y1 {
        for x in rect.x0..rect.x1 {
            let (fx, fy) = scale.to_frame(x, y);
            if !region.contains(fx, fy) {
                continue;
            }
            claimed[y as usize * width as usize + x as usize] = 1;

            let dst = image.get_pixel(x, y).0;
            if !passes_gate(dst, part.policy.texture_gate, band.as_ref(), config) {
                continue;
            }

            let sample = patch.sample(x, y, rect);
            if sample[3] == 0 {
                continue;
            }

            image.put_pixel(x, y, Rgba(sample));
            count += 1;
        }
    }

    Ok(count)
}

fn passes_gate(
    dst: [u8; 4],
    gate: TextureGate,
    band: Option<&ColorBand>,
    config: &RenderConfig,
) -> bool {
    if dst[3] == 0 {
        return false;
    }
    let rgb = [dst[0], dst[1], dst[2]];
    match gate {
        TextureGate::AlphaOnly => true,
        TextureGate::SkipNearWhite => !is_near_white(rgb, config.near_white_threshold),
        TextureGate::ColorBand => {
            band.is_some_and(|band| band.contains(rgb_to_hsl(rgb[0], rgb[1], rgb[2])))
        }
    }
}

/// Downscales so neither side exceeds `cap`, keeping aspect. Never upscales.
fn fit_within(texture: &RgbaImage, cap: u32) -> RgbaImage {
    let (w, h) = texture.dimensions();
    if w <= cap && h <= cap {
        return texture.clone();
    }
    let ratio = (cap as f32 / w as f32).min(cap as f32 / h as f32);
    let nw = ((w as f32 * ratio).round() as u32).clamp(1, cap);
    let nh = ((h as f32 * ratio).round() as u32).clamp(1, cap);
    imageops::resize(texture, nw, nh, FilterType::Triangle)
}

fn resize_exact(texture: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if texture.dimensions() == (width, height) {
        return texture.clone();
    }
    imageops::resize(texture, width.max(1), height.max(1), FilterType::Triangle)
}

/// Cuts the bounding box of a normalized (`0..1`) polygon out of `texture`
/// and clears pixels whose centers fall outside the polygon.
fn crop_to_polygon(texture: &RgbaImage, normalized: &Polygon) -> Option<RgbaImage> {
    let (w, h) = texture.dimensions();
    let polygon = normalized.scaled(w as f32, h as f32);
    let bounds = polygon.bounds()?;

    let x0 = bounds.min_x.floor().max(0.0) as u32;
    let y0 = bounds.min_y.floor().max(0.0) as u32;
    let x1 = (bounds.max_x.ceil().max(0.0) as u32).min(w);
    let y1 = (bounds.max_y.ceil().max(0.0) as u32).min(h);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let mut cropped = imageops::crop_imm(texture, x0, y0, x1 - x0, y1 - y0).to_image();
    let mut kept = 0usize;
    for (cx, cy, px) in cropped.enumerate_pixels_mut() {
        let sx = (x0 + cx) as f32 + 0.5;
        let sy = (y0 + cy) as f32 + 0.5;
        if polygon.contains(sx, sy) {
            kept += 1;
        } else {
            *px = Rgba([0, 0, 0, 0]);
        }
    }

    (kept > 0).then_some(cropped)
}

/// Rotates about the center onto a canvas large enough to hold every corner.
fn rotate_expanded(patch: &RgbaImage, degrees: f32) -> RgbaImage {
    let theta = degrees.to_radians();
    let (w, h) = (patch.width() as f32, patch.height() as f32);
    let (sin, cos) = theta.sin_cos();
    let out_w = ((w * cos.abs() + h * sin.abs()).ceil() as u32).max(1);
    let out_h = ((w * sin.abs() + h * cos.abs()).ceil() as u32).max(1);

    let projection = Projection::translate(-w / 2.0, -h / 2.0)
        .and_then(Projection::rotate(theta))
        .and_then(Projection::translate(out_w as f32 / 2.0, out_h as f32 / 2.0));

    let mut out = RgbaImage::new(out_w, out_h);
    warp_into(
        patch,
        &projection,
        Interpolation::Bilinear,
        Rgba([0, 0, 0, 0]),
        &mut out,
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::hsl_to_rgb;
    use crate::parts::CropLookup;

    fn policy(layout: TextureLayout, gate: TextureGate, crop: Option<CropLookup>) -> PartPolicy {
        PartPolicy {
            z_order: 0,
            skip_near_white_color: false,
            texture_layout: layout,
            texture_gate: gate,
            texture_crop: crop,
        }
    }

    fn registry_with(region: Polygon, policy: PartPolicy, band: Option<ColorBand>) -> PartRegistry {
        PartRegistry::new(vec![PartDefinition {
            id: PartId::Fjertuch,
            display_name: "test",
            color_band: band,
            region: Some(region),
            policy,
        }])
    }

    /// Every pixel distinct so sampled positions can be read back.
    fn coordinate_texture(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| Rgba([x as u8 * 10, y as u8 * 10, 200, 255]))
    }

    fn single(texture: RgbaImage, asset_id: &str) -> HashMap<PartId, TextureInput> {
        let mut map = HashMap::new();
        map.insert(
            PartId::Fjertuch,
            TextureInput {
                asset_id: asset_id.to_string(),
                image: Arc::new(texture),
            },
        );
        map
    }

    #[test]
    fn tiled_layout_repeats_patch_inside_polygon_only() {
        let registry = registry_with(
            Polygon::rect(5.0, 5.0, 10.0, 10.0),
            policy(TextureLayout::Tiled, TextureGate::AlphaOnly, None),
            None,
        );
        let source = RgbaImage::from_pixel(20, 20, Rgba([90, 90, 90, 255]));
        let texture = coordinate_texture(3, 3);

        let out = apply_textures(
            source.clone(),
            &single(texture.clone(), "fjertuch_modra"),
            &registry,
            FrameScale::IDENTITY,
            &RenderConfig::default(),
        );

        assert_eq!(out.textured_parts, vec![PartId::Fjertuch]);
        assert_eq!(out.changed_pixels, 100);
        assert_eq!(out.image.get_pixel(7, 11), texture.get_pixel(7 % 3, 11 % 3));
        assert_eq!(out.image.get_pixel(14, 5), texture.get_pixel(14 % 3, 5 % 3));
        assert_eq!(out.image.get_pixel(2, 2), source.get_pixel(2, 2));
        assert_eq!(out.image.get_pixel(15, 10), source.get_pixel(15, 10));
        assert_eq!(out.claimed[11 * 20 + 7], 1);
        assert_eq!(out.claimed[2 * 20 + 2], 0);
    }

    #[test]
    fn tiled_patch_is_capped() {
        let config = RenderConfig {
            texture_tile_cap: 50,
            ..RenderConfig::default()
        };
        let texture = RgbaImage::from_pixel(400, 100, Rgba([10, 20, 30, 255]));
        let patch = TexturePatch::prepare(
            &texture,
            "any",
            &policy(TextureLayout::Tiled, TextureGate::AlphaOnly, None),
            PixelRect { x0: 0, y0: 0, x1: 10, y1: 10 },
            &config,
        )
        .expect("patch prepared");
        assert_eq!(patch.image.dimensions(), (50, 13));

        let small = RgbaImage::from_pixel(20, 30, Rgba([10, 20, 30, 255]));
        let patch = TexturePatch::prepare(
            &small,
            "any",
            &policy(TextureLayout::Tiled, TextureGate::AlphaOnly, None),
            PixelRect { x0: 0, y0: 0, x1: 10, y1: 10 },
            &config,
        )
        .expect("patch prepared");
        assert_eq!(patch.image.dimensions(), (20, 30));
    }

    #[test]
    fn stretched_layout_matches_region_height_without_vertical_repeat() {
        let rect = PixelRect { x0: 4, y0: 2, x1: 12, y1: 42 };
        // Constant columns survive a vertical-only resize exactly.
        let texture = RgbaImage::from_fn(3, 5, |x, _| Rgba([x as u8 * 80, 0, 0, 255]));
        let patch = TexturePatch::prepare(
            &texture,
            "sukne_cervena",
            &policy(TextureLayout::Stretched, TextureGate::AlphaOnly, None),
            rect,
            &RenderConfig::default(),
        )
        .expect("patch prepared");

        assert_eq!(patch.image.dimensions(), (3, 40));
        assert_eq!(patch.sample(4, 2, rect), [0, 0, 0, 255]);
        assert_eq!(patch.sample(5, 30, rect), [80, 0, 0, 255]);
        // Horizontal wrap: x0 + 3 maps back to column 0.
        assert_eq!(patch.sample(7, 10, rect), [0, 0, 0, 255]);
        // Vertical is clamped, never wrapped.
        assert_eq!(patch.sample(4, 500, rect), patch.image.get_pixel(0, 39).0);
    }

    #[test]
    fn stretched_layout_stamps_relative_to_region() {
        let registry = registry_with(
            Polygon::rect(2.0, 2.0, 6.0, 10.0),
            policy(TextureLayout::Stretched, TextureGate::AlphaOnly, None),
            None,
        );
        let source = RgbaImage::from_pixel(12, 14, Rgba([90, 90, 90, 255]));
        let texture = RgbaImage::from_fn(3, 5, |x, _| Rgba([x as u8 * 80, 0, 0, 255]));

        let out = apply_textures(
            source.clone(),
            &single(texture, "sukne_cervena"),
            &registry,
            FrameScale::IDENTITY,
            &RenderConfig::default(),
        );

        assert_eq!(out.textured_parts, vec![PartId::Fjertuch]);
        assert_eq!(out.changed_pixels, 60);
        // Columns count from the region's left edge, not from the raster's.
        assert_eq!(out.image.get_pixel(2, 5).0, [0, 0, 0, 255]);
        assert_eq!(out.image.get_pixel(3, 5).0, [80, 0, 0, 255]);
        assert_eq!(out.image.get_pixel(4, 2).0, [160, 0, 0, 255]);
        assert_eq!(out.image.get_pixel(5, 11).0, [0, 0, 0, 255]);
        assert_eq!(out.image.get_pixel(8, 5), source.get_pixel(8, 5));
        assert_eq!(out.image.get_pixel(4, 12), source.get_pixel(4, 12));
    }

    #[test]
    fn color_band_gate_keeps_embroidery() {
        let band = ColorBand::new(80.0, 160.0, 20.0, 100.0, 15.0, 75.0);
        let registry = registry_with(
            Polygon::rect(0.0, 0.0, 10.0, 10.0),
            policy(TextureLayout::Tiled, TextureGate::ColorBand, None),
            Some(band),
        );
        let cloth = hsl_to_rgb(120.0, 60.0, 40.0);
        let mut source = RgbaImage::from_pixel(10, 10, Rgba([cloth[0], cloth[1], cloth[2], 255]));
        source.put_pixel(3, 3, Rgba([250, 240, 20, 255]));
        let texture = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));

        let out = apply_textures(
            source.clone(),
            &single(texture, "fjertuch_zelena"),
            &registry,
            FrameScale::IDENTITY,
            &RenderConfig::default(),
        );

        assert_eq!(out.image.get_pixel(3, 3), source.get_pixel(3, 3));
        assert_eq!(out.image.get_pixel(4, 4).0, [1, 2, 3, 255]);
        assert_eq!(out.changed_pixels, 99);
        // Gated-out pixels still belong to the textured part.
        assert_eq!(out.claimed[3 * 10 + 3], 1);
    }

    #[test]
    fn near_white_gate_keeps_background_and_transparency() {
        let registry = registry_with(
            Polygon::rect(0.0, 0.0, 10.0, 10.0),
            policy(TextureLayout::Tiled, TextureGate::SkipNearWhite, None),
            None,
        );
        let mut source = RgbaImage::from_pixel(10, 10, Rgba([120, 60, 60, 255]));
        source.put_pixel(1, 1, Rgba([252, 252, 252, 255]));
        source.put_pixel(2, 2, Rgba([120, 60, 60, 0]));
        let texture = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 200]));

        let out = apply_textures(
            source.clone(),
            &single(texture, "fjertuch_hneda"),
            &registry,
            FrameScale::IDENTITY,
            &RenderConfig::default(),
        );

        assert_eq!(out.image.get_pixel(1, 1), source.get_pixel(1, 1));
        assert_eq!(out.image.get_pixel(2, 2), source.get_pixel(2, 2));
        assert_eq!(out.image.get_pixel(5, 5).0, [1, 2, 3, 200]);
    }

    #[test]
    fn missing_region_or_band_skips_the_part() {
        let mut registry_parts = vec![PartDefinition {
            id: PartId::Fjertuch,
            display_name: "test",
            color_band: None,
            region: None,
            policy: policy(TextureLayout::Tiled, TextureGate::AlphaOnly, None),
        }];
        let source = RgbaImage::from_pixel(4, 4, Rgba([120, 60, 60, 255]));
        let texture = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));

        let out = apply_textures(
            source.clone(),
            &single(texture.clone(), "x"),
            &PartRegistry::new(registry_parts.clone()),
            FrameScale::IDENTITY,
            &RenderConfig::default(),
        );
        assert_eq!(out.image, source);
        assert_eq!(out.skipped[0].reason, SkipReason::MissingRegion);

        registry_parts[0].region = Some(Polygon::rect(0.0, 0.0, 4.0, 4.0));
        registry_parts[0].policy.texture_gate = TextureGate::ColorBand;
        let out = apply_textures(
            source.clone(),
            &single(texture, "x"),
            &PartRegistry::new(registry_parts),
            FrameScale::IDENTITY,
            &RenderConfig::default(),
        );
        assert_eq!(out.image, source);
        assert_eq!(out.skipped[0].reason, SkipReason::MissingColorBand);
    }

    #[test]
    fn rotation_expands_canvas() {
        let patch = RgbaImage::from_pixel(10, 4, Rgba([5, 5, 5, 255]));
        let rotated = rotate_expanded(&patch, 80.0);
        assert_eq!(rotated.dimensions(), (6, 11));
        let center = rotated.get_pixel(3, 5).0;
        assert_eq!(center[3], 255);
    }

    #[test]
    fn crop_clears_pixels_outside_polygon() {
        let texture = RgbaImage::from_pixel(10, 10, Rgba([7, 7, 7, 255]));
        let square = Polygon::from_pairs(&[(0.2, 0.2), (0.6, 0.2), (0.6, 0.6), (0.2, 0.6)]);
        let cropped = crop_to_polygon(&texture, &square).expect("square crop");
        assert_eq!(cropped.dimensions(), (4, 4));
        assert!(cropped.pixels().all(|p| p.0[3] == 255));

        let triangle = Polygon::from_pairs(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        let cropped = crop_to_polygon(&texture, &triangle).expect("triangle crop");
        assert_eq!(cropped.dimensions(), (10, 10));
        assert_eq!(cropped.get_pixel(1, 1).0[3], 255);
        assert_eq!(cropped.get_pixel(9, 9).0[3], 0);

        let outside = Polygon::from_pairs(&[(2.0, 2.0), (3.0, 2.0), (3.0, 3.0)]);
        assert!(crop_to_polygon(&texture, &outside).is_none());
    }

    #[test]
    fn accessory_layout_falls_back_to_whole_texture() {
        fn never(_: &str) -> Option<Polygon> {
            None
        }
        fn left_half(asset_id: &str) -> Option<Polygon> {
            asset_id
                .contains("pantle_modra")
                .then(|| Polygon::from_pairs(&[(0.0, 0.0), (0.5, 0.0), (0.5, 1.0), (0.0, 1.0)]))
        }

        let rect = PixelRect { x0: 0, y0: 0, x1: 8, y1: 20 };
        let texture = coordinate_texture(20, 10);
        let layout = TextureLayout::Accessory { rotation_degrees: 80.0 };

        let whole = TexturePatch::prepare(
            &texture,
            "pantle_modra",
            &policy(layout, TextureGate::AlphaOnly, Some(never)),
            rect,
            &RenderConfig::default(),
        )
        .expect("whole texture patch");
        let cropped = TexturePatch::prepare(
            &texture,
            "/kroje/pantle_modra.jpeg",
            &policy(layout, TextureGate::AlphaOnly, Some(left_half)),
            rect,
            &RenderConfig::default(),
        )
        .expect("cropped patch");

        // 20x10 rotated by 80 degrees lands on a 14x22 canvas, scaled to height 20.
        assert_eq!(whole.image.dimensions(), (13, 20));
        // The 10x10 left half rotates onto 12x12.
        assert_eq!(cropped.image.dimensions(), (20, 20));
    }

    #[test]
    fn higher_z_texture_owns_overlap() {
        let base = policy(TextureLayout::Tiled, TextureGate::AlphaOnly, None);
        let registry = PartRegistry::new(vec![
            PartDefinition {
                id: PartId::Sukne,
                display_name: "low",
                color_band: None,
                region: Some(Polygon::rect(0.0, 0.0, 10.0, 10.0)),
                policy: PartPolicy { z_order: 0, ..base },
            },
            PartDefinition {
                id: PartId::Pantle,
                display_name: "high",
                color_band: None,
                region: Some(Polygon::rect(0.0, 0.0, 5.0, 10.0)),
                policy: PartPolicy { z_order: 9, ..base },
            },
        ]);
        let mut textures = HashMap::new();
        textures.insert(
            PartId::Pantle,
            TextureInput {
                asset_id: "high".to_string(),
                image: Arc::new(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]))),
            },
        );
        textures.insert(
            PartId::Sukne,
            TextureInput {
                asset_id: "low".to_string(),
                image: Arc::new(RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]))),
            },
        );

        let source = RgbaImage::from_pixel(10, 10, Rgba([50, 50, 50, 255]));
        let out = apply_textures(
            source,
            &textures,
            &registry,
            FrameScale::IDENTITY,
            &RenderConfig::default(),
        );
        assert_eq!(out.textured_parts, vec![PartId::Sukne, PartId::Pantle]);
        assert_eq!(out.image.get_pixel(1, 1).0, [0, 0, 255, 255]);
        assert_eq!(out.image.get_pixel(8, 1).0, [255, 0, 0, 255]);
    }
}
