//! Flat-color recoloring of garment parts.
//!
//! A pixel is rewritten when it falls inside a requested part's polygon and its
//! HSL sits inside that part's original-cloth band. The output keeps the
//! requested hue and saturation and spreads lightness around the requested value
//! by where the source pixel sat in its band, so folds and shading survive.

use crate::color::{hsl_to_rgb, is_near_white, parse_hex, rgb_to_hsl, ColorBand, HslColor};
use crate::geometry::{Bounds, FrameScale, Polygon};
use crate::parts::{PartId, PartRegistry};
use crate::render::{RenderConfig, SkipReason, SkippedPart};
use image::RgbaImage;
use rayon::prelude::*;
use std::collections::HashMap;

struct RecolorTarget<'a> {
    id: PartId,
    band: ColorBand,
    region: Option<(&'a Polygon, Bounds)>,
    target: HslColor,
}

impl RecolorTarget<'_> {
    fn covers(&self, fx: f32, fy: f32) -> bool {
        match self.region {
            Some((polygon, bounds)) => bounds.contains(fx, fy) && polygon.contains(fx, fy),
            None => true,
        }
    }

    fn shade(&self, source_l: f32, spread: f32) -> [u8; 3] {
        let normalized = self.band.relative_lightness(source_l);
        let l = (self.target.l + (normalized - 0.5) * spread).clamp(0.0, 100.0);
        hsl_to_rgb(self.target.h, self.target.s, l)
    }
}

pub struct RecolorOutcome {
    pub image: RgbaImage,
    pub changed_pixels: usize,
    pub recolored_parts: Vec<PartId>,
    pub skipped: Vec<SkippedPart>,
}

/// Recolors `image` (taken by value; callers pass a copy) for every request.
///
/// Overlapping regions resolve by z-order: the highest part whose polygon and
/// band both match wins, and a pixel is never recolored twice. Pixels flagged
/// non-zero in `protected` (row-major, one byte per pixel) are left alone.
pub fn recolor(
    mut image: RgbaImage,
    requests: &HashMap<PartId, String>,
    registry: &PartRegistry,
    scale: FrameScale,
    config: &RenderConfig,
    protected: Option<&[u8]>,
) -> RecolorOutcome {
    let (targets, skipped) = plan_targets(requests, registry, config);
    let recolored_parts: Vec<PartId> = targets.iter().map(|t| t.id).collect();

    let width = image.width() as usize;
    if targets.is_empty() || width == 0 || image.height() == 0 {
        return RecolorOutcome {
            image,
            changed_pixels: 0,
            recolored_parts,
            skipped,
        };
    }

    let spread = config.lightness_spread;
    let changed_pixels: usize = image
        .par_chunks_exact_mut(width * 4)
        .enumerate()
        .map(|(y, row)| {
            let mut changed = 0usize;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                if px[3] == 0 {
                    continue;
                }
                if let Some(mask) = protected {
                    if mask.get(y * width + x).copied().unwrap_or(0) != 0 {
                        continue;
                    }
                }

                let hsl = rgb_to_hsl(px[0], px[1], px[2]);
                let (fx, fy) = scale.to_frame(x as u32, y as u32);
                let hit = targets
                    .iter()
                    .find(|t| t.covers(fx, fy) && t.band.contains(hsl));
                if let Some(target) = hit {
                    px[..3].copy_from_slice(&target.shade(hsl.l, spread));
                    changed += 1;
                }
            }
            changed
        })
        .sum();

    RecolorOutcome {
        image,
        changed_pixels,
        recolored_parts,
        skipped,
    }
}

/// Resolves requests into targets, highest z-order first.
fn plan_targets<'a>(
    requests: &HashMap<PartId, String>,
    registry: &'a PartRegistry,
    config: &RenderConfig,
) -> (Vec<RecolorTarget<'a>>, Vec<SkippedPart>) {
    let mut targets = Vec::new();
    let mut skipped = Vec::new();

    let mut requested: Vec<PartId> = requests.keys().copied().collect();
    requested.sort();
    for id in &requested {
        if registry.get(*id).is_none() {
            skipped.push(SkippedPart::new(*id, SkipReason::NotRegistered));
        }
    }

    for part in registry.by_z_order(requested).into_iter().rev() {
        let Some(hex) = requests.get(&part.id) else {
            continue;
        };
        let Some(rgb) = parse_hex(hex) else {
            log::warn!("Skipping {}: unparseable color {:?}", part, hex);
            skipped.push(SkippedPart::new(part.id, SkipReason::InvalidColor));
            continue;
        };
        let Some(band) = part.valid_band() else {
            log::warn!("Skipping {}: no usable color band", part);
            skipped.push(SkippedPart::new(part.id, SkipReason::MissingColorBand));
            continue;
        };

        let target = rgb_to_hsl(rgb[0], rgb[1], rgb[2]);
        if part.policy.skip_near_white_color
            && (is_near_white(rgb, config.near_white_threshold)
                || target.l >= config.near_white_lightness)
        {
            log::debug!("Keeping original {} for near-white request {}", part, hex);
            skipped.push(SkippedPart::new(part.id, SkipReason::NearWhiteRequest));
            continue;
        }

        let region = part
            .valid_region()
            .and_then(|polygon| polygon.bounds().map(|bounds| (polygon, bounds)));
        if region.is_none() {
            log::debug!("{} has no region; whole image is eligible", part);
        }

        targets.push(RecolorTarget {
            id: part.id,
            band,
            region,
            target,
        });
    }

    (targets, skipped)
}
