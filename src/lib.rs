pub mod color;
pub mod geometry;
pub mod parts;
pub mod raster;
pub mod recolor;
pub mod render;
pub mod texture;
pub mod texture_cache;
pub mod validation;

pub use parts::{PartId, PartRegistry};
pub use render::{render, RenderConfig, RenderOutput, RenderPreset, RenderReport, SkipReason};
pub use texture_cache::{TextureCache, TextureSource};
pub use validation::{
    classify_color, classify_color_with, ColorMatching, ColorTag, CostumeSelection, RuleTable,
    Verdict,
};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

static TEXTURE_CACHE: OnceLock<Mutex<TextureCache>> = OnceLock::new();

fn texture_cache() -> &'static Mutex<TextureCache> {
    TEXTURE_CACHE.get_or_init(|| Mutex::new(TextureCache::new()))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderRequest {
    /// Flat hex color per part.
    pub colors: HashMap<PartId, String>,
    /// Texture image per part; wins over a color for the same part.
    pub textures: HashMap<PartId, TextureSource>,
    pub config: RenderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponse {
    pub data_uri: String,
    pub report: RenderReport,
}

/// Render the costume artwork with the requested colors and textures.
///
/// # Arguments
/// * `source_bytes` - Encoded costume artwork (PNG, JPEG, etc.)
/// * `request` - Per-part colors and textures plus render configuration
///
/// # Returns
/// A PNG data URI of the composite and a report of what was applied or skipped
pub fn render_costume(
    source_bytes: &[u8],
    request: RenderRequest,
) -> Result<RenderResponse, String> {
    log::info!(
        "Rendering costume: {} bytes, {} colors, {} textures",
        source_bytes.len(),
        request.colors.len(),
        request.textures.len()
    );

    let source = raster::decode(source_bytes)?;
    render_decoded(&source, &request)
}

/// Same as [`render_costume`] for a raw RGBA buffer, as read back from a canvas.
pub fn render_costume_rgba(
    rgba: Vec<u8>,
    width: u32,
    height: u32,
    request: RenderRequest,
) -> Result<RenderResponse, String> {
    let source = raster::from_rgba(rgba, width, height)?;
    render_decoded(&source, &request)
}

fn render_decoded(
    source: &image::RgbaImage,
    request: &RenderRequest,
) -> Result<RenderResponse, String> {
    let output = {
        let mut cache = texture_cache()
            .lock()
            .map_err(|_| "Texture cache mutex poisoned")?;
        render(
            source,
            &request.colors,
            &request.textures,
            &mut cache,
            &request.config,
        )?
    };

    let data_uri = raster::to_data_uri(&output.image)?;
    Ok(RenderResponse {
        data_uri,
        report: output.report,
    })
}

/// Drops decoded textures, e.g. when the asset set is reloaded.
pub fn clear_texture_cache() -> Result<(), String> {
    texture_cache()
        .lock()
        .map_err(|_| "Texture cache mutex poisoned")?
        .clear();
    Ok(())
}

/// Check a costume selection against the combination rules file.
pub fn validate_combination(
    rule_json: &str,
    selection: &CostumeSelection,
) -> Result<Verdict, String> {
    let table = RuleTable::from_json(rule_json)?;
    let verdict = table.evaluate(selection);
    log::info!("Combination validated: valid={}", verdict.is_valid);
    Ok(verdict)
}

/// Derive a flat color request (`#rrggbb`) from a variant's swatch image.
pub fn extract_variant_color(swatch_bytes: &[u8]) -> Result<String, String> {
    let swatch = raster::decode(swatch_bytes)?;
    Ok(validation::dominant_color_hex(&swatch))
}
