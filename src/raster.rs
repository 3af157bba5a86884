//! Raster boundary: decoding input bytes and encoding rendered output.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

/// Wraps a raw RGBA buffer, rejecting empty or mis-sized buffers.
pub fn from_rgba(bytes: Vec<u8>, width: u32, height: u32) -> Result<RgbaImage, String> {
    if width == 0 || height == 0 {
        return Err(format!("Image has no drawable area ({}x{})", width, height));
    }
    let expected = width as usize * height as usize * 4;
    if bytes.len() != expected {
        return Err(format!(
            "Buffer size mismatch: expected {} bytes for {}x{}, got {}",
            expected,
            width,
            height,
            bytes.len()
        ));
    }
    RgbaImage::from_raw(width, height, bytes).ok_or_else(|| "Buffer size mismatch".to_string())
}

pub fn decode(bytes: &[u8]) -> Result<RgbaImage, String> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| format!("Failed to decode image bytes: {}", e))?;
    let rgba = img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err("Decoded image is empty".to_string());
    }
    Ok(rgba)
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, String> {
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| format!("Failed to encode PNG: {}", e))?;
    Ok(out.into_inner())
}

pub fn to_data_uri(image: &RgbaImage) -> Result<String, String> {
    let png = encode_png(image)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}
