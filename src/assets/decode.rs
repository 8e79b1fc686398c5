use std::path::Path;

use crate::foundation::{
    error::{AvatarError, AvatarResult},
    math::premultiply_rgba8_in_place,
};

#[derive(Clone, Debug)]
/// Decoded trait image in premultiplied RGBA8 form.
pub struct DecodedLayer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Vec<u8>,
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
///
/// `layer` and `item` only label the error.
pub fn decode_layer_bytes(layer: &str, item: &str, bytes: &[u8]) -> AvatarResult<DecodedLayer> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| AvatarError::asset_decode(layer, item, e.to_string()))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(DecodedLayer {
        width,
        height,
        rgba8_premul,
    })
}

/// Read and decode the trait file at `path`.
pub fn decode_layer_file(layer: &str, item: &str, path: &Path) -> AvatarResult<DecodedLayer> {
    let bytes = std::fs::read(path).map_err(|e| {
        AvatarError::asset_decode(layer, item, format!("read '{}': {e}", path.display()))
    })?;
    decode_layer_bytes(layer, item, &bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
