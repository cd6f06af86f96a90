use anyhow::Context;
use base64::{Engine as _, engine::general_purpose};

use crate::{
    assets::raster::Raster,
    foundation::error::{LuminaError, LuminaResult},
};

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> LuminaResult<Raster> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Raster::from_premul(width, height, rgba8_premul)
}

/// Decode a `data:<mime>;base64,<payload>` URL, as produced by browser logo uploads.
pub fn decode_data_url(data_url: &str) -> LuminaResult<Raster> {
    let rest = data_url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| LuminaError::asset("not a data url"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| LuminaError::asset("data url has no payload"))?;
    if !header.split(';').any(|p| p == "base64") {
        return Err(LuminaError::asset("data url payload is not base64"));
    }

    let bytes = general_purpose::STANDARD
        .decode(payload.trim())
        .context("decode data url base64 payload")?;
    decode_image(&bytes)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
