use anyhow::Context;
use image::RgbaImage;

use crate::resources::load_binary;

/// Decode an encoded image (PNG, JPEG) into tightly packed RGBA8 pixels.
///
/// The width, height and pixel bytes are available through
/// `RgbaImage::dimensions` and `RgbaImage::as_raw`.
pub fn decode_image(bytes: &[u8], file_name: &str) -> anyhow::Result<RgbaImage> {
    let img = image::load_from_memory(bytes)
        .with_context(|| format!("failed to decode image `{file_name}`"))?;
    Ok(img.to_rgba8())
}

pub async fn load_image(file_name: &str) -> anyhow::Result<RgbaImage> {
    let data = load_binary(file_name).await?;
    decode_image(&data, file_name)
}
