//! Loading of everything the demo reads from disk.
//!
//! All paths are fixed and resolved below `./assets`. A missing or
//! undecodable file is a fatal startup error.

use std::path::PathBuf;

use anyhow::Context;
use image::RgbaImage;

use crate::{
    settings::{
        ASSET_ROOT, BILLBOARD_TEXTURE, FRAGMENT_SHADER, GROUND_TEXTURE, PANEL_FONT,
        PANEL_FONT_SIZE, VERTEX_SHADER,
    },
    text::GlyphAtlas,
};

pub mod shader;
pub mod texture;

pub use shader::{ShaderProgram, compile_program};
pub use texture::{decode_image, load_image};

fn asset_path(file_name: &str) -> PathBuf {
    std::path::Path::new("./").join(ASSET_ROOT).join(file_name)
}

pub async fn load_string(file_name: &str) -> anyhow::Result<String> {
    let path = asset_path(file_name);
    tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = asset_path(file_name);
    tokio::fs::read(&path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

/// Decoded images and shader sources for the scene.
#[derive(Clone, Debug)]
pub struct SceneAssets {
    pub ground: RgbaImage,
    pub billboard: RgbaImage,
    pub vertex_src: String,
    pub fragment_src: String,
}

pub async fn load_scene_assets() -> anyhow::Result<SceneAssets> {
    let (ground, billboard, vertex_src, fragment_src) = futures::try_join!(
        load_image(GROUND_TEXTURE),
        load_image(BILLBOARD_TEXTURE),
        load_string(VERTEX_SHADER),
        load_string(FRAGMENT_SHADER),
    )?;
    log::info!("loaded scene assets from ./{ASSET_ROOT}");
    Ok(SceneAssets {
        ground,
        billboard,
        vertex_src,
        fragment_src,
    })
}

/// The control panel's font, rasterised into an atlas.
pub async fn load_glyph_atlas() -> anyhow::Result<GlyphAtlas> {
    let bytes = load_binary(PANEL_FONT).await?;
    GlyphAtlas::new(&bytes, PANEL_FONT_SIZE).with_context(|| format!("failed to load {PANEL_FONT}"))
}
