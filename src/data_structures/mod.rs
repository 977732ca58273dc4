//! Scene data: geometry, textures, mip chains and scene objects.
//!
//! - `geometry` holds the immutable quad vertex/index buffers
//! - `mipmap` generates box-filtered mip chains on the CPU
//! - `texture` wraps GPU textures and their mutable sampler state
//! - `scene` pairs geometry with textures and fixes their draw order

pub mod geometry;
pub mod mipmap;
pub mod scene;
pub mod texture;
