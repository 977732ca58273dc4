//! Fatal setup errors.
//!
//! Every variant ends the process: the demo has no degraded mode. Callers wrap
//! these in `anyhow::Error` with context on the way up to `main`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("the renderer was already initialised in this process")]
    AlreadyInitialized,

    #[error("index {index} at position {position} is out of range for {vertices} vertices")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertices: usize,
    },

    #[error("{positions} positions but {tex_coords} texture coordinates")]
    AttributeLengthMismatch { positions: usize, tex_coords: usize },

    #[error("{0} indices do not form whole triangles")]
    PartialTriangle(usize),

    #[error("image `{0}` has zero width or height")]
    EmptyImage(String),

    #[error("pixel buffer of `{label}` holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    PixelBufferSize {
        label: String,
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}
