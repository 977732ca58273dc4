//! The two objects of the scene: a repeating ground plane and a blended billboard.

use crate::{
    data_structures::{
        geometry::{Geometry, QUAD_INDICES, QuadData},
        texture::Texture,
    },
    error::SetupError,
    filter::WrapMode,
};

/// Position of an object in the frame's draw sequence.
///
/// The derived ordering is the draw order: the opaque ground always comes
/// before the blended billboard, whatever order the objects were created in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DrawOrder {
    Ground,
    Billboard,
}

impl DrawOrder {
    /// Only the billboard is alpha blended.
    pub fn is_blended(self) -> bool {
        match self {
            DrawOrder::Ground => false,
            DrawOrder::Billboard => true,
        }
    }

    pub fn wrap_mode(self) -> WrapMode {
        match self {
            DrawOrder::Ground => WrapMode::Repeat,
            DrawOrder::Billboard => WrapMode::ClampToEdge,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DrawOrder::Ground => "ground",
            DrawOrder::Billboard => "billboard",
        }
    }
}

/// A geometry paired with the texture it is drawn with.
#[derive(Debug)]
pub struct SceneObject {
    pub order: DrawOrder,
    pub geometry: Geometry,
    pub texture: Texture,
}

/// A 20-unit wide strip running from z = -10 to z = -330, tiled 15 times along its length.
pub fn ground_quad() -> Result<QuadData, SetupError> {
    QuadData::new(
        &[
            [-10.0, 0.0, -10.0],
            [-10.0, 0.0, -330.0],
            [10.0, 0.0, -330.0],
            [10.0, 0.0, -10.0],
        ],
        &[[0.0, 0.0], [0.0, 15.0], [1.0, 15.0], [1.0, 0.0]],
        &QUAD_INDICES,
    )
}

/// An upright 8x8 square at z = -30 showing its texture exactly once.
pub fn billboard_quad() -> Result<QuadData, SetupError> {
    QuadData::new(
        &[
            [-4.0, -4.0, -30.0],
            [4.0, -4.0, -30.0],
            [4.0, 4.0, -30.0],
            [-4.0, 4.0, -30.0],
        ],
        &[[1.0, 1.0], [1.0, 0.0], [0.0, 0.0], [0.0, 1.0]],
        &QUAD_INDICES,
    )
}
