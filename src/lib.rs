//! filter-lab
//!
//! An interactive texture filtering demo. A repeating ground plane and an
//! alpha-blended billboard are drawn in perspective while a control panel
//! switches the ground's magnification and minification filters, its
//! anisotropy level and the camera's sideways pan.
//!
//! High-level modules
//! - `camera`: projection, camera position and its uniform buffer
//! - `context`: window surface, device and queue
//! - `data_structures`: quad geometry, textures with mip chains, the scene objects
//! - `error`: fatal setup errors
//! - `filter`: user filter selections and their mapping to sampler state
//! - `flow`: event loop, key handling and frame driving
//! - `pipelines`: opaque, blended and control panel render pipelines
//! - `render`: frame plans and the renderer that executes them
//! - `resources`: asset loading, image decoding and shader compilation
//! - `settings`: compile-time constants
//! - `text`: the glyph atlas behind the control panel's labels
//! - `ui`: the immediate-mode control panel
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod filter;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod settings;
pub mod text;
pub mod ui;

pub use error::SetupError;
pub use filter::{FilterParameterState, MagSelection, MinSelection, SamplerState};
pub use render::{FramePlan, Renderer};
