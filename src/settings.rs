//! Compile-time settings for the demo.
//!
//! The demo takes no arguments and reads no configuration files. Only
//! `RUST_LOG` influences runtime behaviour.

/// Title of the demo window.
pub const WINDOW_TITLE: &str = "filter-lab: texture filtering";

/// Initial logical window size.
pub const WINDOW_SIZE: (f64, f64) = (1280.0, 720.0);

/// Background colour the colour buffer is cleared to every frame.
pub const CLEAR_COLOUR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.2,
    b: 0.8,
    a: 1.0,
};

/// Vertical field of view of the projection, in degrees.
pub const FOVY_DEGREES: f32 = 45.0;
pub const Z_NEAR: f32 = 0.01;
pub const Z_FAR: f32 = 400.0;

/// The camera only pans along X; its height and depth never change.
pub const CAMERA_HEIGHT: f32 = 10.0;
pub const CAMERA_DEPTH: f32 = 0.0;

/// Upper bound for anisotropic filtering, matching the hardware cap.
pub const MAX_ANISOTROPY: f32 = 16.0;
pub const MIN_ANISOTROPY: f32 = 1.0;

/// Pixel size of the control panel's text.
pub const PANEL_FONT_SIZE: f32 = 14.0;

/// Range of the camera pan slider.
pub const CAMERA_PAN_RANGE: (f32, f32) = (-1.0, 1.0);

/// Asset paths below [`ASSET_ROOT`], which is resolved against the working directory.
pub const GROUND_TEXTURE: &str = "textures/asphalt.jpg";
pub const BILLBOARD_TEXTURE: &str = "textures/explosion.png";
pub const VERTEX_SHADER: &str = "shaders/simple_vert.wgsl";
pub const FRAGMENT_SHADER: &str = "shaders/simple_frag.wgsl";
pub const PANEL_FONT: &str = "fonts/DejaVuSans.ttf";
pub const ASSET_ROOT: &str = "assets";
