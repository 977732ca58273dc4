//! Filter selections and their mapping onto sampler state.
//!
//! [`FilterParameterState`] is the only state shared between the control panel
//! (which writes it) and the renderer (which reads it every frame). It is owned
//! by the application and lent out explicitly, never stored in a global.
//!
//! The mapping from a selection to a [`SamplerState`] is total: every
//! selection is a variant of a closed enum and maps to exactly one filter mode.

use crate::settings::{CAMERA_PAN_RANGE, MAX_ANISOTROPY, MIN_ANISOTROPY};

/// Magnification filter as offered to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MagSelection {
    Nearest,
    Linear,
}

impl MagSelection {
    pub const ALL: [MagSelection; 2] = [MagSelection::Nearest, MagSelection::Linear];

    pub fn filter(self) -> TexelFilter {
        match self {
            MagSelection::Nearest => TexelFilter::Nearest,
            MagSelection::Linear => TexelFilter::Linear,
        }
    }

    /// Name shown in the control panel.
    pub fn label(self) -> &'static str {
        match self {
            MagSelection::Nearest => "GL_NEAREST",
            MagSelection::Linear => "GL_LINEAR",
        }
    }
}

/// Minification filter as offered to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MinSelection {
    Nearest,
    Linear,
    NearestMipNearest,
    NearestMipLinear,
    LinearMipNearest,
    LinearMipLinear,
}

impl MinSelection {
    pub const ALL: [MinSelection; 6] = [
        MinSelection::Nearest,
        MinSelection::Linear,
        MinSelection::NearestMipNearest,
        MinSelection::NearestMipLinear,
        MinSelection::LinearMipNearest,
        MinSelection::LinearMipLinear,
    ];

    pub fn filter(self) -> MinFilter {
        use MipFilter as M;
        use TexelFilter as T;
        let (texel, mip) = match self {
            MinSelection::Nearest => (T::Nearest, M::None),
            MinSelection::Linear => (T::Linear, M::None),
            MinSelection::NearestMipNearest => (T::Nearest, M::Nearest),
            MinSelection::NearestMipLinear => (T::Nearest, M::Linear),
            MinSelection::LinearMipNearest => (T::Linear, M::Nearest),
            MinSelection::LinearMipLinear => (T::Linear, M::Linear),
        };
        MinFilter { texel, mip }
    }

    /// Name shown in the control panel.
    pub fn label(self) -> &'static str {
        match self {
            MinSelection::Nearest => "GL_NEAREST",
            MinSelection::Linear => "GL_LINEAR",
            MinSelection::NearestMipNearest => "GL_NEAREST_MIPMAP_NEAREST",
            MinSelection::NearestMipLinear => "GL_NEAREST_MIPMAP_LINEAR",
            MinSelection::LinearMipNearest => "GL_LINEAR_MIPMAP_NEAREST",
            MinSelection::LinearMipLinear => "GL_LINEAR_MIPMAP_LINEAR",
        }
    }
}

/// Filtering within a single mip level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TexelFilter {
    /// Point sampling.
    Nearest,
    /// Bilinear sampling.
    Linear,
}

impl TexelFilter {
    pub fn to_wgpu(self) -> wgpu::FilterMode {
        match self {
            TexelFilter::Nearest => wgpu::FilterMode::Nearest,
            TexelFilter::Linear => wgpu::FilterMode::Linear,
        }
    }
}

/// Filtering between mip levels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MipFilter {
    /// Only the base level is ever sampled.
    None,
    /// Sample the nearest mip level.
    Nearest,
    /// Blend the two nearest mip levels.
    Linear,
}

impl MipFilter {
    pub fn to_wgpu(self) -> wgpu::MipmapFilterMode {
        match self {
            // wgpu has no "off" mode; the LOD clamp in `SamplerState::descriptor` pins level 0.
            MipFilter::None | MipFilter::Nearest => wgpu::MipmapFilterMode::Nearest,
            MipFilter::Linear => wgpu::MipmapFilterMode::Linear,
        }
    }
}

/// A minification filter: texel filtering plus mip level selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MinFilter {
    pub texel: TexelFilter,
    pub mip: MipFilter,
}

/// Clamp an anisotropy request into `[MIN_ANISOTROPY, MAX_ANISOTROPY]`.
///
/// Values inside the range pass through unchanged. NaN maps to the lower bound.
pub fn clamp_anisotropy(anisotropy: f32) -> f32 {
    if anisotropy.is_nan() {
        return MIN_ANISOTROPY;
    }
    anisotropy.clamp(MIN_ANISOTROPY, MAX_ANISOTROPY)
}

/// Wrapping behaviour for texture coordinates outside `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WrapMode {
    Repeat,
    ClampToEdge,
}

impl WrapMode {
    pub fn to_wgpu(self) -> wgpu::AddressMode {
        match self {
            WrapMode::Repeat => wgpu::AddressMode::Repeat,
            WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        }
    }
}

/// The complete set of mutable sampler parameters of a texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplerState {
    pub mag: TexelFilter,
    pub min: MinFilter,
    /// Requested anisotropy, always within `[MIN_ANISOTROPY, MAX_ANISOTROPY]`.
    pub anisotropy: f32,
}

impl SamplerState {
    pub fn new(mag: MagSelection, min: MinSelection, anisotropy: f32) -> Self {
        Self {
            mag: mag.filter(),
            min: min.filter(),
            anisotropy: clamp_anisotropy(anisotropy),
        }
    }

    /// Derive the sampler state from the user's current selections.
    ///
    /// Evaluated every frame; the result is never cached by the caller.
    pub fn from_params(params: &FilterParameterState) -> Self {
        Self::new(params.mag_selection, params.min_selection, params.anisotropy)
    }

    /// The anisotropy level the hardware will actually use.
    ///
    /// Anisotropic sampling requires linear magnification, minification and
    /// mip filtering; any other combination samples with a level of 1.
    pub fn effective_anisotropy(&self) -> u16 {
        let all_linear = self.mag == TexelFilter::Linear
            && self.min.texel == TexelFilter::Linear
            && self.min.mip == MipFilter::Linear;
        if all_linear {
            self.anisotropy.round() as u16
        } else {
            1
        }
    }

    pub fn descriptor(&self, wrap: WrapMode) -> wgpu::SamplerDescriptor<'static> {
        let address_mode = wrap.to_wgpu();
        let lod_max_clamp = match self.min.mip {
            MipFilter::None => 0.0,
            MipFilter::Nearest | MipFilter::Linear => 32.0,
        };
        wgpu::SamplerDescriptor {
            label: Some("texture sampler"),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: self.mag.to_wgpu(),
            min_filter: self.min.texel.to_wgpu(),
            mipmap_filter: self.min.mip.to_wgpu(),
            lod_min_clamp: 0.0,
            lod_max_clamp,
            anisotropy_clamp: self.effective_anisotropy(),
            ..Default::default()
        }
    }
}

impl Default for SamplerState {
    /// The sampler both textures are created with: the nicest available filtering.
    fn default() -> Self {
        Self::new(
            MagSelection::Linear,
            MinSelection::LinearMipLinear,
            MAX_ANISOTROPY,
        )
    }
}

/// The user's current filter, anisotropy and camera selections.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterParameterState {
    pub mag_selection: MagSelection,
    pub min_selection: MinSelection,
    /// Kept within `[MIN_ANISOTROPY, MAX_ANISOTROPY]` by [`Self::set_anisotropy`].
    pub anisotropy: f32,
    pub camera_pan: f32,
    pub ui_visible: bool,
}

impl FilterParameterState {
    pub fn set_anisotropy(&mut self, anisotropy: f32) {
        self.anisotropy = clamp_anisotropy(anisotropy);
    }

    pub fn set_camera_pan(&mut self, pan: f32) {
        let (lo, hi) = CAMERA_PAN_RANGE;
        if !pan.is_nan() {
            self.camera_pan = pan.clamp(lo, hi);
        }
    }

    pub fn toggle_ui(&mut self) {
        self.ui_visible = !self.ui_visible;
    }
}

impl Default for FilterParameterState {
    fn default() -> Self {
        Self {
            mag_selection: MagSelection::Nearest,
            min_selection: MinSelection::LinearMipLinear,
            anisotropy: MAX_ANISOTROPY,
            camera_pan: 0.0,
            ui_visible: false,
        }
    }
}
