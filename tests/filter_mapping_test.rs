use std::collections::HashSet;

use filter_lab::{
    camera::camera_position,
    filter::{
        FilterParameterState, MagSelection, MinSelection, MipFilter, SamplerState, TexelFilter,
        WrapMode, clamp_anisotropy,
    },
    settings::{MAX_ANISOTROPY, MIN_ANISOTROPY},
};

mod common;
use common::test_utils::params;

#[test]
fn every_min_selection_maps_to_a_distinct_filter() {
    let filters: Vec<_> = MinSelection::ALL.iter().map(|s| s.filter()).collect();
    let distinct: HashSet<_> = filters.iter().copied().collect();
    assert_eq!(distinct.len(), MinSelection::ALL.len());

    // Deterministic: the same selection always gives the same filter.
    for selection in MinSelection::ALL {
        assert_eq!(selection.filter(), selection.filter());
    }
}

#[test]
fn min_selection_table() {
    let expected = [
        (MinSelection::Nearest, TexelFilter::Nearest, MipFilter::None),
        (MinSelection::Linear, TexelFilter::Linear, MipFilter::None),
        (MinSelection::NearestMipNearest, TexelFilter::Nearest, MipFilter::Nearest),
        (MinSelection::NearestMipLinear, TexelFilter::Nearest, MipFilter::Linear),
        (MinSelection::LinearMipNearest, TexelFilter::Linear, MipFilter::Nearest),
        (MinSelection::LinearMipLinear, TexelFilter::Linear, MipFilter::Linear),
    ];
    for (selection, texel, mip) in expected {
        let filter = selection.filter();
        assert_eq!(filter.texel, texel, "{selection:?}");
        assert_eq!(filter.mip, mip, "{selection:?}");
    }
}

#[test]
fn mag_selection_maps_to_point_and_bilinear() {
    assert_eq!(MagSelection::Nearest.filter(), TexelFilter::Nearest);
    assert_eq!(MagSelection::Linear.filter(), TexelFilter::Linear);
    assert_eq!(
        MagSelection::Nearest.filter().to_wgpu(),
        wgpu::FilterMode::Nearest
    );
    assert_eq!(
        MagSelection::Linear.filter().to_wgpu(),
        wgpu::FilterMode::Linear
    );
}

#[test]
fn anisotropy_outside_range_is_clamped() {
    assert_eq!(clamp_anisotropy(0.0), MIN_ANISOTROPY);
    assert_eq!(clamp_anisotropy(-3.5), MIN_ANISOTROPY);
    assert_eq!(clamp_anisotropy(16.5), MAX_ANISOTROPY);
    assert_eq!(clamp_anisotropy(1000.0), MAX_ANISOTROPY);
    assert_eq!(clamp_anisotropy(f32::INFINITY), MAX_ANISOTROPY);
    assert_eq!(clamp_anisotropy(f32::NAN), MIN_ANISOTROPY);
}

#[test]
fn anisotropy_inside_range_passes_through_exactly() {
    for value in [1.0, 1.25, 2.0, 7.5, 15.999, 16.0] {
        assert_eq!(clamp_anisotropy(value), value);
        assert_eq!(clamp_anisotropy(clamp_anisotropy(value)), value);
    }

    let mut state = FilterParameterState::default();
    state.set_anisotropy(4.5);
    assert_eq!(state.anisotropy, 4.5);
    state.set_anisotropy(40.0);
    assert_eq!(state.anisotropy, MAX_ANISOTROPY);
}

#[test]
fn sampler_state_is_a_pure_function_of_the_selection() {
    for mag in MagSelection::ALL {
        for min in MinSelection::ALL {
            let p = params(mag, min, 8.0);
            let a = SamplerState::from_params(&p);
            let b = SamplerState::from_params(&p);
            assert_eq!(a, b);
            assert_eq!(a.mag, mag.filter());
            assert_eq!(a.min, min.filter());
            assert_eq!(a.anisotropy, 8.0);
        }
    }
}

#[test]
fn hardware_anisotropy_needs_all_linear_filters() {
    let all_linear = SamplerState::new(MagSelection::Linear, MinSelection::LinearMipLinear, 16.0);
    assert_eq!(all_linear.effective_anisotropy(), 16);
    assert_eq!(all_linear.descriptor(WrapMode::Repeat).anisotropy_clamp, 16);

    let nearest_mag = SamplerState::new(MagSelection::Nearest, MinSelection::LinearMipLinear, 16.0);
    assert_eq!(nearest_mag.effective_anisotropy(), 1);
    // The request is kept even when the hardware can't honour it.
    assert_eq!(nearest_mag.anisotropy, 16.0);

    for min in MinSelection::ALL {
        let state = SamplerState::new(MagSelection::Linear, min, 16.0);
        let expected = if min == MinSelection::LinearMipLinear { 16 } else { 1 };
        assert_eq!(state.effective_anisotropy(), expected, "{min:?}");
    }
}

#[test]
fn no_mip_selections_pin_the_base_level() {
    for min in [MinSelection::Nearest, MinSelection::Linear] {
        let desc = SamplerState::new(MagSelection::Linear, min, 1.0).descriptor(WrapMode::Repeat);
        assert_eq!(desc.lod_max_clamp, 0.0);
    }
    let desc = SamplerState::new(MagSelection::Linear, MinSelection::LinearMipNearest, 1.0)
        .descriptor(WrapMode::Repeat);
    assert!(desc.lod_max_clamp > 0.0);
    assert_eq!(desc.mipmap_filter, wgpu::MipmapFilterMode::Nearest);
}

#[test]
fn wrap_mode_sets_every_axis() {
    let state = SamplerState::default();
    let repeat = state.descriptor(WrapMode::Repeat);
    assert_eq!(repeat.address_mode_u, wgpu::AddressMode::Repeat);
    assert_eq!(repeat.address_mode_v, wgpu::AddressMode::Repeat);
    let clamp = state.descriptor(WrapMode::ClampToEdge);
    assert_eq!(clamp.address_mode_u, wgpu::AddressMode::ClampToEdge);
    assert_eq!(clamp.address_mode_v, wgpu::AddressMode::ClampToEdge);
}

#[test]
fn defaults() {
    let state = FilterParameterState::default();
    assert_eq!(state.mag_selection, MagSelection::Nearest);
    assert_eq!(state.min_selection, MinSelection::LinearMipLinear);
    assert_eq!(state.anisotropy, 16.0);
    assert_eq!(state.camera_pan, 0.0);
    assert!(!state.ui_visible);
}

#[test]
fn camera_pan_moves_only_x() {
    let centre = camera_position(0.0);
    assert_eq!((centre.x, centre.y, centre.z), (0.0, 10.0, 0.0));
    let right = camera_position(1.0);
    assert_eq!((right.x, right.y, right.z), (1.0, 10.0, 0.0));
}

#[test]
fn camera_pan_stays_within_slider_range() {
    let mut state = FilterParameterState::default();
    state.set_camera_pan(0.25);
    assert_eq!(state.camera_pan, 0.25);
    state.set_camera_pan(3.0);
    assert_eq!(state.camera_pan, 1.0);
    state.set_camera_pan(-3.0);
    assert_eq!(state.camera_pan, -1.0);
    state.set_camera_pan(f32::NAN);
    assert_eq!(state.camera_pan, -1.0);
}

#[test]
fn toggling_the_ui_twice_restores_it() {
    let mut state = FilterParameterState::default();
    state.toggle_ui();
    assert!(state.ui_visible);
    state.toggle_ui();
    assert!(!state.ui_visible);
}
