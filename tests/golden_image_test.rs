#[cfg(feature = "integration-tests")]
mod common;

#[test]
#[cfg(feature = "integration-tests")]
fn captured_frame_shows_sky_above_the_scene() {
    use filter_lab::{
        context::headless_device,
        data_structures::scene::DrawOrder,
        error::SetupError,
        filter::{FilterParameterState, SamplerState},
        render::Renderer,
        resources::load_scene_assets,
        settings::CLEAR_COLOUR,
    };

    use crate::common::test_utils::{assert_pixel_near, block_on, linear_to_srgb_u8, window};

    let (device, queue) = block_on(headless_device()).expect("No GPU available");
    let assets = block_on(load_scene_assets()).unwrap();
    let size = window(64, 48);
    let format = wgpu::TextureFormat::Rgba8UnormSrgb;

    let mut renderer = Renderer::initialize(&device, &queue, format, &assets, size).unwrap();
    let img = block_on(renderer.capture(&device, &queue, size, &FilterParameterState::default()))
        .unwrap();
    assert_eq!(img.dimensions(), (64, 48));

    let sky = [
        linear_to_srgb_u8(CLEAR_COLOUR.r),
        linear_to_srgb_u8(CLEAR_COLOUR.g),
        linear_to_srgb_u8(CLEAR_COLOUR.b),
        linear_to_srgb_u8(CLEAR_COLOUR.a),
    ];
    assert_pixel_near(*img.get_pixel(0, 0), sky, 2);
    assert_pixel_near(*img.get_pixel(63, 0), sky, 2);
    // The ground covers the bottom edge.
    assert_ne!(img.get_pixel(32, 47).0, sky);

    // Only the ground follows the selection; the billboard keeps its creation sampler.
    assert_eq!(renderer.color_format(), format);
    let ground = renderer.object(DrawOrder::Ground).unwrap();
    assert_eq!(
        ground.texture.sampler_state(),
        SamplerState::from_params(&FilterParameterState::default())
    );
    let billboard = renderer.object(DrawOrder::Billboard).unwrap();
    assert_eq!(billboard.texture.sampler_state(), SamplerState::default());

    let err = Renderer::initialize(&device, &queue, format, &assets, size).unwrap_err();
    assert_eq!(
        err.downcast_ref::<SetupError>(),
        Some(&SetupError::AlreadyInitialized)
    );
}

#[test]
#[cfg(feature = "integration-tests")]
fn sampler_state_is_applied_idempotently() {
    use filter_lab::{
        context::headless_device,
        data_structures::texture::{Texture, texture_bind_group_layout},
        filter::{MagSelection, MinSelection, SamplerState, WrapMode},
    };

    use crate::common::test_utils::{block_on, checkerboard};

    let (device, queue) = block_on(headless_device()).expect("No GPU available");
    let layout = texture_bind_group_layout(&device);
    let mut texture = Texture::from_image(
        &device,
        &queue,
        &layout,
        &checkerboard(64, 32, 4),
        WrapMode::Repeat,
        "checker",
    )
    .unwrap();
    assert_eq!(texture.mip_level_count(), 7);
    assert_eq!(texture.wrap_mode(), WrapMode::Repeat);
    assert_eq!(texture.sampler_state(), SamplerState::default());

    let state = SamplerState::new(MagSelection::Nearest, MinSelection::NearestMipLinear, 40.0);
    texture.apply_sampler_state(&device, state);
    let first = texture.sampler_state();
    texture.apply_sampler_state(&device, state);
    assert_eq!(texture.sampler_state(), first);
    assert_eq!(first.anisotropy, 16.0);
}

#[test]
#[cfg(feature = "integration-tests")]
fn malformed_pixel_buffers_are_rejected() {
    use filter_lab::{
        context::headless_device,
        data_structures::texture::{Texture, texture_bind_group_layout},
        error::SetupError,
        filter::WrapMode,
    };

    use crate::common::test_utils::block_on;

    let (device, queue) = block_on(headless_device()).expect("No GPU available");
    let layout = texture_bind_group_layout(&device);
    let err = Texture::from_pixels(
        &device,
        &queue,
        &layout,
        &[0; 10],
        2,
        2,
        WrapMode::ClampToEdge,
        "short",
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SetupError>(),
        Some(SetupError::PixelBufferSize { expected: 16, actual: 10, .. })
    ));
}
