#![allow(dead_code)]

use std::future::Future;

use filter_lab::filter::{FilterParameterState, MagSelection, MinSelection};
use image::RgbaImage;
use winit::dpi::PhysicalSize;

pub(crate) fn window(width: u32, height: u32) -> PhysicalSize<u32> {
    PhysicalSize::new(width, height)
}

pub(crate) fn params(mag: MagSelection, min: MinSelection, anisotropy: f32) -> FilterParameterState {
    let mut params = FilterParameterState {
        mag_selection: mag,
        min_selection: min,
        ..Default::default()
    };
    params.set_anisotropy(anisotropy);
    params
}

/// Black and white squares of `cell` texels, white in the top-left corner.
pub(crate) fn checkerboard(width: u32, height: u32, cell: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            image::Rgba([255, 255, 255, 255])
        } else {
            image::Rgba([0, 0, 0, 255])
        }
    })
}

pub(crate) fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, image::Rgba(rgba))
}

pub(crate) fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to build a test runtime")
        .block_on(future)
}

/// The byte an sRGB render target stores for a linear colour channel.
pub(crate) fn linear_to_srgb_u8(v: f64) -> u8 {
    let v = v.clamp(0.0, 1.0);
    let encoded = if v <= 0.0031308 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round() as u8
}

pub(crate) fn assert_pixel_near(actual: image::Rgba<u8>, expected: [u8; 4], tolerance: u8) {
    for (a, e) in actual.0.iter().zip(expected) {
        assert!(
            a.abs_diff(e) <= tolerance,
            "pixel {:?} differs from {:?} by more than {}",
            actual.0,
            expected,
            tolerance
        );
    }
}
