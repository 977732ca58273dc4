use filter_lab::data_structures::mipmap::{downsample, mip_chain, mip_level_count};
use image::RgbaImage;

mod common;
use common::test_utils::{checkerboard, solid};

#[test]
fn level_count_covers_the_largest_dimension() {
    assert_eq!(mip_level_count(1, 1), 1);
    assert_eq!(mip_level_count(2, 2), 2);
    assert_eq!(mip_level_count(256, 256), 9);
    assert_eq!(mip_level_count(256, 1), 9);
    assert_eq!(mip_level_count(5, 3), 3);
    assert_eq!(mip_level_count(0, 0), 1);
}

#[test]
fn chain_halves_down_to_one_texel() {
    let chain = mip_chain(&checkerboard(16, 4, 1));
    let sizes: Vec<_> = chain.iter().map(|level| level.dimensions()).collect();
    assert_eq!(sizes, vec![(16, 4), (8, 2), (4, 1), (2, 1), (1, 1)]);
}

#[test]
fn base_level_is_the_input() {
    let base = checkerboard(8, 8, 2);
    let chain = mip_chain(&base);
    assert_eq!(chain[0], base);
}

#[test]
fn two_by_two_blocks_are_averaged() {
    let src = RgbaImage::from_raw(
        2,
        2,
        vec![
            0, 0, 0, 255, //
            255, 0, 0, 255, //
            0, 255, 0, 255, //
            0, 0, 255, 255,
        ],
    )
    .unwrap();
    let dst = downsample(&src);
    assert_eq!(dst.dimensions(), (1, 1));
    // 255 / 4 = 63.75 rounds to 64.
    assert_eq!(dst.get_pixel(0, 0).0, [64, 64, 64, 255]);
}

#[test]
fn fine_checkerboard_averages_to_grey() {
    let chain = mip_chain(&checkerboard(8, 8, 1));
    for level in &chain[1..] {
        for pixel in level.pixels() {
            assert_eq!(pixel.0, [128, 128, 128, 255]);
        }
    }
}

#[test]
fn odd_edges_fold_into_the_last_texel() {
    // A bright last column must still show up after downsampling 3 -> 1.
    let src = RgbaImage::from_fn(3, 1, |x, _| {
        if x == 2 {
            image::Rgba([255, 255, 255, 255])
        } else {
            image::Rgba([0, 0, 0, 255])
        }
    });
    let dst = downsample(&src);
    assert_eq!(dst.dimensions(), (1, 1));
    assert_eq!(dst.get_pixel(0, 0).0, [85, 85, 85, 255]);
}

#[test]
fn uniform_images_stay_uniform() {
    let chain = mip_chain(&solid(13, 7, [10, 20, 30, 40]));
    assert_eq!(chain.len(), 4);
    for level in &chain {
        assert!(level.pixels().all(|p| p.0 == [10, 20, 30, 40]));
    }
}
