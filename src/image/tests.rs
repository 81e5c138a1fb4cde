// src/image/tests.rs

use super::*;
use crate::surface::ImageSurface;
use test_log::test; // For logging within tests

fn checker_2x2() -> RgbImage {
    // red, green / blue, white
    RgbImage::new(
        vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255],
        2,
        2,
        Depth::Rgb,
    )
    .unwrap()
}

#[test]
fn new_validates_data_length() {
    assert!(RgbImage::new(vec![0; 11], 2, 2, Depth::Rgb).is_err());
    assert!(RgbImage::new(vec![0; 4], 2, 2, Depth::Gray).is_ok());
    assert!(RgbImage::new(Vec::new(), 0, 2, Depth::Gray).is_err());
}

#[test]
fn stride_must_cover_a_row() {
    assert!(RgbImage::with_stride(vec![0; 20], 3, 2, Depth::Rgb, 8).is_err());
    let img = RgbImage::with_stride(vec![0; 19], 3, 2, Depth::Rgb, 10).unwrap();
    assert_eq!(img.ld(), 10);
    assert_eq!(img.row_stride(), 10);
    assert_eq!(img.row(1).len(), 9);
}

#[test]
fn logical_size_defaults_to_data_size_and_is_annotatable() {
    let mut img = checker_2x2();
    assert_eq!((img.w(), img.h()), (2, 2));
    img.scale(1, 1);
    assert_eq!((img.w(), img.h()), (1, 1));
    assert_eq!((img.data_w(), img.data_h()), (2, 2));
}

#[test]
fn copy_upsamples_nearest_neighbour() {
    let big = checker_2x2().copy(4, 4).unwrap();
    assert_eq!((big.data_w(), big.data_h()), (4, 4));
    assert_eq!(big.rgb_at(0, 0), [255, 0, 0]);
    assert_eq!(big.rgb_at(1, 1), [255, 0, 0]);
    assert_eq!(big.rgb_at(2, 0), [0, 255, 0]);
    assert_eq!(big.rgb_at(0, 3), [0, 0, 255]);
    assert_eq!(big.rgb_at(3, 3), [255, 255, 255]);
}

#[test]
fn copy_downsamples_and_packs_strided_data() {
    let data = vec![1, 2, 3, 0, 4, 5, 6, 0];
    let img = RgbImage::with_stride(data, 1, 2, Depth::Rgb, 4).unwrap();
    let same = img.copy(1, 2).unwrap();
    assert_eq!(same.ld(), 0);
    assert_eq!(same.array(), &[1, 2, 3, 4, 5, 6]);
    let one = img.copy(1, 1).unwrap();
    assert_eq!(one.array(), &[1, 2, 3]);
}

#[test]
fn gray_pixels_replicate_to_rgb() {
    let img = RgbImage::new(vec![7, 9], 2, 1, Depth::Gray).unwrap();
    assert_eq!(img.rgb_at(1, 0), [9, 9, 9]);
}

#[test]
fn filled_checks_channel_count() {
    assert!(RgbImage::filled(2, 2, Depth::Rgb, &[1]).is_err());
    let img = RgbImage::filled(2, 2, Depth::Gray, &[4]).unwrap();
    assert!(img.array().iter().all(|&b| b == 4));
}

#[test]
fn draw_scales_to_logical_size() {
    let surface = ImageSurface::new(4, 4, false).unwrap();
    let mut img = checker_2x2();
    img.scale(4, 4);
    surface.set_current();
    img.draw(0, 0);
    device::pop_current();
    let out = surface.image().unwrap();
    assert_eq!(out.rgb_at(1, 1), [255, 0, 0]);
    assert_eq!(out.rgb_at(3, 0), [0, 255, 0]);
    assert_eq!(out.rgb_at(3, 3), [255, 255, 255]);
}

#[test]
fn draw_on_display_changes_nothing() {
    let surface = ImageSurface::new(2, 2, false).unwrap();
    checker_2x2().draw(0, 0);
    assert_eq!(surface.image().unwrap().rgb_at(0, 0), [255, 255, 255]);
}

#[test]
fn shared_image_clones_share_pixels() {
    let shared = SharedImage::new(checker_2x2());
    let mut other = shared.clone();
    assert_eq!(shared.ref_count(), 2);
    other.scale(8, 8);
    assert_eq!((other.w(), other.h()), (8, 8));
    assert_eq!((shared.w(), shared.h()), (2, 2));
    assert_eq!(other.image().array(), shared.image().array());
}
