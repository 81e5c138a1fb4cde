// src/surface/tests.rs

use super::*;
use crate::color::{Color, NamedColor};
use crate::display::{pixmap, scale};
use crate::draw;
use crate::image::Depth;
use test_log::test; // For logging within tests

fn fill(surface: &ImageSurface, color: Color) {
    let (w, h) = surface.printable_rect();
    surface.set_current();
    draw::set_color(color);
    draw::rect_fill(0, 0, w, h);
    device::pop_current();
}

fn all_pixels(image: &RgbImage, rgb: [u8; 3]) -> bool {
    (0..image.data_h()).all(|y| (0..image.data_w()).all(|x| image.rgb_at(x, y) == rgb))
}

// --- Construction ---

#[test]
fn pixel_size_is_exact_without_high_res() {
    scale::set_scale_factor(1.75).unwrap();
    for (w, h) in [(1, 1), (13, 7), (100, 3)] {
        let surface = ImageSurface::new(w, h, false).unwrap();
        assert_eq!(surface.pixel_size(), (w as u32, h as u32));
        assert_eq!(surface.printable_rect(), (w, h));
    }
}

#[test]
fn pixel_size_follows_scale_with_high_res() {
    for (s, w, h, expected) in [
        (1.0, 10, 5, (10, 5)),
        (2.0, 10, 5, (20, 10)),
        (1.5, 7, 3, (11, 5)),
        (1.25, 9, 4, (11, 5)),
    ] {
        scale::set_scale_factor(s).unwrap();
        let surface = ImageSurface::new(w, h, true).unwrap();
        assert_eq!(surface.pixel_size(), expected, "scale {s}, {w}x{h}");
        assert_eq!(surface.printable_rect(), (w, h));
    }
}

#[test]
fn construction_failures_propagate() {
    assert!(matches!(
        ImageSurface::new(0, 10, false),
        Err(SurfaceError::InvalidDimensions { .. })
    ));
    assert!(matches!(
        ImageSurface::new(100_000, 10, false),
        Err(SurfaceError::Allocation { .. })
    ));
    assert_eq!(pixmap::live_count(), 0);
}

#[test]
fn drop_releases_owned_buffer() {
    let surface = ImageSurface::new(4, 4, false).unwrap();
    let off = surface.offscreen();
    assert!(pixmap::exists(off));
    drop(surface);
    assert!(!pixmap::exists(off));
}

#[test]
fn drop_keeps_caller_supplied_buffer() {
    let off = pixmap::allocate(6, 4, [0, 0, 0], 1000).unwrap();
    let surface = ImageSurface::with_offscreen(3, 2, off).unwrap();
    assert_eq!(surface.offscreen(), off);
    assert_eq!(surface.pixel_size(), (6, 4));
    assert_eq!(surface.printable_rect(), (3, 2));
    fill(&surface, Color::Named(NamedColor::Red));
    drop(surface);
    assert!(pixmap::exists(off));
    assert_eq!(pixmap::with_buffer(off, |b| b.pixel(5, 3)), Some([255, 0, 0]));
}

#[test]
fn wrapping_unknown_buffer_fails() {
    let off = pixmap::allocate(1, 1, [0; 3], 10).unwrap();
    pixmap::destroy(off);
    assert_eq!(
        ImageSurface::with_offscreen(1, 1, off).unwrap_err(),
        SurfaceError::UnknownOffscreen(off)
    );
}

#[test]
fn into_offscreen_keeps_the_buffer() {
    let surface = ImageSurface::new(2, 2, false).unwrap();
    fill(&surface, Color::Named(NamedColor::Green));
    let off = surface.into_offscreen();
    assert_eq!(pixmap::with_buffer(off, |b| b.pixel(0, 0)), Some([0, 255, 0]));
    assert!(pixmap::destroy(off));
}

// --- Activation ---

#[test]
fn set_current_and_is_current() {
    let surface = ImageSurface::new(2, 2, false).unwrap();
    assert!(!surface.is_current());
    surface.set_current();
    assert!(surface.is_current());
    device::pop_current();
    assert!(!surface.is_current());
    assert!(device::is_current(&DrawTarget::Display));
}

#[test]
fn dropping_current_surface_restores_previous_target() {
    let outer = ImageSurface::new(2, 2, false).unwrap();
    outer.set_current();
    let inner = ImageSurface::new(2, 2, false).unwrap();
    let inner_off = inner.offscreen();
    inner.set_current();
    assert_eq!(device::depth(), 2);
    drop(inner);
    assert_eq!(device::depth(), 1);
    assert!(outer.is_current());
    assert!(!pixmap::exists(inner_off));
    drop(outer);
    assert_eq!(device::depth(), 0);
    assert!(device::is_current(&DrawTarget::Display));
}

#[test]
fn origin_and_translation_pass_through() {
    let surface = ImageSurface::new(4, 4, false).unwrap();
    fill(&surface, Color::BLACK);
    surface.set_origin(2, 1);
    assert_eq!(surface.origin(), (2, 1));
    surface.translate(1, 1);
    surface.set_current();
    draw::set_color(Color::WHITE);
    draw::point(0, 0);
    device::pop_current();
    surface.untranslate();
    let img = surface.image().unwrap();
    assert_eq!(img.rgb_at(3, 2), [255, 255, 255]);
    assert_eq!(img.rgb_at(2, 1), [0, 0, 0]);
}

// --- Snapshot ---

#[test]
fn image_is_annotated_with_logical_size() {
    scale::set_scale_factor(2.0).unwrap();
    let surface = ImageSurface::new(5, 3, true).unwrap();
    let img = surface.image().unwrap();
    assert_eq!(img.depth(), Depth::Rgb);
    assert_eq!((img.data_w(), img.data_h()), (10, 6));
    assert_eq!((img.w(), img.h()), (5, 3));
}

#[test]
fn image_leaves_the_stack_unchanged() {
    let surface = ImageSurface::new(2, 2, false).unwrap();
    surface.image().unwrap();
    assert_eq!(device::depth(), 0);

    surface.set_current();
    surface.image().unwrap();
    assert_eq!(device::depth(), 1);
    assert!(surface.is_current());
    device::pop_current();
}

#[test]
fn repeated_readback_is_identical() {
    let surface = ImageSurface::new(6, 4, false).unwrap();
    surface.set_current();
    draw::set_color(Color::Rgb(12, 34, 56));
    draw::rect_fill(1, 1, 3, 2);
    device::pop_current();
    let first = surface.image().unwrap();
    let second = surface.image().unwrap();
    assert_eq!(first, second);
}

#[test]
#[allow(deprecated)]
fn highres_image_is_shared_and_scaled() {
    scale::set_scale_factor(2.0).unwrap();
    let surface = ImageSurface::new(4, 2, true).unwrap();
    let shared = surface.highres_image().unwrap();
    assert_eq!((shared.w(), shared.h()), (4, 2));
    assert_eq!(shared.image().data_w(), 8);
}

// --- Masking ---

#[test]
fn mask_restricts_later_drawing_to_white_areas() {
    let surface = ImageSurface::new(4, 2, false).unwrap();

    surface.set_current();
    draw::set_color(Color::BLACK);
    draw::rect_fill(0, 0, 4, 2);
    draw::set_color(Color::WHITE);
    draw::rect_fill(0, 0, 2, 2);
    let mask = surface.image().unwrap();
    draw::set_color(Color::Named(NamedColor::Yellow));
    draw::rect_fill(0, 0, 4, 2);
    device::pop_current();

    surface.mask(&mask).unwrap();
    fill(&surface, Color::Named(NamedColor::Blue));

    let out = surface.image().unwrap();
    assert_eq!(out.rgb_at(0, 0), [0, 0, 255]);
    assert_eq!(out.rgb_at(1, 1), [0, 0, 255]);
    assert_eq!(out.rgb_at(2, 0), [255, 255, 0]);
    assert_eq!(out.rgb_at(3, 1), [255, 255, 0]);
}

#[test]
fn gray_mask_blends_proportionally() {
    let surface = ImageSurface::new(1, 1, false).unwrap();
    fill(&surface, Color::Rgb(0, 0, 0));
    let mask = RgbImage::filled(1, 1, Depth::Rgb, &[51, 51, 51]).unwrap();
    surface.mask(&mask).unwrap();
    fill(&surface, Color::Rgb(255, 100, 5));
    // (0 * 204 + c * 51) / 255
    assert_eq!(surface.image().unwrap().rgb_at(0, 0), [51, 20, 1]);
}

#[test]
fn mask_of_another_size_is_resampled() {
    scale::set_scale_factor(2.0).unwrap();
    let surface = ImageSurface::new(4, 4, true).unwrap();
    fill(&surface, Color::BLACK);
    // left half white, 2x1 pixels
    let mask = RgbImage::new(vec![255, 255, 255, 0, 0, 0], 2, 1, Depth::Rgb).unwrap();
    surface.mask(&mask).unwrap();
    fill(&surface, Color::WHITE);
    let out = surface.image().unwrap();
    assert_eq!(out.rgb_at(3, 7), [255, 255, 255]);
    assert_eq!(out.rgb_at(4, 0), [0, 0, 0]);
}

#[test]
fn successive_masks_compose_through_image() {
    let surface = ImageSurface::new(3, 1, false).unwrap();
    fill(&surface, Color::BLACK);

    let first = RgbImage::new(vec![255, 255, 0], 3, 1, Depth::Gray).unwrap();
    surface.mask(&first).unwrap();
    fill(&surface, Color::Named(NamedColor::Red));
    surface.image().unwrap();

    let second = RgbImage::new(vec![0, 255, 255], 3, 1, Depth::Gray).unwrap();
    surface.mask(&second).unwrap();
    fill(&surface, Color::Named(NamedColor::Green));
    let out = surface.image().unwrap();

    assert_eq!(out.rgb_at(0, 0), [255, 0, 0]);
    assert_eq!(out.rgb_at(1, 0), [0, 255, 0]);
    assert_eq!(out.rgb_at(2, 0), [0, 255, 0]);
}

#[test]
fn mask_while_current_is_rejected() {
    let surface = ImageSurface::new(2, 2, false).unwrap();
    let mask = RgbImage::filled(2, 2, Depth::Rgb, &[0, 0, 0]).unwrap();
    surface.set_current();
    assert_eq!(
        surface.mask(&mask),
        Err(SurfaceError::SurfaceActive { operation: "mask" })
    );
    device::pop_current();
    assert!(surface.mask(&mask).is_ok());
}

// --- Rescale ---

#[test]
fn rescale_keeps_logical_size_and_content() {
    scale::set_scale_factor(1.0).unwrap();
    let mut surface = ImageSurface::new(8, 6, true).unwrap();
    fill(&surface, Color::Rgb(10, 200, 30));
    let old_off = surface.offscreen();

    scale::set_scale_factor(2.0).unwrap();
    surface.rescale().unwrap();

    assert_eq!(surface.printable_rect(), (8, 6));
    assert_eq!(surface.pixel_size(), (16, 12));
    assert_ne!(surface.offscreen(), old_off);
    assert!(!pixmap::exists(old_off));
    assert_eq!(device::depth(), 0);
    assert!(all_pixels(&surface.image().unwrap(), [10, 200, 30]));
}

#[test]
fn rescale_resamples_regions() {
    scale::set_scale_factor(2.0).unwrap();
    let mut surface = ImageSurface::new(4, 2, true).unwrap();
    surface.set_current();
    draw::set_color(Color::BLACK);
    draw::rect_fill(0, 0, 2, 2);
    draw::set_color(Color::WHITE);
    draw::rect_fill(2, 0, 2, 2);
    device::pop_current();

    scale::set_scale_factor(1.0).unwrap();
    surface.rescale().unwrap();
    let out = surface.image().unwrap();
    assert_eq!((out.data_w(), out.data_h()), (4, 2));
    assert_eq!(out.rgb_at(1, 1), [0, 0, 0]);
    assert_eq!(out.rgb_at(2, 0), [255, 255, 255]);
}

#[test]
fn rescale_while_current_is_rejected() {
    let mut surface = ImageSurface::new(2, 2, true).unwrap();
    let off = surface.offscreen();
    surface.set_current();
    assert_eq!(
        surface.rescale(),
        Err(SurfaceError::SurfaceActive {
            operation: "rescale"
        })
    );
    assert_eq!(surface.offscreen(), off);
    device::pop_current();
}

#[test]
fn rescale_below_the_top_of_the_stack_is_rejected() {
    let mut below = ImageSurface::new(2, 2, true).unwrap();
    let above = ImageSurface::new(2, 2, true).unwrap();
    let off = below.offscreen();
    below.set_current();
    above.set_current();
    assert!(!below.is_current());
    assert_eq!(
        below.rescale(),
        Err(SurfaceError::SurfaceActive {
            operation: "rescale"
        })
    );
    assert_eq!(below.offscreen(), off);
    device::pop_current();
    device::pop_current();
    assert!(below.rescale().is_ok());
}

#[test]
fn rescale_of_wrapped_buffer_leaves_it_to_the_caller() {
    let off = pixmap::allocate(2, 2, [9, 9, 9], 100).unwrap();
    let mut surface = ImageSurface::with_offscreen(2, 2, off).unwrap();
    scale::set_scale_factor(3.0).unwrap();
    surface.rescale().unwrap();
    assert!(pixmap::exists(off));
    assert_eq!(surface.pixel_size(), (6, 6));
    assert!(all_pixels(&surface.image().unwrap(), [9, 9, 9]));
}
