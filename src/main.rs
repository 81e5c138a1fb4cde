// In src/main.rs

// Builds a masked image the way a widget would: draw a mask, paint a
// background, apply the mask, draw the foreground, read the result back.
// Then drives the handle API through a scale factor change.

use image_surface::{
    color::{Color, NamedColor},
    display::scale,
    draw,
    offscreen,
    surface::{device, ImageSurface},
    RgbImage,
};

// Logging
use anyhow::Context;
use log::info;

const WIDTH: i32 = 64;
const HEIGHT: i32 = 48;

fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Display scale factor: {}", scale::scale_factor());

    let masked = build_masked_image().context("Failed to build masked image")?;
    info!(
        "Masked image: {}x{} units, {}x{} px",
        masked.w(),
        masked.h(),
        masked.data_w(),
        masked.data_h()
    );
    let (cx, cy) = (masked.data_w() / 2, masked.data_h() / 2);
    info!(
        "Center pixel {:?}, corner pixel {:?}",
        masked.rgb_at(cx, cy),
        masked.rgb_at(0, 0)
    );

    exercise_handle_api().context("Offscreen handle API failed")?;

    info!("surface-demo finished.");
    Ok(())
}

fn build_masked_image() -> anyhow::Result<RgbImage> {
    let surface =
        ImageSurface::new(WIDTH, HEIGHT, true).context("Failed to create image surface")?;

    // --- Mask: white rectangle on black ---
    surface.set_current();
    draw::set_color(Color::BLACK);
    draw::rect_fill(0, 0, WIDTH, HEIGHT);
    draw::set_color(Color::WHITE);
    draw::rect_fill(WIDTH / 4, HEIGHT / 4, WIDTH / 2, HEIGHT / 2);
    let mask = surface.image()?;

    // --- Background ---
    draw::set_color(Color::Named(NamedColor::Yellow));
    draw::rect_fill(0, 0, WIDTH, HEIGHT);
    device::pop_current();

    surface.mask(&mask).context("Failed to apply mask")?;

    // --- Foreground, filtered by the mask ---
    surface.set_current();
    draw::set_color(Color::Named(NamedColor::Blue));
    draw::rect_fill(0, 0, WIDTH, HEIGHT);
    device::pop_current();

    Ok(surface.image()?)
}

fn exercise_handle_api() -> anyhow::Result<()> {
    let mut off = offscreen::create_offscreen(WIDTH, HEIGHT)?;
    info!("Created {:?}", off);

    offscreen::begin_offscreen(off);
    draw::set_color(Color::Named(NamedColor::Green));
    draw::rect_fill(0, 0, WIDTH, HEIGHT);
    offscreen::end_offscreen();

    scale::set_scale_factor(2.0)?;
    let old = off;
    offscreen::rescale_offscreen(&mut off)?;
    info!("Rescaled {:?} -> {:?}", old, off);

    let target = ImageSurface::new(WIDTH, HEIGHT, true)?;
    target.set_current();
    offscreen::copy_offscreen(0, 0, WIDTH, HEIGHT, off, 0, 0)?;
    device::pop_current();
    let copied = target.image()?;
    info!(
        "Copied offscreen into a {}x{} px surface, pixel {:?}",
        copied.data_w(),
        copied.data_h(),
        copied.rgb_at(0, 0)
    );

    offscreen::delete_offscreen(off);
    Ok(())
}
