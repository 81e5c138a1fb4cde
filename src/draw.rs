// src/draw.rs
//! Drawing primitives routed to the current drawing target.
//!
//! Coordinates are logical units. Commands go to whatever
//! `surface::device::current()` returns when they are issued; the display
//! target hands them to the window system, which is outside this crate.

use crate::color::Color;
use crate::image::RgbImage;
use crate::pixels::LogicalPx;
use crate::surface::device::{self, DrawTarget};
use log::trace;
use std::cell::Cell;

thread_local! {
    static COLOR: Cell<Color> = const { Cell::new(Color::BLACK) };
}

/// Sets the color used by subsequent fills.
pub fn set_color(color: Color) {
    COLOR.with(|c| c.set(color));
}

/// The color used by fills.
pub fn color() -> Color {
    COLOR.with(|c| c.get())
}

/// Fills a rectangle with the current color.
pub fn rect_fill(x: LogicalPx, y: LogicalPx, w: LogicalPx, h: LogicalPx) {
    let rgb = color().to_rgb();
    match device::current() {
        DrawTarget::Display => trace!("rect_fill({}, {}, {}, {}) on display", x, y, w, h),
        DrawTarget::Image(driver) => driver.borrow_mut().fill_rect(x, y, w, h, rgb),
    }
}

/// Sets one logical unit to the current color.
pub fn point(x: LogicalPx, y: LogicalPx) {
    rect_fill(x, y, 1, 1);
}

/// Draws `image` at `(x, y)` with its logical size.
pub fn draw_image(image: &RgbImage, x: LogicalPx, y: LogicalPx) {
    image.draw(x, y);
}
