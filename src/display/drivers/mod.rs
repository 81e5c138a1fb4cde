// src/display/drivers/mod.rs
//! Platform-specific image surface driver implementations.

pub mod headless;

pub use headless::HeadlessImageSurfaceDriver;

use crate::display::driver::DriverRef;
use crate::display::pixmap::Offscreen;
use crate::error::Result;
use crate::pixels::LogicalPx;
use std::cell::RefCell;
use std::rc::Rc;

/// Creates the driver for this platform.
///
/// `w` and `h` are pixels when `high_res` is false and logical units scaled
/// by the display scale factor otherwise. With `off`, the driver draws into
/// that existing buffer and never releases it.
pub fn new_image_surface_driver(
    w: LogicalPx,
    h: LogicalPx,
    high_res: bool,
    off: Option<Offscreen>,
) -> Result<DriverRef> {
    let driver: DriverRef = Rc::new(RefCell::new(HeadlessImageSurfaceDriver::new(
        w, h, high_res, off,
    )?));
    Ok(driver)
}
