// src/display/driver.rs
//! ImageSurfaceDriver trait - the platform capability set behind an image surface.
//!
//! One implementation exists per platform back-end; `ImageSurface` owns
//! exactly one driver and delegates nearly everything to it. All common
//! logic (activation, rescale, the handle registry) lives above this trait.
//!
//! ## Coordinate Model
//! Drawing calls take logical units. The driver maps them to pixels with its
//! own scale (`pixel size / logical size`) after applying the origin and any
//! active translations.
//!
//! ## Lifecycle
//! 1. Constructed by `drivers::new_image_surface_driver`, which allocates (or
//!    wraps) the platform buffer.
//! 2. Drawing calls arrive while the driver is on the current-surface stack.
//! 3. `Drop` releases the buffer unless it was supplied by the caller or
//!    handed out with `release_offscreen`.

use crate::display::pixmap::Offscreen;
use crate::error::Result;
use crate::image::RgbImage;
use crate::pixels::{LogicalPx, PhysicalPx, ScaleFactor};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Platform-specific image surface driver.
pub trait ImageSurfaceDriver: fmt::Debug {
    /// The platform buffer this driver draws into.
    fn offscreen(&self) -> Offscreen;

    /// Logical (width, height) of the surface.
    fn printable_rect(&self) -> (LogicalPx, LogicalPx);

    /// Pixel (width, height) of the live buffer.
    fn pixel_size(&self) -> (PhysicalPx, PhysicalPx);

    /// Pixels per logical unit.
    fn scale(&self) -> ScaleFactor;

    fn origin(&self) -> (LogicalPx, LogicalPx);

    fn set_origin(&mut self, x: LogicalPx, y: LogicalPx);

    /// Pushes a translation applied to subsequent drawing.
    fn translate(&mut self, x: LogicalPx, y: LogicalPx);

    /// Pops the most recent `translate`.
    fn untranslate(&mut self);

    /// Fills a logical rectangle with a solid color.
    fn fill_rect(&mut self, x: LogicalPx, y: LogicalPx, w: LogicalPx, h: LogicalPx, rgb: [u8; 3]);

    /// Draws `image` at `(x, y)`, resampled to its logical size.
    fn draw_image(&mut self, image: &RgbImage, x: LogicalPx, y: LogicalPx);

    /// Reads the buffer back as a depth-3 image at pixel resolution,
    /// materializing any pending mask first.
    fn image(&mut self) -> Result<RgbImage>;

    /// Restricts drawing made from now on to the white areas of `mask`.
    fn mask(&mut self, mask: &RgbImage) -> Result<()>;

    /// Gives up ownership of the buffer so that dropping the driver keeps it.
    fn release_offscreen(&mut self) -> Offscreen;
}

/// Shared handle to a driver, held by its surface and by the current-surface stack.
pub type DriverRef = Rc<RefCell<dyn ImageSurfaceDriver>>;

/// Something drawing commands can be routed to.
#[derive(Clone)]
pub enum DrawTarget {
    /// The on-screen display. Drawing here is handled by the window system.
    Display,
    /// An off-screen image surface driver.
    Image(DriverRef),
}

impl DrawTarget {
    /// Identity comparison: same display, or the very same driver object.
    pub fn same_as(&self, other: &DrawTarget) -> bool {
        match (self, other) {
            (DrawTarget::Display, DrawTarget::Display) => true,
            (DrawTarget::Image(a), DrawTarget::Image(b)) => same_driver(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for DrawTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawTarget::Display => write!(f, "Display"),
            DrawTarget::Image(driver) => match driver.try_borrow() {
                Ok(d) => write!(f, "Image({:?})", d.offscreen()),
                Err(_) => write!(f, "Image(<busy>)"),
            },
        }
    }
}

/// Pointer identity of two drivers, ignoring vtable metadata.
pub fn same_driver(a: &DriverRef, b: &DriverRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
