// src/surface.rs
//! `ImageSurface`: an off-screen drawing surface.
//!
//! Accepts the same drawing commands as a window while it is the current
//! drawing target, and turns what was drawn into an [`RgbImage`]. The surface
//! owns exactly one platform driver; `rescale` swaps it for a new one sized
//! for the current display scale factor while carrying the content over.
//!
//! ```no_run
//! use image_surface::{draw, surface::ImageSurface, color::Color};
//!
//! let surface = ImageSurface::new(120, 80, true)?;
//! surface.set_current();
//! draw::set_color(Color::Rgb(255, 255, 0));
//! draw::rect_fill(0, 0, 120, 80);
//! image_surface::surface::device::pop_current();
//! let image = surface.image()?;
//! assert_eq!((image.w(), image.h()), (120, 80));
//! # Ok::<(), image_surface::error::SurfaceError>(())
//! ```

pub mod device;
pub mod mask;

#[cfg(test)]
mod tests;

use crate::display::driver::{DrawTarget, DriverRef};
use crate::display::drivers::new_image_surface_driver;
use crate::display::pixmap::Offscreen;
use crate::error::{Result, SurfaceError};
use crate::image::{RgbImage, SharedImage};
use crate::pixels::{LogicalPx, PhysicalPx};
use log::{debug, info};

#[derive(Debug)]
pub struct ImageSurface {
    driver: DriverRef,
}

impl ImageSurface {
    /// Creates a surface of `w` x `h`.
    ///
    /// Without `high_res` the buffer is exactly `w` x `h` pixels. With it,
    /// `w` and `h` are logical units and the buffer holds as many pixels as
    /// that area of the display does at the current scale factor.
    pub fn new(w: LogicalPx, h: LogicalPx, high_res: bool) -> Result<Self> {
        Ok(Self {
            driver: new_image_surface_driver(w, h, high_res, None)?,
        })
    }

    /// Creates a surface drawing into an existing buffer.
    ///
    /// The caller keeps ownership of `off`: dropping the surface leaves it alive.
    pub fn with_offscreen(w: LogicalPx, h: LogicalPx, off: Offscreen) -> Result<Self> {
        Ok(Self {
            driver: new_image_surface_driver(w, h, false, Some(off))?,
        })
    }

    /// The target to push on the current-surface stack for this surface.
    pub fn draw_target(&self) -> DrawTarget {
        DrawTarget::Image(self.driver.clone())
    }

    /// Makes this surface receive subsequent drawing commands.
    ///
    /// Pair with `device::pop_current()`.
    pub fn set_current(&self) {
        device::push_current(self.draw_target());
    }

    pub fn is_current(&self) -> bool {
        device::is_current(&self.draw_target())
    }

    pub fn origin(&self) -> (LogicalPx, LogicalPx) {
        self.driver.borrow().origin()
    }

    pub fn set_origin(&self, x: LogicalPx, y: LogicalPx) {
        self.driver.borrow_mut().set_origin(x, y);
    }

    pub fn translate(&self, x: LogicalPx, y: LogicalPx) {
        self.driver.borrow_mut().translate(x, y);
    }

    pub fn untranslate(&self) {
        self.driver.borrow_mut().untranslate();
    }

    /// The buffer behind this surface. It is released with the surface unless
    /// the surface was built with [`ImageSurface::with_offscreen`].
    pub fn offscreen(&self) -> Offscreen {
        self.driver.borrow().offscreen()
    }

    /// Logical (width, height).
    pub fn printable_rect(&self) -> (LogicalPx, LogicalPx) {
        self.driver.borrow().printable_rect()
    }

    /// Pixel (width, height) of the buffer.
    pub fn pixel_size(&self) -> (PhysicalPx, PhysicalPx) {
        self.driver.borrow().pixel_size()
    }

    /// Returns a depth-3 image of everything drawn so far.
    ///
    /// The image has the buffer's pixel resolution and the surface's logical
    /// size. The current-surface stack is left as it was found.
    pub fn image(&self) -> Result<RgbImage> {
        let need_push = !self.is_current();
        if need_push {
            self.set_current();
        }
        let image = self.driver.borrow_mut().image();
        if need_push {
            device::pop_current();
        }
        let mut image = image?;
        let (w, h) = self.printable_rect();
        image.scale(w, h);
        Ok(image)
    }

    /// Returns the surface content as a shared image scaled to the printable size.
    #[deprecated(note = "use `image()` instead")]
    pub fn highres_image(&self) -> Result<SharedImage> {
        let mut shared = SharedImage::new(self.image()?);
        let (w, h) = self.printable_rect();
        shared.scale(w, h);
        Ok(shared)
    }

    /// Restricts drawing made after this call to the white areas of `mask`.
    ///
    /// Gray levels blend new drawing with the content present now. The mask
    /// is resampled to the buffer's pixel size when needed. Call `image()`
    /// between successive masks. Fails if this surface is current.
    pub fn mask(&self, mask: &RgbImage) -> Result<()> {
        if self.is_current() {
            return Err(SurfaceError::SurfaceActive { operation: "mask" });
        }
        self.driver.borrow_mut().mask(mask)
    }

    /// Adapts the surface to a changed display scale factor.
    ///
    /// The content is preserved (resampled), the logical size is unchanged,
    /// and the pixel size follows the current scale factor. The buffer is
    /// replaced, so `offscreen()` returns a new handle afterwards. Fails while
    /// this surface is anywhere on the current-surface stack, since those
    /// entries would keep drawing into the old buffer.
    pub fn rescale(&mut self) -> Result<()> {
        if device::contains(&self.draw_target()) {
            return Err(SurfaceError::SurfaceActive {
                operation: "rescale",
            });
        }
        let rgb = self.image()?;
        let (w, h) = self.printable_rect();
        let driver = new_image_surface_driver(w, h, true, None)?;
        let old = std::mem::replace(&mut self.driver, driver);
        debug!(
            "rescale: {:?} replaced by {:?}",
            old.borrow().offscreen(),
            self.offscreen()
        );
        drop(old);
        self.set_current();
        rgb.draw(0, 0);
        device::pop_current();
        info!(
            "Rescaled {}x{} surface to {:?} px",
            w,
            h,
            self.pixel_size()
        );
        Ok(())
    }

    /// Destroys the surface but keeps its buffer, handing it to the caller.
    pub fn into_offscreen(self) -> Offscreen {
        let mut driver = self.driver.borrow_mut();
        let off = driver.release_offscreen();
        drop(driver);
        off
    }
}

impl Drop for ImageSurface {
    fn drop(&mut self) {
        if self.is_current() {
            debug!("Dropping current surface {:?}; popping it", self.offscreen());
            device::pop_current();
        }
    }
}
