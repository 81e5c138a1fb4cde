// src/image.rs
//! `RgbImage`: packed 1- or 3-channel pixel data with a logical size.
//!
//! The data dimensions (`data_w`/`data_h`) count pixels; the drawn size
//! (`w`/`h`) is in logical units and defaults to the data dimensions. A
//! high-resolution snapshot therefore carries more pixels than its logical
//! size, and drawing it maps the pixels back onto the target's pixel grid.

use crate::error::{Result, SurfaceError};
use crate::pixels::{LogicalPx, PhysicalPx};
use crate::surface::device::{self, DrawTarget};
use log::trace;
use std::rc::Rc;

#[cfg(test)]
mod tests;

/// Number of channels per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Depth {
    /// Luminance or alpha, one byte per pixel.
    Gray = 1,
    /// Packed R, G, B.
    Rgb = 3,
}

impl Depth {
    #[inline]
    pub fn channels(self) -> usize {
        self as usize
    }
}

/// An immutable-after-construction pixel array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    data: Vec<u8>,
    data_w: PhysicalPx,
    data_h: PhysicalPx,
    depth: Depth,
    /// Row stride in bytes; 0 means tightly packed.
    ld: usize,
    w: LogicalPx,
    h: LogicalPx,
}

impl RgbImage {
    /// Wraps tightly packed pixel data.
    pub fn new(data: Vec<u8>, width: PhysicalPx, height: PhysicalPx, depth: Depth) -> Result<Self> {
        Self::with_stride(data, width, height, depth, 0)
    }

    /// Wraps pixel data whose rows are `ld` bytes apart (0 = tightly packed).
    pub fn with_stride(
        data: Vec<u8>,
        width: PhysicalPx,
        height: PhysicalPx,
        depth: Depth,
        ld: usize,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidImage {
                reason: format!("empty image {width}x{height}"),
            });
        }
        let packed = width as usize * depth.channels();
        if ld != 0 && ld < packed {
            return Err(SurfaceError::InvalidImage {
                reason: format!("stride {ld} is smaller than a {packed}-byte row"),
            });
        }
        let stride = if ld == 0 { packed } else { ld };
        let needed = stride * (height as usize - 1) + packed;
        if data.len() < needed {
            return Err(SurfaceError::InvalidImage {
                reason: format!("{} bytes given, {} needed", data.len(), needed),
            });
        }
        Ok(Self {
            data,
            data_w: width,
            data_h: height,
            depth,
            ld,
            w: logical(width),
            h: logical(height),
        })
    }

    /// A uniform image, handy for masks and fills.
    pub fn filled(width: PhysicalPx, height: PhysicalPx, depth: Depth, value: &[u8]) -> Result<Self> {
        if value.len() != depth.channels() {
            return Err(SurfaceError::InvalidImage {
                reason: format!("{} channel values for depth {}", value.len(), depth.channels()),
            });
        }
        let pixels = width as usize * height as usize;
        Self::new(value.repeat(pixels), width, height, depth)
    }

    pub fn data_w(&self) -> PhysicalPx {
        self.data_w
    }

    pub fn data_h(&self) -> PhysicalPx {
        self.data_h
    }

    /// Logical width used when drawing.
    pub fn w(&self) -> LogicalPx {
        self.w
    }

    /// Logical height used when drawing.
    pub fn h(&self) -> LogicalPx {
        self.h
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// Row stride as given at construction (0 = tightly packed).
    pub fn ld(&self) -> usize {
        self.ld
    }

    /// Effective row stride in bytes.
    pub fn row_stride(&self) -> usize {
        if self.ld == 0 {
            self.data_w as usize * self.depth.channels()
        } else {
            self.ld
        }
    }

    /// Raw pixel bytes.
    pub fn array(&self) -> &[u8] {
        &self.data
    }

    /// Bytes of one row, without stride padding.
    pub fn row(&self, y: PhysicalPx) -> &[u8] {
        let start = y as usize * self.row_stride();
        &self.data[start..start + self.data_w as usize * self.depth.channels()]
    }

    /// Channel bytes of pixel `(x, y)`.
    pub fn pixel(&self, x: PhysicalPx, y: PhysicalPx) -> &[u8] {
        let c = self.depth.channels();
        let start = y as usize * self.row_stride() + x as usize * c;
        &self.data[start..start + c]
    }

    /// Pixel `(x, y)` as RGB; gray pixels are replicated to all channels.
    pub fn rgb_at(&self, x: PhysicalPx, y: PhysicalPx) -> [u8; 3] {
        match self.pixel(x, y) {
            [l] => [*l, *l, *l],
            [r, g, b] => [*r, *g, *b],
            _ => [0, 0, 0],
        }
    }

    /// Sets the logical drawing size without touching the pixel data.
    pub fn scale(&mut self, w: LogicalPx, h: LogicalPx) {
        self.w = w;
        self.h = h;
    }

    /// Returns a nearest-neighbour resampled copy of `width` x `height` pixels.
    ///
    /// The copy is tightly packed and its logical size equals its data size.
    pub fn copy(&self, width: PhysicalPx, height: PhysicalPx) -> Result<Self> {
        if width == self.data_w && height == self.data_h {
            let mut data = Vec::with_capacity(width as usize * height as usize * self.depth.channels());
            for y in 0..height {
                data.extend_from_slice(self.row(y));
            }
            return Self::new(data, width, height, self.depth);
        }
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidImage {
                reason: format!("cannot resample to {width}x{height}"),
            });
        }
        trace!(
            "Resampling {}x{} image to {}x{}",
            self.data_w,
            self.data_h,
            width,
            height
        );
        let c = self.depth.channels();
        let mut data = Vec::with_capacity(width as usize * height as usize * c);
        for y in 0..height {
            let sy = nearest(y, height, self.data_h);
            for x in 0..width {
                let sx = nearest(x, width, self.data_w);
                data.extend_from_slice(self.pixel(sx, sy));
            }
        }
        Self::new(data, width, height, self.depth)
    }

    /// Draws this image with its top-left corner at `(x, y)` on the current
    /// drawing target, scaled to its logical size.
    pub fn draw(&self, x: LogicalPx, y: LogicalPx) {
        match device::current() {
            DrawTarget::Display => {
                trace!("Image draw at ({}, {}) sent to the display target", x, y);
            }
            DrawTarget::Image(driver) => driver.borrow_mut().draw_image(self, x, y),
        }
    }
}

/// Maps destination index `i` of `dst_len` onto a source of `src_len`.
#[inline]
fn nearest(i: u32, dst_len: u32, src_len: u32) -> u32 {
    ((i as u64 * src_len as u64) / dst_len as u64) as u32
}

fn logical(px: PhysicalPx) -> LogicalPx {
    LogicalPx::try_from(px).unwrap_or(LogicalPx::MAX)
}

/// A reference-counted image annotated with a logical size.
///
/// Returned by the deprecated `ImageSurface::highres_image`; clones share
/// the pixel data.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedImage {
    image: Rc<RgbImage>,
}

impl SharedImage {
    pub fn new(image: RgbImage) -> Self {
        Self {
            image: Rc::new(image),
        }
    }

    /// Sets the logical drawing size; shared copies keep their pixels.
    pub fn scale(&mut self, w: LogicalPx, h: LogicalPx) {
        Rc::make_mut(&mut self.image).scale(w, h);
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn w(&self) -> LogicalPx {
        self.image.w()
    }

    pub fn h(&self) -> LogicalPx {
        self.image.h()
    }

    /// Number of handles sharing this image.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.image)
    }

    pub fn draw(&self, x: LogicalPx, y: LogicalPx) {
        self.image.draw(x, y);
    }
}
