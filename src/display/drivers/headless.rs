//! Headless image surface driver: software rendering into a pixmap buffer.
//!
//! Has no native mask primitive, so masking goes through the generic
//! `rgb3_to_rgb1` / `copy_with_mask` path: `mask()` keeps the reduced mask
//! and a copy of the buffer as background, and the next readback blends
//! everything drawn since then into that background.

use crate::config::CONFIG;
use crate::display::driver::ImageSurfaceDriver;
use crate::display::pixmap::{self, Offscreen};
use crate::display::scale;
use crate::error::{Result, SurfaceError};
use crate::image::{Depth, RgbImage};
use crate::pixels::{to_physical, LogicalPx, PhysicalPx, ScaleFactor};
use crate::surface::mask::{copy_with_mask, rgb3_to_rgb1};
use log::{debug, info, trace, warn};

/// Mask installed by `mask()` and not yet materialized.
#[derive(Debug)]
struct PendingMask {
    /// Depth-1 mask at the buffer's pixel size.
    alpha: RgbImage,
    /// Buffer content when the mask was installed.
    background: Vec<u8>,
}

#[derive(Debug)]
pub struct HeadlessImageSurfaceDriver {
    offscreen: Offscreen,
    owns_buffer: bool,
    width: LogicalPx,
    height: LogicalPx,
    pixel_w: PhysicalPx,
    pixel_h: PhysicalPx,
    origin: (LogicalPx, LogicalPx),
    translations: Vec<(LogicalPx, LogicalPx)>,
    pending_mask: Option<PendingMask>,
}

impl HeadlessImageSurfaceDriver {
    /// Allocates a buffer for a `w` x `h` surface, or wraps `off` without
    /// taking ownership of it.
    pub fn new(w: LogicalPx, h: LogicalPx, high_res: bool, off: Option<Offscreen>) -> Result<Self> {
        if w <= 0 || h <= 0 {
            return Err(SurfaceError::InvalidDimensions {
                width: w.into(),
                height: h.into(),
            });
        }
        let (offscreen, owns_buffer, (pixel_w, pixel_h)) = match off {
            Some(off) => {
                let dims = pixmap::dimensions(off).ok_or(SurfaceError::UnknownOffscreen(off))?;
                (off, false, dims)
            }
            None => {
                let s: ScaleFactor = if high_res { scale::scale_factor() } else { 1.0 };
                let pixel_w = to_physical(w, s).max(1);
                let pixel_h = to_physical(h, s).max(1);
                let off = pixmap::allocate(
                    pixel_w,
                    pixel_h,
                    CONFIG.image.initial_fill.to_rgb(),
                    CONFIG.offscreen.max_dimension_px,
                )?;
                (off, true, (pixel_w, pixel_h))
            }
        };
        info!(
            "HeadlessImageSurfaceDriver: {}x{} units on {:?} ({}x{} px, owned={})",
            w, h, offscreen, pixel_w, pixel_h, owns_buffer
        );
        Ok(Self {
            offscreen,
            owns_buffer,
            width: w,
            height: h,
            pixel_w,
            pixel_h,
            origin: (0, 0),
            translations: Vec::new(),
            pending_mask: None,
        })
    }

    /// Origin plus all active translations, widened so sums cannot overflow.
    fn offset(&self) -> (i64, i64) {
        let (x, y) = self.origin;
        self.translations
            .iter()
            .fold((i64::from(x), i64::from(y)), |(x, y), &(dx, dy)| {
                (x + i64::from(dx), y + i64::from(dy))
            })
    }

    fn map_x(&self, x: i64) -> i64 {
        (x as f64 * self.pixel_w as f64 / self.width as f64).round() as i64
    }

    fn map_y(&self, y: i64) -> i64 {
        (y as f64 * self.pixel_h as f64 / self.height as f64).round() as i64
    }

    /// Pixel span of a logical rectangle after offsetting, before clipping.
    fn pixel_span(&self, x: LogicalPx, y: LogicalPx, w: LogicalPx, h: LogicalPx) -> (i64, i64, i64, i64) {
        let (ox, oy) = self.offset();
        let (x, y) = (i64::from(x) + ox, i64::from(y) + oy);
        (
            self.map_x(x),
            self.map_y(y),
            self.map_x(x + i64::from(w)),
            self.map_y(y + i64::from(h)),
        )
    }

    fn clip(&self, x0: i64, y0: i64, x1: i64, y1: i64) -> (u32, u32, u32, u32) {
        let cx = |v: i64| v.clamp(0, self.pixel_w as i64) as u32;
        let cy = |v: i64| v.clamp(0, self.pixel_h as i64) as u32;
        (cx(x0), cy(y0), cx(x1), cy(y1))
    }

    /// Blends everything drawn since `mask()` into the saved background.
    fn apply_pending_mask(&mut self) -> Result<()> {
        let Some(pending) = self.pending_mask.take() else {
            return Ok(());
        };
        debug!("HeadlessImageSurfaceDriver: materializing mask on {:?}", self.offscreen);
        let mut composed = pending.background;
        pixmap::with_buffer_mut(self.offscreen, |buffer| {
            let line_size = buffer.line_size();
            copy_with_mask(&pending.alpha, &mut composed, &buffer.data, line_size, false)?;
            buffer.data = composed;
            Ok::<(), SurfaceError>(())
        })
        .ok_or(SurfaceError::UnknownOffscreen(self.offscreen))?
    }
}

impl ImageSurfaceDriver for HeadlessImageSurfaceDriver {
    fn offscreen(&self) -> Offscreen {
        self.offscreen
    }

    fn printable_rect(&self) -> (LogicalPx, LogicalPx) {
        (self.width, self.height)
    }

    fn pixel_size(&self) -> (PhysicalPx, PhysicalPx) {
        (self.pixel_w, self.pixel_h)
    }

    fn scale(&self) -> ScaleFactor {
        self.pixel_w as f64 / self.width as f64
    }

    fn origin(&self) -> (LogicalPx, LogicalPx) {
        self.origin
    }

    fn set_origin(&mut self, x: LogicalPx, y: LogicalPx) {
        self.origin = (x, y);
    }

    fn translate(&mut self, x: LogicalPx, y: LogicalPx) {
        self.translations.push((x, y));
    }

    fn untranslate(&mut self) {
        if self.translations.pop().is_none() {
            warn!("HeadlessImageSurfaceDriver: untranslate without matching translate");
        }
    }

    fn fill_rect(&mut self, x: LogicalPx, y: LogicalPx, w: LogicalPx, h: LogicalPx, rgb: [u8; 3]) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (x0, y0, x1, y1) = self.pixel_span(x, y, w, h);
        let (x0, y0, x1, y1) = self.clip(x0, y0, x1, y1);
        trace!("HeadlessImageSurfaceDriver: fill px [{},{})x[{},{}) with {:?}", x0, x1, y0, y1, rgb);
        pixmap::with_buffer_mut(self.offscreen, |buffer| {
            for py in y0..y1 {
                let start = buffer.pixel_index(x0, py);
                let end = buffer.pixel_index(x1, py);
                for px in buffer.data[start..end].chunks_exact_mut(3) {
                    px.copy_from_slice(&rgb);
                }
            }
        });
    }

    fn draw_image(&mut self, image: &RgbImage, x: LogicalPx, y: LogicalPx) {
        let (x0, y0, x1, y1) = self.pixel_span(x, y, image.w(), image.h());
        let (tw, th) = (x1 - x0, y1 - y0);
        if tw <= 0 || th <= 0 {
            return;
        }
        let (cx0, cy0, cx1, cy1) = self.clip(x0, y0, x1, y1);
        trace!(
            "HeadlessImageSurfaceDriver: draw {}x{} px image into [{},{})x[{},{})",
            image.data_w(),
            image.data_h(),
            cx0,
            cx1,
            cy0,
            cy1
        );
        pixmap::with_buffer_mut(self.offscreen, |buffer| {
            for py in cy0..cy1 {
                let sy = span_sample(py as i64 - y0, th, image.data_h());
                for px in cx0..cx1 {
                    let sx = span_sample(px as i64 - x0, tw, image.data_w());
                    let i = buffer.pixel_index(px, py);
                    buffer.data[i..i + 3].copy_from_slice(&image.rgb_at(sx, sy));
                }
            }
        });
    }

    fn image(&mut self) -> Result<RgbImage> {
        self.apply_pending_mask()?;
        let data = pixmap::with_buffer(self.offscreen, |buffer| buffer.data.clone())
            .ok_or(SurfaceError::UnknownOffscreen(self.offscreen))?;
        RgbImage::new(data, self.pixel_w, self.pixel_h, Depth::Rgb)
    }

    fn mask(&mut self, mask: &RgbImage) -> Result<()> {
        if self.pending_mask.is_some() {
            debug!("HeadlessImageSurfaceDriver: new mask replaces a pending one; materializing it first");
            self.apply_pending_mask()?;
        }
        let alpha = rgb3_to_rgb1(mask, self.pixel_w, self.pixel_h)?;
        let background = pixmap::with_buffer(self.offscreen, |buffer| buffer.data.clone())
            .ok_or(SurfaceError::UnknownOffscreen(self.offscreen))?;
        self.pending_mask = Some(PendingMask { alpha, background });
        Ok(())
    }

    fn release_offscreen(&mut self) -> Offscreen {
        self.owns_buffer = false;
        self.offscreen
    }
}

/// Nearest source index for offset `i` into a destination span of `len` pixels.
fn span_sample(i: i64, len: i64, src_len: u32) -> u32 {
    ((i as i128 * src_len as i128) / len as i128) as u32
}

impl Drop for HeadlessImageSurfaceDriver {
    fn drop(&mut self) {
        if self.owns_buffer {
            trace!("Releasing buffer {:?} via driver drop", self.offscreen);
            pixmap::destroy(self.offscreen);
        }
    }
}
