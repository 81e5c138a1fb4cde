// src/offscreen.rs
//! Handle-based offscreen API on top of [`ImageSurface`].
//!
//! For callers that keep a bare [`Offscreen`] value instead of owning a
//! surface. Each call maps onto the object API:
//!
//! | handle API                        | object API                          |
//! |-----------------------------------|-------------------------------------|
//! | `create_offscreen(w, h)`          | `ImageSurface::new(w, h, true)`     |
//! | `begin_offscreen(off)`            | `surface.set_current()`             |
//! | `end_offscreen()`                 | `device::pop_current()`             |
//! | `copy_offscreen(x, y, w, h, off, sx, sy)` | draw part of `surface.image()` |
//! | `rescale_offscreen(&mut off)`     | `surface.rescale()`                 |
//! | `delete_offscreen(off)`           | `drop(surface)`                     |
//!
//! Surfaces live in a slot table owned by the GUI thread. Freed slots are
//! reused first-fit; the table grows by `CONFIG.offscreen.slot_batch` slots
//! when full. Lookups are linear in the number of slots. Handles that are not
//! in the table make every call a no-op.


use crate::config::CONFIG;
use crate::display::pixmap::{self, Offscreen};
use crate::display::scale;
use crate::error::Result;
use crate::image::{Depth, RgbImage};
use crate::pixels::{to_physical, to_physical_coord, LogicalPx};
use crate::surface::{device, ImageSurface};
use log::{debug, trace, warn};
use std::cell::RefCell;

#[derive(Debug, Default)]
struct OffscreenRegistry {
    slots: Vec<Option<ImageSurface>>,
    /// Slots reserved so far; grows in whole batches.
    capacity: usize,
}

impl OffscreenRegistry {
    /// Returns an available slot index, growing the table if none is free.
    fn find_slot(&mut self) -> usize {
        if let Some(free) = self.slots.iter().position(Option::is_none) {
            return free;
        }
        if self.slots.len() >= self.capacity {
            let batch = CONFIG.offscreen.slot_batch.max(1);
            self.capacity += batch;
            self.slots.reserve_exact(self.capacity - self.slots.len());
            debug!("Offscreen registry grown to {} slots", self.capacity);
        }
        self.slots.push(None);
        self.slots.len() - 1
    }

    fn position(&self, off: Offscreen) -> Option<usize> {
        self.slots.iter().position(|slot| {
            slot.as_ref()
                .is_some_and(|surface| surface.offscreen() == off)
        })
    }
}

thread_local! {
    static REGISTRY: RefCell<OffscreenRegistry> = RefCell::new(OffscreenRegistry::default());
}

/// Creates an offscreen buffer of `w` x `h` logical units.
///
/// Its pixel size matches that area of the display at the current scale factor.
pub fn create_offscreen(w: LogicalPx, h: LogicalPx) -> Result<Offscreen> {
    let surface = ImageSurface::new(w, h, true)?;
    let off = surface.offscreen();
    REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        let slot = registry.find_slot();
        registry.slots[slot] = Some(surface);
        debug!("create_offscreen: {:?} in slot {}", off, slot);
    });
    Ok(off)
}

/// Deletes an offscreen buffer created by [`create_offscreen`].
pub fn delete_offscreen(off: Offscreen) {
    let surface = REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        let slot = registry.position(off)?;
        registry.slots[slot].take()
    });
    match surface {
        // dropped outside the registry borrow
        Some(surface) => drop(surface),
        None => warn!("delete_offscreen: unknown {:?}", off),
    }
}

/// Sends subsequent drawing commands to `off`. Pair with [`end_offscreen`].
pub fn begin_offscreen(off: Offscreen) {
    let target = REGISTRY.with(|registry| {
        let registry = registry.borrow();
        registry
            .position(off)
            .and_then(|slot| registry.slots[slot].as_ref().map(ImageSurface::draw_target))
    });
    match target {
        Some(target) => device::push_current(target),
        None => warn!("begin_offscreen: unknown {:?}", off),
    }
}

/// Stops sending drawing commands to the offscreen made current last.
pub fn end_offscreen() {
    device::pop_current();
}

/// Adapts `off` to a changed display scale factor, keeping its content.
///
/// The buffer is replaced: `off` is updated in place and the new handle is
/// also returned; the old value must not be used again. Fails with
/// `SurfaceActive` between `begin_offscreen` and `end_offscreen` for this
/// buffer, even when other offscreens were begun after it. Unknown handles
/// are left untouched.
pub fn rescale_offscreen(off: &mut Offscreen) -> Result<Offscreen> {
    let surface = REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        let slot = registry.position(*off)?;
        registry.slots[slot].take().map(|surface| (slot, surface))
    });
    let Some((slot, mut surface)) = surface else {
        warn!("rescale_offscreen: unknown {:?}", off);
        return Ok(*off);
    };
    let result = surface.rescale();
    let new_off = surface.offscreen();
    REGISTRY.with(|registry| registry.borrow_mut().slots[slot] = Some(surface));
    result?;
    debug!("rescale_offscreen: {:?} -> {:?}", off, new_off);
    *off = new_off;
    Ok(new_off)
}

/// Draws the `w` x `h` region at `(src_x, src_y)` of `off` at `(x, y)` on the
/// current drawing target. All values are logical units; the source region
/// maps to pixels by the current display scale factor.
pub fn copy_offscreen(
    x: LogicalPx,
    y: LogicalPx,
    w: LogicalPx,
    h: LogicalPx,
    off: Offscreen,
    src_x: LogicalPx,
    src_y: LogicalPx,
) -> Result<()> {
    if w <= 0 || h <= 0 {
        return Ok(());
    }
    let s = scale::scale_factor();
    let region = pixmap::with_buffer(off, |buffer| {
        let x0 = to_physical_coord(src_x, s).clamp(0, buffer.width as i64) as u32;
        let y0 = to_physical_coord(src_y, s).clamp(0, buffer.height as i64) as u32;
        let pw = to_physical(w, s).min(buffer.width - x0);
        let ph = to_physical(h, s).min(buffer.height - y0);
        if pw == 0 || ph == 0 {
            return None;
        }
        let mut data = Vec::with_capacity(pw as usize * ph as usize * pixmap::BYTES_PER_PIXEL);
        for row in y0..y0 + ph {
            let start = buffer.pixel_index(x0, row);
            let end = buffer.pixel_index(x0 + pw, row);
            data.extend_from_slice(&buffer.data[start..end]);
        }
        Some((data, pw, ph))
    });
    let Some(region) = region else {
        warn!("copy_offscreen: unknown {:?}", off);
        return Ok(());
    };
    let Some((data, pw, ph)) = region else {
        trace!("copy_offscreen: source region outside {:?}", off);
        return Ok(());
    };
    let mut image = RgbImage::new(data, pw, ph, Depth::Rgb)?;
    // a region clipped by the buffer edge covers proportionally fewer units
    let lw = ((pw as f64 / s).round() as LogicalPx).clamp(1, w);
    let lh = ((ph as f64 / s).round() as LogicalPx).clamp(1, h);
    image.scale(lw, lh);
    image.draw(x, y);
    Ok(())
}

/// Number of slots in the registry, free or in use.
pub fn slot_count() -> usize {
    REGISTRY.with(|registry| registry.borrow().slots.len())
}

/// Number of slots reserved by batch growth.
pub fn slot_capacity() -> usize {
    REGISTRY.with(|registry| registry.borrow().capacity)
}

/// Number of live offscreens created through this API.
pub fn live_offscreens() -> usize {
    REGISTRY.with(|registry| registry.borrow().slots.iter().flatten().count())
}
