// src/display/pixmap.rs
//! Platform pixel buffers addressed by opaque [`Offscreen`] handles.
//!
//! This is the headless stand-in for a native drawable (an X11 `Pixmap`, a
//! `CGContext`, a DIB section): a table of packed RGB buffers owned by the
//! GUI thread. Buffers are created and destroyed explicitly; a handle stays
//! valid until [`destroy`] is called on it and is never reused afterwards.

use crate::error::{Result, SurfaceError};
use crate::pixels::PhysicalPx;
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroU64;

/// Bytes per pixel of every platform buffer (packed R, G, B).
pub const BYTES_PER_PIXEL: usize = 3;

/// Opaque handle to a platform pixel buffer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Offscreen(NonZeroU64);

impl Offscreen {
    /// Raw numeric value of the handle, for logging and FFI-style callers.
    pub fn as_raw(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for Offscreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Offscreen({:#x})", self.0.get())
    }
}

/// A packed RGB pixel buffer, rows top to bottom, stride `3 * width`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: PhysicalPx,
    pub height: PhysicalPx,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    fn new(width: PhysicalPx, height: PhysicalPx, fill: [u8; 3]) -> Result<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .ok_or_else(|| SurfaceError::Allocation {
                width,
                height,
                reason: "buffer size overflows usize".to_string(),
            })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|e| SurfaceError::Allocation {
                width,
                height,
                reason: e.to_string(),
            })?;
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&fill);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Byte length of one row.
    #[inline]
    pub fn line_size(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Byte offset of pixel `(x, y)`.
    #[inline]
    pub fn pixel_index(&self, x: PhysicalPx, y: PhysicalPx) -> usize {
        y as usize * self.line_size() + x as usize * BYTES_PER_PIXEL
    }

    /// The `[r, g, b]` bytes of pixel `(x, y)`.
    pub fn pixel(&self, x: PhysicalPx, y: PhysicalPx) -> [u8; 3] {
        let i = self.pixel_index(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

thread_local! {
    static BUFFERS: RefCell<HashMap<Offscreen, PixelBuffer>> = RefCell::new(HashMap::new());
    static NEXT_HANDLE: Cell<u64> = const { Cell::new(1) };
}

/// Allocates a new buffer of `width` x `height` pixels filled with `fill`.
///
/// Fails when either side is zero or exceeds `max_dimension`, or when the
/// memory cannot be reserved.
pub fn allocate(
    width: PhysicalPx,
    height: PhysicalPx,
    fill: [u8; 3],
    max_dimension: PhysicalPx,
) -> Result<Offscreen> {
    if width == 0 || height == 0 {
        return Err(SurfaceError::InvalidDimensions {
            width: width.into(),
            height: height.into(),
        });
    }
    if width > max_dimension || height > max_dimension {
        return Err(SurfaceError::Allocation {
            width,
            height,
            reason: format!("exceeds the {max_dimension} pixel limit"),
        });
    }
    let buffer = PixelBuffer::new(width, height, fill)?;
    let raw = NEXT_HANDLE.with(|next| {
        let raw = next.get();
        next.set(raw + 1);
        raw
    });
    let handle = Offscreen(NonZeroU64::new(raw).ok_or_else(|| SurfaceError::Allocation {
        width,
        height,
        reason: "handle space exhausted".to_string(),
    })?);
    BUFFERS.with(|buffers| buffers.borrow_mut().insert(handle, buffer));
    debug!("pixmap: allocated {:?} at {}x{} px", handle, width, height);
    Ok(handle)
}

/// Releases a buffer. Returns `false` if the handle was not live.
pub fn destroy(handle: Offscreen) -> bool {
    // the table may already be gone when called from another thread-local destructor
    let Ok(removed) = BUFFERS.try_with(|buffers| buffers.borrow_mut().remove(&handle)) else {
        return false;
    };
    match removed {
        Some(_) => {
            debug!("pixmap: destroyed {:?}", handle);
            true
        }
        None => {
            warn!("pixmap: destroy of unknown buffer {:?}", handle);
            false
        }
    }
}

/// Whether `handle` names a live buffer.
pub fn exists(handle: Offscreen) -> bool {
    BUFFERS.with(|buffers| buffers.borrow().contains_key(&handle))
}

/// Pixel dimensions of a live buffer.
pub fn dimensions(handle: Offscreen) -> Option<(PhysicalPx, PhysicalPx)> {
    with_buffer(handle, |buffer| (buffer.width, buffer.height))
}

/// Number of live buffers on this thread.
pub fn live_count() -> usize {
    BUFFERS.with(|buffers| buffers.borrow().len())
}

/// Runs `f` with shared access to a buffer.
pub fn with_buffer<R>(handle: Offscreen, f: impl FnOnce(&PixelBuffer) -> R) -> Option<R> {
    BUFFERS.with(|buffers| buffers.borrow().get(&handle).map(f))
}

/// Runs `f` with exclusive access to a buffer.
pub fn with_buffer_mut<R>(
    handle: Offscreen,
    f: impl FnOnce(&mut PixelBuffer) -> R,
) -> Option<R> {
    BUFFERS.with(|buffers| buffers.borrow_mut().get_mut(&handle).map(f))
}
