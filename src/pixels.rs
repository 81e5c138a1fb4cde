// src/pixels.rs
//! Type aliases to distinguish between logical and physical pixels.
//!
//! ## Coordinate Systems
//!
//! 1. **Logical units** (LogicalPx): display-scale-independent coordinates
//!    - Used by: drawing primitives, `ImageSurface` sizes, image annotations
//!
//! 2. **Physical pixels** (PhysicalPx): actual buffer pixels
//!    - physical_px = round(logical_px * scale_factor)
//!    - Used by: pixel buffers, `RgbImage` data dimensions, masks
//!
//! A surface built without the high-resolution flag has scale 1, so both
//! systems coincide there.

/// Logical units (platform-independent points).
pub type LogicalPx = i32;

/// Physical pixels (actual buffer pixels).
pub type PhysicalPx = u32;

/// Scale factor converting logical units to physical pixels.
pub type ScaleFactor = f64;

/// Converts a logical length to physical pixels, rounding to nearest.
pub fn to_physical(logical: LogicalPx, scale: ScaleFactor) -> PhysicalPx {
    let px = (logical as f64 * scale).round();
    if px <= 0.0 {
        0
    } else {
        px as PhysicalPx
    }
}

/// Converts a logical coordinate (which may be negative) to a physical one.
pub fn to_physical_coord(logical: LogicalPx, scale: ScaleFactor) -> i64 {
    (logical as f64 * scale).round() as i64
}
