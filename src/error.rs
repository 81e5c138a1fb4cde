// src/error.rs
//! Error type shared by the surface, image and registry layers.

use crate::display::pixmap::Offscreen;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("Invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },
    #[error("Failed to allocate {width}x{height} pixel buffer: {reason}")]
    Allocation {
        width: u32,
        height: u32,
        reason: String,
    },
    #[error("Cannot {operation} while the surface is the current drawing target")]
    SurfaceActive { operation: &'static str },
    #[error("Offscreen buffer {0:?} does not exist")]
    UnknownOffscreen(Offscreen),
    #[error("Invalid image: {reason}")]
    InvalidImage { reason: String },
    #[error("Mask is {mask_w}x{mask_h} but buffers hold {rows} rows of {line_size} bytes")]
    MaskMismatch {
        mask_w: usize,
        mask_h: usize,
        rows: usize,
        line_size: usize,
    },
    #[error("Invalid display scale factor {0}")]
    InvalidScale(f64),
}

pub type Result<T, E = SurfaceError> = std::result::Result<T, E>;
