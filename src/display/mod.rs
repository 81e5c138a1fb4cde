// src/display/mod.rs
//! Platform layer behind image surfaces (Strategy Pattern).
//!
//! - ImageSurfaceDriver: platform capability set (allocate, read back, mask, translate)
//! - drivers: one implementation per platform, chosen at build time
//! - pixmap: platform pixel buffers addressed by `Offscreen` handles
//! - scale: the active display scale factor

pub mod driver;
pub mod drivers;
pub mod pixmap;
pub mod scale;

pub use driver::{DrawTarget, DriverRef, ImageSurfaceDriver};
pub use pixmap::Offscreen;
