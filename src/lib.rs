//! Off-screen drawing surfaces.
//!
//! An [`surface::ImageSurface`] receives the same drawing commands as a
//! window while it is the current drawing target, can be read back into an
//! [`image::RgbImage`], masked by a white-on-black stencil, and rescaled when
//! the display scale factor changes. The [`offscreen`] module exposes the
//! same functionality through bare [`display::Offscreen`] handles.
//!
//! All process-wide state (the current-surface stack, the handle registry,
//! the pixel buffers, the scale factor) is per thread and meant to be used
//! from the GUI thread only.

pub mod color;
pub mod config;
pub mod display;
pub mod draw;
pub mod error;
pub mod image;
pub mod offscreen;
pub mod pixels;
pub mod surface;

pub use display::Offscreen;
pub use error::SurfaceError;
pub use image::{Depth, RgbImage, SharedImage};
pub use surface::ImageSurface;
