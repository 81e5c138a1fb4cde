// src/display/scale.rs
//! The active display scale factor.
//!
//! Starts at `CONFIG.display.scale_factor` and changes when the platform
//! reports a move to a screen of different density. High-resolution surfaces
//! read it at allocation time; existing buffers only pick up a change through
//! `ImageSurface::rescale`.

use crate::config::CONFIG;
use crate::error::{Result, SurfaceError};
use crate::pixels::ScaleFactor;
use log::info;
use std::cell::Cell;

thread_local! {
    static SCALE: Cell<Option<ScaleFactor>> = const { Cell::new(None) };
}

/// Current display scale factor.
pub fn scale_factor() -> ScaleFactor {
    SCALE.with(|scale| match scale.get() {
        Some(s) => s,
        None => {
            let initial = CONFIG.display.scale_factor;
            let initial = if valid(initial) { initial } else { 1.0 };
            scale.set(Some(initial));
            initial
        }
    })
}

/// Changes the display scale factor. Rejects non-finite and non-positive values.
pub fn set_scale_factor(factor: ScaleFactor) -> Result<()> {
    if !valid(factor) {
        return Err(SurfaceError::InvalidScale(factor));
    }
    info!("Display scale factor set to {}", factor);
    SCALE.with(|scale| scale.set(Some(factor)));
    Ok(())
}

fn valid(factor: ScaleFactor) -> bool {
    factor.is_finite() && factor > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn defaults_then_updates() {
        assert_eq!(scale_factor(), 1.0);
        set_scale_factor(2.5).unwrap();
        assert_eq!(scale_factor(), 2.5);
    }

    #[test_log::test]
    fn rejects_bad_factors() {
        assert_eq!(set_scale_factor(0.0), Err(SurfaceError::InvalidScale(0.0)));
        assert!(set_scale_factor(f64::NAN).is_err());
        assert!(set_scale_factor(-1.0).is_err());
        assert_eq!(scale_factor(), 1.0);
    }
}
