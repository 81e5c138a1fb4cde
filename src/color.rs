// src/color.rs

//! Defines the drawing colors (`NamedColor`, `Color`) and their RGB resolution.

use serde::{Deserialize, Serialize};

/// A handful of named colors commonly used for fills and mask construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedColor {
    Black,
    White,
    Red,
    Green,
    Blue,
    Yellow,
    Magenta,
    Cyan,
    Gray,
}

impl NamedColor {
    /// Returns the `[r, g, b]` bytes of this named color.
    pub fn to_rgb(self) -> [u8; 3] {
        match self {
            NamedColor::Black => [0, 0, 0],
            NamedColor::White => [255, 255, 255],
            NamedColor::Red => [255, 0, 0],
            NamedColor::Green => [0, 255, 0],
            NamedColor::Blue => [0, 0, 255],
            NamedColor::Yellow => [255, 255, 0],
            NamedColor::Magenta => [255, 0, 255],
            NamedColor::Cyan => [0, 255, 255],
            NamedColor::Gray => [128, 128, 128],
        }
    }
}

/// A drawing color: either a named color or an RGB true color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Named(NamedColor),
    Rgb(u8, u8, u8),
}

impl Default for Color {
    /// Black, the color a fresh drawing context starts with.
    fn default() -> Self {
        Color::Named(NamedColor::Black)
    }
}

impl Color {
    pub const BLACK: Color = Color::Named(NamedColor::Black);
    pub const WHITE: Color = Color::Named(NamedColor::White);

    /// Resolves this color to `[r, g, b]` bytes.
    pub fn to_rgb(self) -> [u8; 3] {
        match self {
            Color::Named(named) => named.to_rgb(),
            Color::Rgb(r, g, b) => [r, g, b],
        }
    }
}

impl From<NamedColor> for Color {
    fn from(named: NamedColor) -> Self {
        Color::Named(named)
    }
}
