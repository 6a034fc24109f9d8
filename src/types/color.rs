//! RGB color representation.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// An RGB color with red, green, and blue components (0-255 each).
///
/// Serializes to the wire shape the controller uses: `{"r":..,"g":..,"b":..}`.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    #[serde(rename = "r")]
    pub(crate) red: u8,
    #[serde(rename = "g")]
    pub(crate) green: u8,
    #[serde(rename = "b")]
    pub(crate) blue: u8,
}

impl Color {
    /// Create a color with the given RGB values.
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Create a default color (black: 0,0,0).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }
}

impl FromStr for Color {
    type Err = String;

    /// Parse from comma-separated string (e.g., "255,128,0").
    ///
    /// # Examples
    ///
    /// ```
    /// use std::str::FromStr;
    /// use neopixel_lights_rs::Color;
    ///
    /// let color = Color::from_str("255,128,0").unwrap();
    /// assert_eq!(color.red(), 255);
    /// assert_eq!(color.blue(), 0);
    /// ```
    fn from_str(s: &str) -> Result<Self, String> {
        let parts: Vec<u8> = s.split(',').map(|c| c.trim().parse().unwrap_or(0)).collect();
        if parts.len() == 3 {
            Ok(Self::rgb(parts[0], parts[1], parts[2]))
        } else {
            Err("Expected format: r,g,b".into())
        }
    }
}
