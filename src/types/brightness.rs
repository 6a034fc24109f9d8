//! Brightness control on the controller's percent scale.

use serde::{Deserialize, Serialize};

/// Brightness level from 0 to 100 percent, as stored on the device.
///
/// Consumers usually work on a 0-255 scale; [`Brightness::from_scaled`] and
/// [`Brightness::scaled`] convert between the two. A nonzero scaled value
/// never maps to 0 percent, because the firmware treats brightness 0 as an
/// implicit power-off.
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Brightness {
    pub(crate) value: u8,
}

impl Brightness {
    const MAX: u8 = 100;

    /// Create a new Brightness at full output (100%).
    pub fn new() -> Self {
        Brightness { value: Self::MAX }
    }

    /// Get the percent value.
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Returns None if value is outside the device range (0-100).
    ///
    /// # Examples
    ///
    /// ```
    /// use neopixel_lights_rs::Brightness;
    ///
    /// assert!(Brightness::create(100).is_some());
    /// assert!(Brightness::create(101).is_none());
    /// ```
    pub fn create(value: u8) -> Option<Self> {
        if Self::is_valid(value) {
            Some(Brightness { value })
        } else {
            None
        }
    }

    /// Returns default (100%) if value is invalid.
    pub fn create_or(value: u8) -> Self {
        if Self::is_valid(value) {
            Brightness { value }
        } else {
            Self::new()
        }
    }

    /// Convert a 0-255 consumer value to the device percent scale.
    ///
    /// Any nonzero input maps to at least 1 percent.
    ///
    /// # Examples
    ///
    /// ```
    /// use neopixel_lights_rs::Brightness;
    ///
    /// assert_eq!(Brightness::from_scaled(255).value(), 100);
    /// assert_eq!(Brightness::from_scaled(1).value(), 1);
    /// assert_eq!(Brightness::from_scaled(0).value(), 0);
    /// ```
    pub fn from_scaled(scaled: u8) -> Self {
        let percent = (f64::from(scaled) / 255.0 * 100.0).round() as u8;
        let value = if scaled > 0 { percent.max(1) } else { percent };
        Brightness { value }
    }

    /// Convert back to the 0-255 consumer scale.
    pub fn scaled(&self) -> u8 {
        (f64::from(self.value) / 100.0 * 255.0).round() as u8
    }

    fn is_valid(value: u8) -> bool {
        value <= Self::MAX
    }
}
