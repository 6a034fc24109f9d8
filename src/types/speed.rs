//! Animation speed for dynamic effects.

use serde::{Deserialize, Serialize};

/// Animation speed for dynamic effects, with valid values from 1 to 100 percent.
///
/// Speed only affects animated effects; the firmware ignores it while the
/// strip shows a static color.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Speed {
    pub(crate) value: u8,
}

impl Speed {
    const MIN: u8 = 1;
    const MAX: u8 = 100;
    const DEFAULT: u8 = 50;

    /// Create a new Speed with the default value (50%).
    ///
    /// # Examples
    ///
    /// ```
    /// use neopixel_lights_rs::Speed;
    ///
    /// assert_eq!(Speed::new().value(), 50);
    /// ```
    pub fn new() -> Self {
        Speed {
            value: Self::DEFAULT,
        }
    }

    /// Get the speed value.
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Create a new Speed with the given value.
    ///
    /// Returns `None` if value is outside the valid range (1-100).
    ///
    /// # Examples
    ///
    /// ```
    /// use neopixel_lights_rs::Speed;
    ///
    /// assert!(Speed::create(0).is_none());
    /// assert!(Speed::create(1).is_some());
    /// assert!(Speed::create(100).is_some());
    /// assert!(Speed::create(101).is_none());
    /// ```
    pub fn create(value: u8) -> Option<Self> {
        if Self::is_valid(value) {
            Some(Speed { value })
        } else {
            None
        }
    }

    /// Returns default (50%) if value is invalid.
    pub fn create_or(value: u8) -> Self {
        if Self::is_valid(value) {
            Speed { value }
        } else {
            Self::new()
        }
    }

    fn is_valid(value: u8) -> bool {
        (Self::MIN..=Self::MAX).contains(&value)
    }
}
