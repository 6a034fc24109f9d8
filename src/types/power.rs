//! Power state for strip control.

use serde::{Deserialize, Serialize};

/// Power state for a strip, `"on"` or `"off"` on the wire.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Power {
    /// Turn the strip on
    On,
    /// Turn the strip off
    Off,
}

impl Power {
    pub fn is_on(&self) -> bool {
        matches!(self, Power::On)
    }
}

impl From<bool> for Power {
    fn from(on: bool) -> Self {
        if on { Power::On } else { Power::Off }
    }
}
