//! Built-in lighting effects.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Animation effects built into the controller firmware.
///
/// `Static` is a sentinel rather than a real animation: the strip holds one
/// color, and consumers present it as "no effect selected". Firmware builds
/// may report effects beyond this list; those travel through the state cache
/// as plain strings.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Static,
    Rainbow,
    Fade,
    Chase,
    Breathing,
    Twinkle,
    Scanner,
    Strobe,
}

impl Effect {
    /// Wire name of this effect.
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Static => "static",
            Effect::Rainbow => "rainbow",
            Effect::Fade => "fade",
            Effect::Chase => "chase",
            Effect::Breathing => "breathing",
            Effect::Twinkle => "twinkle",
            Effect::Scanner => "scanner",
            Effect::Strobe => "strobe",
        }
    }

    /// Look up a built-in effect by its wire name.
    ///
    /// # Examples
    ///
    /// ```
    /// use neopixel_lights_rs::Effect;
    ///
    /// assert_eq!(Effect::create("rainbow"), Some(Effect::Rainbow));
    /// assert_eq!(Effect::create("disco"), None);
    /// ```
    pub fn create(name: &str) -> Option<Self> {
        Effect::iter().find(|effect| effect.name() == name)
    }

    /// True for the static sentinel.
    pub fn is_static(&self) -> bool {
        matches!(self, Effect::Static)
    }

    /// Wire names of all built-in effects.
    pub fn names() -> Vec<&'static str> {
        Effect::iter().map(|effect| effect.name()).collect()
    }
}
