//! Device state, metadata, and the cached snapshot.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{Brightness, Color, Effect};

/// Live lighting state as reported by the controller via `/state`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DeviceState {
    pub is_on: bool,
    /// Percent scale (0-100), as stored on the device.
    pub brightness: u8,
    pub color: Color,
    pub effect: String,
}

impl DeviceState {
    /// Brightness on the 0-255 scale consumers expect.
    pub fn brightness_scaled(&self) -> u8 {
        Brightness::create_or(self.brightness).scaled()
    }

    /// The active effect, or `None` while the strip shows a static color.
    ///
    /// # Examples
    ///
    /// ```
    /// use neopixel_lights_rs::DeviceState;
    ///
    /// let state: DeviceState = serde_json::from_str(
    ///     r#"{"is_on": true, "brightness": 80, "color": {"r":255,"g":0,"b":0}, "effect": "static"}"#,
    /// ).unwrap();
    /// assert_eq!(state.active_effect(), None);
    /// ```
    pub fn active_effect(&self) -> Option<&str> {
        if self.effect == Effect::Static.name() {
            None
        } else {
            Some(&self.effect)
        }
    }
}

/// Identity block of the `/info` response.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Stable identity token; devices are keyed by this during discovery.
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub mac: String,
}

impl DeviceIdentity {
    /// Fallback display name for firmware that reports none.
    pub const DEFAULT_NAME: &'static str = "NeoPixel Strip";

    /// The reported name, or the fallback when the firmware left it blank.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            Self::DEFAULT_NAME
        } else {
            &self.name
        }
    }
}

/// Capability set reported by the controller.
///
/// Configuration layers read this when they need to validate or enumerate
/// choices, instead of digging through untyped state.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Capabilities {
    /// Number of addressable LEDs on the strip.
    #[serde(default)]
    pub num_leds: Option<u32>,
    /// Effect names reported by the firmware, when it exposes them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<String>,
    /// Capability fields this library does not model.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Capabilities {
    /// Effect names to offer in a configuration UI.
    ///
    /// Prefers the device-reported list; falls back to the built-in catalog.
    pub fn effect_names(&self) -> Vec<String> {
        if self.effects.is_empty() {
            Effect::names().into_iter().map(String::from).collect()
        } else {
            self.effects.clone()
        }
    }
}

/// Static info and capabilities from `/info`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DeviceInfo {
    pub device: DeviceIdentity,
    #[serde(default)]
    pub capabilities: Capabilities,
}

/// Cached result of the most recent successful exchange with a device.
///
/// A snapshot is immutable once committed: the coordinator replaces it
/// wholesale on every successful poll or command, so a reader always sees
/// either the prior complete snapshot or the new one.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DeviceSnapshot {
    pub state: DeviceState,
    pub info: DeviceInfo,
}

impl DeviceSnapshot {
    pub fn is_on(&self) -> bool {
        self.state.is_on
    }

    /// Brightness on the 0-255 consumer scale.
    pub fn brightness_scaled(&self) -> u8 {
        self.state.brightness_scaled()
    }

    pub fn color(&self) -> Color {
        self.state.color
    }

    /// The active effect, with the static sentinel mapped to `None`.
    pub fn active_effect(&self) -> Option<&str> {
        self.state.active_effect()
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.info.device
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.info.capabilities
    }

    pub fn num_leds(&self) -> Option<u32> {
        self.info.capabilities.num_leds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state_body(effect: &str) -> Value {
        json!({
            "is_on": true,
            "brightness": 40,
            "color": {"r": 0, "g": 128, "b": 255},
            "effect": effect,
        })
    }

    #[test]
    fn test_static_effect_presents_as_none() {
        let state: DeviceState = serde_json::from_value(state_body("static")).unwrap();
        assert_eq!(state.active_effect(), None);
    }

    #[test]
    fn test_other_effects_pass_through() {
        let state: DeviceState = serde_json::from_value(state_body("rainbow")).unwrap();
        assert_eq!(state.active_effect(), Some("rainbow"));

        // Unknown firmware effects are not filtered either.
        let state: DeviceState = serde_json::from_value(state_body("aurora")).unwrap();
        assert_eq!(state.active_effect(), Some("aurora"));
    }

    #[test]
    fn test_info_parses_unmodeled_capabilities() {
        let info: DeviceInfo = serde_json::from_value(json!({
            "device": {"id": "pico-1", "name": "Desk", "ip": "192.168.1.40", "mac": "aa:bb:cc:dd:ee:ff"},
            "capabilities": {"num_leds": 60, "max_current_ma": 2400},
        }))
        .unwrap();

        assert_eq!(info.capabilities.num_leds, Some(60));
        assert_eq!(
            info.capabilities.extra.get("max_current_ma"),
            Some(&json!(2400))
        );
    }

    #[test]
    fn test_effect_names_fall_back_to_catalog() {
        let capabilities = Capabilities::default();
        assert!(capabilities.effect_names().contains(&"rainbow".to_string()));

        let reported = Capabilities {
            effects: vec!["aurora".to_string()],
            ..Capabilities::default()
        };
        assert_eq!(reported.effect_names(), vec!["aurora".to_string()]);
    }

    #[test]
    fn test_display_name_fallback() {
        let identity: DeviceIdentity = serde_json::from_value(json!({"id": "pico-1"})).unwrap();
        assert_eq!(identity.display_name(), DeviceIdentity::DEFAULT_NAME);
    }
}
