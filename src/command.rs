//! Control command payloads.

use serde::{Deserialize, Serialize};

use crate::types::{Brightness, Color, Effect, Power, Speed};

/// A control command to send to a strip controller.
///
/// Every command carries a power state; brightness, color, effect, and speed
/// are optional and omitted from the JSON body when unset.
///
/// # Creating Commands
///
/// Start from [`Command::on`] or [`Command::off`] and add attributes with the
/// builder methods:
///
/// ```
/// use std::str::FromStr;
/// use neopixel_lights_rs::{Brightness, Color, Command};
///
/// let mut command = Command::on();
/// command.brightness(&Brightness::from_scaled(128));
/// command.color(&Color::from_str("255,128,0").unwrap());
/// ```
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Command {
    power: Power,
    brightness: Option<u8>,
    color: Option<Color>,
    effect: Option<String>,
    speed: Option<u8>,
}

impl Command {
    /// Create a command that turns the strip on.
    pub fn on() -> Self {
        Self::with_power(Power::On)
    }

    /// Create a command that turns the strip off.
    pub fn off() -> Self {
        Self::with_power(Power::Off)
    }

    /// Create a command with the given power state and nothing else.
    pub fn with_power(power: Power) -> Self {
        Command {
            power,
            brightness: None,
            color: None,
            effect: None,
            speed: None,
        }
    }

    pub fn power(&self) -> Power {
        self.power
    }

    /// Set the brightness.
    ///
    /// The outgoing percent is floored at 1: sending 0 would power the strip
    /// off as a side effect, which the power field already controls.
    ///
    /// # Examples
    ///
    /// ```
    /// use neopixel_lights_rs::{Brightness, Command};
    ///
    /// let mut command = Command::on();
    /// command.brightness(&Brightness::from_scaled(1));
    /// assert_eq!(
    ///     serde_json::to_value(&command).unwrap()["brightness"],
    ///     serde_json::json!(1),
    /// );
    /// ```
    pub fn brightness(&mut self, brightness: &Brightness) {
        self.brightness = Some(brightness.value().max(1));
    }

    /// Set the RGB color.
    pub fn color(&mut self, color: &Color) {
        self.color = Some(*color);
    }

    /// Set a built-in effect.
    ///
    /// Effects animate, so the default speed is filled in unless one was set
    /// explicitly.
    pub fn effect(&mut self, effect: &Effect) {
        self.effect_named(effect.name());
    }

    /// Set an effect by wire name, for firmware effects this library does
    /// not model.
    pub fn effect_named(&mut self, name: &str) {
        self.effect = Some(name.to_string());
        if self.speed.is_none() {
            self.speed = Some(Speed::new().value());
        }
    }

    /// Set the animation speed.
    pub fn speed(&mut self, speed: &Speed) {
        self.speed = Some(speed.value());
    }
}

impl From<Power> for Command {
    fn from(power: Power) -> Self {
        Command::with_power(power)
    }
}
