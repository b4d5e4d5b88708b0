//! Animation configuration, string geometry, and the validated intake
//! boundary.
//!
//! The render loop only ever sees fully-typed [`ScrollConfig`] values.
//! External submissions enter through [`decode_update`], which yields either
//! a complete configuration or a [`ConfigError`] — malformed payloads are
//! rejected here and never reach the mailbox.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pixel::Color;

/// Largest LED count whose payload still fits the protocol's 16-bit length
/// field (`led_count * 3 <= u16::MAX`).
pub const MAX_LED_COUNT: usize = (u16::MAX as usize) / 3;

/// Errors from configuration intake and geometry validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Payload was not a well-formed configuration object
    #[error("malformed configuration payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// `trainLength` must light at least one pixel
    #[error("trainLength must be at least 1 (got {got})")]
    InvalidTrainLength {
        /// The rejected value
        got: usize,
    },

    /// LED count outside the supported range
    #[error("led count must be in 1..={} (got {got})", MAX_LED_COUNT)]
    InvalidLedCount {
        /// The rejected value
        got: usize,
    },
}

/// A complete animation configuration: the unit carried by the mailbox and
/// owned by the render loop.
///
/// Replacement is all-or-nothing — the engine swaps a whole value, never
/// individual fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScrollConfig {
    /// Pause between frames, in milliseconds.
    #[serde(rename = "delay")]
    pub delay_ms: u64,
    /// Number of simultaneously lit pixels. At least 1; deliberately not
    /// validated against the string length.
    pub train_length: usize,
    /// When set, every lit channel is redrawn at random each frame.
    pub random: bool,
    /// Train color when `random` is off.
    pub color: Color,
}

impl Default for ScrollConfig {
    /// 100 ms delay, a train of 7, solid red.
    fn default() -> Self {
        Self {
            delay_ms: 100,
            train_length: 7,
            random: false,
            color: Color::RED,
        }
    }
}

impl ScrollConfig {
    /// Check the field contract.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTrainLength`] when `train_length` is
    /// zero. The integer and channel ranges are enforced by the types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.train_length == 0 {
            return Err(ConfigError::InvalidTrainLength { got: 0 });
        }
        Ok(())
    }
}

/// Decode and validate one externally-submitted configuration payload.
///
/// Accepts exactly the documented shape:
///
/// ```json
/// {"delay": 50, "trainLength": 3, "random": false, "color": {"r": 0, "g": 128, "b": 255}}
/// ```
///
/// # Errors
///
/// Returns [`ConfigError::Malformed`] for anything that is not that shape —
/// missing fields, unknown fields, wrong types, negative integers,
/// out-of-range channel values — and
/// [`ConfigError::InvalidTrainLength`] for a zero train length.
pub fn decode_update(payload: &[u8]) -> Result<ScrollConfig, ConfigError> {
    let config: ScrollConfig = serde_json::from_slice(payload)?;
    config.validate()?;
    Ok(config)
}

/// Fixed, process-lifetime string parameters: how many LEDs there are and
/// where the controller lives. Set once at startup, never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringGeometry {
    led_count: usize,
    controller_addr: String,
}

impl StringGeometry {
    /// Validate and build the geometry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLedCount`] when `led_count` is zero or
    /// so large that a frame payload would not fit the wire format's length
    /// field.
    pub fn new(
        controller_addr: impl Into<String>,
        led_count: usize,
    ) -> Result<Self, ConfigError> {
        if led_count == 0 || led_count > MAX_LED_COUNT {
            return Err(ConfigError::InvalidLedCount { got: led_count });
        }
        Ok(Self {
            led_count,
            controller_addr: controller_addr.into(),
        })
    }

    /// Number of LEDs in the string.
    #[must_use]
    pub fn led_count(&self) -> usize {
        self.led_count
    }

    /// Controller `host:port` address.
    #[must_use]
    pub fn controller_addr(&self) -> &str {
        &self.controller_addr
    }
}
