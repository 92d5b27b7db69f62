//! Configuration options for matching and baking.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::frame_range::FrameRange;
use crate::pole::PoleFallback;
use crate::scene::Channel;

/// Options passed to the matchers and the baking driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchOptions {
    /// Pole placement when the FK chain is straight.
    pub pole_fallback: PoleFallback,

    /// Channels keyed on driven objects while baking.
    pub key_channels: Vec<Channel>,

    /// Frames to bake. `None` bakes the host's playback range.
    pub frame_range: Option<FrameRange>,
}

impl Default for SwitchOptions {
    fn default() -> Self {
        Self {
            pole_fallback: PoleFallback::KeepCurrent,
            key_channels: vec![Channel::Translate, Channel::Rotate],
            frame_range: None,
        }
    }
}

impl SwitchOptions {
    /// Creates options with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the options to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sets the straight-chain pole fallback.
    #[must_use]
    pub fn with_pole_fallback(mut self, fallback: PoleFallback) -> Self {
        self.pole_fallback = fallback;
        self
    }

    /// Sets the channels keyed while baking.
    #[must_use]
    pub fn with_key_channels(mut self, channels: Vec<Channel>) -> Self {
        self.key_channels = channels;
        self
    }

    /// Sets the frame range to bake.
    #[must_use]
    pub fn with_frame_range(mut self, range: FrameRange) -> Self {
        self.frame_range = Some(range);
        self
    }
}
