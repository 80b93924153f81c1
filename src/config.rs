use serde::{Deserialize, Serialize};

/// Configuration for a [`LocalHost`](crate::host::LocalHost).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Multiplier applied to the scaled ("game") clock (default: 1.0).
    /// A value of 0 pauses the scaled clock entirely.
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,

    /// Frame tick rate in Hz, used by interval-driven tickers (default: 60).
    #[serde(default = "default_frame_rate")]
    pub frame_rate_hz: f64,

    /// Physics tick rate in Hz (default: 30).
    #[serde(default = "default_physics_rate")]
    pub physics_rate_hz: f64,

    /// Capacity of the broadcast channels backing tick pulses and named
    /// events (default: 16).
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_time_scale() -> f64 {
    1.0
}

fn default_frame_rate() -> f64 {
    60.0
}

fn default_physics_rate() -> f64 {
    30.0
}

fn default_channel_capacity() -> usize {
    16
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            time_scale: default_time_scale(),
            frame_rate_hz: default_frame_rate(),
            physics_rate_hz: default_physics_rate(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl HostConfig {
    /// Parse a config from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config = HostConfig::from_toml_str("frame_rate_hz = 120.0").unwrap();
        assert_eq!(config.frame_rate_hz, 120.0);
        assert_eq!(config.time_scale, 1.0);
        assert_eq!(config.physics_rate_hz, 30.0);
        assert_eq!(config.channel_capacity, 16);
    }

    #[test]
    fn empty_config_is_all_defaults() {
        let config = HostConfig::from_toml_str("").unwrap();
        assert_eq!(config.time_scale, 1.0);
        assert_eq!(config.frame_rate_hz, 60.0);
    }
}
