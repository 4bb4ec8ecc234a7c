use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";
pub const DEFAULT_SENSOR_NAME: &str = "RAZOR";
pub const DEFAULT_BAUD_RATE: u32 = 500_000;
/// Port timeout. Bounds how long the decoder can go without checking for a stop request.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RazorConfig {
    /// Serial device path, e.g. `/dev/ttyUSB0`.
    pub port: String,
    /// Name of the unit, used to tag diagnostics when several are attached.
    pub sensor_name: String,
    pub baud_rate: u32,
    pub read_timeout: Duration,
}

impl Default for RazorConfig {
    fn default() -> Self {
        RazorConfig {
            port: DEFAULT_PORT.to_string(),
            sensor_name: DEFAULT_SENSOR_NAME.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl RazorConfig {
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        RazorConfig {
            port: port.into(),
            baud_rate,
            ..Default::default()
        }
    }

    pub fn with_sensor_name(mut self, name: impl Into<String>) -> Self {
        self.sensor_name = name.into();
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }
}
