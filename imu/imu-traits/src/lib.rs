use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use thiserror::Error;

// --- Basic Types ---
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector3(x={}, y={}, z={})", self.x, self.y, self.z)
    }
}

// --- Standard IMU Data ---
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImuData {
    /// Acceleration as reported by the device
    pub accelerometer: Option<Vector3>,
    /// Angular velocity
    pub gyroscope: Option<Vector3>,
    /// Magnetic field vector
    pub magnetometer: Option<Vector3>,
    /// Orientation as Euler angles, in the order the device sends them
    pub euler: Option<Vector3>,
    /// Temperature (°C)
    pub temperature: Option<f32>,
}

// --- Standard Error Type ---
#[derive(Debug, Error)]
pub enum ImuError {
    /// Error originating from the underlying device communication (I2C, Serial, CAN)
    #[error("Device error: {0}")]
    DeviceError(String),
    /// Error reading data from the device or internal state
    #[error("Read error: {0}")]
    ReadError(String),
    /// Error during device configuration or setup
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// A shared reader's state could not be locked
    #[error("Lock error: {0}")]
    LockError(String),
    /// Catch-all for other errors
    #[error("Other IMU error: {0}")]
    Other(String),
}

impl From<io::Error> for ImuError {
    fn from(err: io::Error) -> Self {
        ImuError::ReadError(err.to_string())
    }
}

impl From<serialport::Error> for ImuError {
    fn from(err: serialport::Error) -> Self {
        ImuError::DeviceError(err.to_string())
    }
}

// --- Standard Reader Trait ---
pub trait ImuReader {
    /// Retrieves the latest available IMU data.
    fn get_data(&self) -> Result<ImuData, ImuError>;

    fn stop(&self) -> Result<(), ImuError>;
}
