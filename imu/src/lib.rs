pub use imu_traits::{ImuData, ImuError, ImuReader, Vector3};

// --- Re-export concrete reader types based on features ---

#[cfg(feature = "razor")]
pub use razor::{frame_channel, Frame, FrameQueue, RazorConfig, RazorImuReader, RazorReader};

#[cfg(feature = "razor")]
pub use razor::RazorError;
