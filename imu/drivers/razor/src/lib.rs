//! Driver for the Sparkfun Razor 9DOF IMU binary stream.
//!
//! The device streams fixed 52-byte frames (`0xAA 0xBB`, sensor id, four
//! little-endian float triplets, CRC-8/MAXIM) with no other framing. A
//! [`RazorReader`] runs a [`Decoder`] on its own thread, re-synchronizing on
//! the sync bytes and pushing every decoded [`Frame`] into a [`FrameSink`].
//!
//! ```no_run
//! use razor::{frame_channel, RazorConfig, RazorReader};
//!
//! let (sink, queue) = frame_channel();
//! let mut reader = RazorReader::open(&RazorConfig::default(), sink)?;
//! let frame = queue.pop()?;
//! println!("{} {}", frame.sequence_index, frame.acceleration);
//! reader.stop()?;
//! # Ok::<(), razor::RazorError>(())
//! ```

pub mod config;
pub mod crc;
pub mod decoder;
pub mod error;
pub mod frame;
pub mod printer;
pub mod reader;
pub mod sink;
pub mod source;
pub mod telemetry;

pub use config::RazorConfig;
pub use crc::compute_crc8_maxim;
pub use decoder::Decoder;
pub use error::RazorError;
pub use frame::*;
pub use imu_traits::{ImuData, ImuError, ImuReader, Vector3};
pub use printer::CsvPrinter;
pub use reader::{RazorImuReader, RazorReader};
pub use sink::{frame_channel, FrameQueue, FrameSink};
pub use source::{ByteSource, ReaderSource, SerialSource};
pub use telemetry::{DecoderEvent, NullTelemetry, Telemetry, TracingTelemetry};
