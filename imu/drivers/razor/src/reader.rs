use crate::config::RazorConfig;
use crate::decoder::Decoder;
use crate::error::RazorError;
use crate::frame::Frame;
use crate::sink::{frame_channel, FrameQueue, FrameSink};
use crate::source::{ByteSource, SerialSource};
use crate::telemetry::{DecoderEvent, Telemetry, TracingTelemetry};
use imu_traits::{ImuData, ImuError, ImuReader};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tracing::error;

type DecoderExit<S> = (S, Result<(), RazorError>);

/// Runs a [`Decoder`] on its own thread and shuts it down deterministically.
pub struct RazorReader<S: ByteSource + 'static = SerialSource> {
    running: Arc<AtomicBool>,
    telemetry: Arc<dyn Telemetry>,
    handle: Option<JoinHandle<DecoderExit<S>>>,
}

impl RazorReader<SerialSource> {
    /// Opens the configured serial port and starts decoding into `sink`.
    pub fn open(config: &RazorConfig, sink: FrameSink) -> Result<Self, RazorError> {
        let telemetry: Arc<dyn Telemetry> = Arc::new(TracingTelemetry::new(&config.sensor_name));
        let source = match SerialSource::open(config) {
            Ok(source) => source,
            Err(e) => {
                telemetry.record(DecoderEvent::SetupFailed {
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };
        Self::start(source, sink, telemetry)
    }
}

impl<S: ByteSource + 'static> RazorReader<S> {
    /// Starts the decoder thread. A source that is not ready is refused and
    /// no thread is spawned.
    pub fn start(
        source: S,
        sink: FrameSink,
        telemetry: Arc<dyn Telemetry>,
    ) -> Result<Self, RazorError> {
        if !source.is_ready() {
            let err = RazorError::setup("byte source", "Port is not open");
            telemetry.record(DecoderEvent::SetupFailed {
                reason: err.to_string(),
            });
            return Err(err);
        }

        let mut decoder = Decoder::new(source, sink, Arc::clone(&telemetry));
        let running = decoder.running();
        let thread_telemetry = Arc::clone(&telemetry);

        let handle = thread::Builder::new()
            .name("razor-decoder".to_string())
            .spawn(move || {
                thread_telemetry.record(DecoderEvent::Started);
                let result = decoder.run();
                (decoder.into_source(), result)
            })
            .map_err(|e| RazorError::setup("razor-decoder", e))?;

        Ok(RazorReader {
            running,
            telemetry,
            handle: Some(handle),
        })
    }

    /// Whether the decoder thread is still alive.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signals the decoder, waits for it, then closes the source.
    ///
    /// Returns the error that ended the decode loop, if any. The decoder only
    /// sees the stop request between reads, so this waits for at most one
    /// pending read to complete or time out.
    pub fn stop(&mut self) -> Result<(), RazorError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        self.running.store(false, Ordering::Relaxed);
        let result = match handle.join() {
            Ok((mut source, result)) => {
                let closed = source.close().map_err(RazorError::from);
                result.and(closed)
            }
            Err(_) => Err(RazorError::DecoderPanicked),
        };
        self.telemetry.record(DecoderEvent::Stopped);
        result
    }
}

impl<S: ByteSource + 'static> Drop for RazorReader<S> {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            error!("Error stopping decoder thread during drop: {}", e);
        }
    }
}

/// A [`RazorReader`] together with its queue, polled through [`ImuReader`].
///
/// `get_data` drains the queue and reports the newest frame; frames are
/// returned once, so an empty queue is a `ReadError`.
pub struct RazorImuReader<S: ByteSource + 'static = SerialSource> {
    reader: Mutex<RazorReader<S>>,
    queue: FrameQueue,
}

impl RazorImuReader<SerialSource> {
    pub fn open(config: &RazorConfig) -> Result<Self, RazorError> {
        let (sink, queue) = frame_channel();
        let reader = RazorReader::open(config, sink)?;
        Ok(Self::new(reader, queue))
    }
}

impl<S: ByteSource + 'static> RazorImuReader<S> {
    pub fn new(reader: RazorReader<S>, queue: FrameQueue) -> Self {
        RazorImuReader {
            reader: Mutex::new(reader),
            queue,
        }
    }

    /// Newest queued frame, discarding older ones.
    pub fn latest_frame(&self) -> Result<Option<Frame>, RazorError> {
        let mut latest = None;
        loop {
            match self.queue.try_pop() {
                Ok(Some(frame)) => latest = Some(frame),
                Ok(None) => return Ok(latest),
                Err(e) if latest.is_none() => return Err(e),
                Err(_) => return Ok(latest),
            }
        }
    }
}

impl<S: ByteSource + 'static> ImuReader for RazorImuReader<S> {
    fn get_data(&self) -> Result<ImuData, ImuError> {
        match self.latest_frame()? {
            Some(frame) => Ok(ImuData::from(&frame)),
            None => Err(ImuError::ReadError("No new data available".to_string())),
        }
    }

    fn stop(&self) -> Result<(), ImuError> {
        let mut reader = self
            .reader
            .lock()
            .map_err(|_| ImuError::LockError("Failed to lock razor reader".to_string()))?;
        reader.stop()?;
        Ok(())
    }
}
