use crate::error::RazorError;
use crate::frame::{Frame, BODY_LEN, SYNC_A, SYNC_B};
use crate::sink::FrameSink;
use crate::source::ByteSource;
use crate::telemetry::{DecoderEvent, Telemetry};
use chrono::Local;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Frame synchronization state machine.
///
/// ```text
/// +------------+   0xAA   +------------+   0xBB   +----------+   +------+
/// | SeekSyncA  |--------->| SeekSyncB  |--------->| ReadBody |-->| Emit |
/// +------------+          +------------+          +----------+   +------+
///    ^  |  other              | other                                |
///    +--+                     |                                      |
///    +------------------------+--------------------------------------+
/// ```
///
/// A byte rejected in `SeekSyncB` is dropped, not re-examined as a new
/// `0xAA`, so `AA AA BB` loses that frame. A pause in the stream never drops
/// anything: every state waits out idle timeouts and only gives up once
/// stopped. Checksums are carried through unverified.
pub struct Decoder<S> {
    source: S,
    sink: FrameSink,
    running: Arc<AtomicBool>,
    telemetry: Arc<dyn Telemetry>,
    sequence_index: u64,
    discarded: u64,
}

impl<S: ByteSource> Decoder<S> {
    pub fn new(source: S, sink: FrameSink, telemetry: Arc<dyn Telemetry>) -> Self {
        Decoder {
            source,
            sink,
            running: Arc::new(AtomicBool::new(true)),
            telemetry,
            sequence_index: 0,
            discarded: 0,
        }
    }

    /// Flag checked at the start of every sync search and on every idle
    /// timeout. Clearing it makes `next_frame` return `None` and `run`
    /// return `Ok`.
    pub fn running(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Index the next decoded frame will carry.
    pub fn sequence_index(&self) -> u64 {
        self.sequence_index
    }

    pub fn into_source(self) -> S {
        self.source
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    fn read_failed(&self, e: io::Error) -> RazorError {
        self.telemetry.record(DecoderEvent::ReadFailed {
            reason: e.to_string(),
        });
        RazorError::Io(e)
    }

    /// Fills all of `buf`, keeping partial reads across idle timeouts.
    /// Returns `false` if stopped before the buffer was complete.
    fn fill(&mut self, buf: &mut [u8]) -> Result<bool, RazorError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.source.read(&mut buf[filled..]) {
                Ok(0) => {
                    let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "byte stream ended");
                    return Err(self.read_failed(eof));
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                    if !self.is_running() {
                        return Ok(false);
                    }
                }
                Err(e) => return Err(self.read_failed(e)),
            }
        }
        Ok(true)
    }

    fn discard(&mut self, count: u64) {
        if self.discarded == 0 && self.sequence_index > 0 {
            self.telemetry.record(DecoderEvent::SyncLost);
        }
        self.discarded += count;
    }

    /// Reads until one frame is decoded. Returns `None` once stopped.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, RazorError> {
        let mut byte = [0u8; 1];

        while self.is_running() {
            // SeekSyncA
            if !self.fill(&mut byte)? {
                break;
            }
            if byte[0] != SYNC_A {
                self.discard(1);
                continue;
            }

            // SeekSyncB
            if !self.fill(&mut byte)? {
                break;
            }
            if byte[0] != SYNC_B {
                self.discard(2);
                continue;
            }

            // ReadBody
            let mut body = [0u8; BODY_LEN];
            if !self.fill(&mut body)? {
                break;
            }
            let capture_time = Local::now();

            // Emit
            if self.discarded > 0 || self.sequence_index == 0 {
                self.telemetry.record(DecoderEvent::SyncAcquired {
                    discarded: self.discarded,
                });
            }
            self.discarded = 0;

            let frame = Frame::decode(&body, self.sequence_index, capture_time);
            self.sequence_index += 1;
            return Ok(Some(frame));
        }

        Ok(None)
    }

    /// Decodes frames into the sink until stopped or the source fails.
    pub fn run(&mut self) -> Result<(), RazorError> {
        while let Some(frame) = self.next_frame()? {
            self.sink.push(frame)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc::compute_crc8_maxim;
    use crate::frame::PAYLOAD_LEN;
    use crate::sink::frame_channel;
    use crate::source::ReaderSource;
    use crate::telemetry::NullTelemetry;
    use std::io::Cursor;

    fn frame_bytes(sensor_id: u8) -> Vec<u8> {
        let mut payload = vec![0u8; PAYLOAD_LEN];
        payload[0] = sensor_id;
        let mut bytes = vec![SYNC_A, SYNC_B];
        bytes.extend_from_slice(&payload);
        bytes.push(compute_crc8_maxim(&payload));
        bytes
    }

    fn decoder(stream: Vec<u8>) -> Decoder<ReaderSource<Cursor<Vec<u8>>>> {
        let (sink, _queue) = frame_channel();
        Decoder::new(
            ReaderSource::new(Cursor::new(stream)),
            sink,
            Arc::new(NullTelemetry),
        )
    }

    #[test]
    fn decodes_back_to_back_frames() {
        let mut stream = frame_bytes(1);
        stream.extend(frame_bytes(2));
        let mut decoder = decoder(stream);

        let first = decoder.next_frame().unwrap().unwrap();
        let second = decoder.next_frame().unwrap().unwrap();
        assert_eq!((first.sensor_id, first.sequence_index), (1, 0));
        assert_eq!((second.sensor_id, second.sequence_index), (2, 1));
        assert_eq!(decoder.sequence_index(), 2);
    }

    #[test]
    fn end_of_stream_is_an_io_error() {
        let mut decoder = decoder(frame_bytes(1));
        decoder.next_frame().unwrap();
        assert!(matches!(decoder.next_frame(), Err(RazorError::Io(_))));
    }

    #[test]
    fn stopped_decoder_reads_nothing() {
        let mut decoder = decoder(frame_bytes(1));
        decoder.running().store(false, Ordering::Relaxed);
        assert!(decoder.next_frame().unwrap().is_none());
    }
}
