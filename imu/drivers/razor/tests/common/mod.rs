#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use razor::{compute_crc8_maxim, ByteSource, DecoderEvent, Telemetry, SYNC_A, SYNC_B};
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const SENSOR_ID: u8 = 7;

pub const VALUES: [f32; 12] = [
    0.5, -1.0, 2.0, // acceleration
    0.25, -0.125, 4.0, // angular rate
    8.0, -16.0, 32.0, // magnetic field
    90.0, -45.0, 180.0, // yaw, pitch, roll
];

/// The 49 checksummed bytes: sensor id then twelve little-endian floats.
pub fn payload(sensor_id: u8, values: [f32; 12]) -> Vec<u8> {
    let mut payload = vec![sensor_id];
    for v in values {
        payload.write_f32::<LittleEndian>(v).unwrap();
    }
    payload
}

pub fn frame_bytes(sensor_id: u8, values: [f32; 12]) -> Vec<u8> {
    let payload = payload(sensor_id, values);
    let mut bytes = vec![SYNC_A, SYNC_B];
    bytes.extend_from_slice(&payload);
    bytes.push(compute_crc8_maxim(&payload));
    bytes
}

#[derive(Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<DecoderEvent>>,
}

impl RecordingTelemetry {
    pub fn events(&self) -> Vec<DecoderEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Telemetry for RecordingTelemetry {
    fn record(&self, event: DecoderEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Byte source fed from a channel, behaving like a serial port with a read
/// timeout. Dropping the sender acts as a disconnect.
pub struct ChannelSource {
    rx: Receiver<Vec<u8>>,
    pending: VecDeque<u8>,
    timeout: Duration,
    open: bool,
}

impl ChannelSource {
    pub fn new(rx: Receiver<Vec<u8>>, timeout: Duration) -> Self {
        ChannelSource {
            rx,
            pending: VecDeque::new(),
            timeout,
            open: true,
        }
    }
}

impl ByteSource for ChannelSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.pending.is_empty() {
            match self.rx.recv_timeout(self.timeout) {
                Ok(chunk) => self.pending.extend(chunk),
                Err(RecvTimeoutError::Timeout) => {
                    return Err(io::Error::new(io::ErrorKind::TimedOut, "no data"))
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "disconnected"))
                }
            }
        }
        let n = buf.len().min(self.pending.len());
        for (slot, b) in buf.iter_mut().zip(self.pending.drain(..n)) {
            *slot = b;
        }
        Ok(n)
    }

    fn is_ready(&self) -> bool {
        self.open
    }

    fn close(&mut self) -> io::Result<()> {
        self.open = false;
        Ok(())
    }
}

pub enum Step {
    Bytes(Vec<u8>),
    Timeout,
}

/// Byte source replaying a fixed script. Each `Bytes` step is handed out in
/// one or more reads, never merged with the next step, so a `Timeout` lands
/// exactly on the chosen boundary. Once the script is used up every read
/// times out and `drained` is raised.
pub struct ScriptedSource {
    steps: VecDeque<Step>,
    drained: Arc<AtomicBool>,
}

impl ScriptedSource {
    pub fn new(steps: Vec<Step>) -> Self {
        ScriptedSource {
            steps: steps.into(),
            drained: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn drained(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.drained)
    }
}

impl ByteSource for ScriptedSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.steps.pop_front() {
            Some(Step::Bytes(mut bytes)) => {
                let n = buf.len().min(bytes.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                if n < bytes.len() {
                    self.steps.push_front(Step::Bytes(bytes.split_off(n)));
                }
                Ok(n)
            }
            Some(Step::Timeout) => Err(io::Error::new(io::ErrorKind::TimedOut, "no data")),
            None => {
                self.drained.store(true, Ordering::Relaxed);
                std::thread::sleep(Duration::from_millis(1));
                Err(io::Error::new(io::ErrorKind::TimedOut, "no data"))
            }
        }
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}
