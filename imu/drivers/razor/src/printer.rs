// Console/CSV consumer for decoded frames

use crate::error::RazorError;
use crate::frame::Frame;
use crate::sink::FrameQueue;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub const CSV_HEADER: [&str; 16] = [
    "Index", "Time", "ID", "accx", "accy", "accz", "gyrox", "gyroy", "gyroz", "magx", "magy",
    "magz", "psi", "theta", "phi", "crc8maxim",
];

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub struct CsvPrinter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvPrinter<W> {
    /// Wraps `inner` and writes the header line.
    pub fn new(inner: W) -> Result<Self, csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(CSV_HEADER)?;
        writer.flush()?;
        Ok(CsvPrinter { writer })
    }

    pub fn print(&mut self, frame: &Frame) -> Result<(), csv::Error> {
        let mut record = vec![
            frame.sequence_index.to_string(),
            frame.capture_time.format(TIME_FORMAT).to_string(),
            frame.sensor_id.to_string(),
        ];
        for v in [
            frame.acceleration,
            frame.angular_rate,
            frame.magnetic_field,
            frame.orientation,
        ] {
            record.extend(v.to_array().iter().map(|c| format!("{:.2}", c)));
        }
        record.push(frame.checksum.to_string());

        self.writer.write_record(&record)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Prints frames from `queue` until `stop` is raised or every producer is
    /// gone, then prints whatever is still queued. Returns the row count.
    pub fn drain(&mut self, queue: &FrameQueue, stop: &AtomicBool) -> Result<u64, csv::Error> {
        let mut printed = 0;
        while !stop.load(Ordering::Relaxed) {
            match queue.pop_timeout(POLL_INTERVAL) {
                Ok(frame) => {
                    self.print(&frame)?;
                    printed += 1;
                }
                Err(RazorError::SinkEmpty) => continue,
                Err(_) => break,
            }
        }
        while let Ok(Some(frame)) = queue.try_pop() {
            self.print(&frame)?;
            printed += 1;
        }
        Ok(printed)
    }

    pub fn into_inner(self) -> Result<W, csv::Error> {
        self.writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))
    }
}
