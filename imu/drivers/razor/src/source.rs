use crate::config::RazorConfig;
use crate::error::RazorError;
use serialport::SerialPort;
use std::io::{self, Read};
use std::path::Path;
use tracing::info;

/// Where the decoder pulls bytes from.
///
/// `read` places at least one byte at the front of `buf` and returns the
/// count, or `Ok(0)` once the stream has ended. `io::ErrorKind::TimedOut`
/// means nothing arrived in time; the decoder keeps whatever it already
/// holds and uses the pause to check for stop requests.
pub trait ByteSource: Send {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    fn is_ready(&self) -> bool;

    fn close(&mut self) -> io::Result<()>;
}

fn not_connected() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "byte source is closed")
}

/// Serial port connected to the IMU.
pub struct SerialSource {
    name: String,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialSource {
    pub fn open(config: &RazorConfig) -> Result<Self, RazorError> {
        if cfg!(unix) && !Path::new(&config.port).exists() {
            return Err(RazorError::setup(&config.port, "Port is not available"));
        }

        // TTY ports are opened in exclusive mode by serialport on unix.
        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(config.read_timeout)
            .open()
            .map_err(|e| RazorError::setup(&config.port, e))?;

        info!("Opened port: {} at {} baud", config.port, config.baud_rate);
        Ok(SerialSource::from_port(&config.port, port))
    }

    pub fn from_port(name: &str, port: Box<dyn SerialPort>) -> Self {
        SerialSource {
            name: name.to_string(),
            port: Some(port),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ByteSource for SerialSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let port = self.port.as_mut().ok_or_else(not_connected)?;
        loop {
            match port.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                result => return result,
            }
        }
    }

    fn is_ready(&self) -> bool {
        self.port.is_some()
    }

    fn close(&mut self) -> io::Result<()> {
        if self.port.take().is_some() {
            info!("Closed port: {}", self.name);
        }
        Ok(())
    }
}

/// Adapts any reader, e.g. a captured stream or an in-memory buffer.
/// Running out of input ends the stream.
pub struct ReaderSource<R> {
    reader: Option<R>,
}

impl<R: Read + Send> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        ReaderSource {
            reader: Some(reader),
        }
    }
}

impl<R: Read + Send> ByteSource for ReaderSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.as_mut().ok_or_else(not_connected)?.read(buf)
    }

    fn is_ready(&self) -> bool {
        self.reader.is_some()
    }

    fn close(&mut self) -> io::Result<()> {
        self.reader = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reader_source_reports_partial_reads_then_end() {
        let mut source = ReaderSource::new(Cursor::new(vec![1u8, 2, 3]));
        let mut two = [0u8; 2];
        assert_eq!(source.read(&mut two).unwrap(), 2);
        assert_eq!(two, [1, 2]);

        assert_eq!(source.read(&mut two).unwrap(), 1);
        assert_eq!(two[0], 3);
        assert_eq!(source.read(&mut two).unwrap(), 0);
    }

    #[test]
    fn closed_reader_source_is_not_ready() {
        let mut source = ReaderSource::new(Cursor::new(Vec::<u8>::new()));
        assert!(source.is_ready());
        source.close().unwrap();
        assert!(!source.is_ready());

        let err = source.read(&mut [0u8; 1]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
    }

    #[cfg(unix)]
    #[test]
    fn missing_port_is_a_setup_error() {
        let config = RazorConfig::new("/dev/does-not-exist-razor", 500_000);
        match SerialSource::open(&config) {
            Err(RazorError::Setup { port, .. }) => assert_eq!(port, "/dev/does-not-exist-razor"),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("opened a port that does not exist"),
        }
    }
}
