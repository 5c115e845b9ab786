//! `serialport`-backed transport (feature `serial`).

use std::io::{self, Read, Write};
use std::time::Duration;

use crate::transport::Transport;

/// A [`Transport`] over a host serial port.
///
/// The ITLA control interface is 8N1 with no flow control, which is the
/// `serialport` default. The port's own read timeout is kept short; the
/// driver applies its transaction deadline on top by polling.
pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialTransport {
    /// Open `path` at `baud`.
    pub fn open(path: &str, baud: u32) -> io::Result<Self> {
        let port = serialport::new(path, baud)
            .timeout(Duration::from_millis(10))
            .open()?;
        Ok(SerialTransport { port })
    }
}

impl Transport for SerialTransport {
    fn configure(&mut self, baud: u32) -> io::Result<()> {
        self.port.set_baud_rate(baud).map_err(Into::into)
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.port.write_all(bytes)?;
        self.port.flush()
    }

    fn bytes_available(&mut self) -> io::Result<usize> {
        Ok(self.port.bytes_to_read()? as usize)
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        let mut byte = [0u8; 1];
        self.port.read_exact(&mut byte)?;
        Ok(byte[0])
    }
}
