//! Byte-stream transport abstraction.

use std::io;

/// A byte-oriented duplex channel to the module.
///
/// The driver only needs raw byte transmit/receive plus the ability to
/// change the line rate; flow control, parity, and sub-byte framing are
/// the transport's concern. Reads are non-blocking: the driver polls
/// [`bytes_available`](Transport::bytes_available) inside its own
/// deadline loop.
pub trait Transport {
    /// Reconfigure the line to a new baud rate.
    fn configure(&mut self, baud: u32) -> io::Result<()>;

    /// Transmit all of `bytes`.
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Number of received bytes ready to read without blocking.
    fn bytes_available(&mut self) -> io::Result<usize>;

    /// Read one received byte. Only called when
    /// [`bytes_available`](Transport::bytes_available) reported at least
    /// one.
    fn read_byte(&mut self) -> io::Result<u8>;
}
