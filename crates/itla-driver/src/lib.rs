//! Synchronous driver for ITLA tunable laser modules.
//!
//! This crate layers typed register operations on top of the
//! [`itla-protocol`](itla_protocol) wire format:
//!
//! - [`Transport`]: the byte-stream the module is attached to. Any duplex
//!   serial-like channel works; enable the `serial` feature for a
//!   `serialport`-backed implementation.
//! - [`Session`]: one request/response exchange at a time with a
//!   wall-clock deadline. Owns the transport exclusively.
//! - [`Itla`]: the register driver proper. Baud auto-negotiation, typed
//!   reads/writes, AEA string reads, and conversion between raw register
//!   codes and physical units (THz, dBm, degC).
//!
//! The driver is single-threaded and blocking: each call fully completes
//! (or times out) before the next begins. For use from multiple threads,
//! wrap the whole [`Itla`] in one mutex per physical device.
//!
//! # Example
//!
//! ```rust,ignore
//! use itla_driver::{Itla, SerialTransport};
//!
//! let port = SerialTransport::open("/dev/ttyUSB0", 9600)?;
//! let mut laser = Itla::new(port);
//! let baud = laser.begin(false)?;
//!
//! laser.set_frequency_thz(193.1)?;
//! laser.set_power_dbm(10.0)?;
//! laser.laser_on()?;
//! println!("module at {:.2} C", laser.get_temperature()?);
//! ```

pub mod convert;
mod driver;
mod error;
#[cfg(feature = "serial")]
mod serial;
mod session;
mod transport;

pub use driver::*;
pub use error::*;
#[cfg(feature = "serial")]
pub use serial::*;
pub use session::*;
pub use transport::*;

pub use itla_protocol::{ExecutionErrorCode, ProtocolError, Request, Response, Status};
