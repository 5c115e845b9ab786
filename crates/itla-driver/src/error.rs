//! Driver error types.

use itla_protocol::{ExecutionErrorCode, ProtocolError, Status};
use thiserror::Error;

/// Errors surfaced by driver operations.
///
/// Each register access is a single attempt: nothing is retried inside
/// the driver, the caller decides retry policy. A failed read is an
/// error, never a zero value.
#[derive(Error, Debug)]
pub enum DriverError {
    /// Wire-level failure: timeout, bad checksum, or CE flag.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Transport I/O failure.
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    /// The module understood the request but refused or failed it. The
    /// code was fetched from the NOP register.
    #[error("execution error: {0}")]
    Execution(ExecutionErrorCode),

    /// A status that the operation cannot act on, e.g. an AEA-pending
    /// status on a plain register read.
    #[error("unexpected status {status:?} for register 0x{register:02X}")]
    UnexpectedStatus {
        /// Status the module returned.
        status: Status,
        /// Register that was accessed.
        register: u8,
    },

    /// No candidate baud rate produced a valid reply. The transport is
    /// left configured at the default rate and the driver stays usable.
    #[error("baud negotiation failed: no response at any candidate rate")]
    AutoBaudFailed,

    /// The calibration registers returned an unusable value, e.g. a
    /// zero grid spacing on an unprogrammed module.
    #[error("invalid calibration: {0}")]
    InvalidCalibration(&'static str),
}

/// Result type alias for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;
