//! Protocol error types.

use thiserror::Error;

/// Errors that can occur during a wire-level exchange.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Fewer than four response bytes arrived before the deadline.
    #[error("response timeout: {received} of 4 bytes within {timeout_ms}ms")]
    Timeout {
        /// Bytes received when the deadline expired.
        received: usize,
        /// Deadline that was applied, in milliseconds.
        timeout_ms: u64,
    },

    /// The received packet's BIP-4 checksum does not match.
    #[error("checksum mismatch: computed 0x{computed:X}, received 0x{received:X}")]
    ChecksumMismatch {
        /// Checksum recomputed over the received bytes.
        computed: u8,
        /// Checksum nibble carried in the packet.
        received: u8,
    },

    /// The module set the communication-error (CE) flag in its response.
    #[error("module signalled a communication error (CE flag set)")]
    CommunicationError,
}

/// Execution error codes reported through the NOP register after a
/// transaction returns [`Status::ExecutionError`](crate::Status).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionErrorCode {
    /// No error pending.
    Ok,
    /// Register not implemented.
    RegisterNotImplemented,
    /// Register not writable.
    RegisterNotWritable,
    /// Register value out of range.
    ValueOutOfRange,
    /// Command ignored, another operation is pending.
    OperationPending,
    /// Command ignored, module initialization in progress.
    InitInProgress,
    /// Extended address range error.
    ExtendedAddressRange,
    /// Extended address is read-only.
    ExtendedAddressReadOnly,
    /// General execution failure.
    ExecutionFailed,
    /// Command ignored while the optical output is enabled.
    OutputEnabled,
    /// Invalid configuration.
    InvalidConfiguration,
    /// Vendor-specific error.
    VendorSpecific,
    /// Reserved/unknown code.
    Unknown(u8),
}

impl std::fmt::Display for ExecutionErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionErrorCode::Ok => write!(f, "no error"),
            ExecutionErrorCode::RegisterNotImplemented => write!(f, "register not implemented"),
            ExecutionErrorCode::RegisterNotWritable => write!(f, "register not writable"),
            ExecutionErrorCode::ValueOutOfRange => write!(f, "register value out of range"),
            ExecutionErrorCode::OperationPending => write!(f, "command ignored, operation pending"),
            ExecutionErrorCode::InitInProgress => write!(f, "command ignored, init in progress"),
            ExecutionErrorCode::ExtendedAddressRange => write!(f, "extended address range error"),
            ExecutionErrorCode::ExtendedAddressReadOnly => write!(f, "extended address read-only"),
            ExecutionErrorCode::ExecutionFailed => write!(f, "execution failed"),
            ExecutionErrorCode::OutputEnabled => write!(f, "command ignored, output enabled"),
            ExecutionErrorCode::InvalidConfiguration => write!(f, "invalid configuration"),
            ExecutionErrorCode::VendorSpecific => write!(f, "vendor-specific error"),
            ExecutionErrorCode::Unknown(code) => write!(f, "unknown error (0x{:X})", code),
        }
    }
}

impl From<u8> for ExecutionErrorCode {
    fn from(code: u8) -> Self {
        use crate::registers::*;
        match code {
            ERR_CODE_OK => ExecutionErrorCode::Ok,
            ERR_CODE_RNI => ExecutionErrorCode::RegisterNotImplemented,
            ERR_CODE_RNW => ExecutionErrorCode::RegisterNotWritable,
            ERR_CODE_RVE => ExecutionErrorCode::ValueOutOfRange,
            ERR_CODE_CIP => ExecutionErrorCode::OperationPending,
            ERR_CODE_CII => ExecutionErrorCode::InitInProgress,
            ERR_CODE_ERE => ExecutionErrorCode::ExtendedAddressRange,
            ERR_CODE_ERO => ExecutionErrorCode::ExtendedAddressReadOnly,
            ERR_CODE_EXF => ExecutionErrorCode::ExecutionFailed,
            ERR_CODE_CIE => ExecutionErrorCode::OutputEnabled,
            ERR_CODE_IVC => ExecutionErrorCode::InvalidConfiguration,
            ERR_CODE_VSE => ExecutionErrorCode::VendorSpecific,
            _ => ExecutionErrorCode::Unknown(code),
        }
    }
}

impl From<ExecutionErrorCode> for u8 {
    fn from(code: ExecutionErrorCode) -> Self {
        use crate::registers::*;
        match code {
            ExecutionErrorCode::Ok => ERR_CODE_OK,
            ExecutionErrorCode::RegisterNotImplemented => ERR_CODE_RNI,
            ExecutionErrorCode::RegisterNotWritable => ERR_CODE_RNW,
            ExecutionErrorCode::ValueOutOfRange => ERR_CODE_RVE,
            ExecutionErrorCode::OperationPending => ERR_CODE_CIP,
            ExecutionErrorCode::InitInProgress => ERR_CODE_CII,
            ExecutionErrorCode::ExtendedAddressRange => ERR_CODE_ERE,
            ExecutionErrorCode::ExtendedAddressReadOnly => ERR_CODE_ERO,
            ExecutionErrorCode::ExecutionFailed => ERR_CODE_EXF,
            ExecutionErrorCode::OutputEnabled => ERR_CODE_CIE,
            ExecutionErrorCode::InvalidConfiguration => ERR_CODE_IVC,
            ExecutionErrorCode::VendorSpecific => ERR_CODE_VSE,
            ExecutionErrorCode::Unknown(code) => code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_round_trip() {
        for code in 0u8..=0x0F {
            let parsed = ExecutionErrorCode::from(code);
            assert_eq!(u8::from(parsed), code);
        }
    }

    #[test]
    fn test_reserved_codes_are_unknown() {
        assert_eq!(ExecutionErrorCode::from(0x0B), ExecutionErrorCode::Unknown(0x0B));
        assert_eq!(ExecutionErrorCode::from(0x0E), ExecutionErrorCode::Unknown(0x0E));
    }
}
