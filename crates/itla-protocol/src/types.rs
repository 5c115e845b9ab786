//! Request and response types.

use crate::error::ProtocolError;
use crate::packet;
use crate::registers::*;

/// Direction of a register access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Read the register; the request value field is ignored by the module.
    Read,
    /// Write the request value to the register.
    Write,
}

/// The 2-bit status field of a response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Operation completed.
    Ok,
    /// The module refused or failed the operation. The specific cause is
    /// readable from the NOP register's low nibble.
    ExecutionError,
    /// The value is longer than 16 bits; its length is in the response
    /// data and the content is streamed through the AEA data register.
    ExtendedAddressPending,
    /// Reserved / command incomplete.
    CommandIncomplete,
}

impl Status {
    /// Parse the 2-bit status field.
    pub fn from_bits(bits: u8) -> Status {
        match bits & STATUS_MASK {
            0 => Status::Ok,
            1 => Status::ExecutionError,
            2 => Status::ExtendedAddressPending,
            _ => Status::CommandIncomplete,
        }
    }

    /// The raw 2-bit encoding.
    pub fn bits(self) -> u8 {
        match self {
            Status::Ok => 0,
            Status::ExecutionError => 1,
            Status::ExtendedAddressPending => 2,
            Status::CommandIncomplete => 3,
        }
    }
}

/// A register access request, built fresh for every transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    /// Register address.
    pub register: u8,
    /// Value to write (ignored by the module on reads).
    pub value: u16,
    /// Read or write.
    pub operation: Operation,
    /// Ask the module to repeat its last response.
    pub last_response: bool,
}

impl Request {
    /// A read of `register`.
    pub fn read(register: u8) -> Self {
        Request {
            register,
            value: 0,
            operation: Operation::Read,
            last_response: false,
        }
    }

    /// A write of `value` to `register`.
    pub fn write(register: u8, value: u16) -> Self {
        Request {
            register,
            value,
            operation: Operation::Write,
            last_response: false,
        }
    }

    /// Encode to a sealed wire packet.
    ///
    /// Flag bits are set first, then the checksum is computed over the
    /// finished bytes and stored in byte 0's upper nibble. Encoding the
    /// same request twice yields byte-identical packets.
    pub fn encode(&self) -> [u8; PACKET_SIZE] {
        let mut header = FLAG_MARKER;
        if self.last_response {
            header |= FLAG_LAST_RESPONSE;
        }
        if self.operation == Operation::Write {
            header |= FLAG_WRITE;
        }
        let mut bytes = [
            header,
            self.register,
            (self.value >> 8) as u8,
            (self.value & 0xFF) as u8,
        ];
        packet::seal(&mut bytes);
        bytes
    }
}

/// A validated, decoded response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    /// Status field.
    pub status: Status,
    /// Echoed register address.
    pub register: u8,
    /// 16-bit data field.
    pub data: u16,
}

impl Response {
    /// Decode and validate a received packet.
    ///
    /// The checksum is verified first; a mismatched packet is rejected
    /// outright. A set CE flag is reported as
    /// [`ProtocolError::CommunicationError`] without parsing the payload.
    pub fn decode(bytes: &[u8; PACKET_SIZE]) -> Result<Response, ProtocolError> {
        packet::validate(bytes)?;
        if bytes[0] & FLAG_COMM_ERROR != 0 {
            return Err(ProtocolError::CommunicationError);
        }
        Ok(Response {
            status: Status::from_bits(bytes[0]),
            register: bytes[1],
            data: u16::from_be_bytes([bytes[2], bytes[3]]),
        })
    }
}
