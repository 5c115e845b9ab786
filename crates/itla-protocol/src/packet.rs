//! Packet checksum and the streaming packet codec.
//!
//! Every packet is exactly four bytes. The upper nibble of byte 0 carries
//! a BIP-4 checksum of the remaining 28 significant bits:
//!
//! ```text
//! +----------------+----------+-----------+----------+
//! | bip4 | header  | register | value_hi  | value_lo |
//! | 7:4  | 3:0     | byte 1   | byte 2    | byte 3   |
//! +----------------+----------+-----------+----------+
//! ```
//!
//! A packet whose checksum nibble does not match must never be acted upon.

use bytes::{Buf, BytesMut};
use log::trace;

use crate::error::ProtocolError;
use crate::registers::{HEADER_NIBBLE_MASK, PACKET_SIZE};

/// Compute the BIP-4 checksum of a packet.
///
/// XORs the low nibble of byte 0 with bytes 1..3, then folds the two
/// nibbles of the result together. The checksum nibble itself (byte 0
/// bits 7:4) never participates, so the same function both seals outgoing
/// packets and validates received ones.
pub fn bip4(bytes: &[u8; PACKET_SIZE]) -> u8 {
    let bip8 = (bytes[0] & HEADER_NIBBLE_MASK) ^ bytes[1] ^ bytes[2] ^ bytes[3];
    (bip8 >> 4) ^ (bip8 & 0x0F)
}

/// Overwrite byte 0's upper nibble with the packet checksum.
///
/// Must be called after all flag bits are final and before transmission.
pub fn seal(bytes: &mut [u8; PACKET_SIZE]) {
    let sum = bip4(bytes);
    bytes[0] = (bytes[0] & HEADER_NIBBLE_MASK) | (sum << 4);
}

/// Validate the checksum nibble of a received packet.
pub fn validate(bytes: &[u8; PACKET_SIZE]) -> Result<(), ProtocolError> {
    let computed = bip4(bytes);
    let received = bytes[0] >> 4;
    if computed != received {
        return Err(ProtocolError::ChecksumMismatch { computed, received });
    }
    Ok(())
}

/// Accumulates raw received bytes and yields complete 4-byte packets.
///
/// The serial line delivers bytes one at a time; this buffers them until a
/// full packet is available. No resynchronization is attempted: the
/// protocol is strict request/response, so the next four bytes after a
/// request are always one response.
#[derive(Debug, Default)]
pub struct PacketCodec {
    /// Buffer for accumulating incoming data.
    buffer: BytesMut,
}

impl PacketCodec {
    /// Create a new packet codec.
    pub fn new() -> Self {
        PacketCodec {
            buffer: BytesMut::with_capacity(PACKET_SIZE * 2),
        }
    }

    /// Add received data to the buffer.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to take a complete packet from the buffer.
    ///
    /// Returns `Some(packet)` if four bytes are available, or `None` if
    /// more data is needed.
    pub fn decode(&mut self) -> Option<[u8; PACKET_SIZE]> {
        if self.buffer.len() < PACKET_SIZE {
            return None;
        }
        let mut packet = [0u8; PACKET_SIZE];
        packet.copy_from_slice(&self.buffer[..PACKET_SIZE]);
        self.buffer.advance(PACKET_SIZE);
        trace!("codec yielded packet {:02X?}", packet);
        Some(packet)
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        if !self.buffer.is_empty() {
            trace!("codec discarding {} buffered bytes", self.buffer.len());
        }
        self.buffer.clear();
    }
}
