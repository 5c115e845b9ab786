//! ITLA Register Access Protocol
//!
//! This crate provides types and utilities for the register-access wire
//! protocol spoken by integrable tunable laser assemblies (ITLA) following
//! the OIF MSA. The protocol is a strict request/response exchange of
//! fixed-size 4-byte packets over a serial line.
//!
//! # Protocol Overview
//!
//! Every exchange is one packet in each direction:
//!
//! - **Requests** (host → module): header byte with read/write flag,
//!   register address, 16-bit value (big-endian)
//! - **Responses** (module → host): header byte with status bits,
//!   echoed register address, 16-bit data (big-endian)
//!
//! The upper nibble of the header byte always carries a BIP-4 checksum of
//! the remaining 28 bits. Values wider than 16 bits (identity strings) are
//! transferred through the extended-addressing (AEA) registers by a length
//! query followed by repeated reads of the AEA data register.
//!
//! # Example
//!
//! ```rust,ignore
//! use itla_protocol::{Request, Response, REG_CTEMP};
//!
//! // Build a request
//! let req = Request::read(REG_CTEMP);
//! let packet = req.encode();
//!
//! // Parse a response
//! let response = Response::decode(&received)?;
//! ```

mod error;
pub mod packet;
mod registers;
mod types;

pub use error::*;
pub use packet::PacketCodec;
pub use registers::*;
pub use types::*;
