//! Register addresses and protocol constants.
//!
//! Addresses follow the OIF ITLA MSA 1.3 register map. Only the registers
//! the driver actually touches are named here; the map itself is fixed and
//! never changes at runtime.

// ============================================================================
// Packet layout
// ============================================================================

/// Wire packet size in bytes. Both directions use the same size.
pub const PACKET_SIZE: usize = 4;

/// Header flag: re-request the last response instead of a new operation.
pub const FLAG_LAST_RESPONSE: u8 = 0x80;
/// Header flag: write operation (clear = read).
pub const FLAG_WRITE: u8 = 0x08;
/// Header marker bit, always set on outgoing requests.
pub const FLAG_MARKER: u8 = 0x04;
/// Response header flag: module-signalled communication error (CE).
pub const FLAG_COMM_ERROR: u8 = 0x08;
/// Response header mask for the 2-bit status field.
pub const STATUS_MASK: u8 = 0x03;
/// Mask selecting the low nibble of the header byte (everything but the
/// checksum).
pub const HEADER_NIBBLE_MASK: u8 = 0x0F;

// ============================================================================
// Register Addresses (module register map)
// ============================================================================

/// NOP/status register. Low nibble of the value holds the most recent
/// execution error code.
pub const REG_NOP: u8 = 0x00;
/// Device type string (AEA).
pub const REG_DEVTYP: u8 = 0x01;
/// Manufacturer string (AEA).
pub const REG_MFGR: u8 = 0x02;
/// Model string (AEA).
pub const REG_MODEL: u8 = 0x03;
/// Serial number string (AEA).
pub const REG_SERNO: u8 = 0x04;
/// Manufacturing date string (AEA).
pub const REG_MFGDATE: u8 = 0x05;
/// Firmware release string (AEA).
pub const REG_RELEASE: u8 = 0x06;
/// Release backwards-compatibility string (AEA).
pub const REG_RELBACK: u8 = 0x07;
/// General module configuration.
pub const REG_GENCFG: u8 = 0x08;
/// AEA extended address config.
pub const REG_AEA_EAC: u8 = 0x09;
/// AEA extended address.
pub const REG_AEA_EA: u8 = 0x0A;
/// AEA data register. Repeated reads stream the value two bytes at a
/// time, advancing a module-side cursor.
pub const REG_AEA_EAR: u8 = 0x0B;
/// I/O capabilities register.
pub const REG_IOCAP: u8 = 0x0D;
/// Last response register.
pub const REG_LSTRESP: u8 = 0x13;

/// Fatal condition status word.
pub const REG_STATUSF: u8 = 0x20;
/// Warning condition status word.
pub const REG_STATUSW: u8 = 0x21;

/// Channel number, low word. Writing this word commits a pending channel
/// change.
pub const REG_CHANNEL: u8 = 0x30;
/// Optical power setpoint, dBm * 100 (signed).
pub const REG_PWR: u8 = 0x31;
/// Reset/enable register. Bit 3 (SENA) gates the optical output.
pub const REG_RESENA: u8 = 0x32;
/// Module configuration behavior.
pub const REG_MCB: u8 = 0x33;
/// Grid spacing, integer part (0.1 GHz steps).
pub const REG_GRID: u8 = 0x34;
/// First channel frequency, THz digits.
pub const REG_FCF1: u8 = 0x35;
/// First channel frequency, 0.1 GHz digits.
pub const REG_FCF2: u8 = 0x36;

/// Laser frequency readback, THz digits.
pub const REG_LF1: u8 = 0x40;
/// Laser frequency readback, 0.1 GHz digits.
pub const REG_LF2: u8 = 0x41;
/// Actual optical output power, dBm * 100 (signed).
pub const REG_OOP: u8 = 0x42;
/// Current module temperature, degC * 100 (signed).
pub const REG_CTEMP: u8 = 0x43;

/// Optical power range minimum.
pub const REG_OPSL: u8 = 0x50;
/// Optical power range maximum.
pub const REG_OPSH: u8 = 0x51;
/// Fine-tune frequency offset.
pub const REG_FTF: u8 = 0x62;
/// Channel number, high word. Written before the low word.
pub const REG_CHANNELH: u8 = 0x65;
/// Grid spacing, fractional part (0.001 GHz steps).
pub const REG_GRID2: u8 = 0x66;
/// First channel frequency, 0.001 GHz digits.
pub const REG_FCF3: u8 = 0x67;
/// Laser frequency readback, 0.001 GHz digits.
pub const REG_LF3: u8 = 0x68;

// ============================================================================
// Reset/Enable bits (REG_RESENA)
// ============================================================================

/// Soft reset.
pub const RESENA_SR: u16 = 0x0001;
/// Output enable (SENA).
pub const RESENA_SENA: u16 = 0x0008;
/// Hard module reset.
pub const RESENA_MR: u16 = 0x0010;

// ============================================================================
// Execution error codes (NOP register bits 3:0)
// ============================================================================

/// No pending error.
pub const ERR_CODE_OK: u8 = 0x00;
/// Register not implemented.
pub const ERR_CODE_RNI: u8 = 0x01;
/// Register not writable.
pub const ERR_CODE_RNW: u8 = 0x02;
/// Register value out of range.
pub const ERR_CODE_RVE: u8 = 0x03;
/// Command ignored, operation pending.
pub const ERR_CODE_CIP: u8 = 0x04;
/// Command ignored, initialization in progress.
pub const ERR_CODE_CII: u8 = 0x05;
/// Extended address range error.
pub const ERR_CODE_ERE: u8 = 0x06;
/// Extended address is read-only.
pub const ERR_CODE_ERO: u8 = 0x07;
/// General execution failure.
pub const ERR_CODE_EXF: u8 = 0x08;
/// Command ignored while output is enabled.
pub const ERR_CODE_CIE: u8 = 0x09;
/// Invalid configuration.
pub const ERR_CODE_IVC: u8 = 0x0A;
/// Vendor-specific error.
pub const ERR_CODE_VSE: u8 = 0x0F;
