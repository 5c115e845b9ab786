//! Typed register operations and the high-level module API.

use std::thread;
use std::time::Duration;

use log::{debug, info, warn};

use itla_protocol::*;

use crate::convert;
use crate::error::{DriverError, DriverResult};
use crate::session::{Session, TIMEOUT_GENERAL, TIMEOUT_MONITOR};
use crate::transport::Transport;

/// Baud rates probed during negotiation, in order. First match wins.
pub const BAUD_CANDIDATES: [u32; 6] = [4800, 9600, 19200, 38400, 57600, 115200];

/// Rate the transport is left at when negotiation fails.
pub const BAUD_DEFAULT: u32 = 9600;

/// Line settle time after a rate change, before the probe read.
const BAUD_SETTLE: Duration = Duration::from_millis(50);

/// Driver for one ITLA module on an exclusively owned transport.
///
/// All operations are synchronous single attempts; see
/// [`DriverError`] for the failure taxonomy.
pub struct Itla<T> {
    session: Session<T>,
}

impl<T: Transport> Itla<T> {
    /// Create a driver over `transport`. No I/O happens until
    /// [`begin`](Itla::begin) or a register operation is called.
    pub fn new(transport: T) -> Self {
        Itla {
            session: Session::new(transport),
        }
    }

    /// Initialize the interface: set verbosity and auto-negotiate the
    /// baud rate. Returns the accepted rate.
    ///
    /// On [`DriverError::AutoBaudFailed`] the transport is configured at
    /// [`BAUD_DEFAULT`] and the driver remains usable for later retries.
    pub fn begin(&mut self, verbose: bool) -> DriverResult<u32> {
        self.session.set_verbose(verbose);
        self.negotiate_baud()
    }

    /// Probe [`BAUD_CANDIDATES`] in order with a NOP read; accept the
    /// first rate the module answers at with status OK and stop there.
    pub fn negotiate_baud(&mut self) -> DriverResult<u32> {
        for &baud in &BAUD_CANDIDATES {
            self.session.transport_mut().configure(baud)?;
            thread::sleep(BAUD_SETTLE);
            debug!("probing {} baud", baud);
            match self.session.transact(Request::read(REG_NOP), TIMEOUT_GENERAL) {
                Ok(response) if response.status == Status::Ok => {
                    info!("module answered at {} baud", baud);
                    self.session.set_baud(baud);
                    return Ok(baud);
                }
                Ok(response) => {
                    debug!("status {:?} at {} baud", response.status, baud);
                }
                Err(err) => {
                    debug!("no reply at {} baud: {}", baud, err);
                }
            }
        }
        self.session.transport_mut().configure(BAUD_DEFAULT)?;
        warn!("baud negotiation failed, falling back to {} baud", BAUD_DEFAULT);
        Err(DriverError::AutoBaudFailed)
    }

    /// Read a 16-bit register.
    pub fn read_register(&mut self, register: u8) -> DriverResult<u16> {
        let response = self.session.transact(Request::read(register), TIMEOUT_GENERAL)?;
        self.check_status(response)
    }

    /// Read a monitoring register (longer deadline, see
    /// [`TIMEOUT_MONITOR`]).
    pub fn read_monitor(&mut self, register: u8) -> DriverResult<u16> {
        let response = self.session.transact(Request::read(register), TIMEOUT_MONITOR)?;
        self.check_status(response)
    }

    /// Write a 16-bit register.
    pub fn write_register(&mut self, register: u8, value: u16) -> DriverResult<()> {
        let response = self
            .session
            .transact(Request::write(register, value), TIMEOUT_GENERAL)?;
        self.check_status(response)?;
        Ok(())
    }

    /// The specific cause of the most recent execution error, from the
    /// NOP register's low nibble.
    pub fn get_error_code(&mut self) -> DriverResult<ExecutionErrorCode> {
        let response = self.session.transact(Request::read(REG_NOP), TIMEOUT_GENERAL)?;
        Ok(ExecutionErrorCode::from((response.data & 0x0F) as u8))
    }

    /// Map a non-OK status to a driver error, fetching the execution
    /// error code when the module reported one.
    fn check_status(&mut self, response: Response) -> DriverResult<u16> {
        match response.status {
            Status::Ok => Ok(response.data),
            Status::ExecutionError => {
                let code = self.get_error_code()?;
                warn!(
                    "register 0x{:02X}: execution error: {}",
                    response.register, code
                );
                Err(DriverError::Execution(code))
            }
            status => Err(DriverError::UnexpectedStatus {
                status,
                register: response.register,
            }),
        }
    }

    /// Read a variable-length string through extended addressing (AEA).
    ///
    /// Returns `Ok(None)` if the register does not hold an AEA value.
    /// The first read must answer with status
    /// [`Status::ExtendedAddressPending`], whose data low byte declares
    /// the string length; the content then streams through
    /// [`REG_AEA_EAR`] two bytes per read, high byte first, ending at
    /// the declared length or a NUL. A failure mid-stream yields the
    /// partial string accumulated so far.
    ///
    /// The module advances its AEA cursor on every EAR read, so no other
    /// transaction may be interleaved until this returns.
    pub fn read_string(&mut self, register: u8) -> DriverResult<Option<String>> {
        let first = self.session.transact(Request::read(register), TIMEOUT_GENERAL)?;
        if first.status != Status::ExtendedAddressPending {
            debug!(
                "register 0x{:02X} is not an AEA string (status {:?})",
                register, first.status
            );
            return Ok(None);
        }
        let declared = (first.data & 0xFF) as usize;

        let mut out = String::with_capacity(declared);
        'stream: while out.len() < declared {
            let chunk = match self.session.transact(Request::read(REG_AEA_EAR), TIMEOUT_GENERAL) {
                Ok(response) if response.status == Status::Ok => response.data,
                Ok(response) => {
                    warn!(
                        "AEA read of 0x{:02X} ended early at {} of {} bytes (status {:?})",
                        register,
                        out.len(),
                        declared,
                        response.status
                    );
                    break;
                }
                Err(err) => {
                    warn!(
                        "AEA read of 0x{:02X} failed at {} of {} bytes: {}",
                        register,
                        out.len(),
                        declared,
                        err
                    );
                    break;
                }
            };
            for byte in [(chunk >> 8) as u8, (chunk & 0xFF) as u8] {
                if byte == 0 {
                    break 'stream;
                }
                out.push(byte as char);
                if out.len() >= declared {
                    break 'stream;
                }
            }
        }
        Ok(Some(out))
    }

    // ------------------------------------------------------------------
    // High-level operations
    // ------------------------------------------------------------------

    /// Enable the optical output (SENA bit of the reset/enable register).
    pub fn laser_on(&mut self) -> DriverResult<()> {
        self.write_register(REG_RESENA, RESENA_SENA)
    }

    /// Disable the optical output.
    pub fn laser_off(&mut self) -> DriverResult<()> {
        self.write_register(REG_RESENA, 0)
    }

    /// Whether the optical output is enabled.
    pub fn is_laser_on(&mut self) -> DriverResult<bool> {
        Ok(self.read_register(REG_RESENA)? & RESENA_SENA != 0)
    }

    /// Set the optical power setpoint in dBm.
    pub fn set_power_dbm(&mut self, dbm: f64) -> DriverResult<()> {
        self.write_register(REG_PWR, convert::dbm_to_raw(dbm) as u16)
    }

    /// The optical power setpoint in dBm.
    pub fn get_power_dbm(&mut self) -> DriverResult<f64> {
        Ok(convert::raw_to_dbm(self.read_register(REG_PWR)? as i16))
    }

    /// The actual optical output power in dBm (monitoring read).
    pub fn get_output_power_dbm(&mut self) -> DriverResult<f64> {
        Ok(convert::raw_to_dbm(self.read_monitor(REG_OOP)? as i16))
    }

    /// The current module temperature in degrees Celsius (monitoring
    /// read).
    pub fn get_temperature(&mut self) -> DriverResult<f64> {
        Ok(convert::raw_to_celsius(self.read_monitor(REG_CTEMP)? as i16))
    }

    /// Tune to `thz` by selecting the nearest channel on the module's
    /// grid.
    ///
    /// The channel is split into two words written high word first; the
    /// module commits the pending change on the low-word write, so the
    /// order is part of the device contract.
    pub fn set_frequency_thz(&mut self, thz: f64) -> DriverResult<()> {
        let grid = self.grid_spacing_ghz()?;
        let first = self.first_channel_ghz()?;
        let channel = convert::channel_for_frequency(thz * 1000.0, first, grid);
        debug!(
            "tuning to {} THz: channel {} (grid {} GHz, first {} GHz)",
            thz, channel, grid, first
        );
        self.write_register(REG_CHANNELH, (channel >> 16) as u16)?;
        self.write_register(REG_CHANNEL, (channel & 0xFFFF) as u16)
    }

    /// The currently selected frequency in THz, from the channel number
    /// and calibration registers.
    pub fn get_frequency_thz(&mut self) -> DriverResult<f64> {
        let low = self.read_register(REG_CHANNEL)? as u32;
        let high = self.read_register(REG_CHANNELH)? as u32;
        let channel = (high << 16) | low;
        let grid = self.grid_spacing_ghz()?;
        let first = self.first_channel_ghz()?;
        Ok(convert::frequency_for_channel(channel, first, grid) / 1000.0)
    }

    /// Grid spacing in GHz from the calibration registers.
    ///
    /// A zero spacing (unprogrammed module) is rejected here so the
    /// channel math never divides by it.
    pub fn grid_spacing_ghz(&mut self) -> DriverResult<f64> {
        let grid_i = self.read_register(REG_GRID)?;
        let grid_f = self.read_register(REG_GRID2)?;
        let grid = convert::grid_ghz(grid_i, grid_f);
        if grid <= 0.0 {
            return Err(DriverError::InvalidCalibration(
                "grid spacing registers read zero",
            ));
        }
        Ok(grid)
    }

    /// The actual lasing frequency in THz, from the readback registers
    /// (monitoring reads). This is the module's own measurement and can
    /// differ from the selected channel while tuning settles.
    pub fn get_laser_frequency_thz(&mut self) -> DriverResult<f64> {
        let lf1 = self.read_monitor(REG_LF1)?;
        let lf2 = self.read_monitor(REG_LF2)?;
        let lf3 = self.read_monitor(REG_LF3)?;
        Ok(convert::frequency_triplet_ghz(lf1, lf2, lf3) / 1000.0)
    }

    /// First channel frequency in GHz from the calibration registers.
    pub fn first_channel_ghz(&mut self) -> DriverResult<f64> {
        let fcf1 = self.read_register(REG_FCF1)?;
        let fcf2 = self.read_register(REG_FCF2)?;
        let fcf3 = self.read_register(REG_FCF3)?;
        Ok(convert::first_channel_ghz(fcf1, fcf2, fcf3))
    }

    /// Read an identity string (device type, manufacturer, model, serial
    /// number, ...) through AEA.
    pub fn read_identity_string(&mut self, register: u8) -> DriverResult<Option<String>> {
        self.read_string(register)
    }

    /// Manufacturer string.
    pub fn manufacturer(&mut self) -> DriverResult<Option<String>> {
        self.read_string(REG_MFGR)
    }

    /// Model string.
    pub fn model(&mut self) -> DriverResult<Option<String>> {
        self.read_string(REG_MODEL)
    }

    /// Serial number string.
    pub fn serial_number(&mut self) -> DriverResult<Option<String>> {
        self.read_string(REG_SERNO)
    }

    /// The fatal and warning status words (monitoring reads).
    pub fn status_flags(&mut self) -> DriverResult<(u16, u16)> {
        let fatal = self.read_monitor(REG_STATUSF)?;
        let warning = self.read_monitor(REG_STATUSW)?;
        Ok((fatal, warning))
    }

    /// Enable or disable wire traffic logging.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.session.set_verbose(verbose);
    }

    /// The underlying session.
    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    /// Mutable access to the underlying session.
    pub fn session_mut(&mut self) -> &mut Session<T> {
        &mut self.session
    }

    /// Consume the driver and release the transport.
    pub fn into_inner(self) -> T {
        self.session.into_inner()
    }
}
