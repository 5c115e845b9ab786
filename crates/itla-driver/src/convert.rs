//! Conversions between raw register codes and physical units.
//!
//! All functions are pure; the driver reads the calibration registers
//! (grid spacing, first channel frequency) and feeds them in.

/// Power in dBm to the signed raw register code (dBm * 100).
pub fn dbm_to_raw(dbm: f64) -> i16 {
    (dbm * 100.0).round() as i16
}

/// Signed raw register code to power in dBm.
pub fn raw_to_dbm(raw: i16) -> f64 {
    raw as f64 / 100.0
}

/// Signed raw register code to temperature in degrees Celsius.
pub fn raw_to_celsius(raw: i16) -> f64 {
    raw as f64 / 100.0
}

/// Combine the grid spacing registers into GHz.
///
/// The integer register counts 0.1 GHz steps, the fractional register
/// 0.001 GHz steps.
pub fn grid_ghz(grid_i: u16, grid_f: u16) -> f64 {
    grid_i as f64 * 0.1 + grid_f as f64 * 0.001
}

/// Combine a THz / 0.1 GHz / 0.001 GHz register triplet into GHz.
///
/// Both the first-channel-frequency (FCF1..FCF3) and laser-frequency
/// readback (LF1..LF3) registers use this digit scheme.
pub fn frequency_triplet_ghz(thz: u16, tenth_ghz: u16, thousandth_ghz: u16) -> f64 {
    thz as f64 * 1000.0 + tenth_ghz as f64 * 0.1 + thousandth_ghz as f64 * 0.001
}

/// Combine the first-channel-frequency registers into GHz.
pub fn first_channel_ghz(fcf1: u16, fcf2: u16, fcf3: u16) -> f64 {
    frequency_triplet_ghz(fcf1, fcf2, fcf3)
}

/// Channel number for a target frequency on the module's grid.
///
/// Channel 1 is the first channel frequency; the target is rounded to
/// the nearest grid point. `grid` must be positive; the driver rejects
/// a zero grid spacing when it reads the calibration registers.
pub fn channel_for_frequency(target_ghz: f64, first_ghz: f64, grid: f64) -> u32 {
    ((target_ghz - first_ghz) / grid + 1.0).round() as u32
}

/// Frequency in GHz of a channel number.
pub fn frequency_for_channel(channel: u32, first_ghz: f64, grid: f64) -> f64 {
    first_ghz + (channel as f64 - 1.0) * grid
}
