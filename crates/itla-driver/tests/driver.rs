//! Integration tests for the register driver against a scripted module.

mod common;

use std::collections::HashMap;

use common::{register_file, response, ScriptedTransport};
use itla_driver::{DriverError, Itla, BAUD_CANDIDATES};
use itla_protocol::*;

/// Calibration for a 50 GHz grid starting at 191.5 THz.
fn grid_store() -> HashMap<u8, u16> {
    HashMap::from([
        (REG_GRID, 500),
        (REG_GRID2, 0),
        (REG_FCF1, 191),
        (REG_FCF2, 5000),
        (REG_FCF3, 0),
    ])
}

#[test]
fn test_negotiation_stops_at_first_responding_rate() {
    // The module only answers at 19200 baud.
    let transport = ScriptedTransport::new(|request, baud| {
        if baud == 19200 && request[1] == REG_NOP {
            Some(response(Status::Ok, REG_NOP, 0))
        } else {
            None
        }
    });
    let mut laser = Itla::new(transport);

    let baud = laser.begin(false).expect("negotiation succeeds");
    assert_eq!(baud, 19200);
    // 4800 and 9600 were probed and timed out; 38400+ never were.
    assert_eq!(laser.session().transport().configured, vec![4800, 9600, 19200]);
    assert_eq!(laser.session().baud(), Some(19200));
}

#[test]
fn test_negotiation_failure_leaves_default_rate() {
    let transport = ScriptedTransport::new(|_, _| None);
    let mut laser = Itla::new(transport);

    match laser.negotiate_baud() {
        Err(DriverError::AutoBaudFailed) => {}
        other => panic!("expected AutoBaudFailed, got {:?}", other.err()),
    }
    let transport = laser.session().transport();
    assert_eq!(transport.configured.len(), BAUD_CANDIDATES.len() + 1);
    assert_eq!(transport.baud, 9600);

    // The driver stays usable: a later probe can still succeed.
    assert!(laser.read_register(REG_NOP).is_err());
}

#[test]
fn test_read_string_streams_in_two_byte_chunks() {
    // Declared length 5, content "ABCDE": must take exactly three EAR
    // reads (2 + 2 + 1 characters).
    let mut cursor = 0usize;
    let transport = ScriptedTransport::new(move |request, _| {
        let register = request[1];
        match register {
            REG_SERNO => Some(response(Status::ExtendedAddressPending, REG_SERNO, 5)),
            REG_AEA_EAR => {
                let text = b"ABCDE\0";
                let chunk = u16::from_be_bytes([text[cursor], text[cursor + 1]]);
                cursor += 2;
                Some(response(Status::Ok, REG_AEA_EAR, chunk))
            }
            _ => None,
        }
    });
    let mut laser = Itla::new(transport);

    let serial = laser.read_string(REG_SERNO).unwrap();
    assert_eq!(serial.as_deref(), Some("ABCDE"));
    assert_eq!(laser.session().transport().reads_of(REG_AEA_EAR), 3);
}

#[test]
fn test_read_string_on_plain_register_is_absent() {
    let transport = ScriptedTransport::new(|request, _| {
        Some(response(Status::Ok, request[1], 0x1234))
    });
    let mut laser = Itla::new(transport);

    assert_eq!(laser.read_string(REG_GENCFG).unwrap(), None);
    // No EAR traffic for a non-AEA register.
    assert_eq!(laser.session().transport().reads_of(REG_AEA_EAR), 0);
}

#[test]
fn test_read_string_stops_at_nul_before_declared_length() {
    let mut chunks = vec![
        u16::from_be_bytes([b'O', b'K']),
        u16::from_be_bytes([b'\0', b'X']),
    ]
    .into_iter();
    let transport = ScriptedTransport::new(move |request, _| match request[1] {
        REG_MODEL => Some(response(Status::ExtendedAddressPending, REG_MODEL, 8)),
        REG_AEA_EAR => Some(response(Status::Ok, REG_AEA_EAR, chunks.next().unwrap())),
        _ => None,
    });
    let mut laser = Itla::new(transport);

    assert_eq!(laser.read_string(REG_MODEL).unwrap().as_deref(), Some("OK"));
}

#[test]
fn test_read_string_truncates_on_mid_stream_error() {
    // Phase 2 fails after one chunk; the partial string is returned.
    let mut ear_reads = 0;
    let transport = ScriptedTransport::new(move |request, _| match request[1] {
        REG_MFGR => Some(response(Status::ExtendedAddressPending, REG_MFGR, 6)),
        REG_AEA_EAR => {
            ear_reads += 1;
            if ear_reads == 1 {
                Some(response(Status::Ok, REG_AEA_EAR, u16::from_be_bytes([b'P', b'U'])))
            } else {
                Some(response(Status::ExecutionError, REG_AEA_EAR, 0))
            }
        }
        _ => None,
    });
    let mut laser = Itla::new(transport);

    assert_eq!(laser.read_string(REG_MFGR).unwrap().as_deref(), Some("PU"));
}

#[test]
fn test_execution_error_surfaces_specific_code() {
    let transport = ScriptedTransport::new(|request, _| {
        let register = request[1];
        if register == REG_NOP {
            // Low nibble of the NOP value carries the error code.
            Some(response(Status::Ok, REG_NOP, ERR_CODE_RNW as u16))
        } else {
            Some(response(Status::ExecutionError, register, 0))
        }
    });
    let mut laser = Itla::new(transport);

    match laser.write_register(REG_OOP, 1) {
        Err(DriverError::Execution(code)) => {
            assert_eq!(code, ExecutionErrorCode::RegisterNotWritable)
        }
        other => panic!("expected execution error, got {:?}", other.err()),
    }
}

#[test]
fn test_unexpected_status_is_an_error_not_a_zero() {
    let transport = ScriptedTransport::new(|request, _| {
        Some(response(Status::CommandIncomplete, request[1], 0))
    });
    let mut laser = Itla::new(transport);

    assert!(matches!(
        laser.read_register(REG_GENCFG),
        Err(DriverError::UnexpectedStatus {
            status: Status::CommandIncomplete,
            ..
        })
    ));
}

#[test]
fn test_laser_enable_round_trip() {
    let mut laser = Itla::new(ScriptedTransport::new(register_file(HashMap::new())));

    assert!(!laser.is_laser_on().unwrap());
    laser.laser_on().unwrap();
    assert!(laser.is_laser_on().unwrap());
    laser.laser_off().unwrap();
    assert!(!laser.is_laser_on().unwrap());
}

#[test]
fn test_power_setpoint_round_trip() {
    let mut laser = Itla::new(ScriptedTransport::new(register_file(HashMap::new())));

    laser.set_power_dbm(7.5).unwrap();
    assert!((laser.get_power_dbm().unwrap() - 7.5).abs() < 0.01);

    laser.set_power_dbm(-3.25).unwrap();
    assert!((laser.get_power_dbm().unwrap() + 3.25).abs() < 0.01);
}

#[test]
fn test_set_frequency_writes_high_word_before_low_word() {
    let mut laser = Itla::new(ScriptedTransport::new(register_file(grid_store())));

    // 193.1 THz on a 50 GHz grid from 191.5 THz is channel 33.
    laser.set_frequency_thz(193.1).unwrap();

    let transport = laser.session().transport();
    assert_eq!(transport.writes_of(REG_CHANNELH), vec![0]);
    assert_eq!(transport.writes_of(REG_CHANNEL), vec![33]);

    // The low-word write commits the change, so it must come last.
    let writes: Vec<u8> = transport
        .requests
        .iter()
        .filter(|p| p[0] & FLAG_WRITE != 0)
        .map(|p| p[1])
        .collect();
    assert_eq!(writes, vec![REG_CHANNELH, REG_CHANNEL]);
}

#[test]
fn test_frequency_round_trip_through_registers() {
    let mut laser = Itla::new(ScriptedTransport::new(register_file(grid_store())));

    laser.set_frequency_thz(193.1).unwrap();
    let read_back = laser.get_frequency_thz().unwrap();
    assert!((read_back - 193.1).abs() < 1e-9);
}

#[test]
fn test_laser_frequency_readback() {
    let store = HashMap::from([
        (REG_LF1, 193u16),
        (REG_LF2, 1000),
        (REG_LF3, 0),
    ]);
    let mut laser = Itla::new(ScriptedTransport::new(register_file(store)));

    assert!((laser.get_laser_frequency_thz().unwrap() - 193.1).abs() < 1e-9);
}

#[test]
fn test_zero_grid_spacing_is_rejected() {
    // Unprogrammed calibration registers all read zero. The channel
    // math must not divide by the zero grid or write a garbage channel.
    let mut laser = Itla::new(ScriptedTransport::new(register_file(HashMap::new())));

    assert!(matches!(
        laser.set_frequency_thz(193.1),
        Err(DriverError::InvalidCalibration(_))
    ));
    let transport = laser.session().transport();
    assert!(transport.writes_of(REG_CHANNELH).is_empty());
    assert!(transport.writes_of(REG_CHANNEL).is_empty());
}

#[test]
fn test_temperature_and_output_power_monitoring() {
    let store = HashMap::from([
        (REG_CTEMP, 2537u16),
        (REG_OOP, (-150i16) as u16),
    ]);
    let mut laser = Itla::new(ScriptedTransport::new(register_file(store)));

    assert!((laser.get_temperature().unwrap() - 25.37).abs() < 1e-9);
    assert!((laser.get_output_power_dbm().unwrap() + 1.5).abs() < 1e-9);
}

#[test]
fn test_status_flags() {
    let store = HashMap::from([(REG_STATUSF, 0x0001u16), (REG_STATUSW, 0x0200u16)]);
    let mut laser = Itla::new(ScriptedTransport::new(register_file(store)));

    assert_eq!(laser.status_flags().unwrap(), (0x0001, 0x0200));
}
