//! Command-line control for an ITLA module on a serial port.

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::warn;

use itla_driver::{DriverError, Itla, SerialTransport, BAUD_DEFAULT};
use itla_protocol::*;

#[derive(Parser)]
#[command(name = "itla-ctl", version, about = "Control an ITLA tunable laser module")]
struct Cli {
    /// Serial device the module is attached to.
    #[arg(short, long, default_value = "/dev/ttyUSB0")]
    port: String,

    /// Skip auto-negotiation and use this baud rate.
    #[arg(short, long)]
    baud: Option<u32>,

    /// Log wire traffic.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the module's identity strings.
    Info,
    /// Print status words, temperature, and output power.
    Status,
    /// Enable the optical output.
    On,
    /// Disable the optical output.
    Off,
    /// Read or set the optical power setpoint in dBm.
    Power {
        /// New setpoint; omit to read the current one.
        dbm: Option<f64>,
    },
    /// Read or set the frequency in THz.
    Frequency {
        /// New frequency; omit to read the current one.
        thz: Option<f64>,
    },
    /// Read a raw register.
    Read {
        /// Register address (hex accepted with 0x prefix).
        #[arg(value_parser = parse_register)]
        register: u8,
    },
    /// Write a raw register.
    Write {
        /// Register address (hex accepted with 0x prefix).
        #[arg(value_parser = parse_register)]
        register: u8,
        /// 16-bit value (hex accepted with 0x prefix).
        #[arg(value_parser = parse_value)]
        value: u16,
    },
}

fn parse_register(arg: &str) -> Result<u8, String> {
    parse_number(arg).map_err(|()| format!("invalid register address: {arg}"))
}

fn parse_value(arg: &str) -> Result<u16, String> {
    parse_number(arg).map_err(|()| format!("invalid register value: {arg}"))
}

fn parse_number<N: TryFrom<u32>>(arg: &str) -> Result<N, ()> {
    let parsed = match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => arg.parse(),
    };
    parsed.map_err(|_| ()).and_then(|n| N::try_from(n).map_err(|_| ()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(if cli.verbose { "debug" } else { "info" })
            }),
        )
        .init();

    let transport = SerialTransport::open(&cli.port, cli.baud.unwrap_or(BAUD_DEFAULT))
        .with_context(|| format!("opening {}", cli.port))?;
    let mut laser = Itla::new(transport);
    laser.set_verbose(cli.verbose);

    if cli.baud.is_none() {
        match laser.negotiate_baud() {
            Ok(baud) => println!("module found at {baud} baud"),
            Err(DriverError::AutoBaudFailed) => {
                warn!("no reply at any rate, continuing at {BAUD_DEFAULT} baud")
            }
            Err(err) => return Err(err).context("baud negotiation"),
        }
    }

    match cli.command {
        Command::Info => {
            print_string("device type", laser.read_identity_string(REG_DEVTYP)?);
            print_string("manufacturer", laser.manufacturer()?);
            print_string("model", laser.model()?);
            print_string("serial number", laser.serial_number()?);
            print_string("mfg date", laser.read_identity_string(REG_MFGDATE)?);
            print_string("release", laser.read_identity_string(REG_RELEASE)?);
        }
        Command::Status => {
            let (fatal, warning) = laser.status_flags()?;
            println!("fatal status:   0x{fatal:04X}");
            println!("warning status: 0x{warning:04X}");
            println!("frequency:      {:.4} THz", laser.get_laser_frequency_thz()?);
            println!("temperature:    {:.2} C", laser.get_temperature()?);
            println!("output power:   {:.2} dBm", laser.get_output_power_dbm()?);
            println!(
                "laser output:   {}",
                if laser.is_laser_on()? { "on" } else { "off" }
            );
        }
        Command::On => {
            laser.laser_on()?;
            println!("laser output enabled");
        }
        Command::Off => {
            laser.laser_off()?;
            println!("laser output disabled");
        }
        Command::Power { dbm: Some(dbm) } => {
            laser.set_power_dbm(dbm)?;
            println!("power setpoint {dbm:.2} dBm");
        }
        Command::Power { dbm: None } => {
            println!("power setpoint {:.2} dBm", laser.get_power_dbm()?);
        }
        Command::Frequency { thz: Some(thz) } => {
            laser.set_frequency_thz(thz)?;
            println!("tuned to {thz:.4} THz");
        }
        Command::Frequency { thz: None } => {
            println!("frequency {:.4} THz", laser.get_frequency_thz()?);
        }
        Command::Read { register } => {
            let value = laser.read_register(register)?;
            println!("0x{register:02X} = 0x{value:04X} ({value})");
        }
        Command::Write { register, value } => {
            laser.write_register(register, value)?;
            println!("0x{register:02X} <- 0x{value:04X}");
        }
    }

    Ok(())
}

fn print_string(label: &str, value: Option<String>) {
    match value {
        Some(s) => println!("{label}: {s}"),
        None => println!("{label}: (not available)"),
    }
}
