//! The transaction engine: one request/response exchange at a time.

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, trace, warn};

use itla_protocol::{PacketCodec, ProtocolError, Request, Response};

use crate::error::DriverResult;
use crate::transport::Transport;

/// Deadline for ordinary register transactions.
pub const TIMEOUT_GENERAL: Duration = Duration::from_millis(100);
/// Deadline for monitoring reads (temperature, output power, status
/// words), which some modules answer noticeably slower.
pub const TIMEOUT_MONITOR: Duration = Duration::from_millis(500);

/// Receive poll interval inside the deadline loop.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Drives request/response exchanges over an exclusively owned transport.
///
/// Holds the session state that outlives a single transaction: the
/// verbosity flag, the negotiated baud rate, and the last successfully
/// decoded response. The last response matters because the AEA string
/// protocol reads a length in one transaction and data in later ones.
pub struct Session<T> {
    transport: T,
    codec: PacketCodec,
    verbose: bool,
    baud: Option<u32>,
    last_response: Option<Response>,
}

impl<T: Transport> Session<T> {
    /// Create a session over `transport`.
    pub fn new(transport: T) -> Self {
        Session {
            transport,
            codec: PacketCodec::new(),
            verbose: false,
            baud: None,
            last_response: None,
        }
    }

    /// Perform one transaction: send the request, await exactly one
    /// validated response within `timeout`.
    ///
    /// The deadline is measured from send time on a monotonic clock.
    /// Partial receipt at the deadline is a [`ProtocolError::Timeout`];
    /// nothing is parsed and nothing is retried here. A register-echo
    /// mismatch is logged but the parsed response is still returned.
    pub fn transact(&mut self, request: Request, timeout: Duration) -> DriverResult<Response> {
        // Discard anything left over from a previous (timed-out)
        // exchange so it cannot be mistaken for this response.
        self.codec.clear();
        while self.transport.bytes_available()? > 0 {
            let stale = self.transport.read_byte()?;
            trace!("discarding stale byte 0x{:02X}", stale);
        }

        let packet = request.encode();
        if self.verbose {
            debug!("tx {:02X?}", packet);
        }
        self.transport.write_all(&packet)?;
        let deadline = Instant::now() + timeout;

        loop {
            while self.transport.bytes_available()? > 0 {
                let byte = self.transport.read_byte()?;
                self.codec.push(&[byte]);
            }
            if let Some(bytes) = self.codec.decode() {
                if self.verbose {
                    debug!("rx {:02X?}", bytes);
                }
                let response = Response::decode(&bytes)?;
                if response.register != request.register {
                    warn!(
                        "response register mismatch: expected 0x{:02X}, got 0x{:02X}",
                        request.register, response.register
                    );
                }
                self.last_response = Some(response);
                return Ok(response);
            }
            if Instant::now() >= deadline {
                return Err(ProtocolError::Timeout {
                    received: self.codec.buffered_len(),
                    timeout_ms: timeout.as_millis() as u64,
                }
                .into());
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// The last successfully decoded response, if any.
    pub fn last_response(&self) -> Option<&Response> {
        self.last_response.as_ref()
    }

    /// Whether wire traffic is logged at debug level.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Enable or disable wire traffic logging.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// The baud rate accepted during negotiation, if any.
    pub fn baud(&self) -> Option<u32> {
        self.baud
    }

    pub(crate) fn set_baud(&mut self, baud: u32) {
        self.baud = Some(baud);
    }

    /// Access the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the session and release the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }
}
