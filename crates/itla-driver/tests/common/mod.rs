//! Scripted in-memory transport for driver tests.

use std::collections::{HashMap, VecDeque};
use std::io;

use itla_driver::Transport;
use itla_protocol::{packet, Status, FLAG_WRITE, PACKET_SIZE};

/// What the scripted module does with one request packet at the current
/// baud rate. `None` means no reply (the transaction times out).
pub type Responder = Box<dyn FnMut(&[u8; PACKET_SIZE], u32) -> Option<Vec<u8>>>;

/// A transport backed by a responder closure playing the module.
pub struct ScriptedTransport {
    responder: Responder,
    rx: VecDeque<u8>,
    /// Current baud rate.
    pub baud: u32,
    /// Every rate passed to `configure`, in order.
    pub configured: Vec<u32>,
    /// Every request packet written, in order.
    pub requests: Vec<[u8; PACKET_SIZE]>,
}

impl ScriptedTransport {
    pub fn new(
        responder: impl FnMut(&[u8; PACKET_SIZE], u32) -> Option<Vec<u8>> + 'static,
    ) -> Self {
        ScriptedTransport {
            responder: Box::new(responder),
            rx: VecDeque::new(),
            baud: 0,
            configured: Vec::new(),
            requests: Vec::new(),
        }
    }

    /// Request packets that were writes of `register`.
    pub fn writes_of(&self, register: u8) -> Vec<u16> {
        self.requests
            .iter()
            .filter(|p| p[1] == register && p[0] & FLAG_WRITE != 0)
            .map(|p| u16::from_be_bytes([p[2], p[3]]))
            .collect()
    }

    /// Number of read requests for `register`.
    pub fn reads_of(&self, register: u8) -> usize {
        self.requests
            .iter()
            .filter(|p| p[1] == register && p[0] & FLAG_WRITE == 0)
            .count()
    }
}

impl Transport for ScriptedTransport {
    fn configure(&mut self, baud: u32) -> io::Result<()> {
        self.baud = baud;
        self.configured.push(baud);
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        assert_eq!(bytes.len(), PACKET_SIZE, "requests are whole packets");
        let mut request = [0u8; PACKET_SIZE];
        request.copy_from_slice(bytes);
        self.requests.push(request);
        if let Some(reply) = (self.responder)(&request, self.baud) {
            self.rx.extend(reply);
        }
        Ok(())
    }

    fn bytes_available(&mut self) -> io::Result<usize> {
        Ok(self.rx.len())
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        self.rx
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::WouldBlock, "rx empty"))
    }
}

/// Sealed module response bytes.
pub fn response(status: Status, register: u8, data: u16) -> Vec<u8> {
    let mut bytes = [
        status.bits(),
        register,
        (data >> 8) as u8,
        (data & 0xFF) as u8,
    ];
    packet::seal(&mut bytes);
    bytes.to_vec()
}

/// A responder emulating a plain register file: reads and writes against
/// `store`, every operation answered with status OK.
pub fn register_file(
    store: HashMap<u8, u16>,
) -> impl FnMut(&[u8; PACKET_SIZE], u32) -> Option<Vec<u8>> {
    let mut store = store;
    move |request, _baud| {
        let register = request[1];
        if request[0] & FLAG_WRITE != 0 {
            let value = u16::from_be_bytes([request[2], request[3]]);
            store.insert(register, value);
            Some(response(Status::Ok, register, value))
        } else {
            let value = store.get(&register).copied().unwrap_or(0);
            Some(response(Status::Ok, register, value))
        }
    }
}
