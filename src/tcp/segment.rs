use crate::tcp::flags::TcpFlags;
use crate::tcp::wrap32::Wrap32;
use std::fmt;

/// A transport segment as seen by the sender and receiver.
///
/// Ports, checksums and options belong to the framing layer and are not represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpSegment {
    pub seq_no: Wrap32,
    pub ack_no: Wrap32, // Meaningful only with ACK set
    pub flags: TcpFlags,
    pub window: u16,
    pub payload: Vec<u8>,
}

impl Default for TcpSegment {
    fn default() -> Self {
        TcpSegment {
            seq_no: Wrap32::new(0),
            ack_no: Wrap32::new(0),
            flags: TcpFlags::empty(),
            window: 0,
            payload: vec![],
        }
    }
}

impl TcpSegment {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn seq_no(mut self, seq_no: Wrap32) -> Self {
        self.seq_no = seq_no;
        self
    }

    /// Set the ack number along with the ACK flag
    pub fn ack_no(mut self, ack_no: Wrap32) -> Self {
        self.ack_no = ack_no;
        self.flags |= TcpFlags::ACK;
        self
    }

    pub fn tcp_flags(mut self, flags: TcpFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn window_size(mut self, window: u16) -> Self {
        self.window = window;
        self
    }

    pub fn payload(mut self, payload: &[u8]) -> Self {
        self.payload = payload.to_vec();
        self
    }

    pub fn syn(&self) -> bool {
        self.flags.contains(TcpFlags::SYN)
    }

    pub fn fin(&self) -> bool {
        self.flags.contains(TcpFlags::FIN)
    }

    pub fn ack(&self) -> bool {
        self.flags.contains(TcpFlags::ACK)
    }

    /// Payload length plus one for each of SYN and FIN
    pub fn length_in_sequence_space(&self) -> usize {
        self.payload.len() + usize::from(self.syn()) + usize::from(self.fin())
    }
}

impl fmt::Display for TcpSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seq={} flags={:?}", self.seq_no, self.flags)?;
        if self.ack() {
            write!(f, " ack={}", self.ack_no)?;
        }
        write!(f, " win={} len={}", self.window, self.payload.len())?;

        // Long payloads only show a prefix
        if !self.payload.is_empty() {
            let shown = self.payload.len().min(16);
            write!(f, " payload={}", hex::encode(&self.payload[..shown]))?;
            if shown < self.payload.len() {
                write!(f, "..")?;
            }
        }
        Ok(())
    }
}
