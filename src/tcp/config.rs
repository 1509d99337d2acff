use crate::tcp::errors::TcpError;
use crate::tcp::wrap32::Wrap32;

/// Default capacity of a stream, in bytes
pub const DEFAULT_CAPACITY: usize = 64000;
/// Largest payload the sender puts in one segment
pub const MAX_PAYLOAD_SIZE: usize = 1000;
/// Initial retransmission timeout, in milliseconds
pub const TIMEOUT_DFLT: u16 = 1000;
/// Consecutive retransmissions after which a connection should give up
pub const MAX_RETX_ATTEMPTS: u32 = 8;

/// Settings for one direction of a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpConfig {
    pub capacity: usize,           // Outbound stream capacity
    pub rt_timeout: u16,           // Initial RTO in milliseconds
    pub max_payload_size: usize,   // Upper bound on payload bytes per segment
    pub fixed_isn: Option<Wrap32>, // Use this ISN instead of a random one
}

impl Default for TcpConfig {
    fn default() -> Self {
        TcpConfig {
            capacity: DEFAULT_CAPACITY,
            rt_timeout: TIMEOUT_DFLT,
            max_payload_size: MAX_PAYLOAD_SIZE,
            fixed_isn: None,
        }
    }
}

impl TcpConfig {
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn rt_timeout(mut self, rt_timeout: u16) -> Self {
        self.rt_timeout = rt_timeout;
        self
    }

    pub fn max_payload_size(mut self, max_payload_size: usize) -> Self {
        self.max_payload_size = max_payload_size;
        self
    }

    pub fn fixed_isn(mut self, isn: Wrap32) -> Self {
        self.fixed_isn = Some(isn);
        self
    }

    /// Reject settings that would leave the sender unable to make progress
    pub fn validate(&self) -> Result<(), TcpError> {
        if self.capacity == 0 {
            return Err(TcpError::ZeroCapacity);
        }
        if self.rt_timeout == 0 {
            return Err(TcpError::ZeroTimeout);
        }
        if self.max_payload_size == 0 {
            return Err(TcpError::ZeroPayloadSize);
        }
        Ok(())
    }
}
