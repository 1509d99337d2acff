//! The data-transport half of TCP: a flow-controlled byte stream, an
//! out-of-order reassembler, 32-bit sequence number arithmetic, and the
//! sender and receiver state machines built on top of them.
//!
//! Wire encoding, checksums and the connection lifecycle live elsewhere;
//! segments are consumed and produced here as plain [`tcp::TcpSegment`] values.

pub mod tcp;
