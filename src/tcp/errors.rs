use thiserror::Error;

/// Rejected construction-time settings. Protocol operations never fail; see `TcpSender`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TcpError {
    #[error("Invalid capacity: the outbound stream must hold at least one byte")]
    ZeroCapacity,

    #[error("Invalid retransmission timeout: must be at least 1 ms")]
    ZeroTimeout,

    #[error("Invalid max payload size: segments must carry at least one byte")]
    ZeroPayloadSize,
}
