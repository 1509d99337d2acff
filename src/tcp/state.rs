use std::fmt;

/// Where the sender is in its half of the connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderState {
    Closed,   // Nothing sent yet
    SynSent,  // SYN sent, not yet acknowledged
    SynAcked, // SYN acknowledged, streaming data
    FinSent,  // FIN sent, not yet acknowledged
    FinAcked, // Everything acknowledged, including FIN
    Error,    // Outbound stream flagged as broken
}

/// Where the receiver is in its half of the connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverState {
    Listen,  // Waiting for SYN
    SynRecv, // ISN known, assembling data
    FinRecv, // Whole stream assembled, including FIN
    Error,   // Inbound stream flagged as broken
}

impl fmt::Display for SenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SenderState::Closed => "CLOSED",
            SenderState::SynSent => "SYN_SENT",
            SenderState::SynAcked => "SYN_ACKED",
            SenderState::FinSent => "FIN_SENT",
            SenderState::FinAcked => "FIN_ACKED",
            SenderState::Error => "ERROR",
        };
        f.write_str(name)
    }
}

impl fmt::Display for ReceiverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReceiverState::Listen => "LISTEN",
            ReceiverState::SynRecv => "SYN_RECV",
            ReceiverState::FinRecv => "FIN_RECV",
            ReceiverState::Error => "ERROR",
        };
        f.write_str(name)
    }
}
