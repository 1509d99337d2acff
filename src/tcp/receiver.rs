use crate::tcp::byte_stream::ByteStream;
use crate::tcp::reassembler::Reassembler;
use crate::tcp::segment::TcpSegment;
use crate::tcp::state::ReceiverState;
use crate::tcp::wrap32::Wrap32;

/// The receiver end of a connection.
///
/// Turns inbound segments into an assembled byte stream and produces the ack number and
/// window the peer's sender needs.
#[derive(Debug)]
pub struct TcpReceiver {
    isn: Option<Wrap32>,      // Set by the first SYN
    reassembler: Reassembler, // Handles incoming TCP segments
    ackno: Option<Wrap32>,    // Next seq number expected from the peer
    capacity: usize,
}

impl TcpReceiver {
    pub fn new(capacity: usize) -> Self {
        TcpReceiver {
            isn: None,
            reassembler: Reassembler::new(ByteStream::new(capacity)),
            ackno: None,
            capacity,
        }
    }

    /// Process an inbound segment. Anything that cannot be placed in the stream is ignored.
    pub fn segment_received(&mut self, seg: &TcpSegment) {
        let isn = match self.isn {
            Some(_) if seg.syn() => {
                log::debug!("ignoring duplicate SYN: {seg}");
                return;
            }
            Some(isn) => isn,
            None if seg.syn() => {
                log::debug!("SYN received, isn={}", seg.seq_no);
                self.isn = Some(seg.seq_no);
                seg.seq_no
            }
            None => {
                log::debug!("ignoring segment before SYN: {seg}");
                return;
            }
        };

        // Absolute seq numbers count the SYN at 0, stream indexes start right after it
        let checkpoint = self.reassembler.first_unassembled() + 1;
        let abs_seq_no = seg.seq_no.unwrap(isn, checkpoint);
        let Some(stream_idx) = (abs_seq_no + u64::from(seg.syn())).checked_sub(1) else {
            log::debug!("ignoring segment at the ISN without SYN: {seg}");
            return;
        };

        self.reassembler.push_substring(&seg.payload, stream_idx, seg.fin());

        // FIN takes one more seq number once the whole stream is in
        let fin_acked = u64::from(self.reassembler.empty());
        let next_abs = self.reassembler.first_unassembled() + 1 + fin_acked;
        self.ackno = Some(Wrap32::wrap(next_abs, isn));
    }

    /// The next seq number expected from the peer, or `None` before the SYN
    pub fn ackno(&self) -> Option<Wrap32> {
        self.ackno
    }

    /// How many more bytes the receiver can buffer past the ack number
    pub fn window_size(&self) -> usize {
        self.capacity - self.reassembler.stream_out().buffer_size()
    }

    pub fn unassembled_bytes(&self) -> usize {
        self.reassembler.unassembled_bytes()
    }

    pub fn isn(&self) -> Option<Wrap32> {
        self.isn
    }

    pub fn stream_out(&self) -> &ByteStream {
        self.reassembler.stream_out()
    }

    /// The assembled stream, for the application to read from
    pub fn stream_out_mut(&mut self) -> &mut ByteStream {
        self.reassembler.stream_out_mut()
    }

    pub fn state(&self) -> ReceiverState {
        if self.stream_out().error() {
            ReceiverState::Error
        } else if self.isn.is_none() {
            ReceiverState::Listen
        } else if self.stream_out().input_ended() {
            ReceiverState::FinRecv
        } else {
            ReceiverState::SynRecv
        }
    }
}
