use crate::tcp::byte_stream::ByteStream;
use crate::tcp::config::TcpConfig;
use crate::tcp::errors::TcpError;
use crate::tcp::flags::TcpFlags;
use crate::tcp::segment::TcpSegment;
use crate::tcp::state::SenderState;
use crate::tcp::timer::RetransmissionTimer;
use crate::tcp::wrap32::Wrap32;
use rand::Rng;
use std::collections::VecDeque;

/// A segment that has been sent but not fully acknowledged
#[derive(Debug)]
struct Outstanding {
    abs_seq_no: u64,
    segment: TcpSegment,
}

impl Outstanding {
    /// One past the last absolute seq number the segment occupies
    fn end(&self) -> u64 {
        self.abs_seq_no + self.segment.length_in_sequence_space() as u64
    }
}

/// The sender end of a connection.
///
/// Reads the outbound stream into segments that fit the peer's window, keeps every
/// unacknowledged segment around and retransmits the oldest one when the timer expires.
/// Segments to transmit are queued on `segments_out`; the connection layer drains the
/// queue and stamps each segment with the receiver's ack number and window.
#[derive(Debug)]
pub struct TcpSender {
    isn: Wrap32,
    segments_out: VecDeque<TcpSegment>,  // Waiting to be put on the wire
    outstanding: VecDeque<Outstanding>,  // Sent but un'acked segments, in seq order
    stream: ByteStream,                  // Stream of outgoing data
    initial_rto: u64,
    max_payload_size: usize,
    timer: RetransmissionTimer,
    next_seq_no: u64,                    // Absolute seq number of the next byte to send
    ack_no: u64,                         // Absolute seq number acknowledged so far
    window_size: u16,                    // Advertised window from receiver
    consecutive_retransmissions: u32,
    syn_sent: bool,
    fin_sent: bool,
}

impl TcpSender {
    /// New sender. The ISN comes from `config.fixed_isn`, or is drawn from `rng`.
    pub fn new<R: Rng>(config: &TcpConfig, rng: &mut R) -> Result<Self, TcpError> {
        config.validate()?;

        let isn = config.fixed_isn.unwrap_or_else(|| Wrap32::new(rng.gen()));
        let initial_rto = u64::from(config.rt_timeout);

        Ok(TcpSender {
            isn,
            segments_out: VecDeque::new(),
            outstanding: VecDeque::new(),
            stream: ByteStream::new(config.capacity),
            initial_rto,
            max_payload_size: config.max_payload_size,
            timer: RetransmissionTimer::new(initial_rto),
            next_seq_no: 0,
            ack_no: 0,
            window_size: 1,
            consecutive_retransmissions: 0,
            syn_sent: false,
            fin_sent: false,
        })
    }

    /// Send as many segments as the peer's window allows.
    ///
    /// A zero window is treated as a window of one so the sender keeps probing.
    pub fn fill_window(&mut self) {
        let window = u64::from(self.window_size.max(1));

        while !self.fin_sent && self.next_seq_no - self.ack_no < window {
            let free_window = window - (self.next_seq_no - self.ack_no);
            let mut seg = TcpSegment::new().seq_no(Wrap32::wrap(self.next_seq_no, self.isn));

            if !self.syn_sent {
                seg.flags |= TcpFlags::SYN;
                self.syn_sent = true;
            }

            let room = free_window - u64::from(seg.syn());
            let len = room
                .min(self.max_payload_size as u64)
                .min(self.stream.buffer_size() as u64);
            seg.payload = self.stream.read(len as usize);

            // FIN only goes out if it fits in the window
            if self.stream.eof() && (seg.length_in_sequence_space() as u64) < free_window {
                seg.flags |= TcpFlags::FIN;
                self.fin_sent = true;
            }

            if seg.length_in_sequence_space() == 0 {
                break;
            }

            self.send_segment(seg);

            if self.stream.buffer_empty() {
                break;
            }
        }
    }

    /// Process an ack from the peer's receiver
    pub fn ack_received(&mut self, ack_no: Wrap32, window_size: u16) {
        let abs_ack_no = ack_no.unwrap(self.isn, self.next_seq_no);
        if abs_ack_no > self.next_seq_no {
            log::debug!(
                "ignoring ack {ack_no} beyond next seq no {}",
                Wrap32::wrap(self.next_seq_no, self.isn)
            );
            return;
        }

        self.window_size = window_size;
        if abs_ack_no <= self.ack_no {
            return;
        }
        self.ack_no = abs_ack_no;

        // Outstanding segments are in seq order, so the fully acked ones are at the front
        while self
            .outstanding
            .front()
            .is_some_and(|seg| seg.end() <= abs_ack_no)
        {
            self.outstanding.pop_front();
        }

        self.fill_window();

        self.timer.reset_rto(self.initial_rto);
        if self.outstanding.is_empty() {
            self.timer.stop();
        } else {
            self.timer.start();
        }
        self.consecutive_retransmissions = 0;
    }

    /// Notify the sender that `ms_since_last_tick` milliseconds have passed
    pub fn tick(&mut self, ms_since_last_tick: u64) {
        self.timer.tick(ms_since_last_tick);
        if !self.timer.is_expired() {
            return;
        }

        let Some(oldest) = self.outstanding.front() else {
            self.timer.stop();
            return;
        };
        log::trace!("retransmitting {}", oldest.segment);
        self.segments_out.push_back(oldest.segment.clone());

        // A zero window means the peer is full, not that the network lost the segment
        if self.window_size > 0 {
            self.consecutive_retransmissions += 1;
            self.timer.double_rto();
        }
        self.timer.start();
    }

    /// Queue a segment that occupies no sequence space, e.g. for a bare ack
    pub fn send_empty_segment(&mut self) {
        let seg = TcpSegment::new().seq_no(Wrap32::wrap(self.next_seq_no, self.isn));
        self.segments_out.push_back(seg);
    }

    /// Seq numbers sent but not yet acknowledged. SYN and FIN count as one each.
    pub fn bytes_in_flight(&self) -> u64 {
        self.outstanding
            .iter()
            .map(|seg| {
                let end = seg.end();
                if end <= self.ack_no {
                    log::error!(
                        "outstanding segment [{}, {end}) is already acknowledged up to {}",
                        seg.abs_seq_no,
                        self.ack_no
                    );
                    debug_assert!(end > self.ack_no, "acked segment left outstanding");
                    return 0;
                }
                if seg.abs_seq_no < self.ack_no {
                    log::debug!(
                        "segment [{}, {end}) partially acknowledged up to {}",
                        seg.abs_seq_no,
                        self.ack_no
                    );
                }
                end - seg.abs_seq_no.max(self.ack_no)
            })
            .sum()
    }

    pub fn consecutive_retransmissions(&self) -> u32 {
        self.consecutive_retransmissions
    }

    /// Absolute seq number of the next byte to be sent
    pub fn next_seq_no_absolute(&self) -> u64 {
        self.next_seq_no
    }

    /// Wrapped seq number of the next byte to be sent
    pub fn next_seq_no(&self) -> Wrap32 {
        Wrap32::wrap(self.next_seq_no, self.isn)
    }

    pub fn isn(&self) -> Wrap32 {
        self.isn
    }

    /// The most recently advertised window
    pub fn window_size(&self) -> u16 {
        self.window_size
    }

    /// Segments queued for transmission, oldest first
    pub fn segments_out(&mut self) -> &mut VecDeque<TcpSegment> {
        &mut self.segments_out
    }

    pub fn stream_in(&self) -> &ByteStream {
        &self.stream
    }

    /// The outbound stream, for the application to write into
    pub fn stream_in_mut(&mut self) -> &mut ByteStream {
        &mut self.stream
    }

    pub fn state(&self) -> SenderState {
        if self.stream.error() {
            SenderState::Error
        } else if !self.syn_sent {
            SenderState::Closed
        } else if self.ack_no == 0 {
            SenderState::SynSent
        } else if !self.fin_sent {
            SenderState::SynAcked
        } else if self.ack_no < self.next_seq_no {
            SenderState::FinSent
        } else {
            SenderState::FinAcked
        }
    }

    fn send_segment(&mut self, seg: TcpSegment) {
        log::trace!("sending {seg}");
        let len = seg.length_in_sequence_space() as u64;

        self.segments_out.push_back(seg.clone());
        self.outstanding.push_back(Outstanding {
            abs_seq_no: self.next_seq_no,
            segment: seg,
        });
        self.next_seq_no += len;

        if !self.timer.is_running() {
            self.timer.start();
        }
    }
}
