use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use tcp_transport::tcp::{ReceiverState, SenderState, TcpConfig, TcpReceiver, TcpSegment, TcpSender};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Drops, duplicates and reorders everything put through it
struct Channel {
    rng: StdRng,
    loss: f64,
    dup: f64,
    in_flight: Vec<TcpSegment>,
}

impl Channel {
    fn new(seed: u64, loss: f64, dup: f64) -> Self {
        Channel {
            rng: StdRng::seed_from_u64(seed),
            loss,
            dup,
            in_flight: vec![],
        }
    }

    fn send(&mut self, seg: TcpSegment) {
        if self.rng.gen_bool(self.loss) {
            return;
        }
        if self.rng.gen_bool(self.dup) {
            self.in_flight.push(seg.clone());
        }
        self.in_flight.push(seg);
    }

    fn deliver(&mut self) -> Vec<TcpSegment> {
        let mut segs = std::mem::take(&mut self.in_flight);
        segs.shuffle(&mut self.rng);
        segs
    }
}

struct Outcome {
    received: Vec<u8>,
    sender_state: SenderState,
    receiver_state: ReceiverState,
}

fn transfer(data: &[u8], loss: f64, dup: f64, seed: u64) -> Outcome {
    init_logger();

    let config = TcpConfig::default().capacity(4000).rt_timeout(100);
    let mut sender = TcpSender::new(&config, &mut StdRng::seed_from_u64(seed)).unwrap();
    let mut receiver = TcpReceiver::new(4000);
    let mut channel = Channel::new(seed + 1, loss, dup);

    let mut written = 0;
    let mut received = Vec::with_capacity(data.len());

    for _ in 0..200_000 {
        if !sender.stream_in().input_ended() {
            written += sender.stream_in_mut().write(&data[written..]);
            if written == data.len() {
                sender.stream_in_mut().end_input();
            }
        }

        sender.fill_window();
        while let Some(seg) = sender.segments_out().pop_front() {
            channel.send(seg);
        }

        for seg in channel.deliver() {
            receiver.segment_received(&seg);
            if let Some(ackno) = receiver.ackno() {
                let window = receiver.window_size().min(u16::MAX as usize) as u16;
                sender.ack_received(ackno, window);
            }
        }

        let out = receiver.stream_out_mut();
        let n = out.buffer_size();
        received.extend(out.read(n));

        if receiver.stream_out().eof() && sender.state() == SenderState::FinAcked {
            break;
        }
        sender.tick(10);
    }

    Outcome {
        received,
        sender_state: sender.state(),
        receiver_state: receiver.state(),
    }
}

fn random_payload(len: usize, seed: u64) -> Vec<u8> {
    let mut data = vec![0u8; len];
    StdRng::seed_from_u64(seed).fill_bytes(&mut data);
    data
}

#[test]
fn test_clean_channel() {
    let data = random_payload(50_000, 1);
    let outcome = transfer(&data, 0.0, 0.0, 1);

    assert_eq!(outcome.received, data);
    assert_eq!(outcome.sender_state, SenderState::FinAcked);
    assert_eq!(outcome.receiver_state, ReceiverState::FinRecv);
}

#[test]
fn test_lossy_reordering_channel() {
    for seed in 0..5 {
        let data = random_payload(30_000, seed);
        let outcome = transfer(&data, 0.1, 0.05, seed);

        assert_eq!(outcome.received.len(), data.len(), "seed {seed}");
        assert_eq!(outcome.received, data, "seed {seed}");
        assert_eq!(outcome.sender_state, SenderState::FinAcked);
        assert_eq!(outcome.receiver_state, ReceiverState::FinRecv);
    }
}

#[test]
fn test_empty_stream() {
    let outcome = transfer(&[], 0.2, 0.0, 99);

    assert!(outcome.received.is_empty());
    assert_eq!(outcome.sender_state, SenderState::FinAcked);
    assert_eq!(outcome.receiver_state, ReceiverState::FinRecv);
}
