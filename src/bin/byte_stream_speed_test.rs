use rand::RngCore;
use std::collections::VecDeque;
use std::time::Instant;
use tcp_transport::tcp::ByteStream;

fn speed_test(
    input_len: usize,
    capacity: usize,
    write_size: usize,
    read_size: usize,
) -> Result<f64, String> {
    // Generate random data
    let mut rng = rand::thread_rng();
    let mut data = vec![0u8; input_len];
    rng.fill_bytes(&mut data);

    // Split data into chunks
    let mut chunks: VecDeque<&[u8]> = data.chunks(write_size).collect();

    let mut stream = ByteStream::new(capacity);
    let mut output_buffer = Vec::with_capacity(input_len);

    let t0 = Instant::now();

    while !stream.eof() {
        match chunks.front() {
            None if !stream.input_ended() => stream.end_input(),
            Some(front) if front.len() <= stream.remaining_capacity() => {
                stream.write(front);
                chunks.pop_front();
            }
            _ => {}
        }

        if !stream.buffer_empty() {
            let to_read = read_size.min(stream.buffer_size());
            let peeked = stream.peek_output(to_read);
            if peeked.is_empty() {
                return Err("peek_output returned empty data".to_string());
            }
            output_buffer.extend_from_slice(&peeked);
            stream.pop_output(to_read);
        }
    }

    let duration = t0.elapsed();

    if data != output_buffer {
        return Err("Data written does not equal data read :(".to_string());
    }

    let bits_per_sec = input_len as f64 * 8.0 / duration.as_secs_f64();
    Ok(bits_per_sec / 1e9)
}

fn main() {
    let input_len = 1e7 as usize; // 10 MB
    let capacity = 32768; // 32 KB
    let write_size = 1500; // MTU 1500 bytes
    let read_size = 128;

    match speed_test(input_len, capacity, write_size, read_size) {
        Ok(gbps) => println!(
            "ByteStream with capacity={capacity}, write_size={write_size}, read_size={read_size} reached {gbps:.2} Gbit/s"
        ),
        Err(e) => {
            eprintln!("Speed test failed: {e}");
            std::process::exit(1);
        }
    }
}
