use std::collections::VecDeque;
use std::io;
use std::io::{Read, Write};

/// A bounded, in-order byte buffer with a writer on one end and a reader on the other.
///
/// Writes never block; anything that does not fit is dropped and the caller learns how much
/// was accepted. Back-pressure is the caller's job, usually through an advertised window.
#[derive(Debug)]
pub struct ByteStream {
    buffer: VecDeque<u8>,
    capacity: usize,
    bytes_written: usize,
    bytes_read: usize,
    input_ended: bool,
    error: bool,
}

impl ByteStream {
    pub fn new(capacity: usize) -> Self {
        ByteStream {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            bytes_written: 0,
            bytes_read: 0,
            input_ended: false,
            error: false,
        }
    }

    /// Push up to `remaining_capacity()` bytes into the stream. Returns how many were accepted.
    pub fn write(&mut self, data: &[u8]) -> usize {
        if self.input_ended {
            log::debug!("dropping {} bytes written after end of input", data.len());
            return 0;
        }
        let to_write = data.len().min(self.remaining_capacity());
        self.buffer.extend(&data[..to_write]);
        self.bytes_written += to_write;
        to_write
    }

    /// Peek at up to `amount` bytes without consuming them
    pub fn peek_output(&self, amount: usize) -> Vec<u8> {
        let to_read = amount.min(self.buffer.len());
        self.buffer.iter().take(to_read).copied().collect()
    }

    /// Remove `amount` bytes from the front of the buffer.
    ///
    /// Callers must not pop more than `buffer_size()`; in release builds the excess is ignored.
    pub fn pop_output(&mut self, amount: usize) {
        debug_assert!(
            amount <= self.buffer.len(),
            "pop of {amount} bytes with only {} buffered",
            self.buffer.len()
        );
        let to_pop = amount.min(self.buffer.len());
        self.buffer.drain(..to_pop);
        self.bytes_read += to_pop;
    }

    /// Consume up to `amount` bytes from the stream
    pub fn read(&mut self, amount: usize) -> Vec<u8> {
        let to_read = amount.min(self.buffer.len());
        let data = self.peek_output(to_read);
        self.pop_output(to_read);
        data
    }

    /// Signal that no more bytes will be written. Idempotent.
    pub fn end_input(&mut self) {
        self.input_ended = true;
    }

    pub fn input_ended(&self) -> bool {
        self.input_ended
    }

    /// Flag the stream as broken, e.g. after a reset. Sticky.
    pub fn set_error(&mut self) {
        self.error = true;
    }

    pub fn error(&self) -> bool {
        self.error
    }

    /// The number of bytes still available in the buffer (not consumed yet)
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    pub fn buffer_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Input has ended and every byte has been read out
    pub fn eof(&self) -> bool {
        self.input_ended && self.buffer.is_empty()
    }

    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    /// The remaining capacity in the underlying buffer
    pub fn remaining_capacity(&self) -> usize {
        self.capacity - self.buffer.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Read for ByteStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let to_read = buf.len().min(self.buffer.len());
        for (dst, src) in buf.iter_mut().zip(self.buffer.drain(..to_read)) {
            *dst = src;
        }
        self.bytes_read += to_read;
        Ok(to_read)
    }
}

impl Write for ByteStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(ByteStream::write(self, buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
