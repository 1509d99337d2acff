use crate::tcp::byte_stream::ByteStream;
use std::collections::BTreeMap;
use std::io;
use std::io::Read;

/// Turns arbitrary, possibly overlapping byte ranges of a stream into the stream itself.
///
/// Fragments are accepted only inside the window `[first_unassembled, first_unassembled +
/// remaining_capacity)`; anything past it is dropped, so pending plus buffered bytes never
/// exceed the output capacity.
#[derive(Debug)]
pub struct Reassembler {
    pending: BTreeMap<u64, Vec<u8>>, // Out-of-order fragments. key = start index
    pending_bytes: usize,            // Sum of pending fragment lengths
    output: ByteStream,              // The assembled ByteStream, ready to be read
    next_idx: u64,                   // The next byte index expected to write
    end_idx: Option<u64>,            // One past the last byte index, if known
}

impl Reassembler {
    /// New `Reassembler` with the provided `ByteStream` as output
    pub fn new(output: ByteStream) -> Self {
        Reassembler {
            pending: BTreeMap::new(),
            pending_bytes: 0,
            output,
            next_idx: 0,
            end_idx: None,
        }
    }

    /// Accept `data` starting at stream index `index`. `eof` marks it as the final fragment.
    pub fn push_substring(&mut self, data: &[u8], index: u64, eof: bool) {
        let end = index.saturating_add(data.len() as u64);

        // The first end of stream sticks
        match self.end_idx {
            None if eof => {
                self.end_idx = Some(end);
                self.truncate_pending(end);
            }
            Some(known) if eof && known != end => {
                log::debug!("ignoring end of stream at {end}, already known at {known}");
            }
            _ => {}
        }

        // Clip to the bytes we can still accept
        let window_end = self.next_idx + self.output.remaining_capacity() as u64;
        let start = index.max(self.next_idx);
        let stop = end.min(window_end).min(self.end_idx.unwrap_or(u64::MAX));

        if start < stop {
            let offset = (start - index) as usize;
            let fragment = &data[offset..offset + (stop - start) as usize];
            self.insert_pending(start, fragment);
            self.write_output();
        } else if !data.is_empty() {
            log::trace!(
                "discarding fragment [{index}, {end}) outside window [{}, {window_end})",
                self.next_idx
            );
        }

        if self.empty() && !self.output.input_ended() {
            self.output.end_input();
        }

        debug_assert!(self.pending_bytes + self.output.buffer_size() <= self.output.capacity());
    }

    /// The total number of bytes pending reassembly
    pub fn unassembled_bytes(&self) -> usize {
        self.pending_bytes
    }

    /// The last fragment has arrived and everything up to it has been assembled
    pub fn empty(&self) -> bool {
        self.end_idx.is_some_and(|end| self.next_idx >= end)
    }

    /// Index of the next byte expected in the stream
    pub fn first_unassembled(&self) -> u64 {
        self.next_idx
    }

    pub fn stream_out(&self) -> &ByteStream {
        &self.output
    }

    pub fn stream_out_mut(&mut self) -> &mut ByteStream {
        &mut self.output
    }

    /// Insert a fragment, merging it with every stored fragment it overlaps or touches.
    ///
    /// Where bytes overlap, the fragment with the lower start index keeps its bytes; on
    /// equal starts the stored fragment wins.
    fn insert_pending(&mut self, start: u64, data: &[u8]) {
        let end = start + data.len() as u64;

        // Stored fragments never touch each other, so ends grow with starts
        let neighbors: Vec<u64> = self
            .pending
            .range(..=end)
            .rev()
            .take_while(|(seg_start, seg_data)| **seg_start + seg_data.len() as u64 >= start)
            .map(|(&seg_start, _)| seg_start)
            .collect();

        let mut pieces: Vec<(u64, Vec<u8>)> = Vec::with_capacity(neighbors.len() + 1);
        for seg_start in neighbors.into_iter().rev() {
            if let Some(seg_data) = self.pending.remove(&seg_start) {
                self.pending_bytes -= seg_data.len();
                pieces.push((seg_start, seg_data));
            }
        }
        let pos = pieces.partition_point(|(seg_start, _)| *seg_start <= start);
        pieces.insert(pos, (start, data.to_vec()));

        let mut pieces = pieces.into_iter();
        let Some((m_start, mut merged)) = pieces.next() else {
            return;
        };
        for (seg_start, seg_data) in pieces {
            let m_end = m_start + merged.len() as u64;
            let seg_end = seg_start + seg_data.len() as u64;
            if seg_end > m_end {
                // Keep only the suffix past what we already have
                merged.extend_from_slice(&seg_data[(m_end - seg_start) as usize..]);
            }
        }

        self.pending_bytes += merged.len();
        self.pending.insert(m_start, merged);
    }

    /// Drop pending bytes at or past `end`
    fn truncate_pending(&mut self, end: u64) {
        for (_, data) in self.pending.split_off(&end) {
            self.pending_bytes -= data.len();
        }
        if let Some((&start, data)) = self.pending.iter_mut().next_back() {
            let keep = (end.saturating_sub(start) as usize).min(data.len());
            self.pending_bytes -= data.len() - keep;
            data.truncate(keep);
        }
    }

    /// Write contiguous data from the pending set to the output `ByteStream`
    fn write_output(&mut self) {
        while let Some(data) = self.pending.remove(&self.next_idx) {
            self.pending_bytes -= data.len();
            let n = self.output.write(&data);
            debug_assert_eq!(n, data.len(), "fragment inside the window did not fit");
            self.next_idx += n as u64;
        }
    }
}

impl Read for Reassembler {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(&mut self.output, buf)
    }
}
