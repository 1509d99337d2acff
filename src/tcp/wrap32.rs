use std::fmt;
use std::ops::Add;

/// A 32-bit sequence number as carried on the wire. Arithmetic wraps modulo 2^32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Wrap32 {
    value: u32,
}

impl Wrap32 {
    const WRAP_SIZE: u64 = 1 << 32;
    const UPPER_MASK: u64 = !(Self::WRAP_SIZE - 1);

    pub fn new(value: u32) -> Self {
        Wrap32 { value }
    }

    /// The raw 32-bit value
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Wrap an absolute `seq_no` given an `initial seq_no`
    pub fn wrap(n: u64, isn: Wrap32) -> Self {
        isn + n as u32
    }

    /// Unwrap into the absolute `seq_no` closest to `checkpoint`.
    ///
    /// Every absolute value congruent to `self - isn` (mod 2^32) is a candidate; the
    /// one nearest the checkpoint wins. When two candidates are exactly equidistant
    /// the larger one is returned. Candidates below zero or above `u64::MAX` are never
    /// considered.
    pub fn unwrap(&self, isn: Wrap32, checkpoint: u64) -> u64 {
        let offset = u64::from(self.value.wrapping_sub(isn.value));

        // Candidate in the same 2^32 block as the checkpoint
        let candidate = (checkpoint & Self::UPPER_MASK) | offset;

        if candidate > checkpoint {
            match candidate.checked_sub(Self::WRAP_SIZE) {
                Some(lower) if checkpoint - lower < candidate - checkpoint => lower,
                _ => candidate,
            }
        } else {
            match candidate.checked_add(Self::WRAP_SIZE) {
                Some(upper) if upper - checkpoint <= checkpoint - candidate => upper,
                _ => candidate,
            }
        }
    }
}

impl Add<u32> for Wrap32 {
    type Output = Wrap32;

    fn add(self, other: u32) -> Wrap32 {
        Wrap32::new(self.value.wrapping_add(other))
    }
}

impl fmt::Display for Wrap32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

// -- Unit tests --
