//! Retransmission timer for the sender.
//!
//! The timer only measures time it is told about through [`RetransmissionTimer::tick`];
//! it never reads a clock. The timeout (RTO) doubles on each consecutive expiry the
//! sender chooses to back off from, and drops back to its initial value once new data
//! is acknowledged.

#[derive(Debug)]
pub struct RetransmissionTimer {
    running: bool,
    elapsed_ms: u64, // Reset to zero whenever the timer (re)starts
    rto_ms: u64,
}

impl RetransmissionTimer {
    pub fn new(initial_rto_ms: u64) -> Self {
        RetransmissionTimer {
            running: false,
            elapsed_ms: 0,
            rto_ms: initial_rto_ms,
        }
    }

    /// Start (or restart) counting from zero with the current RTO
    pub fn start(&mut self) {
        self.running = true;
        self.elapsed_ms = 0;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance the timer. A stopped timer ignores the passage of time.
    pub fn tick(&mut self, ms: u64) {
        if self.running {
            self.elapsed_ms = self.elapsed_ms.saturating_add(ms);
        }
    }

    pub fn is_expired(&self) -> bool {
        self.running && self.elapsed_ms >= self.rto_ms
    }

    /// Exponential backoff
    pub fn double_rto(&mut self) {
        self.rto_ms = self.rto_ms.saturating_mul(2);
    }

    pub fn reset_rto(&mut self, initial_rto_ms: u64) {
        self.rto_ms = initial_rto_ms;
    }

    pub fn rto(&self) -> u64 {
        self.rto_ms
    }
}
