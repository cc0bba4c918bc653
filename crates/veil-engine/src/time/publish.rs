use std::sync::atomic::{AtomicU64, Ordering};

/// Receiver for published logical time values (seconds).
///
/// Every mutation of a clock's `t` goes through a sink, so the publish step is
/// visible at the call site.
pub trait TimeSink {
    fn publish(&mut self, t: f64);
}

impl<F> TimeSink for F
where
    F: FnMut(f64),
{
    #[inline]
    fn publish(&mut self, t: f64) {
        self(t)
    }
}

/// Single-writer / multi-reader published time for multi-threaded hosts.
///
/// The value is stored as raw `f64` bits; writes use release ordering so a reader
/// on another thread that observes a value also observes everything the writer
/// did before publishing it. Publish into it with a closure sink:
/// `|t| shared.store(t)`.
#[derive(Debug, Default)]
pub struct SharedTime {
    bits: AtomicU64,
}

impl SharedTime {
    pub fn new(t: f64) -> Self {
        Self {
            bits: AtomicU64::new(t.to_bits()),
        }
    }

    #[inline]
    pub fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    #[inline]
    pub fn store(&self, t: f64) {
        self.bits.store(t.to_bits(), Ordering::Release);
    }
}
