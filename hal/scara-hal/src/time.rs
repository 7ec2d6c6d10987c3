//! Monotonic time source
//!
//! Step pacing is expressed as a minimum interval against this clock rather
//! than a blocking delay, so control loops stay cooperative.

/// Monotonic microsecond clock
///
/// The value must never decrease. Its epoch is arbitrary.
pub trait Monotonic {
    /// Microseconds since an arbitrary fixed epoch
    fn now_us(&self) -> u64;

    /// Microseconds elapsed since `since_us`, saturating at zero
    fn elapsed_us(&self, since_us: u64) -> u64 {
        self.now_us().saturating_sub(since_us)
    }
}

impl<T: Monotonic + ?Sized> Monotonic for &T {
    fn now_us(&self) -> u64 {
        T::now_us(self)
    }
}
