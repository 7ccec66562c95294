//! timeout guard
//! 
//! saturating counter that bounds how long an access may wait for the
//! register side to acknowledge

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeoutGuard {
    count: u32,
    threshold: u32,
}

impl TimeoutGuard {

    pub fn new_with(threshold: u32) -> Self {
        debug_assert!(threshold > 0);
        Self { count: 0, threshold }
    }

    /// count one more tick of an outstanding access.
    /// returns true once the threshold is reached
    pub fn step(&mut self) -> bool {
        self.count = self.count.saturating_add(1).min(self.threshold);
        self.expired()
    }

    pub fn expired(&self) -> bool {
        self.count >= self.threshold
    }

    /// cleared whenever a transaction leaves the access phase
    pub fn clear(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}
