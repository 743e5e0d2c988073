//! # Logging Utilities
//!
//! Rate limiting for noisy warnings (bus retries on a flaky two-wire link)
//! and register dump helpers for protocol debugging.
//!
//! ## Usage
//!
//! ```rust
//! use si4703_rs::util::logging::LogThrottle;
//!
//! let mut throttle = LogThrottle::new(1000, 5); // 5 messages per second
//! if throttle.allow() {
//!     log::warn!("I2C write not acknowledged");
//! }
//! ```

use std::time::Instant;

/// Throttling structure for rate-limiting log messages
#[derive(Debug)]
pub struct LogThrottle {
    /// Time window for throttling (in milliseconds)
    window_ms: u64,
    /// Maximum messages allowed per window
    cap: u32,
    /// Current message count in window
    count: u32,
    /// Messages dropped since the throttle was created
    suppressed: u64,
    /// Start time of current window
    t0: Instant,
}

impl LogThrottle {
    /// Create new throttle with time window and message cap
    ///
    /// # Arguments
    /// * `window_ms` - Time window in milliseconds
    /// * `cap` - Maximum messages allowed per window
    pub fn new(window_ms: u64, cap: u32) -> Self {
        Self {
            window_ms,
            cap,
            count: 0,
            suppressed: 0,
            t0: Instant::now(),
        }
    }

    /// Check if logging is allowed (resets counter after window expires)
    ///
    /// Returns `true` if the message should be logged, `false` if it
    /// should be throttled.
    pub fn allow(&mut self) -> bool {
        let now = Instant::now();
        let elapsed_ms = now.duration_since(self.t0).as_millis() as u64;

        if elapsed_ms > self.window_ms {
            self.t0 = now;
            self.count = 0;
        }

        self.count += 1;
        let allowed = self.count <= self.cap;
        if !allowed {
            self.suppressed += 1;
        }
        allowed
    }

    /// Messages dropped so far
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }

    /// Reset the throttle (start new window immediately)
    pub fn reset(&mut self) {
        self.t0 = Instant::now();
        self.count = 0;
    }
}

/// Log the register file at debug level, one word per register in address order
pub fn log_registers(prefix: &str, words: &[u16]) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    let dump = words
        .iter()
        .enumerate()
        .map(|(addr, w)| format!("{addr:02X}:{}", hex::encode_upper(w.to_be_bytes())))
        .collect::<Vec<_>>()
        .join(" ");
    log::debug!("{prefix}: {dump}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttle_caps_messages() {
        let mut throttle = LogThrottle::new(60_000, 3);
        assert!(throttle.allow());
        assert!(throttle.allow());
        assert!(throttle.allow());
        assert!(!throttle.allow());
        assert!(!throttle.allow());
        assert_eq!(throttle.suppressed(), 2);
    }

    #[test]
    fn test_throttle_reset() {
        let mut throttle = LogThrottle::new(60_000, 1);
        assert!(throttle.allow());
        assert!(!throttle.allow());
        throttle.reset();
        assert!(throttle.allow());
    }
}
