//! Per-source connection admission counting.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;

/// Counts connection attempts per source address.
///
/// Counts only grow: a source that crosses the threshold stays refused for
/// the life of the process. The threshold bounds the count recorded before
/// refusal starts, so a threshold of 4 admits five connections.
pub struct RateLimiter {
    max_per_source: u32,
    counts: Mutex<HashMap<IpAddr, u32>>,
}

impl RateLimiter {
    pub fn new(max_per_source: u32) -> Self {
        RateLimiter {
            max_per_source,
            counts: Mutex::new(HashMap::new()),
        }
    }

    /// Record one attempt from `source` and report whether it is admitted.
    ///
    /// Refused attempts are not counted, so the stored count tops out at
    /// `max_per_source + 1`.
    pub fn admit(&self, source: IpAddr) -> bool {
        let mut counts = self.counts.lock().unwrap();
        let count = counts.entry(source).or_insert(0);
        if *count > self.max_per_source {
            return false;
        }
        *count += 1;
        true
    }
}
