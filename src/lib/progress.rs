//! Progress logging at regular record intervals.

use log::info;

use crate::logging::format_count;

/// Logs a progress line every `interval` records, naming the last genomic position seen.
///
/// # Example
/// ```
/// use mecluster_lib::progress::ProgressTracker;
///
/// let mut tracker = ProgressTracker::new("Read anchors").with_interval(100);
/// for pos in 1..=250 {
///     tracker.record(Some(("chr1", pos))); // logs at 100 and 200
/// }
/// tracker.log_final(); // logs "Read anchors 250 (complete)"
/// assert_eq!(tracker.count(), 250);
/// ```
#[derive(Debug)]
pub struct ProgressTracker {
    interval: u64,
    message: String,
    count: u64,
}

impl ProgressTracker {
    /// Creates a tracker with an interval of 1,000,000 records.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: 1_000_000, message: message.into(), count: 0 }
    }

    /// Sets the logging interval. An interval of zero is treated as one.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Counts one record and logs if an interval boundary was reached.
    ///
    /// Returns `true` if a progress line was logged.
    pub fn record(&mut self, position: Option<(&str, usize)>) -> bool {
        self.count += 1;
        if !self.count.is_multiple_of(self.interval) {
            return false;
        }

        match position {
            Some((reference, pos)) => {
                info!("{} {}, last at {reference}:{pos}", self.message, format_count(self.count));
            }
            None => info!("{} {}", self.message, format_count(self.count)),
        }
        true
    }

    /// Records counted so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Logs the final count unless the last record already triggered a progress line.
    pub fn log_final(&self) {
        if self.count > 0 && !self.count.is_multiple_of(self.interval) {
            info!("{} {} (complete)", self.message, format_count(self.count));
        }
    }
}
