use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const NANOSECONDS_PER_MICROSECOND: u128 = 1_000;

/// Counters shared between a session and its listener thread.
#[derive(Debug, Default)]
pub(crate) struct Metrics {
    frames_sent: AtomicU64,
    frames_received: AtomicU64,
    channel_messages_sent: AtomicU64,
    dropped_messages: AtomicU64,
    timeouts: AtomicU64,
    stale_replies: AtomicU64,
    exchanges: AtomicU64,
    exchange_latency_total_ns: AtomicU64,
    exchange_latency_max_ns: AtomicU64,
}

impl Metrics {
    #[inline]
    pub(crate) fn record_frame_sent(&self) {
        self.frames_sent.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_frame_received(&self) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_channel_message(&self) {
        self.channel_messages_sent.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_dropped(&self) {
        self.dropped_messages.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_stale_reply(&self) {
        self.stale_replies.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_exchange(&self, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.exchanges.fetch_add(1, Ordering::Relaxed);
        self.exchange_latency_total_ns.fetch_add(nanos, Ordering::Relaxed);
        update_max(&self.exchange_latency_max_ns, nanos);
    }

    pub(crate) fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            frames_received: self.frames_received.load(Ordering::Relaxed),
            channel_messages_sent: self.channel_messages_sent.load(Ordering::Relaxed),
            dropped_messages: self.dropped_messages.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            stale_replies: self.stale_replies.load(Ordering::Relaxed),
            exchanges: self.exchanges.load(Ordering::Relaxed),
            exchange_latency_total_ns: self.exchange_latency_total_ns.load(Ordering::Relaxed),
            exchange_latency_max_ns: self.exchange_latency_max_ns.load(Ordering::Relaxed),
        }
    }
}

fn update_max(target: &AtomicU64, candidate: u64) {
    let mut current = target.load(Ordering::Relaxed);
    while candidate > current {
        match target.compare_exchange_weak(
            current,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return,
            Err(old) => current = old,
        }
    }
}

/// Point-in-time copy of a session's counters.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// SysEx requests written to the output
    pub frames_sent: u64,
    /// Inbound SysEx frames accepted by the listener
    pub frames_received: u64,
    /// Channel voice messages written to the output
    pub channel_messages_sent: u64,
    /// Inbound non-SysEx messages discarded by the listener
    pub dropped_messages: u64,
    /// Exchanges that gave up waiting
    pub timeouts: u64,
    /// Frames found waiting before a request and discarded
    pub stale_replies: u64,
    /// Exchanges that got a reply before the deadline
    pub exchanges: u64,
    /// Sum of completed exchange round trips
    pub exchange_latency_total_ns: u64,
    /// Slowest completed exchange round trip
    pub exchange_latency_max_ns: u64,
}

impl MetricsSnapshot {
    /// Average exchange round trip in microseconds.
    #[must_use]
    pub fn avg_exchange_latency_us(&self) -> Option<u64> {
        if self.exchanges == 0 {
            return None;
        }

        let average = u128::from(self.exchange_latency_total_ns)
            / (u128::from(self.exchanges) * NANOSECONDS_PER_MICROSECOND);
        Some(u64::try_from(average).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts() {
        let metrics = Metrics::default();
        metrics.record_frame_sent();
        metrics.record_frame_sent();
        metrics.record_frame_received();
        metrics.record_dropped();
        metrics.record_timeout();
        metrics.record_stale_reply();
        metrics.record_exchange(Duration::from_micros(300));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.frames_sent, 2);
        assert_eq!(snapshot.frames_received, 1);
        assert_eq!(snapshot.dropped_messages, 1);
        assert_eq!(snapshot.stale_replies, 1);
        assert_eq!(snapshot.exchanges, 1);
        assert_eq!(snapshot.avg_exchange_latency_us(), Some(300));
    }

    #[test]
    fn test_latency_max() {
        let metrics = Metrics::default();
        metrics.record_exchange(Duration::from_micros(50));
        metrics.record_exchange(Duration::from_micros(900));
        metrics.record_exchange(Duration::from_micros(200));

        assert_eq!(metrics.snapshot().exchange_latency_max_ns, 900_000);
    }

    #[test]
    fn test_no_average_without_exchanges() {
        assert_eq!(MetricsSnapshot::default().avg_exchange_latency_us(), None);
    }
}
