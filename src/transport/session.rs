//! Request/reply session over a pair of MIDI ports
//!
//! The output side is a [`FrameSink`]. The input side is a channel of raw inbound messages fed
//! by the port driver; a listener thread filters it down to SysEx frames and hands them over
//! through a single-slot reply channel.

use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, select};
use tracing::{debug, instrument, trace, warn};

use super::metrics::{Metrics, MetricsSnapshot};
use crate::protocol::{Error, Result, START};

/// Outbound half of a MIDI connection.
pub trait FrameSink {
    /// Write one complete message (SysEx frame or channel message).
    fn send(&mut self, message: &[u8]) -> Result<()>;
}

impl FrameSink for Sender<Vec<u8>> {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        Sender::send(self, message.to_vec())
            .map_err(|_| Error::Port("output receiver disconnected".to_string()))
    }
}

/// Session configuration options.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Name of the listener thread.
    pub thread_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            thread_name: "logue-sysex-listener".to_string(),
        }
    }
}

/// One device conversation: at most one request in flight.
///
/// Dropping the session stops and joins the listener thread.
pub struct Session {
    sink: Option<Box<dyn FrameSink>>,
    replies: Receiver<Vec<u8>>,
    shutdown: Option<Sender<()>>,
    listener: Option<JoinHandle<()>>,
    metrics: Arc<Metrics>,
}

impl Session {
    /// Start the listener on `inbound` and take ownership of the output.
    ///
    /// A session without an output can still be opened; every exchange on it fails with
    /// [`Error::NoOutput`].
    #[instrument(
        level = "debug",
        skip_all,
        fields(thread = %config.thread_name, output = sink.is_some())
    )]
    pub fn open(
        sink: Option<Box<dyn FrameSink>>,
        inbound: Receiver<Vec<u8>>,
        config: SessionConfig,
    ) -> Result<Self> {
        let (reply_tx, replies) = channel::bounded(1);
        let (shutdown_tx, shutdown_rx) = channel::bounded::<()>(0);
        let metrics = Arc::new(Metrics::default());

        let listener_metrics = Arc::clone(&metrics);
        let listener = thread::Builder::new()
            .name(config.thread_name)
            .spawn(move || listen(&inbound, &reply_tx, &shutdown_rx, &listener_metrics))
            .map_err(|err| Error::Port(format!("failed to spawn listener: {err}")))?;

        debug!("session open");

        Ok(Self {
            sink,
            replies,
            shutdown: Some(shutdown_tx),
            listener: Some(listener),
            metrics,
        })
    }

    /// Send `request` and wait up to `timeout` for the next inbound SysEx frame.
    ///
    /// Frames are not matched to requests; whatever SysEx arrives first after the request is
    /// sent is the reply. Frames already waiting (late replies to a timed-out exchange) are
    /// discarded first.
    #[instrument(level = "debug", skip(self, request), fields(len = request.len()))]
    pub fn exchange(&mut self, request: &[u8], timeout: Duration) -> Result<Vec<u8>> {
        let sink = self.sink.as_mut().ok_or(Error::NoOutput)?;

        for stale in self.replies.try_iter() {
            self.metrics.record_stale_reply();
            debug!(len = stale.len(), "discarding stale reply");
            trace!("stale {:02x?}", stale);
        }

        trace!("sending {:02x?}", request);
        let started = Instant::now();
        sink.send(request)?;
        self.metrics.record_frame_sent();

        match self.replies.recv_timeout(timeout) {
            Ok(reply) => {
                self.metrics.record_exchange(started.elapsed());
                trace!("received {:02x?}", reply);
                Ok(reply)
            }
            Err(RecvTimeoutError::Timeout) => {
                self.metrics.record_timeout();
                debug!(?timeout, "no reply");
                Err(Error::Timeout { waited: timeout })
            }
            Err(RecvTimeoutError::Disconnected) => Err(Error::ListenerClosed),
        }
    }

    /// Send a message that expects no reply.
    #[instrument(level = "trace", skip(self, message))]
    pub fn send(&mut self, message: &[u8]) -> Result<()> {
        let sink = self.sink.as_mut().ok_or(Error::NoOutput)?;
        trace!("sending {:02x?}", message);
        sink.send(message)?;
        self.metrics.record_channel_message();
        Ok(())
    }

    /// Check whether an output is attached.
    #[must_use]
    pub fn has_output(&self) -> bool {
        self.sink.is_some()
    }

    /// Check whether the listener thread is still running.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listener.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Snapshot of this session's counters.
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("has_output", &self.has_output())
            .field("listening", &self.is_listening())
            .finish_non_exhaustive()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Disconnecting the shutdown channel wakes the listener
        self.shutdown.take();
        if let Some(handle) = self.listener.take() {
            if handle.join().is_err() {
                warn!("listener thread panicked");
            }
        }
        debug!("session closed");
    }
}

fn listen(
    inbound: &Receiver<Vec<u8>>,
    replies: &Sender<Vec<u8>>,
    shutdown: &Receiver<()>,
    metrics: &Metrics,
) {
    loop {
        let message = select! {
            recv(shutdown) -> _ => None,
            recv(inbound) -> message => message.ok(),
        };
        let Some(message) = message else {
            break;
        };

        if message.first() != Some(&START) {
            trace!(len = message.len(), "dropping non-SysEx message");
            metrics.record_dropped();
            continue;
        }

        metrics.record_frame_received();
        let delivered = select! {
            send(replies, message) -> sent => sent.is_ok(),
            recv(shutdown) -> _ => false,
        };
        if !delivered {
            break;
        }
    }

    debug!("listener stopped");
}
