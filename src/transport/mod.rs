//! Device I/O: the request/reply session and its port adapters

mod metrics;
#[cfg(feature = "midir")]
pub mod midir;
mod session;

pub use metrics::MetricsSnapshot;
pub use session::{FrameSink, Session, SessionConfig};
