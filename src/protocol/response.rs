//! Reply shapes keyed by the request that triggers them

use super::{DeviceProfile, MessageType};

/// What the device sends back for a given request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseSpec {
    /// Message type the reply is expected to carry
    pub reply: MessageType,
    /// Bytes at the start of the reply's data section that precede the 7-bit payload
    /// (program number echo, module/slot IDs). `None` for status-only replies.
    pub header_size: Option<usize>,
}

impl ResponseSpec {
    /// Reply carrying a data section
    #[must_use]
    pub const fn data(reply: MessageType, header_size: usize) -> Self {
        Self {
            reply,
            header_size: Some(header_size),
        }
    }

    /// Reply that only reports a status
    #[must_use]
    pub const fn status(reply: MessageType) -> Self {
        Self {
            reply,
            header_size: None,
        }
    }
}

/// Look up the reply shape for a sent message type
///
/// The expected reply type is advisory: it tells the caller what to log when the device answers
/// with something else, while `header_size` drives how the data section is split.
#[must_use]
pub fn lookup(profile: &DeviceProfile, sent: MessageType) -> Option<ResponseSpec> {
    profile
        .family()
        .response_table()
        .iter()
        .find(|(request, _)| *request == sent)
        .map(|(_, spec)| *spec)
}
