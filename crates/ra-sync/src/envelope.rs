//! Envelope and JSON codec.

use serde::{Deserialize, Serialize};

use ra_core::Role;

use crate::{Message, MessageKind, SyncResult};

/// What actually travels: the message plus who sent it and when.
///
/// ```json
/// { "sender": "RESPONDER", "timestamp": 1700000000040,
///   "message": { "type": "DRIVER_POSITION", "data": { "pos": {…}, "angle": 245.6 } } }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub sender:    Role,
    /// Sender's clock at publish time, unix milliseconds.
    pub timestamp: i64,
    pub message:   Message,
}

impl Envelope {
    pub fn new(sender: Role, timestamp: i64, message: Message) -> Self {
        Self { sender, timestamp, message }
    }

    #[inline]
    pub fn kind(&self) -> MessageKind {
        self.message.kind()
    }

    pub fn to_json(&self) -> SyncResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(frame: &str) -> SyncResult<Self> {
        Ok(serde_json::from_str(frame)?)
    }
}
