use {
    async_trait::async_trait,
    serde::{Deserialize, Serialize},
};

use crate::Result;

/// Message tag carrying the id of the message a notice replies to.
pub const REPLY_TAG: &str = "+draft/reply";

/// A chat message delivered by the transport.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Channel name or nickname the message was addressed to.
    pub target: String,
    /// Raw message body.
    pub text: String,
    /// Server-assigned message id, when the transport supports one.
    pub msgid: Option<String>,
    /// Authenticated account of the sender, if known.
    pub sender_account: Option<String>,
}

impl InboundMessage {
    #[must_use]
    pub fn new(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_msgid(mut self, msgid: impl Into<String>) -> Self {
        self.msgid = Some(msgid.into());
        self
    }

    /// Where replies to this message should go.
    #[must_use]
    pub fn reply_target(&self) -> ReplyTarget {
        ReplyTarget {
            target: self.target.clone(),
            reply_to: self.msgid.clone().filter(|id| !id.is_empty()),
        }
    }
}

/// Where to send a notice back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyTarget {
    pub target: String,
    /// Message id to associate the notice with (sent as [`REPLY_TAG`]).
    pub reply_to: Option<String>,
}

/// A single line of bot output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub target: ReplyTarget,
    pub text: String,
}

/// Outbound half of a chat transport.
#[async_trait]
pub trait NoticeSink: Send + Sync {
    /// Deliver one notice. `notice.text` is already sanitized.
    async fn send_notice(&self, notice: Notice) -> Result<()>;
}
