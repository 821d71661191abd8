//! Chat transport boundary.
//!
//! The resolver never talks to a chat protocol directly. Transports hand it
//! [`InboundMessage`]s and receive [`Notice`]s back through a [`NoticeSink`].

pub mod error;
pub mod gating;
pub mod notice;
pub mod sanitize;

pub use {
    error::{Error, Result},
    notice::{InboundMessage, Notice, NoticeSink, REPLY_TAG, ReplyTarget},
    sanitize::sanitize_text,
};
