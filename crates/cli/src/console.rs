//! Line-oriented transport over stdin/stdout.
//!
//! Every input line is one inbound message to a fixed target. Notices are
//! written back in IRC wire form so the output can be piped into other tools.

use std::sync::Arc;

use {
    async_trait::async_trait,
    tokio::{
        io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader},
        sync::Mutex,
    },
    tokio_util::sync::CancellationToken,
    tracing::{debug, info},
};

use {
    linkherald_channels::{
        InboundMessage, Notice, NoticeSink, REPLY_TAG, Result, gating::should_handle,
    },
    linkherald_resolver::Dispatcher,
};

/// Writes each notice as one line to the wrapped writer.
pub struct ConsoleSink<W> {
    out: Mutex<W>,
}

impl<W> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> NoticeSink for ConsoleSink<W> {
    async fn send_notice(&self, notice: Notice) -> Result<()> {
        let line = format_notice(&notice);
        let mut out = self.out.lock().await;
        out.write_all(line.as_bytes()).await?;
        out.write_all(b"\r\n").await?;
        out.flush().await?;
        Ok(())
    }
}

/// `[@+draft/reply=<id> ]NOTICE <target> :<text>`
pub fn format_notice(notice: &Notice) -> String {
    match &notice.target.reply_to {
        Some(id) => format!(
            "@{REPLY_TAG}={id} NOTICE {} :{}",
            notice.target.target, notice.text
        ),
        None => format!("NOTICE {} :{}", notice.target.target, notice.text),
    }
}

/// Who console input comes from and where it is addressed.
#[derive(Debug, Clone)]
pub struct ConsoleSession {
    pub target: String,
    /// Account the input is attributed to, if any.
    pub sender: Option<String>,
    pub owner: Option<String>,
}

impl ConsoleSession {
    /// Turn one input line into an inbound message, or `None` when gating
    /// drops it.
    pub fn message(&self, seq: u64, line: &str) -> Option<InboundMessage> {
        let mut msg = InboundMessage::new(self.target.as_str(), line).with_msgid(seq.to_string());
        msg.sender_account = self.sender.clone();
        should_handle(&msg, self.owner.as_deref()).then_some(msg)
    }
}

/// Feed stdin lines to the dispatcher until EOF or cancellation.
pub async fn run(
    dispatcher: Arc<Dispatcher>,
    session: ConsoleSession,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut seq: u64 = 0;

    info!(channel = %session.target, "reading messages from stdin");
    loop {
        let line = tokio::select! {
            () = cancel.cancelled() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            debug!("stdin closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        seq += 1;
        let Some(msg) = session.message(seq, &line) else {
            debug!(channel = %session.target, "ignoring direct message from non-owner");
            continue;
        };
        let launched = dispatcher.handle(&msg);
        debug!(msgid = seq, launched, "dispatched message");
    }

    Ok(())
}
