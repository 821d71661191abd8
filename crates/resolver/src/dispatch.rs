use std::{any::Any, panic::AssertUnwindSafe, sync::Arc, time::Instant};

use {
    futures::FutureExt,
    tracing::{debug, error, warn},
};

use linkherald_channels::{InboundMessage, Notice, NoticeSink, ReplyTarget};

use crate::{
    AdmissionController, Result, ResolverConfig,
    classify::{LinkKind, classify},
    fetch::build_client,
    generic::GenericResolver,
    panic_trace,
    scan::find_urls,
    social::SocialResolver,
};

/// How one link's pipeline ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A notice was delivered to the sink.
    Emitted,
    /// Resolution worked but there was nothing to show.
    NoResult,
    /// The admission gate was full.
    Rejected,
    /// A network, protocol, decode or delivery error ended the pipeline.
    Failed,
    /// The pipeline panicked and was recovered.
    Panicked,
}

/// Turns inbound messages into notices, one detached task per link.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    admission: AdmissionController,
    generic: GenericResolver,
    social: SocialResolver,
    sink: Arc<dyn NoticeSink>,
    max_urls_per_message: usize,
}

impl Dispatcher {
    pub fn new(config: &ResolverConfig, sink: Arc<dyn NoticeSink>) -> Result<Self> {
        config.validate()?;
        panic_trace::install_hook();
        let client = build_client(config)?;
        Ok(Self {
            inner: Arc::new(DispatcherInner {
                admission: AdmissionController::new(config.concurrency_limit),
                generic: GenericResolver::new(client.clone(), config),
                social: SocialResolver::new(client, config),
                sink,
                max_urls_per_message: config.max_urls_per_message,
            }),
        })
    }

    pub fn admission(&self) -> &AdmissionController {
        &self.inner.admission
    }

    /// Launch a pipeline for each link in `msg` and return without waiting.
    ///
    /// Only the first `max_urls_per_message` links are considered. Returns
    /// the number of pipelines launched. Must be called from within a
    /// tokio runtime.
    pub fn handle(&self, msg: &InboundMessage) -> usize {
        let reply = msg.reply_target();
        let mut launched = 0;
        for url in find_urls(&msg.text)
            .into_iter()
            .take(self.inner.max_urls_per_message)
        {
            let this = self.clone();
            let reply = reply.clone();
            tokio::spawn(async move {
                this.process(reply, url).await;
            });
            launched += 1;
        }
        launched
    }

    /// Run one link's pipeline to completion in the current task.
    ///
    /// Never panics and never returns an error: every failure is logged and
    /// reported through the [`Outcome`].
    pub async fn process(&self, reply: ReplyTarget, url: String) -> Outcome {
        let Some(_permit) = self.inner.admission.try_acquire() else {
            warn!(url = %url, "concurrency limit exceeded, not resolving link");
            return Outcome::Rejected;
        };

        let start = Instant::now();
        let outcome = match AssertUnwindSafe(self.resolve_and_emit(reply, &url))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(panic) => {
                let trace = panic_trace::take_last();
                let location = trace
                    .as_ref()
                    .and_then(|t| t.location.clone())
                    .unwrap_or_else(|| "unknown".into());
                let backtrace = trace.map(|t| t.backtrace.to_string()).unwrap_or_default();
                error!(
                    url = %url,
                    panic = panic_message(panic.as_ref()),
                    location = %location,
                    "caught panic while resolving link\n{backtrace}"
                );
                Outcome::Panicked
            },
        };
        debug!(url = %url, elapsed = ?start.elapsed(), ?outcome, "link pipeline finished");
        outcome
    }

    async fn resolve_and_emit(&self, reply: ReplyTarget, url: &str) -> Outcome {
        let resolved = match classify(url) {
            LinkKind::Social(post) => {
                debug!(url, platform = %post.platform, handle = %post.handle, "resolving social post");
                self.inner.social.resolve(&post).await.map(Some)
            },
            LinkKind::Generic => self.inner.generic.resolve(url).await,
        };

        let text = match resolved {
            Ok(Some(text)) => text,
            Ok(None) => return Outcome::NoResult,
            Err(e) => {
                warn!(url, error = %e, "failed to resolve link");
                return Outcome::Failed;
            },
        };

        match self
            .inner
            .sink
            .send_notice(Notice {
                target: reply,
                text,
            })
            .await
        {
            Ok(()) => Outcome::Emitted,
            Err(e) => {
                warn!(url, error = %e, "failed to deliver notice");
                Outcome::Failed
            },
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
