mod console;

use std::{sync::Arc, time::Duration};

use {
    clap::Parser,
    linkherald_resolver::{Dispatcher, ResolverConfig},
    secrecy::Secret,
    tokio_util::sync::CancellationToken,
    tracing::{info, warn},
    tracing_subscriber::{
        EnvFilter, fmt, fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt,
    },
};

#[derive(Parser)]
#[command(name = "linkherald", about = "Answers links posted in chat with their titles")]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,

    /// Channel that console input is addressed to.
    #[arg(long, env = "LINKHERALD_TARGET", default_value = "#console")]
    target: String,

    /// Account allowed to use the bot in direct messages.
    #[arg(long, env = "LINKHERALD_OWNER_ACCOUNT")]
    owner: Option<String>,

    /// Account that console input is attributed to.
    #[arg(long, env = "LINKHERALD_SENDER_ACCOUNT")]
    sender: Option<String>,

    /// User-Agent header for page fetches.
    #[arg(long, env = "LINKHERALD_USER_AGENT")]
    user_agent: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "LINKHERALD_TIMEOUT_SECONDS")]
    timeout_seconds: Option<u64>,

    /// Maximum links resolved per message.
    #[arg(long, env = "LINKHERALD_MAX_URLS_PER_MESSAGE")]
    max_urls_per_message: Option<usize>,

    /// Maximum links resolved concurrently.
    #[arg(long, env = "LINKHERALD_CONCURRENCY_LIMIT")]
    concurrency_limit: Option<usize>,

    /// Bluesky XRPC API base URL.
    #[arg(long, env = "LINKHERALD_BLUESKY_API_BASE")]
    bluesky_api_base: Option<String>,

    /// Twitter API v2 base URL.
    #[arg(long, env = "LINKHERALD_TWITTER_API_BASE")]
    twitter_api_base: Option<String>,

    /// Twitter API v2 bearer token (tweets are skipped without one).
    #[arg(long, env = "LINKHERALD_TWITTER_BEARER_TOKEN", hide_env_values = true)]
    twitter_bearer_token: Option<String>,
}

impl Cli {
    /// Layer CLI/env overrides on top of the defaults.
    fn resolver_config(&self) -> ResolverConfig {
        let mut config = ResolverConfig::default();
        if let Some(ref ua) = self.user_agent {
            config.user_agent = ua.clone();
        }
        if let Some(secs) = self.timeout_seconds {
            config.timeout_seconds = secs;
        }
        if let Some(n) = self.max_urls_per_message {
            config.max_urls_per_message = n;
        }
        if let Some(n) = self.concurrency_limit {
            config.concurrency_limit = n;
        }
        if let Some(ref base) = self.bluesky_api_base {
            config.bluesky_api_base = base.clone();
        }
        if let Some(ref base) = self.twitter_api_base {
            config.twitter_api_base = base.clone();
        }
        config.twitter_bearer_token = self
            .twitter_bearer_token
            .as_ref()
            .filter(|t| !t.is_empty())
            .map(|t| Secret::new(t.clone()));
        config
    }
}

/// Build the log subscriber. Both formats write to `writer` only.
fn log_subscriber<W>(cli: &Cli, writer: W) -> Box<dyn tracing::Subscriber + Send + Sync>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        Box::new(
            registry.with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(writer),
            ),
        )
    } else {
        Box::new(
            registry.with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_writer(writer),
            ),
        )
    }
}

fn init_telemetry(cli: &Cli) {
    // stdout carries the notice stream.
    log_subscriber(cli, std::io::stderr).init();
}

/// Give in-flight pipelines up to `grace` to finish.
async fn drain(dispatcher: &Dispatcher, grace: Duration) {
    let deadline = tokio::time::Instant::now() + grace;
    // Pipelines spawned for the last lines may not hold a permit yet.
    loop {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let in_flight = dispatcher.admission().in_use();
        if in_flight == 0 {
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            warn!(in_flight, "exiting with links still resolving");
            return;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "linkherald starting");

    let config = cli.resolver_config();
    if config.twitter_bearer_token.is_none() {
        info!("no twitter bearer token configured, tweets will not be resolved");
    }

    let sink = Arc::new(console::ConsoleSink::new(tokio::io::stdout()));
    let dispatcher = Arc::new(Dispatcher::new(&config, sink)?);
    info!(
        concurrency = dispatcher.admission().capacity(),
        max_urls = config.max_urls_per_message,
        "dispatcher ready"
    );

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down");
            ctrl_c.cancel();
        }
    });

    let session = console::ConsoleSession {
        target: cli.target.clone(),
        sender: cli.sender.clone(),
        owner: cli.owner.clone(),
    };
    console::run(Arc::clone(&dispatcher), session, cancel).await?;

    drain(&dispatcher, config.timeout() * 2).await;
    info!("linkherald stopped");
    Ok(())
}
