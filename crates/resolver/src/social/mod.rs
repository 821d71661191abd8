//! Rendering of social-media post links.

pub mod bluesky;
pub mod time;
pub mod twitter;

use {
    chrono::{DateTime, NaiveDateTime, Utc},
    linkherald_channels::sanitize_text,
};

use crate::{
    Error, Result, ResolverConfig,
    classify::{Platform, SocialPost},
};

pub use {bluesky::BlueskyClient, twitter::TwitterClient};

/// Creation timestamps must look exactly like `2024-01-02T03:04:05.678Z`.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.%3fZ";

/// A post as returned by its platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub handle: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// `None` when the platform has no notion of verified accounts.
    pub verified: Option<bool>,
}

/// Parse a platform creation timestamp (always UTC, millisecond precision).
pub fn parse_created_at(value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, CREATED_AT_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| Error::Timestamp {
            value: value.to_string(),
            source,
        })
}

/// `(@handle[ ✓], <when>) <text>`
pub fn render_post(record: &PostRecord, now: DateTime<Utc>, char_limit: usize) -> String {
    let checkmark = if record.verified == Some(true) {
        " \u{2713}"
    } else {
        ""
    };
    let when = time::display_post_time(record.created_at, now);
    let handle = sanitize_text(&record.handle, char_limit);
    let text = sanitize_text(&record.text, char_limit);
    format!("(@{handle}{checkmark}, {when}) {text}")
}

/// Looks up posts on every supported platform.
#[derive(Debug, Clone)]
pub struct SocialResolver {
    bluesky: BlueskyClient,
    twitter: TwitterClient,
    title_char_limit: usize,
}

impl SocialResolver {
    pub fn new(client: reqwest::Client, config: &ResolverConfig) -> Self {
        Self {
            bluesky: BlueskyClient::new(client.clone(), config),
            twitter: TwitterClient::new(client, config),
            title_char_limit: config.title_char_limit,
        }
    }

    /// Fetch `post` and render it as one chat line.
    pub async fn resolve(&self, post: &SocialPost) -> Result<String> {
        let record = match post.platform {
            Platform::Bluesky => self.bluesky.fetch_post(&post.handle, &post.post_id).await?,
            Platform::Twitter => self.twitter.fetch_post(&post.handle, &post.post_id).await?,
        };
        Ok(render_post(&record, Utc::now(), self.title_char_limit))
    }
}
