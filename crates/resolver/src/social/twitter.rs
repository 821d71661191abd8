use {
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
};

use crate::{
    Error, Result, ResolverConfig,
    fetch::get_json,
    html::decode_entities,
    social::{PostRecord, parse_created_at},
};

#[derive(Debug, Deserialize)]
struct TweetResponse {
    data: TweetData,
    #[serde(default)]
    includes: TweetIncludes,
}

#[derive(Debug, Deserialize)]
struct TweetData {
    text: String,
    created_at: String,
    #[serde(default)]
    author_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct TweetIncludes {
    #[serde(default)]
    users: Vec<TwitterUser>,
}

#[derive(Debug, Deserialize)]
struct TwitterUser {
    id: String,
    username: String,
    #[serde(default)]
    verified: bool,
}

/// Client for the Twitter v2 tweet lookup endpoint.
#[derive(Debug, Clone)]
pub struct TwitterClient {
    client: reqwest::Client,
    api_base: String,
    bearer_token: Option<Secret<String>>,
    read_limit: usize,
}

impl TwitterClient {
    pub fn new(client: reqwest::Client, config: &ResolverConfig) -> Self {
        Self {
            client,
            api_base: config.twitter_api_base.trim_end_matches('/').to_string(),
            bearer_token: config.twitter_bearer_token.clone(),
            read_limit: config.trusted_read_limit,
        }
    }

    /// Look up one tweet with its author expanded.
    ///
    /// `handle` from the link is used only when the response does not
    /// include the author.
    pub async fn fetch_post(&self, handle: &str, tweet_id: &str) -> Result<PostRecord> {
        let token = self
            .bearer_token
            .as_ref()
            .ok_or(Error::MissingCredentials("twitter bearer token is not configured"))?;

        let request = self
            .client
            .get(format!("{}/tweets/{tweet_id}", self.api_base))
            .query(&[
                ("tweet.fields", "created_at"),
                ("expansions", "author_id"),
                ("user.fields", "verified"),
            ])
            .bearer_auth(token.expose_secret());
        let tweet: TweetResponse = get_json(request, self.read_limit, "twitter tweet lookup").await?;

        let created_at = parse_created_at(&tweet.data.created_at)?;
        let author = tweet
            .includes
            .users
            .into_iter()
            .find(|user| user.id == tweet.data.author_id);
        let (handle, verified) = match author {
            Some(user) => (user.username, Some(user.verified)),
            None => (handle.to_string(), None),
        };

        // The API escapes `&`, `<` and `>` in tweet text.
        Ok(PostRecord {
            handle,
            text: decode_entities(&tweet.data.text).into_owned(),
            created_at,
            verified,
        })
    }
}
