use {serde::Deserialize, tracing::debug};

use crate::{
    Result, ResolverConfig,
    fetch::get_json,
    social::{PostRecord, parse_created_at},
};

/// Record collection holding Bluesky posts.
const POST_COLLECTION: &str = "app.bsky.feed.post";

#[derive(Debug, Deserialize)]
struct ResolveHandleResponse {
    did: String,
}

#[derive(Debug, Deserialize)]
struct GetRecordResponse {
    value: PostValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostValue {
    text: String,
    created_at: String,
}

/// Client for the public AT Protocol XRPC endpoints.
#[derive(Debug, Clone)]
pub struct BlueskyClient {
    client: reqwest::Client,
    api_base: String,
    read_limit: usize,
}

impl BlueskyClient {
    pub fn new(client: reqwest::Client, config: &ResolverConfig) -> Self {
        Self {
            client,
            api_base: config.bluesky_api_base.trim_end_matches('/').to_string(),
            read_limit: config.trusted_read_limit,
        }
    }

    /// Resolve a handle to its DID. Links that already carry a DID skip the call.
    pub async fn resolve_handle(&self, handle: &str) -> Result<String> {
        if handle.starts_with("did:") {
            return Ok(handle.to_string());
        }
        let request = self
            .client
            .get(format!("{}/com.atproto.identity.resolveHandle", self.api_base))
            .query(&[("handle", handle)]);
        let resolved: ResolveHandleResponse =
            get_json(request, self.read_limit, "bluesky handle resolution").await?;
        debug!(handle, did = %resolved.did, "resolved bluesky handle");
        Ok(resolved.did)
    }

    /// Handle resolution followed by the record lookup, strictly in that order.
    pub async fn fetch_post(&self, handle: &str, rkey: &str) -> Result<PostRecord> {
        let did = self.resolve_handle(handle).await?;
        let request = self
            .client
            .get(format!("{}/com.atproto.repo.getRecord", self.api_base))
            .query(&[
                ("repo", did.as_str()),
                ("collection", POST_COLLECTION),
                ("rkey", rkey),
            ]);
        let record: GetRecordResponse =
            get_json(request, self.read_limit, "bluesky record lookup").await?;

        Ok(PostRecord {
            handle: handle.to_string(),
            text: record.value.text,
            created_at: parse_created_at(&record.value.created_at)?,
            verified: None,
        })
    }
}
