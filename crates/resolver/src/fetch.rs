//! HTTP plumbing shared by the resolvers.

use {
    reqwest::{RequestBuilder, Response, StatusCode},
    serde::de::DeserializeOwned,
};

use crate::{Error, Result, ResolverConfig};

/// A response body read up to a byte budget.
#[derive(Debug)]
pub(crate) struct LimitedBody {
    pub bytes: Vec<u8>,
    /// The budget was reached; the page may continue past `bytes`.
    pub truncated: bool,
}

/// One client per dispatcher, carrying the timeout and user agent.
pub(crate) fn build_client(config: &ResolverConfig) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent.as_str())
        .build()?)
}

/// Read at most `limit` bytes of the body. Hitting the limit is not an error.
pub(crate) async fn read_limited(mut resp: Response, limit: usize) -> Result<LimitedBody> {
    let mut bytes = Vec::new();
    let mut truncated = false;

    while let Some(chunk) = resp.chunk().await? {
        let room = limit - bytes.len();
        if chunk.len() >= room {
            bytes.extend_from_slice(&chunk[..room]);
            truncated = true;
            break;
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(LimitedBody { bytes, truncated })
}

/// Send `request`, require a 200 and decode the bounded body as JSON.
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
    limit: usize,
    context: &'static str,
) -> Result<T> {
    let resp = request.send().await?;
    let status = resp.status();
    if status != StatusCode::OK {
        return Err(Error::Status { context, status });
    }
    let body = read_limited(resp, limit).await?;
    serde_json::from_slice(&body.bytes).map_err(|source| Error::Json { context, source })
}
