use {reqwest::StatusCode, tracing::debug};

use crate::{
    Result, ResolverConfig,
    fetch::read_limited,
    html::extract_title,
    policy::{ReadLimits, parse_http_url, select_policy},
};

/// Resolves ordinary web pages to their `<title>`.
#[derive(Debug, Clone)]
pub struct GenericResolver {
    client: reqwest::Client,
    limits: ReadLimits,
    title_char_limit: usize,
}

impl GenericResolver {
    pub fn new(client: reqwest::Client, config: &ResolverConfig) -> Self {
        Self {
            client,
            limits: config.read_limits(),
            title_char_limit: config.title_char_limit,
        }
    }

    /// Fetch `raw_url` and return its sanitized title.
    ///
    /// `Ok(None)` means the page was reachable but produced nothing worth
    /// showing: a non-200 status, no title, or an empty one.
    pub async fn resolve(&self, raw_url: &str) -> Result<Option<String>> {
        let url = parse_http_url(raw_url)?;
        let policy = select_policy(&url, self.limits);

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            debug!(url = raw_url, %status, "not titling non-200 response");
            return Ok(None);
        }

        let body = read_limited(resp, policy.byte_limit).await?;
        if body.truncated {
            debug!(
                url = raw_url,
                limit = policy.byte_limit,
                "read limit reached, scanning partial page"
            );
        }

        Ok(extract_title(
            &body.bytes,
            policy.pattern,
            self.title_char_limit,
        ))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, crate::Error, crate::fetch::build_client};

    fn resolver(config: &ResolverConfig) -> GenericResolver {
        GenericResolver::new(build_client(config).unwrap(), config)
    }

    #[tokio::test]
    async fn resolves_title_and_sends_user_agent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .match_header("user-agent", "linkherald-test/1.0")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><head><title>  Hello &amp; World  </title></head><body></body></html>")
            .create_async()
            .await;

        let config = ResolverConfig {
            user_agent: "linkherald-test/1.0".into(),
            ..Default::default()
        };
        let title = resolver(&config)
            .resolve(&format!("{}/page", server.url()))
            .await
            .unwrap();

        assert_eq!(title.as_deref(), Some("Hello & World"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_200_yields_nothing() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("<title>Not Found</title>")
            .create_async()
            .await;

        let title = resolver(&ResolverConfig::default())
            .resolve(&format!("{}/missing", server.url()))
            .await
            .unwrap();
        assert_eq!(title, None);
    }

    #[tokio::test]
    async fn title_past_read_limit_is_not_seen() {
        let mut server = mockito::Server::new_async().await;
        let padding = "x".repeat(4096);
        let _mock = server
            .mock("GET", "/heavy")
            .with_status(200)
            .with_body(format!("<html><script>{padding}</script><title>Late</title>"))
            .create_async()
            .await;

        let config = ResolverConfig {
            standard_read_limit: 1024,
            ..Default::default()
        };
        let title = resolver(&config)
            .resolve(&format!("{}/heavy", server.url()))
            .await
            .unwrap();
        assert_eq!(title, None);
    }

    #[tokio::test]
    async fn title_before_read_limit_survives_truncation() {
        let mut server = mockito::Server::new_async().await;
        let padding = "x".repeat(4096);
        let _mock = server
            .mock("GET", "/early")
            .with_status(200)
            .with_body(format!("<title>Early</title><script>{padding}</script>"))
            .create_async()
            .await;

        let config = ResolverConfig {
            standard_read_limit: 1024,
            ..Default::default()
        };
        let title = resolver(&config)
            .resolve(&format!("{}/early", server.url()))
            .await
            .unwrap();
        assert_eq!(title.as_deref(), Some("Early"));
    }

    #[tokio::test]
    async fn malformed_url_is_an_error() {
        let result = resolver(&ResolverConfig::default())
            .resolve("https://")
            .await;
        assert!(matches!(result, Err(Error::InvalidUrl { .. })));
    }
}
