use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

use crate::{Error, Result, policy::ReadLimits};

/// Browser-like user agent; many sites serve bots a page without a title.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                      (KHTML, like Gecko) Chrome/98.0.4758.81 Safari/537.36";

/// Link resolution settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// `User-Agent` sent with every outbound request.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Links beyond this count in one message are ignored.
    pub max_urls_per_message: usize,
    /// Maximum number of links resolved at the same time.
    pub concurrency_limit: usize,
    /// Maximum characters in an emitted line.
    pub title_char_limit: usize,
    /// Bytes read from an ordinary page.
    pub standard_read_limit: usize,
    /// Bytes read from hosts that emit heavy markup before the title.
    pub extended_read_limit: usize,
    /// Bytes read from platform API responses.
    pub trusted_read_limit: usize,
    /// Base URL of the Bluesky XRPC API.
    pub bluesky_api_base: String,
    /// Base URL of the Twitter v2 API.
    pub twitter_api_base: String,
    /// Twitter API bearer token; tweets are not resolved without it.
    #[serde(
        default,
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub twitter_bearer_token: Option<Secret<String>>,
}

impl std::fmt::Debug for ResolverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverConfig")
            .field("user_agent", &self.user_agent)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("max_urls_per_message", &self.max_urls_per_message)
            .field("concurrency_limit", &self.concurrency_limit)
            .field("bluesky_api_base", &self.bluesky_api_base)
            .field("twitter_api_base", &self.twitter_api_base)
            .field(
                "twitter_bearer_token",
                &self.twitter_bearer_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.into(),
            timeout_seconds: 15,
            max_urls_per_message: 4,
            concurrency_limit: 128,
            title_char_limit: 400,
            standard_read_limit: 32 * 1024,
            extended_read_limit: 1024 * 1024,
            trusted_read_limit: 1024 * 1024,
            bluesky_api_base: "https://public.api.bsky.app/xrpc".into(),
            twitter_api_base: "https://api.twitter.com/2".into(),
            twitter_bearer_token: None,
        }
    }
}

impl ResolverConfig {
    /// Reject settings that would make every resolution fail or hang.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(Error::config("timeout_seconds must be greater than zero"));
        }
        let positive = [
            ("max_urls_per_message", self.max_urls_per_message),
            ("concurrency_limit", self.concurrency_limit),
            ("title_char_limit", self.title_char_limit),
            ("standard_read_limit", self.standard_read_limit),
            ("extended_read_limit", self.extended_read_limit),
            ("trusted_read_limit", self.trusted_read_limit),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(Error::config(format!("{name} must be greater than zero")));
        }
        if self.extended_read_limit < self.standard_read_limit {
            return Err(Error::config(
                "extended_read_limit must not be smaller than standard_read_limit",
            ));
        }
        for (name, base) in [
            ("bluesky_api_base", &self.bluesky_api_base),
            ("twitter_api_base", &self.twitter_api_base),
        ] {
            url::Url::parse(base).map_err(|e| Error::config(format!("{name}: {e}")))?;
        }
        Ok(())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }

    pub(crate) fn read_limits(&self) -> ReadLimits {
        ReadLimits {
            standard: self.standard_read_limit,
            extended: self.extended_read_limit,
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ResolverConfig::default();
        assert_eq!(cfg.timeout_seconds, 15);
        assert_eq!(cfg.max_urls_per_message, 4);
        assert_eq!(cfg.concurrency_limit, 128);
        assert_eq!(cfg.title_char_limit, 400);
        assert_eq!(cfg.trusted_read_limit, 1024 * 1024);
        assert!(cfg.twitter_bearer_token.is_none());
        cfg.validate().unwrap();
    }

    #[test]
    fn deserialize_partial_json() {
        let json = r#"{
            "concurrency_limit": 8,
            "twitter_bearer_token": "secret-token"
        }"#;
        let cfg: ResolverConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.concurrency_limit, 8);
        assert_eq!(
            cfg.twitter_bearer_token.as_ref().unwrap().expose_secret(),
            "secret-token"
        );
        assert_eq!(cfg.max_urls_per_message, 4);
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = ResolverConfig {
            twitter_bearer_token: Some(Secret::new("hunter2".into())),
            ..Default::default()
        };
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let cfg = ResolverConfig {
            concurrency_limit: 0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("concurrency_limit"));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let cfg = ResolverConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn validate_rejects_bad_api_base() {
        let cfg = ResolverConfig {
            bluesky_api_base: "not a url".into(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
