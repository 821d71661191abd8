use std::sync::LazyLock;

use {regex::bytes::Regex, url::Url};

use crate::{Error, Result};

/// Hosts that send a lot of script and markup ahead of the `<title>` tag,
/// so the standard read budget would stop before reaching it.
pub const EXTENDED_BUDGET_DOMAINS: &[&str] = &[
    "amazon.com",
    "amazon.ca",
    "amzn.to",
    "imdb.com",
    "google.com",
    "goo.gl",
    "github.com",
];

/// Hosts whose useful title lives in `<meta name="title">`.
const YOUTUBE_DOMAINS: &[&str] = &["youtube.com", "youtu.be"];

// <title>bar</title>, <title data-react-helmet="true">qux</title>
#[allow(clippy::expect_used)]
static GENERIC_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is-u)<\s*title\b.*?>(.*?)<").expect("title pattern is valid")
});

#[allow(clippy::expect_used)]
static YOUTUBE_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is-u)<meta name="title" content="(.*?)""#).expect("meta pattern is valid")
});

/// Which pattern pulls the title out of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitlePattern {
    /// `<title ...>text</title>`
    Generic,
    /// `<meta name="title" content="text">`
    YoutubeMeta,
}

impl TitlePattern {
    pub(crate) fn regex(self) -> &'static Regex {
        match self {
            Self::Generic => &*GENERIC_TITLE_RE,
            Self::YoutubeMeta => &*YOUTUBE_TITLE_RE,
        }
    }
}

/// Read budgets available to generic fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadLimits {
    pub standard: usize,
    pub extended: usize,
}

/// How one page fetch is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    pub byte_limit: usize,
    pub pattern: TitlePattern,
}

/// True when `host` is `domain` or a subdomain of it.
///
/// Both arguments must already be lower-case.
pub fn domain_matches(host: &str, domain: &str) -> bool {
    match host.strip_suffix(domain) {
        Some("") => true,
        Some(rest) => rest.ends_with('.'),
        None => false,
    }
}

/// Parse a candidate into an absolute http(s) URL with a host.
pub fn parse_http_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| Error::invalid_url(raw, e))?;
    match url.scheme() {
        "http" | "https" => {},
        other => return Err(Error::invalid_url(raw, format!("unsupported scheme {other}"))),
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(Error::invalid_url(raw, "missing host"));
    }
    Ok(url)
}

/// The lower-cased host of `url`, without any port.
///
/// This is the only place hosts are normalized.
pub fn normalized_host(url: &Url) -> Option<String> {
    url.host_str().map(str::to_ascii_lowercase)
}

/// Pick the read budget and title pattern for `url`.
pub fn select_policy(url: &Url, limits: ReadLimits) -> FetchPolicy {
    let host = normalized_host(url).unwrap_or_default();
    let matches_any = |domains: &[&str]| domains.iter().any(|d| domain_matches(&host, d));

    if matches_any(YOUTUBE_DOMAINS) {
        FetchPolicy {
            byte_limit: limits.extended,
            pattern: TitlePattern::YoutubeMeta,
        }
    } else if matches_any(EXTENDED_BUDGET_DOMAINS) {
        FetchPolicy {
            byte_limit: limits.extended,
            pattern: TitlePattern::Generic,
        }
    } else {
        FetchPolicy {
            byte_limit: limits.standard,
            pattern: TitlePattern::Generic,
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    const LIMITS: ReadLimits = ReadLimits {
        standard: 32 * 1024,
        extended: 1024 * 1024,
    };

    #[rstest]
    #[case("www.google.com", "bing.com", false)]
    #[case("www.google.com", "google.com", true)]
    #[case("google.com", "google.com", true)]
    #[case("google.com", "www.google.com", false)]
    #[case("clients3.google.com", "www.google.com", false)]
    #[case("evilgoogle.com", "google.com", false)]
    #[case("a.b.github.com", "github.com", true)]
    fn domain_matching(#[case] host: &str, #[case] domain: &str, #[case] expected: bool) {
        assert_eq!(domain_matches(host, domain), expected);
    }

    fn policy_for(raw: &str) -> FetchPolicy {
        select_policy(&parse_http_url(raw).unwrap(), LIMITS)
    }

    #[rstest]
    #[case("https://example.com/page", LIMITS.standard, TitlePattern::Generic)]
    #[case("https://github.com/rust-lang/rust", LIMITS.extended, TitlePattern::Generic)]
    #[case("https://GIST.GitHub.com:8443/x", LIMITS.extended, TitlePattern::Generic)]
    #[case("https://www.amazon.ca/dp/123", LIMITS.extended, TitlePattern::Generic)]
    #[case("https://evilgithub.com/", LIMITS.standard, TitlePattern::Generic)]
    #[case("https://github.com.evil.net/", LIMITS.standard, TitlePattern::Generic)]
    #[case("https://www.youtube.com/watch?v=abc", LIMITS.extended, TitlePattern::YoutubeMeta)]
    #[case("https://youtu.be/abc", LIMITS.extended, TitlePattern::YoutubeMeta)]
    #[case("http://127.0.0.1:8080/", LIMITS.standard, TitlePattern::Generic)]
    fn policy_selection(
        #[case] raw: &str,
        #[case] byte_limit: usize,
        #[case] pattern: TitlePattern,
    ) {
        assert_eq!(policy_for(raw), FetchPolicy {
            byte_limit,
            pattern
        });
    }

    #[test]
    fn host_is_normalized_without_port() {
        let url = parse_http_url("https://WWW.Example.COM:8443/a").unwrap();
        assert_eq!(normalized_host(&url).as_deref(), Some("www.example.com"));
    }

    #[rstest]
    #[case("ftp://example.com/file")]
    #[case("https://")]
    #[case("http://exa mple.com/")]
    #[case("not a url")]
    fn rejects_malformed_urls(#[case] raw: &str) {
        assert!(matches!(
            parse_http_url(raw),
            Err(Error::InvalidUrl { .. })
        ));
    }
}
