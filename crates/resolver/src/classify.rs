use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static BLUESKY_POST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://(?:www\.)?bsky\.app/profile/([^/?#\s]+)/post/([a-z0-9]+)")
        .expect("Bluesky pattern is valid")
});

#[allow(clippy::expect_used)]
static TWITTER_STATUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https://(?:mobile\.)?(?:twitter|x)\.com/([^/?#\s]+)/status/([0-9]+)")
        .expect("Twitter pattern is valid")
});

/// Social platforms with a dedicated post renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Bluesky,
    Twitter,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Bluesky => "bluesky",
            Self::Twitter => "twitter",
        })
    }
}

/// A link to one post on a known platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialPost {
    pub platform: Platform,
    /// Author handle as written in the link.
    pub handle: String,
    /// Platform post id (Bluesky record key, tweet id).
    pub post_id: String,
}

/// How a link gets resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkKind {
    Social(SocialPost),
    Generic,
}

/// Decide whether `url` points at a known social post.
///
/// Anything that does not fully match a platform shape, including profile
/// links and malformed post links, is treated as a generic page.
pub fn classify(url: &str) -> LinkKind {
    let patterns: [(Platform, &Regex); 2] = [
        (Platform::Bluesky, &*BLUESKY_POST_RE),
        (Platform::Twitter, &*TWITTER_STATUS_RE),
    ];
    for (platform, re) in patterns {
        if let Some(caps) = re.captures(url)
            && let (Some(handle), Some(post_id)) = (caps.get(1), caps.get(2))
        {
            return LinkKind::Social(SocialPost {
                platform,
                handle: handle.as_str().to_string(),
                post_id: post_id.as_str().to_string(),
            });
        }
    }
    LinkKind::Generic
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    fn social(platform: Platform, handle: &str, post_id: &str) -> LinkKind {
        LinkKind::Social(SocialPost {
            platform,
            handle: handle.into(),
            post_id: post_id.into(),
        })
    }

    #[rstest]
    #[case(
        "https://bsky.app/profile/alice.bsky.social/post/3kq2xyzabc",
        social(Platform::Bluesky, "alice.bsky.social", "3kq2xyzabc")
    )]
    #[case(
        "https://BSKY.APP/profile/did:plc:abc123/post/3kq2xyzabc?ref=x",
        social(Platform::Bluesky, "did:plc:abc123", "3kq2xyzabc")
    )]
    #[case(
        "https://twitter.com/rustlang/status/1234567890",
        social(Platform::Twitter, "rustlang", "1234567890")
    )]
    #[case(
        "https://mobile.twitter.com/rustlang/status/42",
        social(Platform::Twitter, "rustlang", "42")
    )]
    #[case("https://x.com/rustlang/status/42?s=20", social(Platform::Twitter, "rustlang", "42"))]
    fn recognizes_posts(#[case] url: &str, #[case] expected: LinkKind) {
        assert_eq!(classify(url), expected);
    }

    #[rstest]
    #[case("https://bsky.app/profile/alice.bsky.social")]
    #[case("https://bsky.app/profile/alice.bsky.social/post/")]
    #[case("https://twitter.com/rustlang")]
    #[case("https://twitter.com/rustlang/status/notanumber")]
    #[case("https://notbsky.app/profile/alice/post/abc")]
    #[case("https://example.com/profile/alice/post/abc")]
    #[case("not even a url")]
    fn falls_back_to_generic(#[case] url: &str) {
        assert_eq!(classify(url), LinkKind::Generic);
    }
}
