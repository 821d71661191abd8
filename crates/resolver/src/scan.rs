use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://\S*").expect("URL pattern is valid"));

/// Extract candidate URLs from a chat message, in order of appearance.
///
/// A candidate starts at `http://` or `https://` (any case) and runs up to
/// the next whitespace or the end of the message. Nothing is validated here.
pub fn find_urls(text: &str) -> Vec<String> {
    URL_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case(
        "check https://a.example/x and https://b.example/y",
        &["https://a.example/x", "https://b.example/y"]
    )]
    #[case("no links here, just http talk", &[])]
    #[case("", &[])]
    #[case("HTTPS://Example.COM/Path", &["HTTPS://Example.COM/Path"])]
    #[case("line one http://a.test\nline two", &["http://a.test"])]
    #[case("tabs\thttp://a.test/?q=1&r=2\t", &["http://a.test/?q=1&r=2"])]
    #[case("ftp://files.example/ https://ok.example", &["https://ok.example"])]
    fn extracts_urls(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(find_urls(input), expected);
    }

    #[test]
    fn preserves_order_and_duplicates() {
        let urls = find_urls("https://b.test https://a.test https://b.test");
        assert_eq!(urls, vec!["https://b.test", "https://a.test", "https://b.test"]);
    }
}
