/// Make untrusted text safe to send as a single chat line.
///
/// NUL and CR are dropped, LF becomes two spaces, other whitespace becomes
/// one space and remaining control characters are dropped. Output stops
/// before it would exceed `char_limit` characters.
pub fn sanitize_text(text: &str, char_limit: usize) -> String {
    let mut out = String::with_capacity(text.len().min(char_limit * 4));
    let mut count = 0usize;

    for ch in text.chars() {
        let piece: &str = match ch {
            '\0' | '\r' => continue,
            '\n' => "  ",
            c if c.is_whitespace() => " ",
            c if c.is_control() => continue,
            _ => {
                if count + 1 > char_limit {
                    break;
                }
                out.push(ch);
                count += 1;
                continue;
            },
        };
        let width = piece.len();
        if count + width > char_limit {
            break;
        }
        out.push_str(piece);
        count += width;
    }

    out
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case("plain", "plain")]
    #[case("a\r\nb", "a  b")]
    #[case("tab\there", "tab here")]
    #[case("bell\u{7}less", "bellless")]
    #[case("nul\0byte", "nulbyte")]
    #[case("\u{a0}nbsp", " nbsp")]
    fn strips_control_characters(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_text(input, 400), expected);
    }

    #[test]
    fn truncates_by_characters() {
        assert_eq!(sanitize_text("héllo wörld", 5), "héllo");
        assert_eq!(sanitize_text(&"x".repeat(500), 400).chars().count(), 400);
    }

    #[test]
    fn newline_that_does_not_fit_ends_output() {
        assert_eq!(sanitize_text("abc\ndef", 4), "abc");
    }
}
