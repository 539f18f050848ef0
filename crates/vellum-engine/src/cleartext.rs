//! Cleartext framing helpers: canonicalization and dash-escaping.
//!
//! Signatures are computed over a canonical form of the text so that
//! the transformations the framing itself applies (line-ending
//! normalization, trailing-whitespace trimming) cannot invalidate a
//! signature. Both signer and verifier canonicalize before hashing.

/// Canonicalize text for signing.
///
/// Line endings become CRLF, trailing whitespace is trimmed from every
/// line, and trailing empty lines are dropped entirely. The result has
/// no final line ending. Canonicalization is idempotent.
pub fn canonicalize(text: &str) -> String {
    let mut lines: Vec<&str> = text.split('\n').map(|l| l.trim_end()).collect();
    while lines.last() == Some(&"") {
        lines.pop();
    }
    lines.join("\r\n")
}

/// Dash-escape text for embedding in a cleartext signed message.
///
/// Lines beginning with a dash get a `"- "` prefix so the framing's
/// own `-----` marker lines stay unambiguous.
pub fn dash_escape(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.starts_with('-') {
                format!("- {line}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reverse [`dash_escape`].
pub fn dash_unescape(text: &str) -> String {
    text.lines()
        .map(|line| line.strip_prefix("- ").unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}


#[cfg(test)]
mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn canonicalize_is_idempotent(text in "[ -~\\n\\r\\t]{0,200}") {
            let once = canonicalize(&text);
            prop_assert_eq!(canonicalize(&once), once);
        }

        #[test]
        fn dash_escape_reverses(text in "[ -~\\n]{0,200}") {
            // lines() drops a trailing newline, so compare in that form.
            let text = text.trim_end_matches('\n').to_string();
            prop_assert_eq!(dash_unescape(&dash_escape(&text)), text);
        }

        #[test]
        fn escaped_text_never_starts_line_with_marker(text in "[ -~\\n]{0,200}") {
            for line in dash_escape(&text).lines() {
                prop_assert!(!line.starts_with("-----"));
            }
        }
    }
}
