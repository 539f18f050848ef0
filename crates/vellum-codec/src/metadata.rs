//! Armor header metadata policy.
//!
//! Controls which `Comment:` line (if any) is emitted into armored
//! output. This replaces the original UI's post-hoc string filtering of
//! `Version:`/`Comment:` lines with a structural transform applied
//! before encoding. The policy never touches the binary body.

use serde::{Deserialize, Serialize};

/// The ambient default comment, used when no override is configured.
pub const DEFAULT_COMMENT: &str = "\u{267E}\u{FE0F}";

/// Decides the armor header lines for exported blocks.
///
/// No `Version:` line is ever emitted. The comment behaves as:
///
/// - override set: exactly one `Comment:` line with the override text
/// - no override, defaults not suppressed: one `Comment:` line with the
///   configured default
/// - defaults suppressed: no header lines at all
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataPolicy {
    /// Comment emitted when no override is present. `None` suppresses
    /// default headers entirely.
    pub default_comment: Option<String>,
    /// Caller-supplied comment that replaces the default.
    pub override_comment: Option<String>,
}

impl MetadataPolicy {
    /// Policy emitting the ambient [`DEFAULT_COMMENT`].
    pub fn new() -> Self {
        Self {
            default_comment: Some(DEFAULT_COMMENT.to_string()),
            override_comment: None,
        }
    }

    /// Policy emitting no header lines at all.
    pub fn suppressed() -> Self {
        Self {
            default_comment: None,
            override_comment: None,
        }
    }

    /// Policy emitting exactly one custom `Comment:` line.
    pub fn with_comment(comment: impl Into<String>) -> Self {
        Self {
            default_comment: None,
            override_comment: Some(comment.into()),
        }
    }

    /// Compute the header lines to emit.
    pub fn apply(&self) -> Vec<(String, String)> {
        let comment = self
            .override_comment
            .as_ref()
            .or(self.default_comment.as_ref());
        match comment {
            Some(text) => vec![("Comment".to_string(), text.clone())],
            None => Vec::new(),
        }
    }
}

impl Default for MetadataPolicy {
    fn default() -> Self {
        Self::new()
    }
}
