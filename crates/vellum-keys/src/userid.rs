//! User identities attached to keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A user identity: an optional name and an optional email.
///
/// An empty user ID (both fields absent) is permitted and denotes an
/// anonymous key. This is a deliberate deviation from strict RFC
/// practice: empty user IDs are simply skipped on export, and keys
/// with zero UserId packets are accepted on import.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserId {
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
}

impl UserId {
    /// A user ID with both fields set.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
        }
    }

    /// A name-only user ID.
    pub fn name_only(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: None,
        }
    }

    /// True when both fields are absent or blank.
    pub fn is_empty(&self) -> bool {
        let blank = |s: &Option<String>| s.as_deref().map_or(true, |v| v.trim().is_empty());
        blank(&self.name) && blank(&self.email)
    }

    /// Render as a UserId packet body: `Name <email>`, `Name`, or
    /// `<email>` (UTF-8).
    pub fn to_packet_body(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// Parse a UserId packet body back into name/email parts.
    pub fn from_packet_body(body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body);
        let text = text.trim();
        if text.is_empty() {
            return Self::default();
        }

        if let Some(open) = text.rfind('<') {
            if let Some(stripped) = text[open..].strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
                let name = text[..open].trim();
                let email = stripped.trim();
                return Self {
                    name: (!name.is_empty()).then(|| name.to_string()),
                    email: (!email.is_empty()).then(|| email.to_string()),
                };
            }
        }
        Self {
            name: Some(text.to_string()),
            email: None,
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name.as_deref(), self.email.as_deref()) {
            (Some(name), Some(email)) => write!(f, "{name} <{email}>"),
            (Some(name), None) => write!(f, "{name}"),
            (None, Some(email)) => write!(f, "<{email}>"),
            (None, None) => Ok(()),
        }
    }
}


#[cfg(test)]
mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn packet_body_roundtrips(
            name in prop::option::of("[A-Za-z][A-Za-z .'-]{0,30}[A-Za-z]"),
            email in prop::option::of("[a-z][a-z0-9.]{0,15}@[a-z][a-z0-9]{0,10}\\.[a-z]{2,4}"),
        ) {
            let uid = UserId { name, email };
            prop_assert_eq!(UserId::from_packet_body(&uid.to_packet_body()), uid);
        }

        #[test]
        fn parsing_never_panics(body in prop::collection::vec(any::<u8>(), 0..128)) {
            let _ = UserId::from_packet_body(&body);
        }
    }
}
