//! Correlation identifier generation and validation.

use axum::http::HeaderName;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Header carrying the correlation identifier on requests and responses.
pub const X_CORRELATION_ID: HeaderName = HeaderName::from_static("x-correlation-id");

/// Error returned when a string does not have the expected identifier shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid correlation id: {0:?}")]
pub struct InvalidCorrelationId(pub String);

/// Opaque token linking a client request to its server-side handling and all
/// telemetry emitted for both.
///
/// Minted identifiers are random v4 UUIDs rendered as lowercase hyphenated
/// hex (8-4-4-4-12). Identifiers received over the wire are treated as
/// opaque strings and echoed unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Mint a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parse a string, requiring the UUID-like generation format.
    pub fn parse(s: &str) -> Result<Self, InvalidCorrelationId> {
        if is_valid_format(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidCorrelationId(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CorrelationId {
    /// Wrap a wire value without format validation; the token is opaque.
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::str::FromStr for CorrelationId {
    type Err = InvalidCorrelationId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Check the 8-4-4-4-12 hex shape with a `4` version nibble and a variant
/// nibble in {8, 9, a, b}.
fn is_valid_format(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    for (i, b) in bytes.iter().enumerate() {
        match i {
            8 | 13 | 18 | 23 => {
                if *b != b'-' {
                    return false;
                }
            }
            _ => {
                if !b.is_ascii_hexdigit() {
                    return false;
                }
            }
        }
    }
    bytes[14] == b'4' && matches!(bytes[19].to_ascii_lowercase(), b'8' | b'9' | b'a' | b'b')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_ids_match_generation_format() {
        for _ in 0..64 {
            let id = CorrelationId::new();
            assert!(CorrelationId::parse(id.as_str()).is_ok(), "bad id: {}", id);
        }
    }

    #[test]
    fn minted_ids_are_unique() {
        let a = CorrelationId::new();
        let b = CorrelationId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn parse_accepts_uppercase_hex() {
        assert!(CorrelationId::parse("A3BB189E-8BF9-4888-9912-ACE4E6543002").is_ok());
    }

    #[test]
    fn parse_rejects_wrong_version_nibble() {
        assert!(CorrelationId::parse("a3bb189e-8bf9-1888-9912-ace4e6543002").is_err());
    }

    #[test]
    fn parse_rejects_wrong_variant_nibble() {
        assert!(CorrelationId::parse("a3bb189e-8bf9-4888-7912-ace4e6543002").is_err());
    }

    #[test]
    fn parse_rejects_wrong_length_and_non_hex() {
        assert!(CorrelationId::parse("a3bb189e-8bf9-4888-9912-ace4e654300").is_err());
        assert!(CorrelationId::parse("a3bb189e-8bf9-4888-9912-ace4e654300g").is_err());
        assert!(CorrelationId::parse("not-a-uuid").is_err());
    }
}
