//! Edit capability tokens.
//!
//! An edit token is the sole credential for mutating or deleting a thought.
//! It is minted once at creation from the operating system CSPRNG and is only
//! ever returned in the creation response.

use rand::RngCore;
use rand::rngs::OsRng;

/// Number of random bytes backing a freshly minted token.
const TOKEN_BYTES: usize = 16;

/// Server-minted opaque secret authorising edits and deletes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditToken(String);

impl EditToken {
    /// Mint a new token: 16 bytes from the OS CSPRNG, hex encoded so the
    /// value is URL safe in headers and query parameters.
    pub fn mint() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Wrap a stored column value. No validation: generation-1 rows never had
    /// a token minted, and those are represented as `None` upstream.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The encoded token value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether a presented credential matches this token.
    ///
    /// The presented value is trimmed first; clients routinely copy tokens
    /// with surrounding whitespace.
    pub fn matches(&self, presented: &str) -> bool {
        let presented = presented.trim();
        !presented.is_empty() && presented == self.0
    }
}

impl std::fmt::Display for EditToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn minted_tokens_are_hex_of_sixteen_bytes() {
        let token = EditToken::mint();
        assert_eq!(token.as_str().len(), TOKEN_BYTES * 2);
        assert!(token.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[rstest]
    fn minted_tokens_differ() {
        assert_ne!(EditToken::mint(), EditToken::mint());
    }

    #[rstest]
    #[case("secret", "secret", true)]
    #[case("secret", "  secret  ", true)]
    #[case("secret", "other", false)]
    #[case("secret", "", false)]
    #[case("secret", "   ", false)]
    fn match_requires_trimmed_equality(
        #[case] stored: &str,
        #[case] presented: &str,
        #[case] expected: bool,
    ) {
        let token = EditToken::from_stored(stored);
        assert_eq!(token.matches(presented), expected);
    }
}
