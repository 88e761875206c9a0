//! Admin bearer token.

use sha2::{Digest, Sha256};

type TokenDigest = [u8; 32];

/// The configured admin token, held only as a SHA-256 digest.
///
/// An empty configured token leaves admin access disabled.
#[derive(Clone)]
pub(crate) struct AdminToken(Option<TokenDigest>);

impl AdminToken {
    pub(crate) fn new(token: &str) -> Self {
        if token.is_empty() {
            return Self(None);
        }

        Self(Some(digest(token)))
    }

    pub(crate) fn is_configured(&self) -> bool {
        self.0.is_some()
    }

    /// Check a presented token.
    ///
    /// Both sides are hashed to a fixed length and every byte is folded, so the
    /// comparison time does not depend on the length or the first differing byte.
    pub(crate) fn matches(&self, presented: &str) -> bool {
        let Some(expected) = &self.0 else {
            return false;
        };

        let presented = digest(presented);

        expected
            .iter()
            .zip(presented.iter())
            .fold(0_u8, |diff, (left, right)| diff | (left ^ right))
            == 0
    }
}

fn digest(token: &str) -> TokenDigest {
    Sha256::digest(token.as_bytes()).into()
}
