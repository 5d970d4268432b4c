//! Access guard for the report.
//!
//! The caller proves access with a password compared against a stored
//! one-way hash. The verifier is a trait so the hash scheme can be swapped
//! without touching the request flow.

use md5::{Digest, Md5};
use subtle::ConstantTimeEq;

/// Checks a submitted credential.
pub trait CredentialVerifier: Send + Sync {
    /// Returns true if the credential grants access.
    fn verify(&self, credential: &str) -> bool;
}

/// Verifies passwords against an unsalted MD5 hex digest.
///
/// MD5 is fast and unsalted, so this only keeps existing deployments working.
/// Prefer a salted, slow scheme behind [`CredentialVerifier`] for new ones.
#[derive(Debug, Clone)]
pub struct Md5CredentialVerifier {
    expected: Vec<u8>,
}

impl Md5CredentialVerifier {
    /// Creates a verifier for the given hex digest.
    ///
    /// An undecodable digest is kept as-is and can never match.
    pub fn new(hex_digest: &str) -> Self {
        let expected = hex::decode(hex_digest.trim()).unwrap_or_default();
        Self { expected }
    }

    /// Hex MD5 digest of a password, for writing into the configuration.
    pub fn hash(password: &str) -> String {
        hex::encode(Md5::digest(password.as_bytes()))
    }
}

impl CredentialVerifier for Md5CredentialVerifier {
    fn verify(&self, credential: &str) -> bool {
        if self.expected.is_empty() {
            return false;
        }
        let actual = Md5::digest(credential.as_bytes());
        actual.as_slice().ct_eq(&self.expected).unwrap_u8() == 1
    }
}

/// Minimal form asking for the password, submitted back to `action` via GET.
pub fn login_form(action: &str) -> String {
    format!(
        "<form action=\"{}\" method=\"GET\">\
         Password: <input type=\"password\" name=\"password\" />\
         <input class=\"Submit\" type=\"submit\" name=\"submit\" /></form>",
        crate::report::escape_html(action)
    )
}
