//! Cryptographic Utilities
//!
//! Just enough to run the PKCE (RFC 7636, S256) code flow against the
//! authentication provider.

use base64::{Engine, engine::general_purpose};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// Entropy for a PKCE verifier; 32 bytes encode to 43 characters.
const PKCE_VERIFIER_BYTES: usize = 32;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Base64url without padding
pub fn to_base64url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// A PKCE verifier and its S256 challenge
#[derive(Debug, Clone)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    pub fn generate() -> Self {
        let verifier = to_base64url(&random_bytes(PKCE_VERIFIER_BYTES));
        let challenge = pkce_challenge(&verifier);
        Self {
            verifier,
            challenge,
        }
    }
}

/// S256 challenge: `BASE64URL(SHA256(verifier))`
pub fn pkce_challenge(verifier: &str) -> String {
    to_base64url(&sha256(verifier.as_bytes()))
}
