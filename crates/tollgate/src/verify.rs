//! Ed25519 signature verification against the bundled public key.

use std::sync::OnceLock;

use ed25519_dalek::pkcs8::DecodePublicKey;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

/// SPKI PEM public key bundled with the binary. Not configurable at
/// runtime: a swappable key would defeat the tamper goal.
const EMBEDDED_KEY_PEM: &str = include_str!("../resources/key.pub");

/// Verifying key parsed from the bundled PEM, once per process.
///
/// `None` means the bundled material is unusable; every verification then
/// fails closed.
pub(crate) fn embedded_key() -> Option<&'static VerifyingKey> {
    static KEY: OnceLock<Option<VerifyingKey>> = OnceLock::new();
    KEY.get_or_init(|| match VerifyingKey::from_public_key_pem(EMBEDDED_KEY_PEM) {
        Ok(key) => Some(key),
        Err(e) => {
            tracing::warn!(error = %e, "bundled license key is unusable; all licenses will be rejected");
            None
        }
    })
    .as_ref()
}

/// Verify `signature` over `content` with `key`.
///
/// Malformed signature bytes (wrong length or format) verify as `false`,
/// not as a distinct error: callers learn only that verification failed.
pub fn verify(content: &[u8], signature: &[u8], key: &VerifyingKey) -> bool {
    let Ok(signature) = Signature::from_slice(signature) else {
        return false;
    };
    key.verify(content, &signature).is_ok()
}
