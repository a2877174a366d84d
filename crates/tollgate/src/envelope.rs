//! License envelope codec.
//!
//! Wire format: `base64(base64(signature) + "\n" + base64(content))`,
//! where `content` is the UTF-8 JSON license payload and `signature` is a
//! detached signature over those content bytes.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::error::{LicenseError, LicenseResult};

/// Decoded license envelope.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Detached signature over `content`.
    pub signature: Vec<u8>,

    /// Signed payload bytes (UTF-8 JSON).
    pub content: Vec<u8>,
}

fn malformed(reason: impl Into<String>) -> LicenseError {
    LicenseError::Malformed {
        reason: reason.into(),
    }
}

/// Decode the transport blob into signature and content bytes.
///
/// Pure transform; no side effects.
pub fn decode(raw: &str) -> LicenseResult<Envelope> {
    let outer = BASE64
        .decode(raw.trim())
        .map_err(|e| malformed(format!("invalid outer base64: {e}")))?;
    let outer = String::from_utf8(outer).map_err(|_| malformed("envelope is not UTF-8"))?;

    let (signature_b64, content_b64) = outer
        .split_once('\n')
        .ok_or_else(|| malformed("missing signature separator"))?;
    let content_b64 = content_b64.trim_end();
    if signature_b64.is_empty() || content_b64.is_empty() {
        return Err(malformed("empty envelope field"));
    }

    let signature = BASE64
        .decode(signature_b64)
        .map_err(|e| malformed(format!("invalid signature base64: {e}")))?;
    let content = BASE64
        .decode(content_b64)
        .map_err(|e| malformed(format!("invalid content base64: {e}")))?;

    Ok(Envelope { signature, content })
}

/// Encode signature and content bytes into the transport blob. Inverse of
/// [`decode`].
pub fn encode(signature: &[u8], content: &[u8]) -> String {
    let inner = format!("{}\n{}", BASE64.encode(signature), BASE64.encode(content));
    BASE64.encode(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let raw = encode(b"signature-bytes", br#"{"type":"gold"}"#);
        let envelope = decode(&raw).unwrap();
        assert_eq!(envelope.signature, b"signature-bytes");
        assert_eq!(envelope.content, br#"{"type":"gold"}"#);
    }

    #[test]
    fn decode_tolerates_surrounding_whitespace() {
        let raw = format!("  {}\n", encode(b"sig", b"content"));
        let envelope = decode(&raw).unwrap();
        assert_eq!(envelope.content, b"content");
    }

    #[test]
    fn rejects_invalid_outer_base64() {
        let result = decode("%%%not-base64%%%");
        assert!(matches!(result, Err(LicenseError::Malformed { .. })));
    }

    #[test]
    fn rejects_missing_separator() {
        // Valid outer base64, but no newline inside.
        let raw = BASE64.encode(BASE64.encode(b"only-one-field"));
        let result = decode(&raw);
        assert!(matches!(result, Err(LicenseError::Malformed { .. })));
    }

    #[test]
    fn rejects_empty_fields() {
        let raw = BASE64.encode(format!("\n{}", BASE64.encode(b"content")));
        assert!(matches!(decode(&raw), Err(LicenseError::Malformed { .. })));

        let raw = BASE64.encode(format!("{}\n", BASE64.encode(b"sig")));
        assert!(matches!(decode(&raw), Err(LicenseError::Malformed { .. })));
    }

    #[test]
    fn rejects_invalid_inner_base64() {
        let raw = BASE64.encode(format!("!!bad-sig!!\n{}", BASE64.encode(b"content")));
        assert!(matches!(decode(&raw), Err(LicenseError::Malformed { .. })));

        let raw = BASE64.encode(format!("{}\n!!bad-content!!", BASE64.encode(b"sig")));
        assert!(matches!(decode(&raw), Err(LicenseError::Malformed { .. })));
    }

    #[test]
    fn rejects_non_utf8_envelope() {
        let raw = BASE64.encode([0xff, 0xfe, 0x0a, 0xff]);
        assert!(matches!(decode(&raw), Err(LicenseError::Malformed { .. })));
    }
}
