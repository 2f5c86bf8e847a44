//! Bearer-token payload decoding.
//!
//! Structural decoding only; nothing here checks a signature. The payload is
//! an assertion the verifier later confirms against the identity provider.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;

use crate::{Error, Result};

/// Claims read from a token payload, not yet trusted.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPayload {
    claims: Value,
}

impl TokenPayload {
    /// Get a claim by key.
    pub fn claim(&self, key: &str) -> Option<&Value> {
        self.claims.get(key)
    }

    /// Convenience accessor for the `site` claim.
    pub fn site(&self) -> Option<&str> {
        self.claim("site").and_then(|v| v.as_str())
    }
}

/// Decode the payload segment of a compact `header.payload.signature` token.
///
/// Accepts both padded and unpadded base64url payloads. A missing `site`
/// claim is not a decode failure; the verifier deals with it at the
/// site-binding step.
pub fn decode_payload(token: &str) -> Result<TokenPayload> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next()) {
        (Some(_), Some(payload)) => payload,
        _ => {
            return Err(Error::MalformedToken(
                "missing payload segment".to_string(),
            ));
        }
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| Error::MalformedToken(format!("payload is not base64url: {e}")))?;

    let claims: Value = serde_json::from_slice(&bytes)
        .map_err(|e| Error::MalformedToken(format!("payload is not valid JSON: {e}")))?;

    if !claims.is_object() {
        return Err(Error::MalformedToken(
            "payload is not a JSON object".to_string(),
        ));
    }

    Ok(TokenPayload { claims })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "h.eyJzaXRlIjoiZXhhbXBsZS5jb20ifQ.sig";

    #[test]
    fn decodes_site_claim() {
        let payload = decode_payload(TOKEN).unwrap();
        assert_eq!(payload.site(), Some("example.com"));
    }

    #[test]
    fn decode_is_idempotent() {
        let first = decode_payload(TOKEN).unwrap();
        let second = decode_payload(TOKEN).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn payload_without_signature_segment_still_decodes() {
        let payload = decode_payload("h.eyJzaXRlIjoiZXhhbXBsZS5jb20ifQ").unwrap();
        assert_eq!(payload.site(), Some("example.com"));
    }

    #[test]
    fn padded_payload_decodes() {
        let payload = decode_payload("h.eyJzaXRlIjoiZXhhbXBsZS5jb20ifQ==.sig").unwrap();
        assert_eq!(payload.site(), Some("example.com"));
    }

    #[test]
    fn rejects_token_without_payload_segment() {
        assert!(matches!(
            decode_payload("single-segment"),
            Err(Error::MalformedToken(_))
        ));
        assert!(matches!(decode_payload(""), Err(Error::MalformedToken(_))));
    }

    #[test]
    fn rejects_non_base64url_payload() {
        assert!(matches!(
            decode_payload("h.!not-base64!.sig"),
            Err(Error::MalformedToken(_))
        ));
    }

    #[test]
    fn rejects_payload_that_is_not_json() {
        // "aGVsbG8" decodes to "hello".
        assert!(matches!(
            decode_payload("h.aGVsbG8.sig"),
            Err(Error::MalformedToken(_))
        ));
    }

    #[test]
    fn rejects_payload_that_is_not_an_object() {
        // "NDI" decodes to "42".
        assert!(matches!(
            decode_payload("h.NDI.sig"),
            Err(Error::MalformedToken(_))
        ));
    }

    #[test]
    fn missing_site_claim_decodes_to_none() {
        let payload = decode_payload("h.eyJhdWQiOiJ4In0.sig").unwrap();
        assert_eq!(payload.site(), None);
        assert!(payload.claim("aud").is_some());
    }
}
