use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use quill_types::api::Claims;

/// Session lifetime. Rotating the signing secret invalidates every
/// outstanding token before this elapses; there is no revocation list.
const TOKEN_TTL_HOURS: i64 = 24;

/// Outcome of verifying a token. Malformed tokens, signature mismatches and
/// expired tokens all collapse to `Invalid` — callers never learn which.
#[derive(Debug)]
pub enum TokenOutcome {
    Valid(Claims),
    Invalid,
}

/// Signs and verifies session tokens. Keys are derived from the secret once
/// at startup and carried in app state.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        // expiry is an absolute instant, no grace window
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, user_id: i64, username: &str) -> Result<String> {
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            exp: (chrono::Utc::now() + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp()
                as usize,
        };

        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> TokenOutcome {
        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => TokenOutcome::Valid(data.claims),
            Err(_) => TokenOutcome::Invalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret")
    }

    fn flip_char(token: &str, idx: usize) -> String {
        let mut bytes = token.as_bytes().to_vec();
        bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn issue_verify_roundtrip() {
        let codec = codec();
        let token = codec.issue(7, "alice").unwrap();

        match codec.verify(&token) {
            TokenOutcome::Valid(claims) => {
                assert_eq!(claims.sub, 7);
                assert_eq!(claims.username, "alice");
                assert!(claims.exp > chrono::Utc::now().timestamp() as usize);
            }
            TokenOutcome::Invalid => panic!("freshly issued token must verify"),
        }
    }

    #[test]
    fn expired_token_is_invalid() {
        let codec = codec();
        let claims = Claims {
            sub: 7,
            username: "alice".to_string(),
            exp: (chrono::Utc::now().timestamp() - 60) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(codec.verify(&token), TokenOutcome::Invalid));
    }

    #[test]
    fn tampered_payload_is_invalid() {
        let codec = codec();
        let token = codec.issue(7, "alice").unwrap();

        let first_dot = token.find('.').unwrap();
        let tampered = flip_char(&token, first_dot + 2);

        assert!(matches!(codec.verify(&tampered), TokenOutcome::Invalid));
    }

    #[test]
    fn tampered_signature_is_invalid() {
        let codec = codec();
        let token = codec.issue(7, "alice").unwrap();

        let tampered = flip_char(&token, token.len() - 1);

        assert!(matches!(codec.verify(&tampered), TokenOutcome::Invalid));
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token = codec().issue(7, "alice").unwrap();
        let other = TokenCodec::new("rotated-secret");

        assert!(matches!(other.verify(&token), TokenOutcome::Invalid));
    }

    #[test]
    fn garbage_is_invalid() {
        assert!(matches!(codec().verify("not-a-token"), TokenOutcome::Invalid));
        assert!(matches!(codec().verify(""), TokenOutcome::Invalid));
    }
}
