//! Session token value object - the reversible session codec.
//!
//! A token is the URL-safe base64 encoding of `user_id:issued_at_ms`.
//! It carries no signature and derives no expiry; the cookie's Max-Age is
//! the only lifetime bound. See DESIGN.md for the security implications of
//! preserving this wire format.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use uuid::Uuid;

use crate::config::TOKEN_DELIMITER;
use crate::errors::{AppError, AppResult};

/// Decoded session token contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionToken {
    pub user_id: Uuid,
    pub issued_at_ms: i64,
}

impl SessionToken {
    /// Create a token for a user, stamped with the current time.
    pub fn issue(user_id: Uuid) -> Self {
        Self {
            user_id,
            issued_at_ms: Utc::now().timestamp_millis(),
        }
    }

    /// Encode into the transport-safe cookie value.
    pub fn encode(&self) -> String {
        let raw = format!("{}{}{}", self.user_id, TOKEN_DELIMITER, self.issued_at_ms);
        URL_SAFE_NO_PAD.encode(raw)
    }

    /// Decode a cookie value back into its parts.
    ///
    /// Fails with `MalformedToken` on any string not produced by `encode`:
    /// bad base64, non-UTF-8 payload, missing delimiter, or unparseable
    /// id/timestamp. Never panics.
    pub fn decode(token: &str) -> AppResult<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| AppError::MalformedToken)?;
        let raw = String::from_utf8(bytes).map_err(|_| AppError::MalformedToken)?;

        let (user_part, ts_part) = raw
            .split_once(TOKEN_DELIMITER)
            .ok_or(AppError::MalformedToken)?;

        let user_id = Uuid::parse_str(user_part).map_err(|_| AppError::MalformedToken)?;
        let issued_at_ms: i64 = ts_part.parse().map_err(|_| AppError::MalformedToken)?;

        Ok(Self {
            user_id,
            issued_at_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let token = SessionToken {
            user_id: Uuid::new_v4(),
            issued_at_ms: 1_700_000_000_000,
        };
        let decoded = SessionToken::decode(&token.encode()).unwrap();
        assert_eq!(decoded, token);
    }

    #[test]
    fn test_issue_stamps_current_time() {
        let before = Utc::now().timestamp_millis();
        let token = SessionToken::issue(Uuid::new_v4());
        let after = Utc::now().timestamp_millis();
        assert!(token.issued_at_ms >= before && token.issued_at_ms <= after);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let bad_tokens = vec![
            String::new(),
            "not base64 !!!".to_string(),
            // valid base64 of a payload without the delimiter
            URL_SAFE_NO_PAD.encode("no-delimiter-here"),
            // delimiter present but id is not a uuid
            URL_SAFE_NO_PAD.encode("not-a-uuid:12345"),
            // uuid ok, timestamp is not a number
            URL_SAFE_NO_PAD.encode(format!("{}:tomorrow", Uuid::new_v4())),
        ];

        for bad in &bad_tokens {
            assert!(
                matches!(SessionToken::decode(bad), Err(AppError::MalformedToken)),
                "expected MalformedToken for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_decode_rejects_non_utf8_payload() {
        let bad = URL_SAFE_NO_PAD.encode([0xff, 0xfe, 0xfd]);
        assert!(matches!(
            SessionToken::decode(&bad),
            Err(AppError::MalformedToken)
        ));
    }
}
