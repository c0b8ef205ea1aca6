//! Bearer-token handling for the SSO flow.
//!
//! The login portal hands the client a JWT; we never verify its signature
//! (the backend does that on every request) but we do decode the payload
//! to check expiry and organizer group membership before attempting any
//! check-in, so an operator with a stale token is bounced to the portal
//! instead of seeing a wall of 401s.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::Error;

/// The group claim that grants check-in authority.
pub const ORGANIZER_GROUP: &str = "organizers_current";

/// Claims we care about from the portal-issued JWT payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Subject -- the operator's user id.
    pub sub: String,
    /// Display name, if the portal includes one.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Expiry as a unix timestamp (seconds).
    pub exp: i64,
    /// Cognito-style group memberships.
    #[serde(rename = "cognito:groups", default)]
    pub groups: Vec<String>,
}

impl TokenClaims {
    /// Whether the token has expired as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Whether the claims grant check-in authority.
    pub fn is_organizer(&self) -> bool {
        self.groups.iter().any(|g| g == ORGANIZER_GROUP)
    }
}

/// A bearer token paired with its decoded claims.
#[derive(Debug, Clone)]
pub struct BearerToken {
    raw: SecretString,
    claims: TokenClaims,
}

impl BearerToken {
    /// Decode a raw JWT into a `BearerToken`.
    ///
    /// Only the payload segment is decoded; the signature is the backend's
    /// problem. Fails on structurally invalid tokens.
    pub fn decode(raw: SecretString) -> Result<Self, Error> {
        let claims = decode_claims(raw.expose_secret())?;
        Ok(Self { raw, claims })
    }

    /// Decode and additionally require a live, organizer-scoped token.
    pub fn decode_checked(raw: SecretString, now: DateTime<Utc>) -> Result<Self, Error> {
        let token = Self::decode(raw)?;
        if token.claims.is_expired(now) {
            return Err(Error::TokenExpired);
        }
        if !token.claims.is_organizer() {
            return Err(Error::NotOrganizer);
        }
        Ok(token)
    }

    pub fn claims(&self) -> &TokenClaims {
        &self.claims
    }

    /// The raw token for the `Authorization` header.
    pub fn expose(&self) -> &str {
        self.raw.expose_secret()
    }
}

/// Decode the payload segment of a JWT without verifying the signature.
fn decode_claims(raw: &str) -> Result<TokenClaims, Error> {
    let payload = raw.split('.').nth(1).ok_or_else(|| Error::TokenInvalid {
        reason: "not a JWT (missing payload segment)".into(),
    })?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| Error::TokenInvalid {
            reason: format!("payload is not base64url: {e}"),
        })?;

    serde_json::from_slice(&bytes).map_err(|e| Error::TokenInvalid {
        reason: format!("payload is not a claims object: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_jwt(payload: serde_json::Value) -> SecretString {
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("eyJhbGciOiJSUzI1NiJ9.{body}.sig").into()
    }

    fn organizer_payload(exp: i64) -> serde_json::Value {
        serde_json::json!({
            "sub": "702f951f-8719-445d-b277-eaa4ea49dd41",
            "name": "Ada",
            "email": "ada@example.com",
            "exp": exp,
            "cognito:groups": ["organizers_current"],
        })
    }

    #[test]
    fn decodes_organizer_token() {
        let now = Utc.with_ymd_and_hms(2024, 2, 16, 12, 0, 0).unwrap();
        let token = BearerToken::decode_checked(make_jwt(organizer_payload(now.timestamp() + 3600)), now)
            .unwrap();
        assert_eq!(token.claims().sub, "702f951f-8719-445d-b277-eaa4ea49dd41");
        assert!(token.claims().is_organizer());
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc.with_ymd_and_hms(2024, 2, 16, 12, 0, 0).unwrap();
        let result =
            BearerToken::decode_checked(make_jwt(organizer_payload(now.timestamp() - 1)), now);
        assert!(matches!(result, Err(Error::TokenExpired)));
    }

    #[test]
    fn exp_exactly_now_counts_as_expired() {
        let now = Utc.with_ymd_and_hms(2024, 2, 16, 12, 0, 0).unwrap();
        let result =
            BearerToken::decode_checked(make_jwt(organizer_payload(now.timestamp())), now);
        assert!(matches!(result, Err(Error::TokenExpired)));
    }

    #[test]
    fn non_organizer_is_rejected() {
        let now = Utc.with_ymd_and_hms(2024, 2, 16, 12, 0, 0).unwrap();
        let payload = serde_json::json!({
            "sub": "abc",
            "exp": now.timestamp() + 3600,
            "cognito:groups": ["hackers"],
        });
        let result = BearerToken::decode_checked(make_jwt(payload), now);
        assert!(matches!(result, Err(Error::NotOrganizer)));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let result = BearerToken::decode("not-a-jwt".to_string().into());
        assert!(matches!(result, Err(Error::TokenInvalid { .. })));
    }

    #[test]
    fn missing_groups_claim_defaults_to_empty() {
        let payload = serde_json::json!({ "sub": "abc", "exp": 4_102_444_800_i64 });
        let token = BearerToken::decode(make_jwt(payload)).unwrap();
        assert!(!token.claims().is_organizer());
    }
}
