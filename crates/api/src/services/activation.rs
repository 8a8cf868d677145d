//! Stateless activation tokens for email verification.
//!
//! Registration never writes to the database. The full pending account is
//! serialized into an HMAC-SHA256 signed token, mailed to the address being
//! verified, and materialized into a row only when the activation endpoint
//! receives the token back. A token that expires is simply re-requested by
//! registering again.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use mandarin_core::Email;

use crate::models::ImageRef;

type HmacSha256 = Hmac<Sha256>;

/// How long an activation token stays valid.
pub const TOKEN_TTL: Duration = Duration::minutes(5);

/// Errors that can occur verifying an activation token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Token is not `payload.signature` base64url, or the payload is not
    /// valid JSON.
    #[error("malformed token")]
    Malformed,

    /// Signature does not match the payload.
    #[error("invalid token signature")]
    BadSignature,

    /// Token was valid but past its expiry.
    #[error("token expired")]
    Expired,
}

/// A customer account waiting for email verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingUser {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub phone: Option<String>,
    pub avatar: Option<ImageRef>,
}

/// A seller account waiting for email verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingShop {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub phone: String,
    pub address: String,
    pub zip_code: String,
    pub avatar: Option<ImageRef>,
}

/// Envelope around the pending payload carrying the expiry timestamp.
#[derive(Debug, Serialize, Deserialize)]
struct Claims<T> {
    #[serde(flatten)]
    payload: T,
    exp: DateTime<Utc>,
}

/// Signs and verifies activation tokens.
#[derive(Clone)]
pub struct ActivationSigner {
    secret: SecretString,
}

impl ActivationSigner {
    /// Create a signer from the configured activation secret.
    #[must_use]
    pub const fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Sign a pending payload into a `payload.signature` token.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if the payload fails to serialize.
    pub fn sign<T: Serialize>(&self, payload: T) -> Result<String, serde_json::Error> {
        self.sign_with_expiry(payload, Utc::now() + TOKEN_TTL)
    }

    fn sign_with_expiry<T: Serialize>(
        &self,
        payload: T,
        exp: DateTime<Utc>,
    ) -> Result<String, serde_json::Error> {
        let claims = Claims { payload, exp };
        let body = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signature = URL_SAFE_NO_PAD.encode(self.mac(body.as_bytes()));
        Ok(format!("{body}.{signature}"))
    }

    /// Verify a token and deserialize its pending payload.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Malformed` if the token shape or payload is
    /// invalid, `TokenError::BadSignature` on a signature mismatch, and
    /// `TokenError::Expired` once the embedded expiry has passed.
    pub fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        let (body, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| TokenError::BadSignature)?;
        mac.update(body.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let claims_bytes = URL_SAFE_NO_PAD
            .decode(body)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims<T> =
            serde_json::from_slice(&claims_bytes).map_err(|_| TokenError::Malformed)?;

        if claims.exp < Utc::now() {
            return Err(TokenError::Expired);
        }

        Ok(claims.payload)
    }

    fn mac(&self, data: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, Utc};
    use secrecy::SecretString;

    use mandarin_core::Email;

    use super::{ActivationSigner, PendingUser, TokenError};

    fn signer() -> ActivationSigner {
        ActivationSigner::new(SecretString::from("k".repeat(32)))
    }

    fn pending() -> PendingUser {
        PendingUser {
            name: "Ada".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            password_hash: "$argon2id$stub".to_string(),
            phone: None,
            avatar: None,
        }
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let signer = signer();
        let token = signer.sign(pending()).unwrap();
        let verified: PendingUser = signer.verify(&token).unwrap();
        assert_eq!(verified.name, "Ada");
        assert_eq!(verified.email.as_str(), "ada@example.com");
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let signer = signer();
        let token = signer.sign(pending()).unwrap();
        let (body, signature) = token.split_once('.').unwrap();
        let mut body = body.to_string();
        // Flip one character of the payload.
        body.replace_range(0..1, "Z");
        let tampered = format!("{body}.{signature}");
        assert!(matches!(
            signer.verify::<PendingUser>(&tampered),
            Err(TokenError::BadSignature)
        ));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = signer().sign(pending()).unwrap();
        let other = ActivationSigner::new(SecretString::from("x".repeat(32)));
        assert!(matches!(
            other.verify::<PendingUser>(&token),
            Err(TokenError::BadSignature)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let signer = signer();
        let token = signer
            .sign_with_expiry(pending(), Utc::now() - Duration::seconds(1))
            .unwrap();
        assert!(matches!(
            signer.verify::<PendingUser>(&token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(
            signer().verify::<PendingUser>("not-a-token"),
            Err(TokenError::Malformed)
        ));
    }
}
