//! Stateless access tokens
//!
//! HS512-signed JWTs carrying `{sub, iat, exp}`. The signing secret is
//! process-wide, loaded once at startup and never logged. Verification
//! collapses every failure (bad signature, expiry, malformed input) into the
//! single [`InvalidToken`] outcome.

use chrono::{DateTime, Duration, Utc};
use folio_core::config::{MAX_JWT_EXPIRY_HOURS, MIN_JWT_SECRET_BYTES};
use folio_core::{AppError, Config, Identity};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const ALGORITHM: Algorithm = Algorithm::HS512;

/// JWT claims embedded in every access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// A token failed verification. Forged, expired and malformed tokens are
/// indistinguishable to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid or expired token")]
pub struct InvalidToken;

#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &ALGORITHM)
            .field("ttl_hours", &self.ttl.num_hours())
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl TokenCodec {
    /// Build a codec from raw key material.
    ///
    /// Fails when the secret is shorter than 64 bytes or the TTL is not within
    /// `(0, MAX_JWT_EXPIRY_HOURS]`.
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, AppError> {
        if secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(AppError::Internal(format!(
                "JWT secret must be at least {} bytes, got {}",
                MIN_JWT_SECRET_BYTES,
                secret.len()
            )));
        }
        if ttl <= Duration::zero() {
            return Err(AppError::Internal(
                "Token TTL must be positive".to_string(),
            ));
        }
        if ttl > Duration::hours(MAX_JWT_EXPIRY_HOURS) {
            return Err(AppError::Internal(format!(
                "Token TTL must not exceed {} hours",
                MAX_JWT_EXPIRY_HOURS
            )));
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["sub", "iat", "exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, anyhow::Error> {
        let secret = config.jwt_secret_bytes()?;
        let hours = config.jwt_expiry_hours();
        let ttl = Duration::try_hours(hours)
            .ok_or_else(|| anyhow::anyhow!("JWT_EXPIRY_HOURS out of range: {}", hours))?;
        let codec = Self::new(&secret, ttl)?;
        Ok(codec)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `subject`, valid from now for the configured TTL.
    pub fn issue(&self, subject: &str) -> Result<String, AppError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token as if it had been minted at `now`.
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String, AppError> {
        if subject.is_empty() {
            return Err(AppError::InvalidInput(
                "Token subject must not be empty".to_string(),
            ));
        }

        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal("Token expiry out of range".to_string()))?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Check signature, structure and expiry; return the authenticated identity.
    pub fn verify(&self, token: &str) -> Result<Identity, InvalidToken> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| InvalidToken)?;

        let claims = data.claims;
        if claims.sub.is_empty() || claims.iat > claims.exp {
            return Err(InvalidToken);
        }

        Ok(Identity::authenticated(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(&[7u8; 64], Duration::hours(24)).unwrap()
    }

    #[test]
    fn test_issue_then_verify() {
        let codec = codec();
        let token = codec.issue("alice").unwrap();

        let identity = codec.verify(&token).unwrap();
        assert_eq!(identity.subject(), "alice");
        assert!(identity.is_authenticated());
    }

    #[test]
    fn test_verify_is_repeatable() {
        let codec = codec();
        let token = codec.issue("alice").unwrap();

        let first = codec.verify(&token).unwrap();
        let second = codec.verify(&token).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = codec();
        let minted = Utc::now() - Duration::hours(25);
        let token = codec.issue_at("alice", minted).unwrap();

        assert_eq!(codec.verify(&token), Err(InvalidToken));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let codec = codec();
        let token = codec.issue("alice").unwrap();
        let (unsigned, signature) = token.rsplit_once('.').unwrap();
        let mut signature: Vec<char> = signature.chars().collect();
        signature[0] = if signature[0] == 'A' { 'B' } else { 'A' };
        let token = format!("{}.{}", unsigned, signature.into_iter().collect::<String>());

        assert_eq!(codec.verify(&token), Err(InvalidToken));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        use base64::Engine;

        let codec = codec();
        let token = codec.issue("alice").unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let forged_claims = Claims {
            sub: "mallory".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_eq!(codec.verify(&forged), Err(InvalidToken));
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = codec().issue("alice").unwrap();
        let other = TokenCodec::new(&[9u8; 64], Duration::hours(24)).unwrap();

        assert_eq!(other.verify(&token), Err(InvalidToken));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let codec = codec();
        for token in ["", "abc", "a.b.c", "Bearer x.y.z"] {
            assert_eq!(codec.verify(token), Err(InvalidToken));
        }
    }

    #[test]
    fn test_short_secret_refused() {
        assert!(TokenCodec::new(&[1u8; 63], Duration::hours(1)).is_err());
        assert!(TokenCodec::new(&[1u8; 64], Duration::zero()).is_err());
    }

    #[test]
    fn test_ttl_upper_bound() {
        let max = Duration::hours(MAX_JWT_EXPIRY_HOURS);
        assert!(TokenCodec::new(&[1u8; 64], max).is_ok());
        assert!(TokenCodec::new(&[1u8; 64], max + Duration::hours(1)).is_err());
    }

    #[test]
    fn test_expiry_overflow_is_an_error() {
        let minted = DateTime::<Utc>::MAX_UTC - Duration::hours(1);
        assert!(matches!(
            codec().issue_at("alice", minted),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn test_empty_subject_refused() {
        assert!(codec().issue("").is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", codec());
        assert!(rendered.contains("<redacted>"));
    }
}
