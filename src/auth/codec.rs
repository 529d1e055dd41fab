// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance and verification.
//!
//! Tokens are compact HS512 JWTs carrying `{sub, iat, exp}`. Nothing is stored
//! server-side. A token is valid while its signature verifies under the process
//! signing key and `now < exp`. Rotating the key (a restart with a new
//! `TOKEN_SIGNING_SECRET`) invalidates every token.
//!
//! Expiry is checked here against the injected [`Clock`] rather than by
//! `jsonwebtoken`, so `verify_at` is a pure function of token, key and time.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use super::claims::TokenClaims;

/// Algorithm written into (and required from) the token header.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS512;

/// Minimum accepted signing secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Errors produced while verifying a presented token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token could not be decoded into header, claims and signature.
    #[error("token is malformed")]
    Malformed,
    /// The signature does not match the claims under the current key.
    #[error("token signature is invalid")]
    BadSignature,
    /// The signature is valid but the token is past its expiry.
    #[error("token has expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

/// Errors produced while minting a token. These are server-side failures.
#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    #[error("cannot issue a token for an empty subject")]
    EmptySubject,
    #[error("token expiry overflows at issue time {issued_at}")]
    ExpiryOverflow { issued_at: i64 },
    #[error("failed to sign token: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
}

/// Signing key errors, raised once at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("signing secret is {len} bytes, at least {min} are required")]
    TooShort { len: usize, min: usize },
}

/// Process-wide HMAC secret.
///
/// Loaded once at startup and never mutated. `Debug` does not print the bytes.
#[derive(Clone)]
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Result<Self, KeyError> {
        let bytes = bytes.as_ref();
        if bytes.len() < MIN_SECRET_LEN {
            return Err(KeyError::TooShort {
                len: bytes.len(),
                min: MIN_SECRET_LEN,
            });
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        })
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Source of the current time in unix seconds.
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Manually driven clock for tests and deterministic replays.
#[derive(Debug, Default)]
pub struct FixedClock(AtomicI64);

impl FixedClock {
    pub fn at(now: i64) -> Self {
        Self(AtomicI64::new(now))
    }

    pub fn advance(&self, secs: i64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// A freshly minted token together with its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

/// Mints and checks bearer tokens.
///
/// Holds only immutable state, so a single instance is shared across all
/// request tasks without locking.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    key: SigningKey,
    validity_secs: i64,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a codec reading time from the system clock.
    pub fn new(key: SigningKey, validity: Duration) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            key,
            validity_secs: i64::try_from(validity.as_secs()).unwrap_or(i64::MAX),
            validation,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Issue a token for `subject`, valid from now for the configured window.
    pub fn issue(&self, subject: &str) -> Result<IssuedToken, IssueError> {
        self.issue_at(subject, self.clock.now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, subject: &str, now: i64) -> Result<IssuedToken, IssueError> {
        if subject.is_empty() {
            return Err(IssueError::EmptySubject);
        }

        let expires_at = now
            .checked_add(self.validity_secs)
            .ok_or(IssueError::ExpiryOverflow { issued_at: now })?;

        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now,
            exp: expires_at,
        };
        let token = encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.key.encoding)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify a token against the codec's clock and return its subject.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, self.clock.now())
    }

    /// Verify a token as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<String, TokenError> {
        let claims = decode::<TokenClaims>(token, &self.key.decoding, &self.validation)?.claims;

        if claims.sub.is_empty() {
            return Err(TokenError::Malformed);
        }
        if now >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

    const SECRET: &[u8] = b"test-signing-secret-with-at-least-32-bytes";
    const OTHER_SECRET: &[u8] = b"another-signing-secret-of-sufficient-length";
    const WINDOW: Duration = Duration::from_secs(900);

    fn codec(secret: &[u8]) -> TokenCodec {
        TokenCodec::new(SigningKey::from_bytes(secret).unwrap(), WINDOW)
    }

    fn split(token: &str) -> (String, String, String) {
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        (parts[0].into(), parts[1].into(), parts[2].into())
    }

    #[test]
    fn issued_token_round_trips_inside_window() {
        let codec = codec(SECRET);
        let issued = codec.issue_at("alice", 1000).unwrap();
        assert_eq!(issued.expires_at, 1900);

        for now in [1000, 1001, 1450, 1899] {
            assert_eq!(codec.verify_at(&issued.token, now), Ok("alice".to_string()));
        }
    }

    #[test]
    fn token_expires_at_window_boundary() {
        let codec = codec(SECRET);
        let issued = codec.issue_at("alice", 1000).unwrap();

        assert_eq!(codec.verify_at(&issued.token, 1900), Err(TokenError::Expired));
        assert_eq!(codec.verify_at(&issued.token, 99_999), Err(TokenError::Expired));
    }

    #[test]
    fn token_is_a_three_segment_header_safe_string() {
        let issued = codec(SECRET).issue_at("alice", 1000).unwrap();
        assert_eq!(issued.token.matches('.').count(), 2);
        assert!(issued
            .token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'));

        let (header, _, _) = split(&issued.token);
        let header: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(&header).unwrap()).unwrap();
        assert_eq!(header["alg"], "HS512");
    }

    #[test]
    fn issue_is_deterministic_for_same_clock_and_key() {
        let codec = codec(SECRET);
        assert_eq!(
            codec.issue_at("alice", 1000).unwrap(),
            codec.issue_at("alice", 1000).unwrap()
        );
    }

    #[test]
    fn token_from_other_secret_has_bad_signature() {
        let issued = codec(SECRET).issue_at("alice", 1000).unwrap();
        assert_eq!(
            codec(OTHER_SECRET).verify_at(&issued.token, 1001),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn rewritten_claims_are_rejected() {
        let codec = codec(SECRET);
        let issued = codec.issue_at("alice", 1000).unwrap();
        let (header, _, signature) = split(&issued.token);

        let forged = TokenClaims {
            sub: "mallory".into(),
            iat: 1000,
            exp: 1900,
        };
        let forged_claims = URL_SAFE_NO_PAD.encode(&serde_json::to_vec(&forged).unwrap());
        let token = format!("{header}.{forged_claims}.{signature}");

        assert_eq!(codec.verify_at(&token, 1001), Err(TokenError::BadSignature));
    }

    #[test]
    fn extended_expiry_is_rejected() {
        let codec = codec(SECRET);
        let issued = codec.issue_at("alice", 1000).unwrap();
        let (header, _, signature) = split(&issued.token);

        let extended = TokenClaims {
            sub: "alice".into(),
            iat: 1000,
            exp: i64::MAX,
        };
        let claims = URL_SAFE_NO_PAD.encode(&serde_json::to_vec(&extended).unwrap());
        let token = format!("{header}.{claims}.{signature}");

        assert_eq!(codec.verify_at(&token, 5000), Err(TokenError::BadSignature));
    }

    #[test]
    fn every_flipped_signature_bit_is_rejected() {
        let codec = codec(SECRET);
        let issued = codec.issue_at("alice", 1000).unwrap();
        let (header, claims, signature) = split(&issued.token);
        let signature = URL_SAFE_NO_PAD.decode(&signature).unwrap();

        for index in 0..signature.len() {
            let mut tampered = signature.clone();
            tampered[index] ^= 0x01;
            let token = format!(
                "{header}.{claims}.{}",
                URL_SAFE_NO_PAD.encode(&tampered)
            );
            assert_eq!(
                codec.verify_at(&token, 1001),
                Err(TokenError::BadSignature),
                "flipped signature byte {index} was accepted"
            );
        }
    }

    #[test]
    fn flipped_characters_never_verify() {
        let codec = codec(SECRET);
        let issued = codec.issue_at("alice", 1000).unwrap();
        let bytes = issued.token.as_bytes();

        // The final character of each segment may carry unused padding bits,
        // so only interior characters are swapped.
        let interior = (1..bytes.len() - 1).filter(|&i| {
            bytes[i] != b'.' && bytes[i + 1] != b'.' && bytes[i - 1] != b'.'
        });
        for index in interior {
            let mut tampered = bytes.to_vec();
            tampered[index] = if tampered[index] == b'A' { b'B' } else { b'A' };
            let token = String::from_utf8(tampered).unwrap();
            let result = codec.verify_at(&token, 1001);
            assert!(
                matches!(result, Err(TokenError::BadSignature | TokenError::Malformed)),
                "tampered character {index} produced {result:?}"
            );
        }
    }

    #[test]
    fn structurally_broken_tokens_are_malformed() {
        let codec = codec(SECRET);
        let issued = codec.issue_at("alice", 1000).unwrap();
        let (header, claims, signature) = split(&issued.token);

        let cases = [
            String::new(),
            "garbage".to_string(),
            format!("{header}.{claims}"),
            format!("{header}.{claims}.{signature}.extra"),
            format!("!!!.{claims}.{signature}"),
            format!("{}.{claims}.{signature}", URL_SAFE_NO_PAD.encode(b"not json")),
        ];
        for token in cases {
            assert_eq!(
                codec.verify_at(&token, 1001),
                Err(TokenError::Malformed),
                "{token:?}"
            );
        }
    }

    #[test]
    fn undecodable_claims_or_signature_never_verify() {
        let codec = codec(SECRET);
        let issued = codec.issue_at("alice", 1000).unwrap();
        let (header, claims, signature) = split(&issued.token);

        for token in [
            format!("{header}.!!!.{signature}"),
            format!("{header}.{claims}.not*base64"),
        ] {
            let result = codec.verify_at(&token, 1001);
            assert!(
                matches!(result, Err(TokenError::Malformed | TokenError::BadSignature)),
                "{token:?} produced {result:?}"
            );
        }
    }

    #[test]
    fn signed_claims_without_subject_are_malformed() {
        let codec = codec(SECRET);
        let claims = serde_json::json!({ "iat": 1000, "exp": 1900 });
        let token = encode(&Header::new(TOKEN_ALGORITHM), &claims, &codec.key.encoding).unwrap();
        assert_eq!(codec.verify_at(&token, 1001), Err(TokenError::Malformed));

        let empty = TokenClaims {
            sub: String::new(),
            iat: 1000,
            exp: 1900,
        };
        let token = encode(&Header::new(TOKEN_ALGORITHM), &empty, &codec.key.encoding).unwrap();
        assert_eq!(codec.verify_at(&token, 1001), Err(TokenError::Malformed));
    }

    #[test]
    fn other_hmac_algorithm_is_malformed() {
        let codec = codec(SECRET);
        let claims = TokenClaims {
            sub: "alice".into(),
            iat: 1000,
            exp: 1900,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &codec.key.encoding).unwrap();
        assert_eq!(codec.verify_at(&token, 1001), Err(TokenError::Malformed));
    }

    #[test]
    fn unsupported_algorithm_is_malformed() {
        let codec = codec(SECRET);
        let issued = codec.issue_at("alice", 1000).unwrap();
        let (_, claims, signature) = split(&issued.token);
        let none_header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);

        assert_eq!(
            codec.verify_at(&format!("{none_header}.{claims}.{signature}"), 1001),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn empty_subject_cannot_be_issued() {
        assert!(matches!(
            codec(SECRET).issue_at("", 1000),
            Err(IssueError::EmptySubject)
        ));
    }

    #[test]
    fn expiry_overflow_is_an_issue_error() {
        assert!(matches!(
            codec(SECRET).issue_at("alice", i64::MAX),
            Err(IssueError::ExpiryOverflow { .. })
        ));
    }

    #[test]
    fn short_secret_is_rejected() {
        assert_eq!(
            SigningKey::from_bytes(b"short").unwrap_err(),
            KeyError::TooShort { len: 5, min: MIN_SECRET_LEN }
        );
    }

    #[test]
    fn signing_key_debug_is_redacted() {
        let key = SigningKey::from_bytes(SECRET).unwrap();
        assert_eq!(format!("{key:?}"), "SigningKey(<redacted>)");
    }

    #[test]
    fn verify_uses_injected_clock() {
        let clock = Arc::new(FixedClock::at(1000));
        let codec = codec(SECRET).with_clock(clock.clone());
        let issued = codec.issue("alice").unwrap();

        clock.advance(899);
        assert_eq!(codec.verify(&issued.token), Ok("alice".to_string()));

        clock.advance(1);
        assert_eq!(codec.verify(&issued.token), Err(TokenError::Expired));
    }
}
