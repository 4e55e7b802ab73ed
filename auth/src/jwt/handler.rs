use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::Error as JsonWebTokenError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// JWT token handler for encoding and decoding tokens.
///
/// Tokens are always signed with the current secret. Retired secrets can be
/// registered with [`JwtHandler::with_previous_secrets`]; tokens signed with
/// them keep validating until they expire, which allows rotating the secret
/// without logging every session out.
///
/// Uses HS256 (HMAC with SHA-256).
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_keys: Vec<DecodingKey>,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with the current signing secret.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Supply it through configuration, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_keys: vec![DecodingKey::from_secret(secret)],
            algorithm: Algorithm::HS256,
        }
    }

    /// Accept tokens signed with retired secrets.
    ///
    /// Previous secrets are only used for validation, never for signing.
    pub fn with_previous_secrets<I, S>(mut self, secrets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        self.decoding_keys.extend(
            secrets
                .into_iter()
                .map(|secret| DecodingKey::from_secret(secret.as_ref())),
        );
        self
    }

    /// Encode claims into a JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT token.
    ///
    /// The `exp` claim is required. Keys are tried in order: current secret
    /// first, then previous secrets.
    ///
    /// # Errors
    /// * `TokenExpired` - Token has expired
    /// * `MissingClaim` - Token has no `exp` claim
    /// * `InvalidToken` - Signature does not match any known secret
    /// * `DecodingFailed` - Token is malformed or claims do not deserialize
    pub fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_required_spec_claims(&["exp"]);

        let mut signature_error = None;
        for key in &self.decoding_keys {
            match decode::<T>(token, key, &validation) {
                Ok(token_data) => return Ok(token_data.claims),
                Err(e) if matches!(e.kind(), ErrorKind::InvalidSignature) => {
                    signature_error = Some(e);
                }
                Err(e) => return Err(map_decode_error(e)),
            }
        }

        Err(signature_error
            .map(map_decode_error)
            .unwrap_or_else(|| JwtError::InvalidToken("no signing key configured".to_string())))
    }
}

fn map_decode_error(error: JsonWebTokenError) -> JwtError {
    match error.kind() {
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        ErrorKind::InvalidSignature => {
            JwtError::InvalidToken("signature does not match".to_string())
        }
        ErrorKind::MissingRequiredClaim(claim) => JwtError::MissingClaim(claim.clone()),
        _ => JwtError::DecodingFailed(error.to_string()),
    }
}
