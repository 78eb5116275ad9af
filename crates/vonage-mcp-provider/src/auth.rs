//! Credential handling.
//!
//! Vonage accepts two schemes: the account API key/secret pair (as HTTP basic
//! auth or as query parameters on the legacy REST endpoints) and a short-lived
//! RS256 JWT signed with an application's private key.

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{
    ENV_API_KEY, ENV_API_SECRET, ENV_APPLICATION_ID, ENV_PRIVATE_KEY64, VonageConfig,
};
use crate::error::{ProviderError, Result};

/// Lifetime of a generated application token, in seconds.
const TOKEN_TTL_SECS: i64 = 900;

/// Claims carried by an application JWT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationClaims {
    pub application_id: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Account and application credentials, validated once at startup.
#[derive(Clone)]
pub struct Credentials {
    api_key: Option<String>,
    api_secret: Option<String>,
    application_id: Option<String>,
    signing_key: Option<EncodingKey>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("application_id", &self.application_id)
            .field("has_signing_key", &self.signing_key.is_some())
            .finish_non_exhaustive()
    }
}

impl Credentials {
    /// Build credentials from configuration, parsing the private key PEM.
    pub fn from_config(config: &VonageConfig) -> Result<Self> {
        let signing_key = match &config.private_key {
            Some(pem) => Some(EncodingKey::from_rsa_pem(pem).map_err(|e| {
                ProviderError::Config(format!(
                    "{ENV_PRIVATE_KEY64} does not hold an RSA private key: {e}"
                ))
            })?),
            None => None,
        };

        Ok(Self {
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            application_id: config.application_id.clone(),
            signing_key,
        })
    }

    /// Whether an application id and private key are both available.
    pub fn has_application(&self) -> bool {
        self.application_id.is_some() && self.signing_key.is_some()
    }

    /// The API key/secret pair.
    pub fn key_pair(&self) -> Result<(&str, &str)> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::Auth(format!("{ENV_API_KEY} is not set")))?;
        let secret = self
            .api_secret
            .as_deref()
            .ok_or_else(|| ProviderError::Auth(format!("{ENV_API_SECRET} is not set")))?;
        Ok((key, secret))
    }

    /// Sign a fresh application JWT.
    pub fn application_token(&self) -> Result<String> {
        let application_id = self
            .application_id
            .as_deref()
            .ok_or_else(|| ProviderError::Auth(format!("{ENV_APPLICATION_ID} is not set")))?;
        let key = self
            .signing_key
            .as_ref()
            .ok_or_else(|| ProviderError::Auth(format!("{ENV_PRIVATE_KEY64} is not set")))?;

        let now = Utc::now().timestamp();
        let claims = ApplicationClaims {
            application_id: application_id.to_owned(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
            jti: Uuid::now_v7().to_string(),
        };

        Ok(encode(&Header::new(Algorithm::RS256), &claims, key)?)
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{DecodingKey, Validation, decode};

    use super::*;

    const PRIVATE_KEY: &[u8] = include_bytes!("../tests/fixtures/private_key.pem");
    const PUBLIC_KEY: &[u8] = include_bytes!("../tests/fixtures/public_key.pem");

    fn config(pairs: &[(&str, &str)], private_key: Option<&[u8]>) -> VonageConfig {
        let owned: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        let mut config = VonageConfig::from_lookup(move |key| {
            owned.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
        .unwrap();
        config.private_key = private_key.map(<[u8]>::to_vec);
        config
    }

    #[test]
    fn key_pair_requires_both_values() {
        let creds = Credentials::from_config(&config(&[(ENV_API_KEY, "k")], None)).unwrap();
        let err = creds.key_pair().unwrap_err();
        assert!(err.to_string().contains(ENV_API_SECRET));

        let creds = Credentials::from_config(&config(
            &[(ENV_API_KEY, "k"), (ENV_API_SECRET, "s")],
            None,
        ))
        .unwrap();
        assert_eq!(creds.key_pair().unwrap(), ("k", "s"));
    }

    #[test]
    fn malformed_private_key_is_config_error() {
        let result = Credentials::from_config(&config(&[], Some(b"not a pem")));
        assert!(matches!(result, Err(ProviderError::Config(_))));
    }

    #[test]
    fn application_token_without_application_fails() {
        let creds = Credentials::from_config(&config(&[], Some(PRIVATE_KEY))).unwrap();
        assert!(!creds.has_application());
        let err = creds.application_token().unwrap_err();
        assert!(matches!(err, ProviderError::Auth(_)));
    }

    #[test]
    fn application_token_verifies_with_public_key() {
        let creds = Credentials::from_config(&config(
            &[(ENV_APPLICATION_ID, "app-123")],
            Some(PRIVATE_KEY),
        ))
        .unwrap();
        assert!(creds.has_application());

        let token = creds.application_token().unwrap();
        let key = DecodingKey::from_rsa_pem(PUBLIC_KEY).unwrap();
        let validation = Validation::new(Algorithm::RS256);
        let data = decode::<ApplicationClaims>(&token, &key, &validation).unwrap();

        assert_eq!(data.claims.application_id, "app-123");
        assert_eq!(data.claims.exp - data.claims.iat, TOKEN_TTL_SECS);
        assert!(!data.claims.jti.is_empty());
    }

    #[test]
    fn debug_hides_secret() {
        let creds = Credentials::from_config(&config(
            &[(ENV_API_KEY, "k"), (ENV_API_SECRET, "very-secret")],
            None,
        ))
        .unwrap();
        assert!(!format!("{creds:?}").contains("very-secret"));
    }
}
