use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use promptsheet_core::SinkError;
use reqwest::Client;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

const SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// The subset of a Google service-account blob this sink needs.
///
/// The blob arrives as a JSON string in the environment, never as a file
/// path.
#[derive(Clone, Debug, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_json(blob: &str) -> Result<Self, SinkError> {
        serde_json::from_str(blob)
            .map_err(|err| SinkError::Config(format!("invalid service account blob: {err}")))
    }
}

/// Source of short-lived bearer tokens for the sheets/drive calls.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<SecretString, SinkError>;
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges a signed RS256 assertion for an access token at the
/// blob's `token_uri`. Tokens are fetched per publish run, not cached.
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    http: Client,
}

impl ServiceAccountAuth {
    pub fn new(key: ServiceAccountKey) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("valid reqwest client config");
        Self { key, http }
    }

    fn assertion(&self) -> Result<String, SinkError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|err| SinkError::Auth(err.to_string()))?
            .as_secs();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SCOPES,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + 3600,
        };
        let signer = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|err| SinkError::Auth(format!("invalid private key: {err}")))?;
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &signer)
            .map_err(|err| SinkError::Auth(format!("signing assertion failed: {err}")))
    }
}

#[async_trait::async_trait]
impl TokenProvider for ServiceAccountAuth {
    async fn access_token(&self) -> Result<SecretString, SinkError> {
        let assertion = self.assertion()?;
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|err| SinkError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Auth(format!(
                "token exchange failed with {status}: {body}"
            )));
        }

        let token = response
            .json::<TokenResponse>()
            .await
            .map_err(|err| SinkError::Malformed(err.to_string()))?;
        Ok(SecretString::new(token.access_token))
    }
}
