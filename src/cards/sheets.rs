//! Google Sheets card source (values API, read-only).

use super::normalize::{RawPayload, normalize};
use super::{CardRecord, CardSource};
use crate::config::{SheetAuth, SheetsSettings};
use crate::error::FetchError;
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const READONLY_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Serialize)]
struct GrantClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct SheetsSource {
    http: reqwest::Client,
    settings: SheetsSettings,
}

impl SheetsSource {
    pub fn new(http: reqwest::Client, settings: SheetsSettings) -> Self {
        Self { http, settings }
    }

    fn values_url(&self) -> Result<reqwest::Url, FetchError> {
        let mut url = reqwest::Url::parse(SHEETS_API)
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::Decode("sheets api url cannot be a base".into()))?
            .extend([
                self.settings.spreadsheet_id.as_str(),
                "values",
                self.settings.range.as_str(),
            ]);
        Ok(url)
    }

    /// Service-account JWT bearer grant. Tokens are not kept between fetches.
    async fn access_token(&self, email: &str, private_key: &str) -> Result<String, FetchError> {
        let now = chrono::Utc::now().timestamp();
        let claims = GrantClaims {
            iss: email,
            scope: READONLY_SCOPE,
            aud: TOKEN_URL,
            iat: now,
            exp: now + 3600,
        };
        let key = EncodingKey::from_rsa_pem(private_key.as_bytes())
            .map_err(|e| FetchError::Auth(format!("bad private key: {e}")))?;
        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| FetchError::Auth(e.to_string()))?;

        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Auth(format!("token endpoint returned {status}: {body}")));
        }
        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Raw grid for the configured range.
    pub async fn read_grid(&self) -> Result<Vec<Vec<String>>, FetchError> {
        let url = self.values_url()?;
        let request = match &self.settings.auth {
            SheetAuth::ApiKey(key) => self.http.get(url).query(&[("key", key.as_str())]),
            SheetAuth::ServiceAccount { email, private_key } => {
                let token = self.access_token(email, private_key).await?;
                self.http.get(url).bearer_auth(token)
            }
        };

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        let range: ValueRange = response.json().await?;
        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }
}

fn cell_text(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl CardSource for SheetsSource {
    #[instrument(level = "debug", skip(self), fields(range = %self.settings.range))]
    async fn fetch_records(&self) -> Result<Vec<CardRecord>, FetchError> {
        let grid = self.read_grid().await?;
        debug!(target = "source.sheets", rows = grid.len(), "fetched range");
        Ok(normalize(RawPayload::Grid(grid)))
    }
}
