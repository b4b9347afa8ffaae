//! App-credential bearer tokens for outbound connector calls (OAuth2 client credentials).

use crate::channels::ChannelError;
use crate::config::AppCredentials;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

pub const BOT_FRAMEWORK_TOKEN_ENDPOINT: &str =
    "https://login.microsoftonline.com/botframework.com/oauth2/v2.0/token";
const BOT_FRAMEWORK_SCOPE: &str = "https://api.botframework.com/.default";

/// Refresh this long before the token's stated expiry.
const REFRESH_MARGIN_SECS: i64 = 300;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Fetches and caches the bot's access token.
pub struct TokenProvider {
    credentials: AppCredentials,
    endpoint: String,
    client: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(credentials: AppCredentials) -> Self {
        Self::with_endpoint(credentials, BOT_FRAMEWORK_TOKEN_ENDPOINT)
    }

    /// Use a different token endpoint (sovereign clouds, tests).
    pub fn with_endpoint(credentials: AppCredentials, endpoint: impl Into<String>) -> Self {
        Self {
            credentials,
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
            cached: Mutex::new(None),
        }
    }

    pub fn app_id(&self) -> &str {
        &self.credentials.app_id
    }

    /// Cached token while fresh; otherwise requests a new one.
    pub async fn token(&self) -> Result<String, ChannelError> {
        let mut cached = self.cached.lock().await;
        if let Some(t) = cached.as_ref().filter(|t| t.is_fresh(Utc::now())) {
            return Ok(t.token.clone());
        }
        let fetched = self.fetch().await?;
        let token = fetched.token.clone();
        *cached = Some(fetched);
        Ok(token)
    }

    async fn fetch(&self) -> Result<CachedToken, ChannelError> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.app_id.as_str()),
            ("client_secret", self.credentials.app_password.as_str()),
            ("scope", BOT_FRAMEWORK_SCOPE),
        ];
        let res = self.client.post(&self.endpoint).form(&params).send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ChannelError::Token(format!("{} {}", status, body)));
        }
        let data: TokenResponse = res
            .json()
            .await
            .map_err(|e| ChannelError::Token(e.to_string()))?;
        log::debug!("connector token acquired, expires in {}s", data.expires_in);
        Ok(CachedToken {
            token: data.access_token,
            expires_at: Utc::now() + Duration::seconds(data.expires_in),
        })
    }
}
