//! Google Calendar exporter.
//!
//! Creates one Calendar event per plan item. Uses OAuth2 with the Google
//! Calendar events scope; credentials live in the OS keyring.

use reqwest::{Client, StatusCode};

use super::keyring_store;
use super::oauth::{self, OAuthConfig, OAuthTokens};
use super::{CalendarClient, EventPayload, TokenProvider};
use crate::error::{ExportError, OAuthError};
use crate::storage::ExportConfig;

const SERVICE: &str = "google";

/// `events.insert` client for one calendar.
pub struct GoogleCalendarClient {
    http: Client,
    api_base: String,
    calendar_id: String,
}

impl GoogleCalendarClient {
    pub fn new(api_base: &str, calendar_id: &str) -> Self {
        Self {
            http: Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            calendar_id: calendar_id.to_string(),
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(&config.api_base, &config.calendar_id)
    }

    fn events_url(&self) -> String {
        let calendar: String =
            url::form_urlencoded::byte_serialize(self.calendar_id.as_bytes()).collect();
        format!("{}/calendars/{}/events", self.api_base, calendar)
    }
}

impl CalendarClient for GoogleCalendarClient {
    async fn insert_event(
        &self,
        access_token: &str,
        event: &EventPayload,
    ) -> Result<String, ExportError> {
        let resp = self
            .http
            .post(self.events_url())
            .bearer_auth(access_token)
            .json(&event.to_google_json())
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ExportError::Unauthorized);
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ExportError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = resp.json().await?;
        body["id"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| ExportError::Transport("missing event id in response".into()))
    }
}

/// Google OAuth credentials backed by the OS keyring.
#[derive(Debug, Clone, Default)]
pub struct GoogleTokens {
    client_id: String,
    client_secret: String,
}

impl GoogleTokens {
    /// Load client credentials from keyring. Empty if not stored yet.
    pub fn new() -> Self {
        let client_id = keyring_store::get("google_client_id")
            .ok()
            .flatten()
            .unwrap_or_default();
        let client_secret = keyring_store::get("google_client_secret")
            .ok()
            .flatten()
            .unwrap_or_default();

        Self {
            client_id,
            client_secret,
        }
    }

    /// Persist Google OAuth client credentials to the OS keyring.
    pub fn set_credentials(client_id: &str, client_secret: &str) -> Result<(), OAuthError> {
        keyring_store::set("google_client_id", client_id)?;
        keyring_store::set("google_client_secret", client_secret)?;
        Ok(())
    }

    pub fn oauth_config(&self) -> OAuthConfig {
        OAuthConfig {
            service_name: SERVICE.to_string(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            scopes: vec!["https://www.googleapis.com/auth/calendar.events".to_string()],
            redirect_port: 19821,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        oauth::load_tokens(SERVICE).is_some()
    }

    /// Run the browser authorization flow and store the tokens.
    pub async fn authenticate(&self) -> Result<(), OAuthError> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(OAuthError::CredentialsNotConfigured {
                service: SERVICE.to_string(),
            });
        }
        oauth::authorize(&self.oauth_config()).await?;
        Ok(())
    }

    /// Remove stored tokens.
    pub fn disconnect(&self) -> Result<(), OAuthError> {
        keyring_store::delete(SERVICE)
    }
}

impl TokenProvider for GoogleTokens {
    fn current(&self) -> Result<OAuthTokens, ExportError> {
        oauth::load_tokens(SERVICE).ok_or_else(|| {
            OAuthError::NotAuthenticated {
                service: SERVICE.to_string(),
            }
            .into()
        })
    }

    async fn refresh(&self) -> Result<OAuthTokens, ExportError> {
        let tokens = self.current()?;
        let refresh = tokens.refresh_token.ok_or(OAuthError::TokenExpired)?;
        let refreshed = oauth::refresh_token(&self.oauth_config(), &refresh).await?;
        Ok(refreshed)
    }
}
