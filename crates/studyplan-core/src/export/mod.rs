//! Calendar export of a finished plan.
//!
//! One external event is created per plan item. Per-item failures are
//! collected and reported; only credential failures stop the batch.

pub mod google;
pub mod oauth;

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ExportError;
use crate::plan::{Instant, PlanItem};
use oauth::OAuthTokens;

pub use google::{GoogleCalendarClient, GoogleTokens};

/// At most this many error messages are kept in an [`ExportReport`].
pub const MAX_SAMPLE_ERRORS: usize = 5;

const EVENT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One calendar event, in the owner's local time zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    pub summary: String,
    pub start: Instant,
    pub end: Instant,
    pub time_zone: String,
}

impl EventPayload {
    pub fn from_item(item: &PlanItem, time_zone: &str) -> Result<Self, ExportError> {
        if item.end <= item.start {
            return Err(ExportError::InvalidDates {
                title: item.title.clone(),
            });
        }
        Ok(Self {
            summary: item.title.clone(),
            start: item.start,
            end: item.end,
            time_zone: time_zone.to_string(),
        })
    }

    /// Google Calendar `events.insert` body.
    pub fn to_google_json(&self) -> serde_json::Value {
        json!({
            "summary": self.summary,
            "start": {
                "dateTime": self.start.format(EVENT_TIME_FORMAT).to_string(),
                "timeZone": self.time_zone,
            },
            "end": {
                "dateTime": self.end.format(EVENT_TIME_FORMAT).to_string(),
                "timeZone": self.time_zone,
            },
        })
    }
}

/// Creates events in an external calendar.
pub trait CalendarClient {
    /// Create one event and return its external id.
    ///
    /// Must return [`ExportError::Unauthorized`] when the token is rejected.
    fn insert_event(
        &self,
        access_token: &str,
        event: &EventPayload,
    ) -> impl Future<Output = Result<String, ExportError>> + Send;
}

/// Supplies and renews the access credential used by a [`CalendarClient`].
pub trait TokenProvider {
    fn current(&self) -> Result<OAuthTokens, ExportError>;

    fn refresh(&self) -> impl Future<Output = Result<OAuthTokens, ExportError>> + Send;
}

/// Outcome of an export batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportReport {
    pub created: usize,
    pub total: usize,
    pub failed: usize,
    /// Up to [`MAX_SAMPLE_ERRORS`] failure messages.
    pub errors: Vec<String>,
}

impl ExportReport {
    fn record_failure(&mut self, item: &PlanItem, err: &ExportError) {
        tracing::warn!(title = %item.title, start = %item.start, error = %err, "event export failed");
        self.failed += 1;
        if self.errors.len() < MAX_SAMPLE_ERRORS {
            self.errors.push(format!("{}: {}", item.title, err));
        }
    }
}

/// Export `items` as calendar events.
///
/// An expired token is refreshed before the batch starts. If the calendar
/// rejects the token mid-batch it is refreshed once and the batch resumes at
/// the rejected item. Zero created events with at least one failure is
/// reported as [`ExportError::BatchFailed`].
pub async fn export_plan<C, T>(
    client: &C,
    tokens: &T,
    items: &[PlanItem],
    time_zone: &str,
) -> Result<ExportReport, ExportError>
where
    C: CalendarClient,
    T: TokenProvider,
{
    let mut token = tokens.current()?;
    let mut refreshed = false;
    if oauth::is_expired(&token) {
        tracing::info!("access token expired, refreshing before export");
        token = tokens.refresh().await?;
        refreshed = true;
    }

    let mut report = ExportReport {
        total: items.len(),
        ..ExportReport::default()
    };

    let mut index = 0;
    while let Some(item) = items.get(index) {
        let payload = match EventPayload::from_item(item, time_zone) {
            Ok(payload) => payload,
            Err(err) => {
                report.record_failure(item, &err);
                index += 1;
                continue;
            }
        };

        match client.insert_event(&token.access_token, &payload).await {
            Ok(_) => report.created += 1,
            Err(ExportError::Unauthorized) if !refreshed => {
                tracing::info!(index, "access token rejected, refreshing");
                token = tokens.refresh().await?;
                refreshed = true;
                continue;
            }
            Err(err) => report.record_failure(item, &err),
        }
        index += 1;
    }

    tracing::info!(
        created = report.created,
        total = report.total,
        failed = report.failed,
        "calendar export finished"
    );

    if report.created == 0 && report.failed > 0 {
        return Err(ExportError::BatchFailed {
            total: report.total,
            errors: report.errors,
        });
    }
    Ok(report)
}

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    use crate::error::OAuthError;

    const SERVICE: &str = "studyplan";

    pub fn get(key: &str) -> Result<Option<String>, OAuthError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), OAuthError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), OAuthError> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
