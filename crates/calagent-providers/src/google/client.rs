//! Google Calendar API client.
//!
//! A thin reqwest client for the six Calendar v3 endpoints the tools use.
//! Each method issues a single request; list results are not paged.

use std::time::Duration;

use chrono::SecondsFormat;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::backend::{BoxFuture, CalendarBackend, EventQuery};
use crate::error::{ProviderError, ProviderResult};
use crate::model::{ApiEvent, EventList, SettingsList};

/// Base URL for Google Calendar API v3.
pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

const PROVIDER: &str = "google";

/// Google Calendar API client bound to one access token.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    access_token: String,
    api_base: String,
}

impl GoogleCalendarClient {
    /// Creates a client against the public Calendar API.
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> ProviderResult<Self> {
        Self::with_api_base(access_token, timeout, CALENDAR_API_BASE)
    }

    /// Creates a client against an alternative API base URL.
    pub fn with_api_base(
        access_token: impl Into<String>,
        timeout: Duration,
        api_base: impl Into<String>,
    ) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self {
            http_client,
            access_token: access_token.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/calendars/{}/events",
            self.api_base,
            urlencoding::encode(calendar_id)
        )
    }

    fn event_url(&self, calendar_id: &str, event_id: &str) -> String {
        format!(
            "{}/{}",
            self.events_url(calendar_id),
            urlencoding::encode(event_id)
        )
    }

    async fn fetch_settings(&self) -> ProviderResult<SettingsList> {
        let url = format!("{}/users/me/settings", self.api_base);
        let request = self.http_client.get(&url).bearer_auth(&self.access_token);
        let response = send(request).await?;
        parse_body(response).await
    }

    async fn fetch_events(
        &self,
        calendar_id: &str,
        query: &EventQuery,
    ) -> ProviderResult<Vec<ApiEvent>> {
        let mut params = vec![
            (
                "timeMin",
                query.window.start.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            (
                "timeMax",
                query.window.end.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            ("maxResults", query.max_results.to_string()),
            ("singleEvents", query.single_events.to_string()),
        ];
        if query.order_by_start {
            params.push(("orderBy", "startTime".to_string()));
        }

        let request = self
            .http_client
            .get(self.events_url(calendar_id))
            .bearer_auth(&self.access_token)
            .query(&params);

        let response = send(request).await?;
        let list: EventList = parse_body(response).await?;

        let mut events = list.items;
        if events.len() > query.max_results {
            events.truncate(query.max_results);
        }
        if list.next_page_token.is_some() {
            debug!(
                "calendar {} has more events than the {} requested; not paging",
                calendar_id, query.max_results
            );
        }

        debug!("fetched {} events from calendar {}", events.len(), calendar_id);
        Ok(events)
    }

    async fn post_event(&self, calendar_id: &str, event: &ApiEvent) -> ProviderResult<ApiEvent> {
        let request = self
            .http_client
            .post(self.events_url(calendar_id))
            .bearer_auth(&self.access_token)
            .json(event);
        let response = send(request).await?;
        parse_body(response).await
    }

    async fn fetch_event(&self, calendar_id: &str, event_id: &str) -> ProviderResult<ApiEvent> {
        let request = self
            .http_client
            .get(self.event_url(calendar_id, event_id))
            .bearer_auth(&self.access_token);
        let response = send(request).await?;
        parse_body(response).await
    }

    async fn put_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &ApiEvent,
    ) -> ProviderResult<ApiEvent> {
        let request = self
            .http_client
            .put(self.event_url(calendar_id, event_id))
            .bearer_auth(&self.access_token)
            .json(event);
        let response = send(request).await?;
        parse_body(response).await
    }

    async fn remove_event(&self, calendar_id: &str, event_id: &str) -> ProviderResult<()> {
        let request = self
            .http_client
            .delete(self.event_url(calendar_id, event_id))
            .bearer_auth(&self.access_token);
        send(request).await?;
        Ok(())
    }
}

impl CalendarBackend for GoogleCalendarClient {
    fn timezone_setting(&self) -> BoxFuture<'_, ProviderResult<Option<String>>> {
        Box::pin(async move {
            let settings = self.fetch_settings().await?;
            Ok(settings.timezone().map(String::from))
        })
    }

    fn list_events<'a>(
        &'a self,
        calendar_id: &'a str,
        query: &'a EventQuery,
    ) -> BoxFuture<'a, ProviderResult<Vec<ApiEvent>>> {
        Box::pin(self.fetch_events(calendar_id, query))
    }

    fn insert_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event: &'a ApiEvent,
    ) -> BoxFuture<'a, ProviderResult<ApiEvent>> {
        Box::pin(self.post_event(calendar_id, event))
    }

    fn get_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<ApiEvent>> {
        Box::pin(self.fetch_event(calendar_id, event_id))
    }

    fn update_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
        event: &'a ApiEvent,
    ) -> BoxFuture<'a, ProviderResult<ApiEvent>> {
        Box::pin(self.put_event(calendar_id, event_id, event))
    }

    fn delete_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(self.remove_event(calendar_id, event_id))
    }
}

/// Sends a request and maps transport failures and non-success statuses.
async fn send(request: reqwest::RequestBuilder) -> ProviderResult<reqwest::Response> {
    let response = request.send().await.map_err(|e| {
        let err = if e.is_timeout() {
            ProviderError::network("request timeout")
        } else if e.is_connect() {
            ProviderError::network(format!("connection failed: {}", e))
        } else {
            ProviderError::network(format!("request failed: {}", e))
        };
        err.with_provider(PROVIDER).with_source(e)
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok());
    let body = response.text().await.unwrap_or_default();
    let detail = api_error_message(&body).unwrap_or_else(|| status.to_string());

    let err = match status {
        reqwest::StatusCode::UNAUTHORIZED => {
            ProviderError::authentication(format!("access token rejected: {}", detail))
        }
        reqwest::StatusCode::FORBIDDEN => ProviderError::authorization(detail),
        reqwest::StatusCode::NOT_FOUND | reqwest::StatusCode::GONE => {
            ProviderError::not_found(detail)
        }
        reqwest::StatusCode::BAD_REQUEST => ProviderError::bad_request(detail),
        reqwest::StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited(format!(
            "{}{}",
            detail,
            retry_after
                .map(|s| format!(", retry after {} seconds", s))
                .unwrap_or_default()
        )),
        _ => ProviderError::server(format!("API error ({}): {}", status, detail)),
    };

    warn!("calendar API request failed: {}", err);
    Err(err.with_provider(PROVIDER))
}

async fn parse_body<T: DeserializeOwned>(response: reqwest::Response) -> ProviderResult<T> {
    let body = response.text().await.map_err(|e| {
        ProviderError::network(format!("failed to read response: {}", e)).with_provider(PROVIDER)
    })?;

    serde_json::from_str(&body).map_err(|e| {
        ProviderError::invalid_response(format!("failed to parse response: {}", e))
            .with_provider(PROVIDER)
            .with_source(e)
    })
}

/// Error body returned by Google APIs.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// Extracts `error.message` from a Google API error body.
fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error.message)
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use crate::model::ApiEventTime;
    use calagent_core::TimeWindow;
    use chrono::{TimeZone, Utc};
    use mockito::Matcher;

    fn client_for(server: &mockito::Server) -> GoogleCalendarClient {
        GoogleCalendarClient::with_api_base("test-token", Duration::from_secs(5), server.url())
            .unwrap()
    }

    fn week_query() -> EventQuery {
        let start = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        EventQuery::new(TimeWindow::for_days(start, 7).unwrap())
    }

    #[test]
    fn error_message_extraction() {
        let body = r#"{"error": {"code": 404, "message": "Not Found"}}"#;
        assert_eq!(api_error_message(body), Some("Not Found".to_string()));
        assert_eq!(api_error_message("<html>oops</html>"), None);
    }

    #[test]
    fn urls_encode_identifiers() {
        let client =
            GoogleCalendarClient::with_api_base("t", Duration::from_secs(1), "http://x/v3/")
                .unwrap();
        assert_eq!(
            client.event_url("family@group.calendar.google.com", "a/b"),
            "http://x/v3/calendars/family%40group.calendar.google.com/events/a%2Fb"
        );
    }

    #[tokio::test]
    async fn list_events_sends_window_and_truncates() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/calendars/primary/events")
            .match_header("authorization", "Bearer test-token")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("timeMin".into(), "2024-03-15T00:00:00Z".into()),
                Matcher::UrlEncoded("timeMax".into(), "2024-03-22T00:00:00Z".into()),
                Matcher::UrlEncoded("maxResults".into(), "2".into()),
                Matcher::UrlEncoded("singleEvents".into(), "true".into()),
                Matcher::UrlEncoded("orderBy".into(), "startTime".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{
                    "items": [
                        { "id": "a", "start": { "dateTime": "2024-03-15T09:00:00Z" } },
                        { "id": "b", "start": { "dateTime": "2024-03-16T09:00:00Z" } },
                        { "id": "c", "start": { "dateTime": "2024-03-17T09:00:00Z" } }
                    ],
                    "nextPageToken": "more"
                }"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let query = week_query().with_max_results(2);
        let events = client.list_events("primary", &query).await.unwrap();

        mock.assert_async().await;
        let ids: Vec<_> = events.iter().filter_map(|e| e.id.as_deref()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn timezone_setting_is_read() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/users/me/settings")
            .with_status(200)
            .with_body(r#"{"items": [{"id": "timezone", "value": "Asia/Tokyo"}]}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let tz = client.timezone_setting().await.unwrap();
        assert_eq!(tz.as_deref(), Some("Asia/Tokyo"));
    }

    #[tokio::test]
    async fn insert_posts_event_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/calendars/primary/events")
            .match_body(Matcher::PartialJsonString(
                r#"{"summary": "Lunch", "start": {"dateTime": "2024-03-15T12:00:00", "timeZone": "UTC"}}"#
                    .into(),
            ))
            .with_status(200)
            .with_body(r#"{"id": "new1", "summary": "Lunch", "htmlLink": "https://cal/new1"}"#)
            .create_async()
            .await;

        let event = ApiEvent {
            summary: Some("Lunch".into()),
            start: Some(ApiEventTime::zoned("2024-03-15T12:00:00", "UTC")),
            end: Some(ApiEventTime::zoned("2024-03-15T13:00:00", "UTC")),
            ..Default::default()
        };

        let client = client_for(&server);
        let created = client.insert_event("primary", &event).await.unwrap();

        mock.assert_async().await;
        assert_eq!(created.id.as_deref(), Some("new1"));
        assert_eq!(created.html_link.as_deref(), Some("https://cal/new1"));
    }

    #[tokio::test]
    async fn update_puts_to_event_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/calendars/primary/events/evt1")
            .with_status(200)
            .with_body(r#"{"id": "evt1", "summary": "Renamed"}"#)
            .create_async()
            .await;

        let event = ApiEvent {
            id: Some("evt1".into()),
            summary: Some("Renamed".into()),
            ..Default::default()
        };

        let client = client_for(&server);
        let updated = client.update_event("primary", "evt1", &event).await.unwrap();

        mock.assert_async().await;
        assert_eq!(updated.summary.as_deref(), Some("Renamed"));
    }

    #[tokio::test]
    async fn delete_accepts_no_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/calendars/primary/events/evt1")
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server);
        client.delete_event("primary", "evt1").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_event_maps_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/calendars/primary/events/ghost")
            .with_status(404)
            .with_body(r#"{"error": {"code": 404, "message": "Not Found"}}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.get_event("primary", "ghost").await.unwrap_err();

        assert_eq!(err.code(), ProviderErrorCode::NotFound);
        assert_eq!(err.message(), "Not Found");
        assert_eq!(err.provider(), Some("google"));
    }

    #[tokio::test]
    async fn status_codes_map_to_error_codes() {
        let cases = [
            (401, ProviderErrorCode::AuthenticationFailed),
            (403, ProviderErrorCode::AuthorizationFailed),
            (410, ProviderErrorCode::NotFound),
            (400, ProviderErrorCode::BadRequest),
            (429, ProviderErrorCode::RateLimited),
            (500, ProviderErrorCode::ServerError),
        ];

        for (status, expected) in cases {
            let mut server = mockito::Server::new_async().await;
            server
                .mock("DELETE", "/calendars/primary/events/evt1")
                .with_status(status)
                .create_async()
                .await;

            let client = client_for(&server);
            let err = client.delete_event("primary", "evt1").await.unwrap_err();
            assert_eq!(err.code(), expected, "status {status}");
        }
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/calendars/primary/events/evt1")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.get_event("primary", "evt1").await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
    }
}
