//! Google Calendar backend.
//!
//! - [`ServiceAccountConnector`] reads a service-account key from the
//!   environment and exchanges it for an access token on every connect.
//! - [`GoogleCalendarClient`] implements [`CalendarBackend`](crate::CalendarBackend)
//!   over the Calendar v3 REST API.

mod auth;
mod client;

pub use auth::{
    CALENDAR_SCOPE, CredentialSettings, DEFAULT_CREDENTIALS_ENV, ServiceAccountConnector,
    parse_service_account_key, read_credential_blob,
};
pub use client::{CALENDAR_API_BASE, GoogleCalendarClient};
