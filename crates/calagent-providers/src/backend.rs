//! The calendar backend seam.
//!
//! [`CalendarBackend`] is the RPC surface the tools consume: one method per
//! provider call. [`ClientConnector`] produces a fresh, authenticated backend
//! for every tool invocation; nothing is cached between calls.

use std::future::Future;
use std::pin::Pin;

use calagent_core::TimeWindow;

use crate::error::ProviderResult;
use crate::model::ApiEvent;

/// A boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Default cap on the number of events a listing returns.
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Parameters of an `events.list` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub window: TimeWindow,
    /// Results beyond this count are dropped, not paged.
    pub max_results: usize,
    /// Expand recurring events into individual instances.
    pub single_events: bool,
    /// Order by start time (requires `single_events`).
    pub order_by_start: bool,
}

impl EventQuery {
    /// A listing of the window with recurring events expanded and ordered by
    /// start time.
    pub fn new(window: TimeWindow) -> Self {
        Self {
            window,
            max_results: DEFAULT_MAX_RESULTS,
            single_events: true,
            order_by_start: true,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

/// The provider calls available to the calendar tools.
///
/// Every method issues exactly one request against the provider.
pub trait CalendarBackend: Send + Sync {
    /// Reads the user's `timezone` setting.
    fn timezone_setting(&self) -> BoxFuture<'_, ProviderResult<Option<String>>>;

    /// Lists events in the query window, truncated to `max_results`.
    fn list_events<'a>(
        &'a self,
        calendar_id: &'a str,
        query: &'a EventQuery,
    ) -> BoxFuture<'a, ProviderResult<Vec<ApiEvent>>>;

    /// Creates an event and returns it as stored by the provider.
    fn insert_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event: &'a ApiEvent,
    ) -> BoxFuture<'a, ProviderResult<ApiEvent>>;

    /// Fetches a single event.
    fn get_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<ApiEvent>>;

    /// Replaces an event with the given representation.
    fn update_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
        event: &'a ApiEvent,
    ) -> BoxFuture<'a, ProviderResult<ApiEvent>>;

    /// Deletes an event.
    fn delete_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>>;
}

/// An authenticated backend plus the calendar it is bound to by default.
///
/// Owned by a single tool invocation and dropped at its end.
pub struct Session {
    pub backend: Box<dyn CalendarBackend>,
    pub calendar_id: String,
}

impl Session {
    pub fn new(backend: Box<dyn CalendarBackend>, calendar_id: impl Into<String>) -> Self {
        Self {
            backend,
            calendar_id: calendar_id.into(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("calendar_id", &self.calendar_id)
            .finish_non_exhaustive()
    }
}

/// Produces an authenticated [`Session`].
///
/// Implementations must not share state between calls: a broken credential
/// load on one call has no effect on the next.
pub trait ClientConnector: Send + Sync {
    fn connect(&self) -> BoxFuture<'_, ProviderResult<Session>>;
}
