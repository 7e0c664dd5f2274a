//! In-memory provider for exercising the tools without a network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use calagent_providers::{
    ApiEvent, BoxFuture, CalendarBackend, ClientConnector, EventQuery, ProviderError,
    ProviderErrorCode, ProviderResult, Session,
};

/// A provider call as the backend received it.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Settings,
    List { calendar_id: String, query: EventQuery },
    Insert { calendar_id: String, event: ApiEvent },
    Get { calendar_id: String, event_id: String },
    Update { calendar_id: String, event_id: String, event: ApiEvent },
    Delete { calendar_id: String, event_id: String },
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::Insert { .. } | Call::Update { .. } | Call::Delete { .. }
        )
    }
}

#[derive(Debug, Default)]
struct State {
    calendars: HashMap<String, Vec<ApiEvent>>,
    timezone: Option<String>,
    failures: HashMap<&'static str, ProviderErrorCode>,
    calendar_failures: HashMap<String, ProviderErrorCode>,
    calls: Vec<Call>,
    next_id: usize,
}

/// A calendar store shared between the test and every session it hands out.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the account `timezone` setting.
    pub fn with_timezone(self, timezone: &str) -> Self {
        self.lock().timezone = Some(timezone.to_string());
        self
    }

    /// Stores an event as if it already existed on the provider.
    pub fn with_event(self, calendar_id: &str, event: ApiEvent) -> Self {
        self.lock()
            .calendars
            .entry(calendar_id.to_string())
            .or_default()
            .push(event);
        self
    }

    /// Makes every call to `method` fail with `code`.
    pub fn failing(self, method: &'static str, code: ProviderErrorCode) -> Self {
        self.lock().failures.insert(method, code);
        self
    }

    /// Makes listing `calendar_id` fail with `code`; other calendars list
    /// normally.
    pub fn failing_calendar(self, calendar_id: &str, code: ProviderErrorCode) -> Self {
        self.lock()
            .calendar_failures
            .insert(calendar_id.to_string(), code);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn events(&self, calendar_id: &str) -> Vec<ApiEvent> {
        self.lock()
            .calendars
            .get(calendar_id)
            .cloned()
            .unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn record(&self, method: &'static str, call: Call) -> ProviderResult<MutexGuard<'_, State>> {
        let mut state = self.lock();
        state.calls.push(call);
        match state.failures.get(method) {
            Some(code) => Err(ProviderError::new(*code, format!("{} failed", method))
                .with_provider("memory")),
            None => Ok(state),
        }
    }
}

fn not_found(event_id: &str) -> ProviderError {
    ProviderError::not_found(format!("event {} does not exist", event_id)).with_provider("memory")
}

impl CalendarBackend for MemoryBackend {
    fn timezone_setting(&self) -> BoxFuture<'_, ProviderResult<Option<String>>> {
        Box::pin(async move {
            let state = self.record("settings", Call::Settings)?;
            Ok(state.timezone.clone())
        })
    }

    fn list_events<'a>(
        &'a self,
        calendar_id: &'a str,
        query: &'a EventQuery,
    ) -> BoxFuture<'a, ProviderResult<Vec<ApiEvent>>> {
        Box::pin(async move {
            let call = Call::List {
                calendar_id: calendar_id.to_string(),
                query: query.clone(),
            };
            let state = self.record("list", call)?;
            if let Some(code) = state.calendar_failures.get(calendar_id) {
                return Err(ProviderError::new(*code, format!("list of {} failed", calendar_id))
                    .with_provider("memory"));
            }
            let mut events = state.calendars.get(calendar_id).cloned().unwrap_or_default();
            events.truncate(query.max_results);
            Ok(events)
        })
    }

    fn insert_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event: &'a ApiEvent,
    ) -> BoxFuture<'a, ProviderResult<ApiEvent>> {
        Box::pin(async move {
            let call = Call::Insert {
                calendar_id: calendar_id.to_string(),
                event: event.clone(),
            };
            let mut state = self.record("insert", call)?;
            state.next_id += 1;
            let id = format!("evt-{}", state.next_id);

            let mut stored = event.clone();
            stored.html_link = Some(format!("https://calendar.example/{}", id));
            stored.id = Some(id);
            state
                .calendars
                .entry(calendar_id.to_string())
                .or_default()
                .push(stored.clone());
            Ok(stored)
        })
    }

    fn get_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<ApiEvent>> {
        Box::pin(async move {
            let call = Call::Get {
                calendar_id: calendar_id.to_string(),
                event_id: event_id.to_string(),
            };
            let state = self.record("get", call)?;
            state
                .calendars
                .get(calendar_id)
                .and_then(|events| events.iter().find(|e| e.id.as_deref() == Some(event_id)))
                .cloned()
                .ok_or_else(|| not_found(event_id))
        })
    }

    fn update_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
        event: &'a ApiEvent,
    ) -> BoxFuture<'a, ProviderResult<ApiEvent>> {
        Box::pin(async move {
            let call = Call::Update {
                calendar_id: calendar_id.to_string(),
                event_id: event_id.to_string(),
                event: event.clone(),
            };
            let mut state = self.record("update", call)?;
            let slot = state
                .calendars
                .get_mut(calendar_id)
                .and_then(|events| {
                    events
                        .iter_mut()
                        .find(|e| e.id.as_deref() == Some(event_id))
                })
                .ok_or_else(|| not_found(event_id))?;
            *slot = event.clone();
            Ok(slot.clone())
        })
    }

    fn delete_event<'a>(
        &'a self,
        calendar_id: &'a str,
        event_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(async move {
            let call = Call::Delete {
                calendar_id: calendar_id.to_string(),
                event_id: event_id.to_string(),
            };
            let mut state = self.record("delete", call)?;
            let events = state
                .calendars
                .get_mut(calendar_id)
                .ok_or_else(|| not_found(event_id))?;
            let before = events.len();
            events.retain(|e| e.id.as_deref() != Some(event_id));
            if events.len() == before {
                return Err(not_found(event_id));
            }
            Ok(())
        })
    }
}

/// Hands out sessions over a shared [`MemoryBackend`].
#[derive(Debug, Clone)]
pub struct StaticConnector {
    backend: MemoryBackend,
    calendar_id: String,
    connects: Arc<Mutex<usize>>,
}

impl StaticConnector {
    pub fn new(backend: MemoryBackend) -> Self {
        Self {
            backend,
            calendar_id: "primary".to_string(),
            connects: Arc::default(),
        }
    }

    pub fn connects(&self) -> usize {
        *self.connects.lock().unwrap()
    }
}

impl ClientConnector for StaticConnector {
    fn connect(&self) -> BoxFuture<'_, ProviderResult<Session>> {
        Box::pin(async move {
            *self.connects.lock().unwrap() += 1;
            Ok(Session::new(
                Box::new(self.backend.clone()),
                &self.calendar_id,
            ))
        })
    }
}

/// A connector whose credential can never be loaded.
#[derive(Debug, Clone, Copy)]
pub struct BrokenCredentials;

impl ClientConnector for BrokenCredentials {
    fn connect(&self) -> BoxFuture<'_, ProviderResult<Session>> {
        Box::pin(async {
            Err(ProviderError::credential(
                "service-account credential is not valid JSON",
            ))
        })
    }
}
