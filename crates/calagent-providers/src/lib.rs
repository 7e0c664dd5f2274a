//! Calendar provider access for calagent.
//!
//! - [`ClientConnector`] - acquires an authenticated [`Session`] per call
//! - [`CalendarBackend`] - the provider calls the tools make
//! - [`ApiEvent`] - provider-native event representation
//! - [`normalize_event`] - conversion to display-ready records
//! - [`ProviderError`] - error taxonomy for everything above
//!
//! ```text
//!  env var ──► ServiceAccountConnector ──► Session { GoogleCalendarClient, calendar_id }
//!                                                   │
//!                                 CalendarBackend   ▼
//!                                               ApiEvent ──► normalize_event() ──► EventRecord
//! ```

pub mod backend;
pub mod error;
pub mod google;
pub mod model;
pub mod normalize;

pub use backend::{
    BoxFuture, CalendarBackend, ClientConnector, DEFAULT_MAX_RESULTS, EventQuery, Session,
};
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use model::{ApiAttendee, ApiEvent, ApiEventTime};
pub use normalize::{normalize_event, normalize_events};
