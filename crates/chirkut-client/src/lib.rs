//! Client side of Chirkut: a typed wrapper over the action endpoint, the
//! persisted session, and the view router that decides which screen is shown.

pub mod api;
pub mod app;
pub mod error;
pub mod router;
pub mod session;
pub mod util;

pub use api::{ApiClient, Message};
pub use app::App;
pub use error::{AuthFailure, ClientError};
pub use router::{AppState, Effect, Event, Route, Transition, View, reduce};
pub use session::{FileSessionStore, MemorySessionStore, SESSION_KEY, SessionStore};
