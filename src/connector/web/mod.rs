//! Single-page web surface: one form, one transcript per browser session.

pub mod handlers;
pub mod page;
pub mod server;
pub mod session_registry;

pub use handlers::{AppState, SESSION_COOKIE};
pub use page::PageRenderer;
pub use server::{build_router, build_state, serve, start_session_sweeper};
pub use session_registry::{SessionEntry, SessionRegistry, SharedSession, DEFAULT_IDLE_TIMEOUT};
