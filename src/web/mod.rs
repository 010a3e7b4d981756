//! Web server module
//!
//! Serves the search page, the JSON search endpoint and the preference and
//! sign-in actions. Each browser gets its own session through a cookie.

mod handlers;
mod routes;
mod state;
mod templates;

pub use handlers::SESSION_COOKIE;
pub use routes::create_router;
pub use state::AppState;
pub use templates::Templates;
