//! Search provider module
//!
//! Defines the [`SearchProvider`] capability and its three implementations:
//! the Custom Search REST API, the embeddable widget endpoint and a mock.

mod loader;
mod traits;

pub mod mock;
pub mod remote_api;
pub mod widget;

pub use loader::ProviderLoader;
pub use mock::MockProvider;
pub use remote_api::RemoteApi;
pub use traits::*;
pub use widget::EmbeddedWidget;
