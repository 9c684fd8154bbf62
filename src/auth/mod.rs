//! Authentication module
//!
//! Metadata providers authenticate with a query-string key; the store
//! expects its service-role key twice, as `apikey` header and as a bearer
//! token.

mod types;

pub use types::AuthConfig;
