mod sqlite;
mod storage;
mod store;

pub use sqlite::SqliteTokenStorage;
pub use storage::TokenStorage;
pub(crate) use storage::UnavailableTokenStorage;
pub use store::SessionStore;
