mod console;

pub use console::{ConsoleConfig, DEFAULT_API_URL, DEFAULT_TOKEN_SLOT};
