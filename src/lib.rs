pub mod api;
pub mod builder;
pub mod config;
mod console;
pub mod error;
pub mod roster;
pub mod session;

pub use api::{Gender, HttpRosterApi, RosterApi, StudentFields, StudentRecord};
pub use builder::ConsoleBuilder;
pub use config::ConsoleConfig;
pub use console::Console;
pub use error::RosterError;
pub use roster::{
    AlwaysConfirm, Confirm, Draft, FieldName, FormMode, FormSession, NeverConfirm,
    RosterSnapshot, RosterSynchronizer, RosterView, SyncOutcome, TerminalConfirm,
};
pub use session::{SessionStore, SqliteTokenStorage, TokenStorage};
