mod confirm;
mod form;
mod synchronizer;
mod view;

pub use confirm::{AlwaysConfirm, Confirm, NeverConfirm, TerminalConfirm};
pub use form::{Draft, FieldName, FormMode, FormSession};
pub use synchronizer::{RosterSynchronizer, SyncOutcome};
pub use view::{RosterSnapshot, RosterView};
