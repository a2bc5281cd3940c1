mod client;
mod http;
mod record;

pub use client::RosterApi;
pub use http::HttpRosterApi;
pub use record::{Gender, StudentFields, StudentRecord};
