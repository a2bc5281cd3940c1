use async_trait::async_trait;

use super::{StudentFields, StudentRecord};
use crate::error::RosterError;

/// Remote student-record resource.
///
/// Every call carries the bearer token explicitly; callers never issue one
/// without a session.
#[async_trait]
pub trait RosterApi: Send + Sync {
    /// Fetch the full list, in server order
    async fn list(&self, token: &str) -> Result<Vec<StudentRecord>, RosterError>;

    /// Create a student and return it with its assigned id
    async fn create(
        &self,
        token: &str,
        student: &StudentFields,
    ) -> Result<StudentRecord, RosterError>;

    /// Replace the student addressed by `student.id`
    async fn update(&self, token: &str, student: &StudentRecord) -> Result<(), RosterError>;

    /// Delete a student by id
    async fn delete(&self, token: &str, id: i64) -> Result<(), RosterError>;
}
