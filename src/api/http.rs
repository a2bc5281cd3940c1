use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

use super::{RosterApi, StudentFields, StudentRecord};
use crate::error::RosterError;

const LIST_PATH: &str = "/api/Student/GetStudents";
const CREATE_PATH: &str = "/api/Student/AddStudent";
const UPDATE_PATH: &str = "/api/Student/UpdateStudent";
const DELETE_PATH: &str = "/api/Student/DeleteStudent";

/// Student API over HTTP with bearer authentication
pub struct HttpRosterApi {
    client: Client,
    base_url: String,
}

impl HttpRosterApi {
    /// Create a client for the API rooted at `base_url` (e.g. `http://localhost:5290`)
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RosterError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RosterError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn a non-2xx response into a remote error, keeping the body for logs
async fn check(resp: Response, operation: &str) -> Result<Response, RosterError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    warn!(operation, status = status.as_u16(), body = %body, "student API rejected request");
    Err(RosterError::Remote {
        status: status.as_u16(),
        message: body,
    })
}

#[async_trait]
impl RosterApi for HttpRosterApi {
    async fn list(&self, token: &str) -> Result<Vec<StudentRecord>, RosterError> {
        let resp = self
            .client
            .get(self.url(LIST_PATH))
            .bearer_auth(token)
            .send()
            .await?;

        let students: Vec<StudentRecord> = check(resp, "list").await?.json().await?;
        debug!(count = students.len(), "fetched students");
        Ok(students)
    }

    async fn create(
        &self,
        token: &str,
        student: &StudentFields,
    ) -> Result<StudentRecord, RosterError> {
        let resp = self
            .client
            .post(self.url(CREATE_PATH))
            .bearer_auth(token)
            .json(student)
            .send()
            .await?;

        let created: StudentRecord = check(resp, "create").await?.json().await?;
        debug!(id = created.id, "created student");
        Ok(created)
    }

    async fn update(&self, token: &str, student: &StudentRecord) -> Result<(), RosterError> {
        let resp = self
            .client
            .put(format!("{}/{}", self.url(UPDATE_PATH), student.id))
            .bearer_auth(token)
            .json(student)
            .send()
            .await?;

        // The body is either the updated record or empty; local state is
        // committed from the submitted values either way.
        check(resp, "update").await?;
        debug!(id = student.id, "updated student");
        Ok(())
    }

    async fn delete(&self, token: &str, id: i64) -> Result<(), RosterError> {
        let resp = self
            .client
            .delete(format!("{}/{}", self.url(DELETE_PATH), id))
            .bearer_auth(token)
            .send()
            .await?;

        check(resp, "delete").await?;
        debug!(id, "deleted student");
        Ok(())
    }
}
