#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Notify;

use roster_console::{
    Confirm, Gender, RosterApi, RosterError, RosterSynchronizer, SessionStore, StudentFields,
    StudentRecord, TokenStorage,
};

/// A call observed by [`MockRosterApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List { token: String },
    Create { token: String, fields: StudentFields },
    Update { token: String, record: StudentRecord },
    Delete { token: String, id: i64 },
}

impl ApiCall {
    pub fn token(&self) -> &str {
        match self {
            Self::List { token }
            | Self::Create { token, .. }
            | Self::Update { token, .. }
            | Self::Delete { token, .. } => token,
        }
    }
}

#[derive(Default)]
struct MockState {
    students: Vec<StudentRecord>,
    next_id: i64,
    failures: VecDeque<RosterError>,
    calls: Vec<ApiCall>,
    gate: Option<Arc<Notify>>,
}

/// An in-memory student API that records every call.
///
/// Clones share state, so a test can keep one and hand another to the roster.
#[derive(Clone, Default)]
pub struct MockRosterApi {
    state: Arc<Mutex<MockState>>,
}

impl MockRosterApi {
    /// Server holding these students; new ids continue after the largest one
    pub fn with_students(students: Vec<StudentRecord>) -> Self {
        let next_id = students.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let api = Self::default();
        {
            let mut state = api.state.lock().unwrap();
            state.students = students;
            state.next_id = next_id;
        }
        api
    }

    /// Id the next created student receives
    pub fn set_next_id(&self, id: i64) {
        self.state.lock().unwrap().next_id = id;
    }

    /// Make the next call fail with this error
    pub fn fail_next(&self, error: RosterError) {
        self.state.lock().unwrap().failures.push_back(error);
    }

    /// Hold every subsequent call until the returned gate is notified
    pub fn hold_calls(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state.lock().unwrap().gate = Some(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn server_students(&self) -> Vec<StudentRecord> {
        self.state.lock().unwrap().students.clone()
    }

    /// Record the call, then wait on the gate if one is set
    async fn enter(&self, call: ApiCall) -> Result<(), RosterError> {
        let (gate, failure) = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(call);
            (state.gate.clone(), state.failures.pop_front())
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RosterApi for MockRosterApi {
    async fn list(&self, token: &str) -> Result<Vec<StudentRecord>, RosterError> {
        self.enter(ApiCall::List {
            token: token.to_string(),
        })
        .await?;
        Ok(self.server_students())
    }

    async fn create(
        &self,
        token: &str,
        student: &StudentFields,
    ) -> Result<StudentRecord, RosterError> {
        self.enter(ApiCall::Create {
            token: token.to_string(),
            fields: student.clone(),
        })
        .await?;

        let mut state = self.state.lock().unwrap();
        let created = StudentRecord::from_fields(state.next_id, student.clone());
        state.next_id += 1;
        state.students.push(created.clone());
        Ok(created)
    }

    async fn update(&self, token: &str, student: &StudentRecord) -> Result<(), RosterError> {
        self.enter(ApiCall::Update {
            token: token.to_string(),
            record: student.clone(),
        })
        .await?;

        let mut state = self.state.lock().unwrap();
        match state.students.iter_mut().find(|s| s.id == student.id) {
            Some(existing) => {
                *existing = student.clone();
                Ok(())
            }
            None => Err(not_found()),
        }
    }

    async fn delete(&self, token: &str, id: i64) -> Result<(), RosterError> {
        self.enter(ApiCall::Delete {
            token: token.to_string(),
            id,
        })
        .await?;

        let mut state = self.state.lock().unwrap();
        let before = state.students.len();
        state.students.retain(|s| s.id != id);
        if state.students.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}

fn not_found() -> RosterError {
    RosterError::Remote {
        status: 404,
        message: String::new(),
    }
}

/// Token storage kept in memory, for tests that don't care about durability
#[derive(Clone, Default)]
pub struct MemoryTokenStorage {
    value: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStorage {
    pub fn holding(token: &str) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(token.to_string()))),
        }
    }

    pub fn value(&self) -> Option<String> {
        self.value.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenStorage for MemoryTokenStorage {
    async fn read(&self) -> Result<Option<String>> {
        Ok(self.value())
    }

    async fn write(&self, token: &str) -> Result<()> {
        *self.value.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        *self.value.lock().unwrap() = None;
        Ok(())
    }
}

pub fn ann() -> StudentRecord {
    StudentRecord {
        id: 1,
        name: "Ann".to_string(),
        gender: Gender::Female,
        age: 20,
        education: "BSc".to_string(),
        academic_year: 2,
    }
}

pub fn cy() -> StudentRecord {
    StudentRecord {
        id: 2,
        name: "Cy".to_string(),
        gender: Gender::Other("Other".to_string()),
        age: 31,
        education: "MSc".to_string(),
        academic_year: 4,
    }
}

/// A session store over memory storage, optionally logged in
pub async fn session_with(token: Option<&str>) -> Arc<SessionStore> {
    let storage = match token {
        Some(t) => MemoryTokenStorage::holding(t),
        None => MemoryTokenStorage::default(),
    };
    Arc::new(SessionStore::open(storage).await)
}

/// A roster over the given mock, logged in with `token`
pub async fn roster_with(
    api: &MockRosterApi,
    token: Option<&str>,
    confirm: impl Confirm + 'static,
) -> (Arc<SessionStore>, RosterSynchronizer) {
    let session = session_with(token).await;
    let roster = RosterSynchronizer::new(Arc::clone(&session), api.clone(), confirm);
    (session, roster)
}
