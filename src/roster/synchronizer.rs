use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use super::{Confirm, Draft, FieldName, FormMode, FormSession, RosterSnapshot};
use crate::api::{RosterApi, StudentRecord};
use crate::error::RosterError;
use crate::session::SessionStore;

const DELETE_PROMPT: &str = "Are you sure you want to delete this student?";

/// Result of a user operation against the remote roster.
///
/// Failures carry no payload: the message lands in the roster's error field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The server confirmed and local state was updated
    Applied,
    /// The user declined the confirmation prompt
    Declined,
    /// Nothing to do (e.g. the initial load already ran)
    Skipped,
    /// The operation failed; see [`RosterSynchronizer::error`]
    Failed,
}

struct RosterState {
    students: Vec<StudentRecord>,
    loading: bool,
    error: Option<String>,
    form: FormSession,
    /// Bumped on every form transition so a late completion can tell
    /// whether the form it was submitted from is still the open one.
    form_epoch: u64,
    mounted: bool,
}

impl RosterState {
    fn set_form(&mut self, form: FormSession) {
        self.form = form;
        self.form_epoch += 1;
    }

    fn surface(&mut self, operation: &str, error: RosterError) -> SyncOutcome {
        warn!(operation, error = %error, "roster operation failed");
        self.error = Some(error.to_string());
        SyncOutcome::Failed
    }
}

/// Keeps the local student list in step with the remote API and drives
/// the add/edit form.
///
/// Operations take `&self`: state lives behind a lock that is never held
/// across a remote call, so several calls may be in flight at once and
/// their completions apply in whatever order they finish.
pub struct RosterSynchronizer {
    session: Arc<SessionStore>,
    api: Box<dyn RosterApi>,
    confirm: Box<dyn Confirm>,
    state: Mutex<RosterState>,
}

impl RosterSynchronizer {
    pub fn new(
        session: Arc<SessionStore>,
        api: impl RosterApi + 'static,
        confirm: impl Confirm + 'static,
    ) -> Self {
        Self::from_parts(session, Box::new(api), Box::new(confirm))
    }

    pub(crate) fn from_parts(
        session: Arc<SessionStore>,
        api: Box<dyn RosterApi>,
        confirm: Box<dyn Confirm>,
    ) -> Self {
        Self {
            session,
            api,
            confirm,
            state: Mutex::new(RosterState {
                students: Vec::new(),
                loading: true,
                error: None,
                form: FormSession::Closed,
                form_epoch: 0,
                mounted: false,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, RosterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current token, or surface a missing session without touching the network
    fn token_for(&self, operation: &str) -> Option<String> {
        let token = self.session.token();
        if token.is_none() {
            let mut state = self.state();
            state.loading = false;
            state.surface(operation, RosterError::NoSession);
        }
        token
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        let state = self.state();
        RosterSnapshot {
            students: state.students.clone(),
            loading: state.loading,
            error: state.error.clone(),
            form: state.form.clone(),
        }
    }

    pub fn students(&self) -> Vec<StudentRecord> {
        self.state().students.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    pub fn form(&self) -> FormSession {
        self.state().form.clone()
    }

    pub fn mode(&self) -> FormMode {
        self.state().form.mode()
    }

    /// Initial load, run once per synchronizer.
    ///
    /// The load only counts once a token was available to send it; a mount
    /// without a session surfaces the error and can be retried after login.
    /// Later token changes do not trigger another load; call
    /// [`fetch_all`](Self::fetch_all) for that.
    pub async fn mount(&self) -> SyncOutcome {
        if self.state().mounted {
            debug!("roster already mounted");
            return SyncOutcome::Skipped;
        }
        let Some(token) = self.token_for("fetch") else {
            return SyncOutcome::Failed;
        };
        {
            let mut state = self.state();
            if state.mounted {
                return SyncOutcome::Skipped;
            }
            state.mounted = true;
        }
        self.fetch_with(token).await
    }

    /// Wait until the session holds a token, then run the initial load
    pub async fn mount_when_ready(&self) -> SyncOutcome {
        let mut tokens = self.session.subscribe();
        if tokens.wait_for(|token| token.is_some()).await.is_err() {
            return SyncOutcome::Skipped;
        }
        self.mount().await
    }

    /// Replace the local list with the server's
    pub async fn fetch_all(&self) -> SyncOutcome {
        let Some(token) = self.token_for("fetch") else {
            return SyncOutcome::Failed;
        };
        self.fetch_with(token).await
    }

    async fn fetch_with(&self, token: String) -> SyncOutcome {
        self.state().loading = true;
        let result = self.api.list(&token).await;

        let mut state = self.state();
        state.loading = false;
        match result {
            Ok(students) => {
                info!(count = students.len(), "loaded students");
                state.students = students;
                state.error = None;
                SyncOutcome::Applied
            }
            Err(e) => state.surface("fetch", e),
        }
    }

    /// Open the form on a blank student
    pub fn begin_add(&self) {
        self.state().set_form(FormSession::Adding {
            draft: Draft::template(),
        });
        debug!("opened add form");
    }

    /// Open the form on a copy of an existing student
    pub fn begin_edit(&self, id: i64) -> Result<(), RosterError> {
        let mut state = self.state();
        let draft = state
            .students
            .iter()
            .find(|s| s.id == id)
            .map(Draft::from_record)
            .ok_or(RosterError::NotFound(id))?;

        state.set_form(FormSession::Editing { id, draft });
        debug!(id, "opened edit form");
        Ok(())
    }

    /// Change one field of the open draft
    pub fn set_field(&self, field: &str, value: impl Into<String>) -> Result<(), RosterError> {
        let field: FieldName = field.parse()?;
        let mut state = self.state();
        let draft = state.form.draft_mut().ok_or(RosterError::FormClosed)?;
        draft.set(field, value);
        Ok(())
    }

    /// Close the form and throw the draft away
    pub fn cancel(&self) {
        let mut state = self.state();
        if state.form.is_open() {
            debug!(mode = %state.form.mode(), "cancelled form");
        }
        state.set_form(FormSession::Closed);
    }

    /// Submit the open form: create when adding, update when editing.
    ///
    /// Errors only when no form is open; remote failures are reported
    /// through the outcome and the error field.
    pub async fn submit(&self) -> Result<SyncOutcome, RosterError> {
        let form = self.form();
        match form {
            FormSession::Closed => Err(RosterError::FormClosed),
            FormSession::Adding { draft } => Ok(self.create(&draft).await),
            FormSession::Editing { id, draft } => Ok(self.update(id, &draft).await),
        }
    }

    /// Create a student from a draft.
    ///
    /// On success the server's record is added and an add form still open
    /// from this submission is closed. On failure nothing changes.
    pub async fn create(&self, draft: &Draft) -> SyncOutcome {
        let epoch = self.state().form_epoch;

        let Some(token) = self.token_for("create") else {
            return SyncOutcome::Failed;
        };
        let fields = match draft.to_fields() {
            Ok(fields) => fields,
            Err(e) => return self.state().surface("create", e),
        };

        let result = self.api.create(&token, &fields).await;

        let mut state = self.state();
        match result {
            Ok(created) => {
                info!(id = created.id, "created student");
                match state.students.iter_mut().find(|s| s.id == created.id) {
                    Some(existing) => *existing = created,
                    None => state.students.push(created),
                }
                state.error = None;
                if state.form_epoch == epoch && state.form.mode() == FormMode::Adding {
                    state.set_form(FormSession::Closed);
                }
                SyncOutcome::Applied
            }
            Err(e) => state.surface("create", e),
        }
    }

    /// Send a draft as the new state of student `id`.
    ///
    /// On success the local record is replaced with the draft's values and
    /// an edit form still open from this submission is closed. On failure
    /// the list and the draft are left as they were.
    pub async fn update(&self, id: i64, draft: &Draft) -> SyncOutcome {
        let epoch = self.state().form_epoch;

        if !self.state().students.iter().any(|s| s.id == id) {
            return self.state().surface("update", RosterError::NotFound(id));
        }
        let Some(token) = self.token_for("update") else {
            return SyncOutcome::Failed;
        };
        let record = match draft.to_record(id) {
            Ok(record) => record,
            Err(e) => return self.state().surface("update", e),
        };

        let result = self.api.update(&token, &record).await;

        let mut state = self.state();
        match result {
            Ok(()) => {
                info!(id, "updated student");
                match state.students.iter_mut().find(|s| s.id == id) {
                    Some(existing) => *existing = record,
                    None => debug!(id, "updated student no longer listed locally"),
                }
                state.error = None;
                let same_form =
                    matches!(state.form, FormSession::Editing { id: open, .. } if open == id);
                if state.form_epoch == epoch && same_form {
                    state.set_form(FormSession::Closed);
                }
                SyncOutcome::Applied
            }
            Err(e) => state.surface("update", e),
        }
    }

    /// Delete a student after asking the user.
    pub async fn delete(&self, id: i64) -> SyncOutcome {
        if !self.confirm.confirm(DELETE_PROMPT) {
            info!(id, "delete declined");
            return SyncOutcome::Declined;
        }

        let Some(token) = self.token_for("delete") else {
            return SyncOutcome::Failed;
        };

        let result = self.api.delete(&token, id).await;

        let mut state = self.state();
        match result {
            Ok(()) => {
                info!(id, "deleted student");
                state.students.retain(|s| s.id != id);
                state.error = None;
                SyncOutcome::Applied
            }
            Err(e) => state.surface("delete", e),
        }
    }
}

impl std::fmt::Debug for RosterSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("RosterSynchronizer")
            .field("students", &state.students.len())
            .field("loading", &state.loading)
            .field("error", &state.error)
            .field("mode", &state.form.mode())
            .finish()
    }
}
