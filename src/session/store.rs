use tokio::sync::{OnceCell, watch};
use tracing::{debug, info, warn};

use super::TokenStorage;
use crate::error::RosterError;

/// Single source of truth for the session token.
///
/// The in-memory value is authoritative; durable storage mirrors it so a
/// restart picks the session back up. Consumers either read [`token()`](Self::token)
/// when they need it or [`subscribe()`](Self::subscribe) to observe changes.
pub struct SessionStore {
    storage: Box<dyn TokenStorage>,
    token: watch::Sender<Option<String>>,
    hydrated: OnceCell<()>,
}

impl SessionStore {
    /// Create a store over the given storage without reading it yet
    pub fn new(storage: impl TokenStorage + 'static) -> Self {
        Self::from_boxed(Box::new(storage))
    }

    pub fn from_boxed(storage: Box<dyn TokenStorage>) -> Self {
        let (token, _) = watch::channel(None);
        Self {
            storage,
            token,
            hydrated: OnceCell::new(),
        }
    }

    /// Create a store and hydrate it from storage
    pub async fn open(storage: impl TokenStorage + 'static) -> Self {
        let store = Self::new(storage);
        store.initialize().await;
        store
    }

    /// Hydrate the in-memory token from durable storage.
    ///
    /// Only the first call reads storage; later calls return the current value.
    /// A read failure is logged and leaves the store without a session.
    pub async fn initialize(&self) -> Option<String> {
        self.hydrated
            .get_or_init(|| async {
                match self.storage.read().await {
                    Ok(stored) => {
                        let stored = stored.filter(|t| !t.is_empty());
                        debug!(present = stored.is_some(), "hydrated session token");
                        self.token.send_replace(stored);
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to read stored token, starting without a session");
                    }
                }
            })
            .await;

        self.token()
    }

    /// Current token, if any
    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    pub fn has_session(&self) -> bool {
        self.token.borrow().is_some()
    }

    /// Observe token changes
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.token.subscribe()
    }

    /// Replace the token. An absent or empty value clears the session.
    ///
    /// Subscribers see the new value before storage is touched. A storage
    /// failure is returned as a non-fatal [`RosterError::Storage`]: the
    /// in-memory value has already been updated and stays authoritative.
    pub async fn update(&self, token: Option<String>) -> Result<(), RosterError> {
        let token = token.filter(|t| !t.is_empty());

        // An explicit update supersedes whatever hydration would have read.
        let _ = self.hydrated.set(());
        self.token.send_replace(token.clone());

        let persisted = match &token {
            Some(t) => self.storage.write(t).await,
            None => self.storage.remove().await,
        };

        match persisted {
            Ok(()) => {
                info!(present = token.is_some(), "session token updated");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to persist session token, keeping in-memory value");
                Err(RosterError::Storage(e.to_string()))
            }
        }
    }

    /// Log out: drop the token from memory and storage
    pub async fn clear(&self) -> Result<(), RosterError> {
        self.update(None).await
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("has_session", &self.has_session())
            .finish()
    }
}
