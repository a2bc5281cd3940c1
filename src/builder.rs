use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::{HttpRosterApi, RosterApi};
use crate::config::ConsoleConfig;
use crate::console::Console;
use crate::error::RosterError;
use crate::roster::{Confirm, RosterSynchronizer, TerminalConfirm};
use crate::session::{SessionStore, SqliteTokenStorage, TokenStorage, UnavailableTokenStorage};

/// Builder for constructing a [`Console`].
///
/// # Example
///
/// ```no_run
/// # use roster_console::{AlwaysConfirm, Console};
/// # async fn example() -> Result<(), roster_console::RosterError> {
/// let console = Console::builder()
///     .from_config()?
///     .confirm(AlwaysConfirm)
///     .build()
///     .await?;
///
/// console.roster().mount().await;
/// println!("{}", console.roster().snapshot().view());
/// # Ok(())
/// # }
/// ```
pub struct ConsoleBuilder {
    config: ConsoleConfig,
    storage: Option<Box<dyn TokenStorage>>,
    api: Option<Box<dyn RosterApi>>,
    confirm: Option<Box<dyn Confirm>>,
}

impl ConsoleBuilder {
    pub fn new() -> Self {
        Self {
            config: ConsoleConfig::default(),
            storage: None,
            api: None,
            confirm: None,
        }
    }

    /// Use an explicit configuration.
    pub fn config(mut self, config: ConsoleConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration with precedence: env > project file > global file > defaults.
    pub fn from_config(mut self) -> Result<Self, RosterError> {
        self.config = ConsoleConfig::load()
            .map_err(|e| RosterError::Config(format!("failed to load configuration: {}", e)))?;
        debug!(api_url = %self.config.api_url, "loaded console configuration");
        Ok(self)
    }

    /// Override the API base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set a custom token storage (defaults to SQLite at the configured path).
    pub fn storage(mut self, storage: impl TokenStorage + 'static) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    /// Set a custom student API (defaults to HTTP at the configured URL).
    pub fn api(mut self, api: impl RosterApi + 'static) -> Self {
        self.api = Some(Box::new(api));
        self
    }

    /// Set how deletes are confirmed (defaults to a terminal prompt).
    pub fn confirm(mut self, confirm: impl Confirm + 'static) -> Self {
        self.confirm = Some(Box::new(confirm));
        self
    }

    /// Build the [`Console`], hydrating the session from storage.
    pub async fn build(self) -> Result<Console, RosterError> {
        let storage: Box<dyn TokenStorage> = match self.storage {
            Some(storage) => storage,
            None => open_token_storage(&self.config),
        };

        let api: Box<dyn RosterApi> = match self.api {
            Some(api) => api,
            None => Box::new(HttpRosterApi::new(
                self.config.api_url.clone(),
                self.config.request_timeout(),
            )?),
        };

        let confirm = self.confirm.unwrap_or_else(|| Box::new(TerminalConfirm));

        let session = Arc::new(SessionStore::from_boxed(storage));
        session.initialize().await;

        let roster = RosterSynchronizer::from_parts(Arc::clone(&session), api, confirm);

        Ok(Console::from_parts(self.config, session, roster))
    }
}

/// Open the configured SQLite token storage.
///
/// Failing to resolve or open it is not fatal: the console starts with
/// storage that rejects every operation and the session lives in memory.
fn open_token_storage(config: &ConsoleConfig) -> Box<dyn TokenStorage> {
    let opened = config.token_db_path().and_then(|path| {
        SqliteTokenStorage::with_slot(path, config.token_slot.clone())
    });

    match opened {
        Ok(storage) => {
            debug!(
                path = %storage.path().display(),
                slot = storage.slot(),
                "opened token storage"
            );
            Box::new(storage)
        }
        Err(e) => {
            warn!(error = %e, "token storage unavailable, session will not persist");
            Box::new(UnavailableTokenStorage::new(e.to_string()))
        }
    }
}

impl Default for ConsoleBuilder {
    fn default() -> Self {
        Self::new()
    }
}
