use std::sync::Arc;

use crate::builder::ConsoleBuilder;
use crate::config::ConsoleConfig;
use crate::roster::RosterSynchronizer;
use crate::session::SessionStore;

/// Primary entry point: a session store and the roster that reads from it.
///
/// Use [`Console::builder()`] to construct an instance.
pub struct Console {
    config: ConsoleConfig,
    session: Arc<SessionStore>,
    roster: RosterSynchronizer,
}

impl Console {
    pub(crate) fn from_parts(
        config: ConsoleConfig,
        session: Arc<SessionStore>,
        roster: RosterSynchronizer,
    ) -> Self {
        Self {
            config,
            session,
            roster,
        }
    }

    /// Create a new builder for configuring a `Console`.
    pub fn builder() -> ConsoleBuilder {
        ConsoleBuilder::new()
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn roster(&self) -> &RosterSynchronizer {
        &self.roster
    }
}
