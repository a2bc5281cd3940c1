use anyhow::Result;
use async_trait::async_trait;

/// Durable storage for the session token (a single named slot)
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Read the stored token, `None` if the slot is empty
    async fn read(&self) -> Result<Option<String>>;

    /// Replace the stored token
    async fn write(&self, token: &str) -> Result<()>;

    /// Remove any stored token
    async fn remove(&self) -> Result<()>;
}

/// Stand-in used when the token database cannot be opened.
///
/// Every operation fails with the original reason, which the session store
/// reports as a warning while the in-memory token stays authoritative.
pub(crate) struct UnavailableTokenStorage {
    reason: String,
}

impl UnavailableTokenStorage {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl TokenStorage for UnavailableTokenStorage {
    async fn read(&self) -> Result<Option<String>> {
        anyhow::bail!("token storage unavailable: {}", self.reason)
    }

    async fn write(&self, _token: &str) -> Result<()> {
        anyhow::bail!("token storage unavailable: {}", self.reason)
    }

    async fn remove(&self) -> Result<()> {
        anyhow::bail!("token storage unavailable: {}", self.reason)
    }
}
