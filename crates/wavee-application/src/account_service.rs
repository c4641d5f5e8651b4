//! Simulated sign-up and log-in.

use std::sync::Arc;

use wavee_core::account::AccountState;
use wavee_core::clock::Clock;
use wavee_core::error::Result;
use wavee_core::store::RecordStore;

#[derive(Clone)]
pub struct AccountService {
    records: RecordStore,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    pub fn new(records: RecordStore, clock: Arc<dyn Clock>) -> Self {
        Self { records, clock }
    }

    pub async fn status(&self) -> Result<AccountState> {
        self.records.load().await
    }

    pub async fn is_guest(&self) -> Result<bool> {
        Ok(self.status().await?.is_guest())
    }

    pub async fn sign_up(&self, email: &str) -> Result<AccountState> {
        self.authenticate(email, "Signed up").await
    }

    pub async fn log_in(&self, email: &str) -> Result<AccountState> {
        self.authenticate(email, "Logged in").await
    }

    async fn authenticate(&self, email: &str, action: &str) -> Result<AccountState> {
        let state = AccountState::sign_in(email, self.clock.now())?;
        self.records.save(&state).await?;
        tracing::info!("[AccountService] {}", action);
        Ok(state)
    }

    /// Returns to guest mode.
    pub async fn sign_out(&self) -> Result<()> {
        self.records.save(&AccountState::default()).await?;
        tracing::info!("[AccountService] Signed out");
        Ok(())
    }
}
