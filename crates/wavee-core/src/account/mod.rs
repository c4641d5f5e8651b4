//! Simulated account state.
//!
//! There is no authentication backend. Signing up or logging in only flips a
//! flag in the local store, which takes the app out of guest mode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WaveeError};
use crate::store::{StoreRecord, keys};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountState {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
}

impl StoreRecord for AccountState {
    const KEY: &'static str = keys::AUTH_STATUS;
}

impl AccountState {
    pub fn is_guest(&self) -> bool {
        !self.authenticated
    }

    pub fn sign_in(email: &str, now: DateTime<Utc>) -> Result<Self> {
        let email = validate_email(email)?;
        Ok(Self {
            authenticated: true,
            email: Some(email),
            since: Some(now),
        })
    }
}

/// Minimal shape check; the address is never contacted.
fn validate_email(email: &str) -> Result<String> {
    let email = email.trim();
    let valid = email
        .split_once('@')
        .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
    if valid {
        Ok(email.to_string())
    } else {
        Err(WaveeError::validation(format!(
            "'{email}' is not a valid email address"
        )))
    }
}
