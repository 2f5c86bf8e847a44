use serde::{Deserialize, Serialize};

pub type AccountId = String;

/// Built-in primary account used when no default is configured.
pub const FALLBACK_ACCOUNT_ID: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
}

/// How a verified email is mapped onto a local account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingPolicy {
    /// Look accounts up by their email address.
    pub user_mapping: bool,

    /// Fail sign-in when no account carries the verified email.
    /// Meaningful only when `user_mapping` is on.
    pub enforce_user_mapping: bool,

    /// Account signed in when mapping is off or finds nothing without
    /// being enforced. Falls back to [`FALLBACK_ACCOUNT_ID`] when unset.
    pub default_user: Option<AccountId>,
}

#[derive(Debug, thiserror::Error)]
pub enum SesameError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Read-only view of the relying site's account store.
pub trait AccountStore: Send + Sync {
    /// All accounts carrying this email, in store order.
    fn accounts_by_email(&self, email: &str) -> Vec<Account>;

    fn account_by_id(&self, id: &str) -> Option<Account>;
}
