//! In-memory session registry.

use dashmap::DashMap;
use sesame_api::AccountId;
use uuid::Uuid;

/// Sessions established after a successful verification.
///
/// Session ids are opaque; the account id never leaves the server inside
/// the cookie value.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, AccountId>,
}

impl SessionRegistry {
    /// Record a signed-in session and return its id.
    pub fn start(&self, account: AccountId) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions.insert(id.clone(), account);
        id
    }
}
