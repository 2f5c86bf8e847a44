use sesame_api::{Account, AccountStore};

/// Account store seeded from configuration, held in memory.
///
/// Lookup order is insertion order, which keeps the first-match tie-break on
/// duplicate emails deterministic.
pub struct InMemoryAccountStore {
    accounts: Vec<Account>,
}

impl InMemoryAccountStore {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn accounts_by_email(&self, email: &str) -> Vec<Account> {
        self.accounts
            .iter()
            .filter(|a| a.email == email)
            .cloned()
            .collect()
    }

    fn account_by_id(&self, id: &str) -> Option<Account> {
        self.accounts.iter().find(|a| a.id == id).cloned()
    }
}
