//! Active-account cursor
//!
//! The decision loop owns the only `ActiveAccount`. Readers (the status
//! reporter) receive an `ActiveAccountView`, which has no way to move it.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

use crate::accounts::{Account, AccountSet};

/// Writable cursor over an `AccountSet`.
#[derive(Debug)]
pub struct ActiveAccount {
    accounts: Arc<AccountSet>,
    index: Arc<AtomicUsize>,
}

impl ActiveAccount {
    /// Start at `index`. Callers resolve it with `AccountSet::index_of`.
    pub fn new(accounts: Arc<AccountSet>, index: usize) -> Self {
        let index = index % accounts.len();
        Self {
            accounts,
            index: Arc::new(AtomicUsize::new(index)),
        }
    }

    pub fn index(&self) -> usize {
        self.index.load(Ordering::Acquire)
    }

    pub fn current(&self) -> &Account {
        self.accounts.get(self.index())
    }

    /// Move to the round-robin successor and return it.
    pub fn rotate(&mut self) -> &Account {
        let from = self.index();
        let to = self.accounts.next_index(from);
        self.index.store(to, Ordering::Release);
        let account = self.accounts.get(to);
        info!(from = %self.accounts.get(from).label, to = %account.label, "switched account");
        account
    }

    /// Read-only handle for other tasks.
    pub fn view(&self) -> ActiveAccountView {
        ActiveAccountView {
            accounts: self.accounts.clone(),
            index: self.index.clone(),
        }
    }
}

/// Read-only view of the active account.
#[derive(Debug, Clone)]
pub struct ActiveAccountView {
    accounts: Arc<AccountSet>,
    index: Arc<AtomicUsize>,
}

impl ActiveAccountView {
    pub fn index(&self) -> usize {
        self.index.load(Ordering::Acquire)
    }

    pub fn current(&self) -> &Account {
        self.accounts.get(self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(n: usize) -> Arc<AccountSet> {
        let contents: Vec<String> = (0..n).map(|i| format!("tok-{i}")).collect();
        Arc::new(AccountSet::parse(&contents.join("\n")).unwrap())
    }

    #[test]
    fn rotate_advances_and_wraps() {
        let mut active = ActiveAccount::new(set(2), 0);
        assert_eq!(active.current().label, "account_1");
        assert_eq!(active.rotate().label, "account_2");
        assert_eq!(active.rotate().label, "account_1");
    }

    #[test]
    fn view_tracks_rotation() {
        let mut active = ActiveAccount::new(set(3), 1);
        let view = active.view();
        assert_eq!(view.current().label, "account_2");
        active.rotate();
        assert_eq!(view.index(), 2);
        assert_eq!(view.current().token.expose(), "tok-2");
    }

    #[test]
    fn start_index_is_clamped_into_range() {
        let active = ActiveAccount::new(set(2), 5);
        assert_eq!(active.index(), 1);
    }
}
