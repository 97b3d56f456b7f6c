//! Thread-safe in-memory balance storage
//!
//! This module provides the `InMemoryBalanceStore` struct, the default
//! [`BalanceStore`] used by both engines.
//!
//! # Design
//!
//! Balances live in a `DashMap` keyed by user id. A single `get` or `put` is
//! atomic, and calls for different users touch different shards. The store
//! gives no guarantee across calls; a read followed by a write can interleave
//! with another caller's read and write. The engines close that gap with the
//! per-user locks of the `LockRegistry`.

use crate::core::traits::BalanceStore;
use crate::types::{Balance, UserId};
use dashmap::DashMap;

/// In-memory balance table
#[derive(Debug, Default)]
pub struct InMemoryBalanceStore {
    /// Concurrent map of user ids to their latest balance
    balances: DashMap<UserId, Balance>,
}

impl InMemoryBalanceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            balances: DashMap::new(),
        }
    }

    /// Number of users with a stored balance
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// Whether no balance was ever stored
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

impl BalanceStore for InMemoryBalanceStore {
    fn get(&self, user_id: UserId) -> Balance {
        self.balances
            .get(&user_id)
            .map(|entry| *entry.value())
            .unwrap_or_else(|| Balance::empty(user_id))
    }

    fn put(&self, user_id: UserId, balance: Balance) {
        self.balances.insert(user_id, balance);
    }

    fn balances(&self) -> Vec<Balance> {
        self.balances.iter().map(|entry| *entry.value()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_get_unknown_user_returns_sentinel() {
        let store = InMemoryBalanceStore::new();

        let balance = store.get(1);

        assert!(balance.is_empty());
        assert_eq!(balance.user_id(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_put_then_get() {
        let store = InMemoryBalanceStore::new();
        let balance = Balance::new(1, 500, 10).unwrap();

        store.put(1, balance);

        assert_eq!(store.get(1), balance);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_put_replaces_previous_balance() {
        let store = InMemoryBalanceStore::new();
        store.put(1, Balance::new(1, 500, 10).unwrap());
        store.put(1, Balance::new(1, 700, 20).unwrap());

        let balance = store.get(1);
        assert_eq!(balance.point(), 700);
        assert_eq!(balance.updated_at(), 20);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_balances_lists_every_user() {
        let store = InMemoryBalanceStore::new();
        for user_id in 1..=3 {
            store.put(user_id, Balance::new(user_id, 100, 0).unwrap());
        }

        let mut users: Vec<UserId> = store.balances().iter().map(|b| b.user_id()).collect();
        users.sort_unstable();
        assert_eq!(users, vec![1, 2, 3]);
    }

    #[test]
    fn test_concurrent_puts_to_different_users() {
        let store = Arc::new(InMemoryBalanceStore::new());
        let mut handles = vec![];

        for user_id in 0..10u64 {
            let store_clone = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                let point = (user_id as i64 + 1) * 100;
                store_clone.put(user_id, Balance::new(user_id, point, 0).unwrap());
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 10);
        for user_id in 0..10u64 {
            assert_eq!(store.get(user_id).point(), (user_id as i64 + 1) * 100);
        }
    }
}
