//! Account Selector - Stateless rotation policy over the pool

use rand::Rng;
use rotamail_common::types::RotationMode;
use rotamail_storage::models::SmtpAccount;

/// Stateless rotation policy. Round-robin is driven entirely by the
/// recipient index, so the same request always produces the same
/// assignment sequence; random picks carry no memory between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountSelector;

impl AccountSelector {
    /// Pick the account for recipient position `index`.
    ///
    /// Returns None only for an empty pool. Round-robin wraps via
    /// `index % len`, which is also what lets the quota fallback walk
    /// the pool at increasing offsets.
    pub fn select<'a>(
        pool: &'a [SmtpAccount],
        index: usize,
        mode: RotationMode,
    ) -> Option<&'a SmtpAccount> {
        if pool.is_empty() {
            return None;
        }

        match mode {
            RotationMode::Random => {
                let i = rand::thread_rng().gen_range(0..pool.len());
                pool.get(i)
            }
            RotationMode::RoundRobin => pool.get(index % pool.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn pool(n: usize) -> Vec<SmtpAccount> {
        (0..n)
            .map(|i| SmtpAccount {
                id: Uuid::new_v4(),
                label: format!("relay-{}", i),
                host: format!("smtp{}.example.com", i),
                port: 587,
                username: format!("user{}@example.com", i),
                password: "secret".to_string(),
                encryption: "starttls".to_string(),
                from_name: String::new(),
                from_email: String::new(),
                daily_limit: None,
                active: true,
                created_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn test_empty_pool_selects_nothing() {
        assert!(AccountSelector::select(&[], 0, RotationMode::RoundRobin).is_none());
        assert!(AccountSelector::select(&[], 7, RotationMode::Random).is_none());
    }

    #[test]
    fn test_round_robin_visits_each_account_k_times() {
        let pool = pool(3);
        let k = 4;

        let mut visits: HashMap<Uuid, usize> = HashMap::new();
        for index in 0..pool.len() * k {
            let picked = AccountSelector::select(&pool, index, RotationMode::RoundRobin).unwrap();
            *visits.entry(picked.id).or_default() += 1;

            // fixed cyclic order by position
            assert_eq!(picked.id, pool[index % pool.len()].id);
        }

        for account in &pool {
            assert_eq!(visits[&account.id], k);
        }
    }

    #[test]
    fn test_round_robin_is_deterministic_per_index() {
        let pool = pool(5);
        for index in [0, 3, 5, 12, 999] {
            let a = AccountSelector::select(&pool, index, RotationMode::RoundRobin).unwrap();
            let b = AccountSelector::select(&pool, index, RotationMode::RoundRobin).unwrap();
            assert_eq!(a.id, b.id);
        }
    }

    #[test]
    fn test_random_is_roughly_uniform() {
        let pool = pool(4);
        let samples = 8000;

        let mut visits: HashMap<Uuid, usize> = HashMap::new();
        for index in 0..samples {
            let picked = AccountSelector::select(&pool, index, RotationMode::Random).unwrap();
            *visits.entry(picked.id).or_default() += 1;
        }

        // every account gets picked, and no account dominates; a loose
        // statistical bound, not an exact one
        let expected = samples / pool.len();
        for account in &pool {
            let count = visits.get(&account.id).copied().unwrap_or(0);
            assert!(
                count > expected / 2 && count < expected * 2,
                "account {} picked {} times, expected around {}",
                account.label,
                count,
                expected
            );
        }
    }
}
