//! Inbound Ports (Driving Ports)

/// Probabilistic set of recently seen keys (Driving Port)
///
/// Implementations may report a key that was never inserted (false
/// positive) but never miss a key inserted since its shard was last cleared.
pub trait MembershipFilter: Send + Sync {
    /// Insert a key. Idempotent.
    fn update(&self, key: &[u8]);

    /// Test a key without inserting it
    fn contains(&self, key: &[u8]) -> bool;

    /// Atomically test and insert a key
    ///
    /// Returns `true` if the key was already present ("hit") and `false` if
    /// it was absent and has now been inserted ("miss"). Concurrent calls
    /// with the same key within one shard epoch observe exactly one miss.
    fn contains_or_update(&self, key: &[u8]) -> bool;
}
