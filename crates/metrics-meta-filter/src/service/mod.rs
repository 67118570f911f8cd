//! Service Layer
//!
//! Wires the sharded filter, its rotation scheduler and the event sink
//! into the store the ingestion pipeline talks to.

pub mod membership_store;
pub mod rotation;

pub use membership_store::MembershipStore;
pub use rotation::{RotationHandle, RotationScheduler};
