//! Ports Layer - Trait definitions
//!
//! - Inbound: `MembershipFilter` - the API the ingestion pipeline drives
//! - Outbound: `EventSink` - where components report what they did

pub mod inbound;
pub mod outbound;

pub use inbound::MembershipFilter;
pub use outbound::EventSink;
