//! # metrics-meta Test Suite
//!
//! Cross-crate tests that need a real listener, a real runtime or both.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── filter_benchmarks.rs  # Store throughput, single and contended
//! └── src/integration/
//!     ├── ingestion.rs          # TCP client -> writer -> store, end to end
//!     └── rotation.rs           # Rolling forget window under paused time
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p metrics-meta-tests
//! cargo test -p metrics-meta-tests integration::ingestion
//!
//! # Benchmarks
//! cargo bench -p metrics-meta-tests
//! ```

pub mod integration;
