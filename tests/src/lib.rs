//! # Flight Surety Test Suite
//!
//! Unified test crate for scenarios that span several crates.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── admission_consensus.rs   # airline quorum + oracle round end to end
//!     ├── insurance_flow.rs        # premiums, payouts, pause, atomicity
//!     └── oracle_fleet.rs          # concurrent agents against one ledger
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p surety-tests
//! cargo test -p surety-tests integration::oracle_fleet
//! ```

#![allow(unused_variables)]
#![allow(dead_code)]

pub mod integration;
