//! # Starlog Testkit
//!
//! Testing utilities for the starlog ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: Helper structs for setting up ledger test scenarios
//! - **Generators**: Proptest strategies for property-based testing
//!
//! ## Test Fixtures
//!
//! Quickly set up a wallet and an in-memory gateway:
//!
//! ```rust,no_run
//! use starlog_testkit::fixtures::TestFixture;
//!
//! async fn example() {
//!     let fixture = TestFixture::with_seed([7u8; 32]).await;
//!     let block = fixture.register("my first star").await;
//!     assert_eq!(block.height, 1);
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use starlog_testkit::generators::star_record;
//!
//! proptest! {
//!     #[test]
//!     fn records_roundtrip(record in star_record()) {
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{multi_party_wallets, star_request, TestFixture};
