//! # Cartkit Testkit
//!
//! Testing utilities for cartkit.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden payloads**: stored cart strings and what they must decode to
//! - **Generators**: Proptest strategies for catalog items and command sequences
//! - **Fixtures**: A memory-backed cart setup, a recording notifier, and
//!   stores that fail or lag on demand
//!
//! ## Golden Payloads
//!
//! ```rust
//! use cartkit_testkit::vectors::verify_all_payloads;
//!
//! assert_eq!(verify_all_payloads(), Ok(()));
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use cartkit_core::CartState;
//! use cartkit_testkit::generators::command_sequence;
//!
//! proptest! {
//!     #[test]
//!     fn never_zero(commands in command_sequence(50)) {
//!         let mut state = CartState::new();
//!         for c in &commands {
//!             if let Ok(next) = c.apply(&state) { state = next; }
//!         }
//!         prop_assert!(state.iter().all(|i| i.quantity > 0));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use cartkit_testkit::fixtures::{catalog_item, TestFixture};
//!
//! async fn example() {
//!     let fixture = TestFixture::new();
//!     let cart = fixture.open_cart().await;
//!     cart.add_to_cart(catalog_item("p1", 10.0));
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{catalog_item, FailingStore, LaggyStore, RecordingNotifier, TestFixture};
pub use generators::{cart_command, catalog_item as catalog_item_strategy, command_sequence};
pub use vectors::{all_payloads, verify_all_payloads, GoldenPayload};
