// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! In-memory circuit state store backed by moka.
//!
//! This crate provides [`InMemoryStore`], a concurrent [`CircuitStore`][fusebox_store::CircuitStore]
//! that keeps circuit state in process memory. Use [`InMemoryStoreBuilder`] to bound the number of
//! tracked targets or to drop idle ones without exposing moka types.
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//!
//! use fusebox_memory::InMemoryStoreBuilder;
//! use fusebox_store::{CircuitState, CircuitStore};
//!
//! let store = InMemoryStoreBuilder::new()
//!     .max_capacity(1000)
//!     .time_to_idle(Duration::from_secs(600))
//!     .build();
//!
//! store.save_state("inventory", CircuitState::Open)?;
//! assert_eq!(store.state("inventory")?, CircuitState::Open);
//! # Ok::<(), fusebox_store::Error>(())
//! ```
//!
//! State lives only as long as the process. Share one store (or clones of it) between every
//! breaker that should see the same circuits.

pub mod builder;
pub mod store;

#[doc(inline)]
pub use builder::InMemoryStoreBuilder;
#[doc(inline)]
pub use store::InMemoryStore;
