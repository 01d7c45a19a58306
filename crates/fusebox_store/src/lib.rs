// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Storage abstractions for building circuit breaker backends.
//!
//! This crate defines the [`CircuitStore`] trait that every circuit breaker backend must
//! satisfy, the [`CircuitState`] vocabulary it stores, and the [`Error`] type for fallible
//! storage operations.
//!
//! # Overview
//!
//! The store separates circuit bookkeeping from circuit decisions. A store only knows how
//! to read and write three facts per target: the circuit state, the consecutive failure
//! count, and the time the circuit last opened. The `fusebox` crate owns the logic that
//! decides when those facts change.
//!
//! Unknown targets must read as a closed circuit with zero failures and no open time.
//! There is no explicit initialization step.
//!
//! # Implementing a Store
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::Mutex;
//! use std::time::SystemTime;
//!
//! use fusebox_store::{CircuitState, CircuitStore, Error};
//!
//! #[derive(Default)]
//! struct Record {
//!     state: CircuitState,
//!     failures: u32,
//!     opened_at: Option<SystemTime>,
//! }
//!
//! #[derive(Default)]
//! struct SimpleStore(Mutex<HashMap<String, Record>>);
//!
//! impl SimpleStore {
//!     fn with<R>(&self, target: &str, f: impl FnOnce(&mut Record) -> R) -> Result<R, Error> {
//!         let mut records = self.0.lock().map_err(|_| Error::from_message("poisoned"))?;
//!         Ok(f(records.entry(target.to_string()).or_default()))
//!     }
//! }
//!
//! impl CircuitStore for SimpleStore {
//!     fn state(&self, target: &str) -> Result<CircuitState, Error> {
//!         self.with(target, |r| r.state)
//!     }
//!
//!     fn save_state(&self, target: &str, state: CircuitState) -> Result<(), Error> {
//!         self.with(target, |r| r.state = state)
//!     }
//!
//!     fn failure_count(&self, target: &str) -> Result<u32, Error> {
//!         self.with(target, |r| r.failures)
//!     }
//!
//!     fn increment_failure_count(&self, target: &str) -> Result<(), Error> {
//!         self.with(target, |r| r.failures = r.failures.saturating_add(1))
//!     }
//!
//!     fn reset_failure_count(&self, target: &str) -> Result<(), Error> {
//!         self.with(target, |r| r.failures = 0)
//!     }
//!
//!     fn last_open_time(&self, target: &str) -> Result<Option<SystemTime>, Error> {
//!         self.with(target, |r| r.opened_at)
//!     }
//!
//!     fn set_last_open_time(&self, target: &str, time: SystemTime) -> Result<(), Error> {
//!         self.with(target, |r| r.opened_at = Some(time))
//!     }
//! }
//! ```
//!
//! # Features
//!
//! - `serde`: serialization support for [`CircuitState`].
//! - `test-util`: exposes the [`testing`] module with a recording, failure-injecting mock store.

pub mod error;
mod state;
mod store;
#[cfg(any(feature = "test-util", test))]
pub mod testing;

#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use state::CircuitState;
#[doc(inline)]
pub use store::CircuitStore;
