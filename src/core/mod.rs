//! # Core Application Logic
//!
//! This module contains Rentrack's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Ledger (store)       │
//!                    │  • Status deriver       │
//!                    │  • Route + Action       │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  I/O only via KvStore.  │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │    Web     │      │    API     │
//!     │  Adapter   │      │  Adapter   │      │  (future)  │
//!     │ (ratatui)  │      │  (future)  │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`model`]: `Asset` and `Rental` records
//! - [`kv`]: the key-value store seam (file and memory backends)
//! - [`ledger`]: the `Ledger` store with check-out/check-in
//! - [`status`]: derives available / rented / overdue from timestamps
//! - [`route`]: the three views and their fragment paths
//! - [`state`]: the `App` struct, all application state in one place
//! - [`action`]: the `Action` enum and `update()`
//! - [`view`]: per-route view models rebuilt from the ledger
//! - [`form`], [`report`], [`seed`], [`config`]

pub mod action;
pub mod config;
pub mod form;
pub mod kv;
pub mod ledger;
pub mod model;
pub mod report;
pub mod route;
pub mod seed;
pub mod state;
pub mod status;
pub mod view;
