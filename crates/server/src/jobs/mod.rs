// crates/server/src/jobs/mod.rs
//! Job lifecycle tracking.
//!
//! Provides:
//! - `JobManager` — the sole writer of job state; persists then broadcasts
//! - `JobHub` — fan-out of job events to connected observers
//!
//! Producers (log collectors, deploy tasks) call `JobManager::create` once
//! and then report progress through `JobManager::patch`; observers subscribe
//! to the hub and re-fetch history from the store on connect.

pub mod hub;
pub mod manager;

pub use hub::{JobHub, Subscription};
pub use manager::JobManager;
