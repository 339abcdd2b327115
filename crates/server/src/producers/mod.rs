// crates/server/src/producers/mod.rs
//! Long-running task implementations that report through the lifecycle
//! manager. Producers own their patch semantics: they supply timestamps,
//! keep progress non-decreasing, and stop patching after a terminal state.

pub mod logcat;
