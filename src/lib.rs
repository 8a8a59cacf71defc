//! GrowMonitor firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod alerts;
pub mod app;
pub mod config;
pub mod error;
pub mod escape;
pub mod history;
pub mod inbox;
pub mod measurement;
pub mod remote;
pub mod report;
pub mod runtime;
pub mod scheduler;

pub mod pins;

// Dual-target modules: device implementations behind cfg attributes,
// simulation stubs on the host.
pub mod adapters;
pub mod drivers;
pub mod sensors;
