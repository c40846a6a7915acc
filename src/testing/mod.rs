//! Simulated driver for offline testing
//!
//! An in-memory stand-in for the vendor driver so the worker, facade, and
//! CLI can run without hardware. Tests reach into the shared
//! [`DeviceState`] to script property tables, inject events, flip failure
//! switches, and assert call order through the journal.

pub mod simulated;

pub use simulated::{DeviceState, DriverCall, SimulatedDriver, SimulatedEvent};
