//! TetherCam: tethered camera control over a thread-confined vendor driver
//!
//! Vendor camera drivers hand out a device handle that must be used from
//! exactly one thread, while real applications issue commands from many.
//! This crate resolves that with an actor: a background worker exclusively
//! owns the handle, drains a command queue, interleaves it with periodic
//! event polling, and publishes the last-known device state to readers on
//! other threads.
//!
//! # Features
//! - Single worker thread owning all device I/O
//! - Fire-and-forget mutators safe to call from any thread
//! - Non-blocking property reads from a guarded cache
//! - Constraint-aware setters addressed by 1-based index
//! - Device event handling (property changes, shutdown warnings)
//! - Simulated driver for offline testing
//!
//! # Usage
//! ```rust
//! use tethercam::testing::SimulatedDriver;
//! use tethercam::CameraSystem;
//!
//! let mut system = CameraSystem::new(Box::new(SimulatedDriver::new(1)));
//! system.list_devices().unwrap();
//! system.select_device(1).unwrap();
//!
//! let camera = system.camera().unwrap();
//! println!("{} (serial {})", camera.get_product_name(), camera.get_serial_number());
//! camera.set_iso(3).unwrap(); // applied on the worker's next tick
//! ```
pub mod cache;
pub mod camera;
pub mod command;
pub mod config;
pub mod decode;
pub mod driver;
pub mod errors;
pub mod properties;

mod worker;

// Testing utilities - simulated driver for offline testing
pub mod testing;

// Re-exports for convenience
pub use camera::{Camera, CameraSystem};
pub use command::{Command, CommandQueue, SessionAction, ShutterAction};
pub use config::TetherConfig;
pub use driver::{DeviceDescriptor, DeviceHandle, Driver};
pub use errors::CameraError;
pub use properties::{PropertyClass, PropertyId, PropertyValue};

/// Initialize logging for the camera system
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "tethercam=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}
