//! Vendor driver interface.
//!
//! The driver hands out one [`DeviceHandle`] per physical camera. A handle is
//! `Send` so it can move onto the worker thread, but it is deliberately not
//! `Sync`: after construction every call on it happens from exactly one
//! thread. `poll_events` may invoke the registered callbacks synchronously on
//! the polling thread before it returns; releasing a handle is `Drop`.

use crate::errors::CameraError;
use crate::properties::{PropertyId, PropertyValue};

/// Descriptor for one connected device, as reported by enumeration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeviceDescriptor {
    pub id: String,
    pub name: String,
}

/// Commands sent to the device body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    PressShutterButton,
    ExtendShutdownTimer,
}

/// Shutter button parameters for [`DeviceCommand::PressShutterButton`].
pub const SHUTTER_BUTTON_OFF: i32 = 0;
pub const SHUTTER_BUTTON_HALFWAY: i32 = 1;
pub const SHUTTER_BUTTON_COMPLETELY: i32 = 3;

/// Status commands that change driver-side state rather than a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCommand {
    UiLock,
    UiUnlock,
}

/// Asynchronous notifications the device pushes during an event poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    /// The device is about to power down and wants its timer extended.
    ShutdownWarning,
    /// A capture failed on the device side; the code is vendor-defined.
    CaptureError(u32),
}

pub type PropertyCallback = Box<dyn FnMut(PropertyId) + Send>;
pub type StateCallback = Box<dyn FnMut(StateEvent) + Send>;

/// Entry point into the vendor driver: enumeration and handle construction.
pub trait Driver: Send {
    fn list_devices(&mut self) -> Result<Vec<DeviceDescriptor>, CameraError>;
    fn open(&mut self, descriptor: &DeviceDescriptor) -> Result<Box<dyn DeviceHandle>, CameraError>;
}

/// Primitive, blocking operations against one opened device.
///
/// The boolean-returning mutators mirror the driver convention: `true` means
/// the device confirmed the operation, `false` means it rejected it (busy,
/// unsupported value, disconnected). Neither outcome is an error at this
/// layer.
pub trait DeviceHandle: Send {
    fn open_session(&mut self) -> bool;
    fn close_session(&mut self) -> bool;

    fn get_property(&mut self, prop: PropertyId) -> Result<PropertyValue, CameraError>;
    fn get_property_constraints(&mut self, prop: PropertyId) -> Result<Vec<u32>, CameraError>;
    fn set_property(&mut self, prop: PropertyId, value: u32) -> bool;

    fn send_command(&mut self, command: DeviceCommand, param: i32) -> bool;
    fn send_status_command(&mut self, command: StatusCommand, param: i32) -> bool;

    /// Drain pending device events, invoking registered callbacks inline.
    fn poll_events(&mut self);

    fn register_property_changed_callback(&mut self, callback: PropertyCallback);
    fn register_constraints_changed_callback(&mut self, callback: PropertyCallback);
    fn register_state_callback(&mut self, callback: StateCallback);
}
