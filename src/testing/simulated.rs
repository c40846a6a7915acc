use crate::driver::{
    DeviceCommand, DeviceDescriptor, DeviceHandle, Driver, PropertyCallback, StateCallback,
    StateEvent, StatusCommand,
};
use crate::errors::CameraError;
use crate::properties::{PropertyId, PropertyValue};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One entry in the per-device call journal, in the order the worker issued
/// the calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    OpenSession,
    CloseSession,
    GetProperty(PropertyId),
    GetConstraints(PropertyId),
    SetProperty(PropertyId, u32),
    SendCommand(DeviceCommand, i32),
    SendStatusCommand(StatusCommand, i32),
    PollEvents,
}

/// An event a test schedules for delivery during the next poll. Property and
/// constraint changes mutate the simulated device first, then fire the
/// callback, so a re-read observes the new value.
#[derive(Debug, Clone)]
pub enum SimulatedEvent {
    PropertyChanged(PropertyId, PropertyValue),
    ConstraintsChanged(PropertyId, Vec<u32>),
    State(StateEvent),
}

/// Shared mutable state of one simulated device.
pub struct DeviceState {
    pub properties: HashMap<PropertyId, PropertyValue>,
    pub constraints: HashMap<PropertyId, Vec<u32>>,
    pub pending_events: Vec<SimulatedEvent>,
    pub fail_open_session: bool,
    pub fail_close_session: bool,
    pub fail_set_property: bool,
    pub fail_shutter: bool,
    pub journal: Vec<DriverCall>,
    pub open_sessions: u32,
    pub released: bool,
}

impl DeviceState {
    /// A device with a full stock property table and plausible constraint
    /// lists for every settable property.
    pub fn stock() -> Self {
        let mut properties = HashMap::new();
        properties.insert(
            PropertyId::ProductName,
            PropertyValue::Text("SimCam 1000".to_string()),
        );
        properties.insert(
            PropertyId::SerialNumber,
            PropertyValue::Text("SC-000123".to_string()),
        );
        properties.insert(
            PropertyId::FirmwareVersion,
            PropertyValue::Text("1.0.3".to_string()),
        );
        properties.insert(
            PropertyId::LensName,
            PropertyValue::Text("50mm f/1.8 STM".to_string()),
        );
        properties.insert(PropertyId::StorageType, PropertyValue::U32(2));
        properties.insert(PropertyId::AeMode, PropertyValue::U32(3));
        properties.insert(PropertyId::AfMode, PropertyValue::U32(0));
        properties.insert(PropertyId::ImageQuality, PropertyValue::U32(0x0010_ff0f));
        properties.insert(PropertyId::WhiteBalance, PropertyValue::U32(0));
        properties.insert(PropertyId::ColorTemperature, PropertyValue::U32(5200));
        properties.insert(PropertyId::ColorSpace, PropertyValue::U32(1));
        properties.insert(PropertyId::DriveMode, PropertyValue::U32(0));
        properties.insert(PropertyId::MeteringMode, PropertyValue::U32(3));
        properties.insert(PropertyId::Iso, PropertyValue::U32(0x48));
        properties.insert(PropertyId::Aperture, PropertyValue::U32(0x30));
        properties.insert(PropertyId::ShutterSpeed, PropertyValue::U32(0x70));
        properties.insert(PropertyId::ExposureCompensation, PropertyValue::U32(0x00));

        let mut constraints = HashMap::new();
        constraints.insert(PropertyId::WhiteBalance, vec![0, 1, 2, 3, 4, 5, 8]);
        constraints.insert(
            PropertyId::ColorTemperature,
            vec![2800, 3200, 4000, 5200, 6000, 7000],
        );
        constraints.insert(PropertyId::ColorSpace, vec![1, 2]);
        constraints.insert(PropertyId::DriveMode, vec![0x00, 0x01, 0x04, 0x05, 0x11, 0x12]);
        constraints.insert(PropertyId::MeteringMode, vec![1, 3, 4, 5]);
        constraints.insert(
            PropertyId::Iso,
            vec![0x00, 0x48, 0x50, 0x58, 0x60, 0x68, 0x70, 0x78],
        );
        constraints.insert(
            PropertyId::Aperture,
            vec![0x20, 0x28, 0x30, 0x38, 0x40, 0x48],
        );
        constraints.insert(
            PropertyId::ShutterSpeed,
            vec![0x48, 0x50, 0x58, 0x60, 0x68, 0x70, 0x78, 0x80, 0x88],
        );
        constraints.insert(
            PropertyId::ExposureCompensation,
            vec![0xe8, 0xf0, 0xf8, 0x00, 0x08, 0x10, 0x18],
        );

        Self {
            properties,
            constraints,
            pending_events: Vec::new(),
            fail_open_session: false,
            fail_close_session: false,
            fail_set_property: false,
            fail_shutter: false,
            journal: Vec::new(),
            open_sessions: 0,
            released: false,
        }
    }

    /// Schedule an event for the next poll.
    pub fn push_event(&mut self, event: SimulatedEvent) {
        self.pending_events.push(event);
    }
}

/// Driver over a fixed set of simulated devices.
pub struct SimulatedDriver {
    devices: Vec<(DeviceDescriptor, Arc<Mutex<DeviceState>>)>,
}

impl SimulatedDriver {
    pub fn new(count: usize) -> Self {
        let devices = (0..count)
            .map(|i| {
                let descriptor = DeviceDescriptor {
                    id: format!("sim-{}", i),
                    name: format!("Simulated Camera {}", i + 1),
                };
                (descriptor, Arc::new(Mutex::new(DeviceState::stock())))
            })
            .collect();
        Self { devices }
    }

    /// Shared state of the `index`-th device (0-based), for scripting and
    /// assertions.
    pub fn device_state(&self, index: usize) -> Arc<Mutex<DeviceState>> {
        self.devices[index].1.clone()
    }
}

impl Driver for SimulatedDriver {
    fn list_devices(&mut self) -> Result<Vec<DeviceDescriptor>, CameraError> {
        Ok(self.devices.iter().map(|(d, _)| d.clone()).collect())
    }

    fn open(&mut self, descriptor: &DeviceDescriptor) -> Result<Box<dyn DeviceHandle>, CameraError> {
        let state = self
            .devices
            .iter()
            .find(|(d, _)| d.id == descriptor.id)
            .map(|(_, s)| s.clone())
            .ok_or_else(|| CameraError::DeviceNotFound(descriptor.id.clone()))?;

        Ok(Box::new(SimulatedHandle {
            state,
            on_property_changed: None,
            on_constraints_changed: None,
            on_state_event: None,
        }))
    }
}

struct SimulatedHandle {
    state: Arc<Mutex<DeviceState>>,
    on_property_changed: Option<PropertyCallback>,
    on_constraints_changed: Option<PropertyCallback>,
    on_state_event: Option<StateCallback>,
}

impl SimulatedHandle {
    fn journal(&self, call: DriverCall) {
        self.state.lock().expect("lock poisoned").journal.push(call);
    }
}

impl DeviceHandle for SimulatedHandle {
    fn open_session(&mut self) -> bool {
        let mut state = self.state.lock().expect("lock poisoned");
        state.journal.push(DriverCall::OpenSession);
        if state.fail_open_session {
            false
        } else {
            state.open_sessions += 1;
            true
        }
    }

    fn close_session(&mut self) -> bool {
        let mut state = self.state.lock().expect("lock poisoned");
        state.journal.push(DriverCall::CloseSession);
        if state.fail_close_session || state.open_sessions == 0 {
            false
        } else {
            state.open_sessions -= 1;
            true
        }
    }

    fn get_property(&mut self, prop: PropertyId) -> Result<PropertyValue, CameraError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.journal.push(DriverCall::GetProperty(prop));
        state
            .properties
            .get(&prop)
            .cloned()
            .ok_or_else(|| CameraError::DriverError(format!("device has no property {}", prop)))
    }

    fn get_property_constraints(&mut self, prop: PropertyId) -> Result<Vec<u32>, CameraError> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.journal.push(DriverCall::GetConstraints(prop));
        Ok(state.constraints.get(&prop).cloned().unwrap_or_default())
    }

    fn set_property(&mut self, prop: PropertyId, value: u32) -> bool {
        let mut state = self.state.lock().expect("lock poisoned");
        state.journal.push(DriverCall::SetProperty(prop, value));
        if state.fail_set_property {
            return false;
        }
        // The simulated device only accepts values on its constraint list,
        // like the real one.
        let admissible = state
            .constraints
            .get(&prop)
            .map(|list| list.contains(&value))
            .unwrap_or(false);
        if admissible {
            state.properties.insert(prop, PropertyValue::U32(value));
        }
        admissible
    }

    fn send_command(&mut self, command: DeviceCommand, param: i32) -> bool {
        let mut state = self.state.lock().expect("lock poisoned");
        state.journal.push(DriverCall::SendCommand(command, param));
        !(state.fail_shutter && command == DeviceCommand::PressShutterButton)
    }

    fn send_status_command(&mut self, command: StatusCommand, param: i32) -> bool {
        self.journal(DriverCall::SendStatusCommand(command, param));
        true
    }

    fn poll_events(&mut self) {
        let pending: Vec<SimulatedEvent> = {
            let mut state = self.state.lock().expect("lock poisoned");
            state.journal.push(DriverCall::PollEvents);
            state.pending_events.drain(..).collect()
        };

        // Callbacks run inline on the polling thread, outside the state
        // lock, after the device's own tables reflect the change.
        for event in pending {
            match event {
                SimulatedEvent::PropertyChanged(prop, value) => {
                    self.state
                        .lock()
                        .expect("lock poisoned")
                        .properties
                        .insert(prop, value);
                    if let Some(callback) = self.on_property_changed.as_mut() {
                        callback(prop);
                    }
                }
                SimulatedEvent::ConstraintsChanged(prop, values) => {
                    self.state
                        .lock()
                        .expect("lock poisoned")
                        .constraints
                        .insert(prop, values);
                    if let Some(callback) = self.on_constraints_changed.as_mut() {
                        callback(prop);
                    }
                }
                SimulatedEvent::State(event) => {
                    if let Some(callback) = self.on_state_event.as_mut() {
                        callback(event);
                    }
                }
            }
        }
    }

    fn register_property_changed_callback(&mut self, callback: PropertyCallback) {
        self.on_property_changed = Some(callback);
    }

    fn register_constraints_changed_callback(&mut self, callback: PropertyCallback) {
        self.on_constraints_changed = Some(callback);
    }

    fn register_state_callback(&mut self, callback: StateCallback) {
        self.on_state_event = Some(callback);
    }
}

impl Drop for SimulatedHandle {
    fn drop(&mut self) {
        self.state.lock().expect("lock poisoned").released = true;
    }
}
