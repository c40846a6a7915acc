//! Public camera surface.
//!
//! [`Camera`] is the caller-facing facade over one device: getters are
//! non-blocking cache reads decoded into display strings, and every mutator
//! enqueues a command and returns immediately. A mutation's only observable
//! result is a later getter reflecting the new value — or not, if the device
//! rejected it. [`CameraSystem`] is the explicitly constructed root that owns
//! the driver and enforces one active camera at a time.

use crate::cache::PropertyCache;
use crate::command::{
    Command, CommandQueue, SessionAction, ShutterAction, INVALID_PROPERTY_VALUE,
};
use crate::config::TetherConfig;
use crate::decode;
use crate::driver::{DeviceDescriptor, DeviceHandle, Driver};
use crate::errors::CameraError;
use crate::properties::{PropertyId, PropertyValue};
use crate::worker;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct Camera {
    descriptor: DeviceDescriptor,
    cache: Arc<PropertyCache>,
    queue: Arc<CommandQueue>,
    stop: Arc<AtomicBool>,
    join_timeout: Duration,
    worker: Option<std::thread::JoinHandle<Box<dyn DeviceHandle>>>,
}

impl Camera {
    /// Take ownership of an opened handle and move it onto a fresh worker
    /// thread. Blocks until the worker finishes its initial bulk read, so
    /// immutable properties are readable as soon as construction returns.
    pub fn new(
        handle: Box<dyn DeviceHandle>,
        descriptor: DeviceDescriptor,
        config: &TetherConfig,
    ) -> Result<Self, CameraError> {
        let cache = Arc::new(PropertyCache::new());
        let queue = Arc::new(CommandQueue::new());
        let stop = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);

        let ctx = worker::WorkerContext {
            cache: cache.clone(),
            queue: queue.clone(),
            stop: stop.clone(),
            tick: Duration::from_millis(config.worker.tick_interval_ms),
            ready: ready_tx,
        };

        let thread = std::thread::Builder::new()
            .name("tethercam-device-worker".to_string())
            .spawn(move || worker::run(handle, ctx))
            .map_err(|e| CameraError::WorkerError(format!("spawn failed: {e}")))?;

        let mut camera = Self {
            descriptor,
            cache,
            queue,
            stop,
            join_timeout: Duration::from_millis(config.worker.join_timeout_ms),
            worker: Some(thread),
        };

        let startup = Duration::from_millis(config.worker.startup_timeout_ms);
        match ready_rx.recv_timeout(startup) {
            Ok(Ok(())) => {
                log::info!("camera ready: {}", camera.descriptor.name);
                Ok(camera)
            }
            Ok(Err(e)) => {
                camera.shutdown();
                Err(e)
            }
            Err(_) => {
                camera.shutdown();
                Err(CameraError::WorkerError(
                    "worker did not finish startup in time".to_string(),
                ))
            }
        }
    }

    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    /// Advisory count of commands not yet dispatched.
    pub fn pending_commands(&self) -> usize {
        self.queue.len()
    }

    // ---- property reads ------------------------------------------------

    /// Display string for any property: text properties come back verbatim,
    /// coded ones go through the decoding tables. `"unknown"` when the cache
    /// has no value yet or the code is unmapped.
    pub fn property_display(&self, prop: PropertyId) -> String {
        match self.cache.read(prop) {
            Some(PropertyValue::Text(s)) => s,
            Some(PropertyValue::U32(v)) => decode::decode(prop, v),
            None => decode::UNKNOWN.to_string(),
        }
    }

    /// Decoded admissible values for a settable property, positionally
    /// paired with 1-based indices for [`Camera::set_property_index`].
    pub fn property_choices(&self, prop: PropertyId) -> Vec<String> {
        self.cache
            .constraints(prop)
            .into_iter()
            .map(|raw| decode::decode(prop, raw))
            .collect()
    }

    pub fn get_product_name(&self) -> String {
        self.property_display(PropertyId::ProductName)
    }

    pub fn get_serial_number(&self) -> String {
        self.property_display(PropertyId::SerialNumber)
    }

    pub fn get_firmware_version(&self) -> String {
        self.property_display(PropertyId::FirmwareVersion)
    }

    pub fn get_storage_type(&self) -> String {
        self.property_display(PropertyId::StorageType)
    }

    pub fn get_ae_mode(&self) -> String {
        self.property_display(PropertyId::AeMode)
    }

    pub fn get_af_mode(&self) -> String {
        self.property_display(PropertyId::AfMode)
    }

    pub fn get_image_quality(&self) -> String {
        self.property_display(PropertyId::ImageQuality)
    }

    pub fn get_lens_name(&self) -> String {
        self.property_display(PropertyId::LensName)
    }

    pub fn get_white_balance(&self) -> String {
        self.property_display(PropertyId::WhiteBalance)
    }

    pub fn get_color_temperature(&self) -> String {
        self.property_display(PropertyId::ColorTemperature)
    }

    pub fn get_color_space(&self) -> String {
        self.property_display(PropertyId::ColorSpace)
    }

    pub fn get_drive_mode(&self) -> String {
        self.property_display(PropertyId::DriveMode)
    }

    pub fn get_metering_mode(&self) -> String {
        self.property_display(PropertyId::MeteringMode)
    }

    pub fn get_iso(&self) -> String {
        self.property_display(PropertyId::Iso)
    }

    pub fn get_aperture(&self) -> String {
        self.property_display(PropertyId::Aperture)
    }

    pub fn get_shutter_speed(&self) -> String {
        self.property_display(PropertyId::ShutterSpeed)
    }

    pub fn get_exposure_compensation(&self) -> String {
        self.property_display(PropertyId::ExposureCompensation)
    }

    // ---- property writes -----------------------------------------------

    /// Enqueue a set of `prop` to the `index`-th entry (1-based) of its
    /// current constraint list. An out-of-range index still enqueues, with
    /// the sentinel value the worker drops without a device call; read the
    /// property back after a tick to observe the outcome either way.
    pub fn set_property_index(&self, prop: PropertyId, index: usize) -> Result<(), CameraError> {
        if !prop.is_settable() {
            return Err(CameraError::InvalidArgument(format!(
                "property {} is not settable",
                prop
            )));
        }
        let choices = self.cache.constraints(prop);
        let value = if index >= 1 && index <= choices.len() {
            choices[index - 1]
        } else {
            INVALID_PROPERTY_VALUE
        };
        self.queue.push(Command::SetProperty { prop, value });
        Ok(())
    }

    pub fn set_white_balance(&self, index: usize) -> Result<(), CameraError> {
        self.set_property_index(PropertyId::WhiteBalance, index)
    }

    pub fn set_color_temperature(&self, index: usize) -> Result<(), CameraError> {
        self.set_property_index(PropertyId::ColorTemperature, index)
    }

    pub fn set_color_space(&self, index: usize) -> Result<(), CameraError> {
        self.set_property_index(PropertyId::ColorSpace, index)
    }

    pub fn set_drive_mode(&self, index: usize) -> Result<(), CameraError> {
        self.set_property_index(PropertyId::DriveMode, index)
    }

    pub fn set_metering_mode(&self, index: usize) -> Result<(), CameraError> {
        self.set_property_index(PropertyId::MeteringMode, index)
    }

    pub fn set_iso(&self, index: usize) -> Result<(), CameraError> {
        self.set_property_index(PropertyId::Iso, index)
    }

    pub fn set_aperture(&self, index: usize) -> Result<(), CameraError> {
        self.set_property_index(PropertyId::Aperture, index)
    }

    pub fn set_shutter_speed(&self, index: usize) -> Result<(), CameraError> {
        self.set_property_index(PropertyId::ShutterSpeed, index)
    }

    pub fn set_exposure_compensation(&self, index: usize) -> Result<(), CameraError> {
        self.set_property_index(PropertyId::ExposureCompensation, index)
    }

    // ---- fire-and-forget actions ---------------------------------------

    pub fn press_shutter_halfway(&self) {
        self.queue.push(Command::Shutter(ShutterAction::PressHalfway));
    }

    pub fn press_shutter(&self) {
        self.queue.push(Command::Shutter(ShutterAction::PressFull));
    }

    pub fn release_shutter(&self) {
        self.queue.push(Command::Shutter(ShutterAction::Release));
    }

    /// Full press plus release in one command.
    pub fn take_photo(&self) {
        self.queue.push(Command::Shutter(ShutterAction::PressAndRelease));
    }

    pub fn open_session(&self) {
        self.queue.push(Command::Session(SessionAction::Open));
    }

    pub fn close_session(&self) {
        self.queue.push(Command::Session(SessionAction::Close));
    }

    pub fn lock_ui(&self) {
        self.queue.push(Command::SetUiLock(true));
    }

    pub fn unlock_ui(&self) {
        self.queue.push(Command::SetUiLock(false));
    }

    /// Signal the worker, wait for it to finish its in-flight tick, then
    /// release the handle. No device call happens after this returns.
    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);

        if let Some(thread) = self.worker.take() {
            let start = Instant::now();
            let mut thread = Some(thread);
            loop {
                if thread.as_ref().is_some_and(|t| t.is_finished()) {
                    // Joining returns the handle; dropping it releases the
                    // device.
                    let _ = thread.take().map(|t| t.join());
                    break;
                }
                if start.elapsed() >= self.join_timeout {
                    log::warn!(
                        "device worker for {} did not stop within the join timeout",
                        self.descriptor.name
                    );
                    break;
                }
                std::thread::sleep(Duration::from_millis(5));
            }
        }
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Root object owning the vendor driver. Replaces the driver's process-wide
/// singleton: callers construct it, and exactly one camera can be active per
/// system at a time.
pub struct CameraSystem {
    driver: Box<dyn Driver>,
    config: TetherConfig,
    devices: Vec<DeviceDescriptor>,
    active: Option<Camera>,
}

impl CameraSystem {
    pub fn new(driver: Box<dyn Driver>) -> Self {
        Self::with_config(driver, TetherConfig::default())
    }

    pub fn with_config(driver: Box<dyn Driver>, config: TetherConfig) -> Self {
        Self {
            driver,
            config,
            devices: Vec::new(),
            active: None,
        }
    }

    /// Re-enumerate connected devices and return the fresh list.
    pub fn list_devices(&mut self) -> Result<Vec<DeviceDescriptor>, CameraError> {
        self.devices = self.driver.list_devices()?;
        Ok(self.devices.clone())
    }

    /// Open the `index`-th device (1-based) from the last enumeration and
    /// start its worker. Fails if a camera is already active.
    pub fn select_device(&mut self, index: usize) -> Result<(), CameraError> {
        if self.active.is_some() {
            return Err(CameraError::SessionError(
                "a camera is already selected; reset first".to_string(),
            ));
        }
        if self.devices.is_empty() {
            self.devices = self.driver.list_devices()?;
        }
        let descriptor = self
            .devices
            .get(index.wrapping_sub(1))
            .cloned()
            .ok_or_else(|| {
                CameraError::DeviceNotFound(format!(
                    "index {} out of range ({} devices)",
                    index,
                    self.devices.len()
                ))
            })?;

        let handle = self.driver.open(&descriptor)?;
        let camera = Camera::new(handle, descriptor, &self.config)?;
        self.active = Some(camera);
        Ok(())
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.active.as_ref()
    }

    /// Tear down the active camera, if any: stop its worker, join it, and
    /// release the handle.
    pub fn reset(&mut self) {
        if let Some(camera) = self.active.take() {
            log::info!("releasing camera {}", camera.descriptor().name);
            drop(camera);
        }
    }
}
