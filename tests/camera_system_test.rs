//! End-to-end facade behavior: enumeration, selection, decoded reads, and
//! the single-active-camera invariant.

use std::time::{Duration, Instant};

use tethercam::properties::PropertyId;
use tethercam::testing::SimulatedDriver;
use tethercam::{CameraError, CameraSystem, TetherConfig};

fn fast_config() -> TetherConfig {
    let mut config = TetherConfig::default();
    config.worker.tick_interval_ms = 5;
    config
}

fn wait_until(mut predicate: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if predicate() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn enumerate_select_and_read_identity() {
    let mut system = CameraSystem::with_config(Box::new(SimulatedDriver::new(2)), fast_config());

    let devices = system.list_devices().unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].name, "Simulated Camera 1");

    system.select_device(1).unwrap();
    let camera = system.camera().unwrap();

    // Immutable fields were read during construction and never block.
    assert_eq!(camera.get_product_name(), "SimCam 1000");
    assert_eq!(camera.get_serial_number(), "SC-000123");
    assert_eq!(camera.get_firmware_version(), "1.0.3");
    assert_eq!(camera.get_lens_name(), "50mm f/1.8 STM");
    assert_eq!(camera.get_storage_type(), "SD");
    assert_eq!(camera.get_ae_mode(), "Manual Exposure");
    assert_eq!(camera.get_white_balance(), "Auto");
    assert_eq!(camera.get_color_temperature(), "5200K");
}

#[test]
fn set_iso_by_index_shows_up_in_the_decoded_getter() {
    let mut system = CameraSystem::with_config(Box::new(SimulatedDriver::new(1)), fast_config());
    system.select_device(1).unwrap();
    let camera = system.camera().unwrap();

    let choices = camera.property_choices(PropertyId::Iso);
    assert!(choices.len() >= 3);
    assert_eq!(choices[0], "Auto");
    assert_eq!(choices[1], "100");

    camera.set_iso(3).unwrap();
    assert!(wait_until(|| camera.get_iso() == choices[2]));
}

#[test]
fn setting_a_read_only_property_is_rejected_at_the_facade() {
    let mut system = CameraSystem::with_config(Box::new(SimulatedDriver::new(1)), fast_config());
    system.select_device(1).unwrap();
    let camera = system.camera().unwrap();

    let result = camera.set_property_index(PropertyId::AeMode, 1);
    assert!(matches!(result, Err(CameraError::InvalidArgument(_))));
}

#[test]
fn select_out_of_range_index_fails_without_opening() {
    let mut system = CameraSystem::with_config(Box::new(SimulatedDriver::new(1)), fast_config());
    system.list_devices().unwrap();

    assert!(matches!(
        system.select_device(0),
        Err(CameraError::DeviceNotFound(_))
    ));
    assert!(matches!(
        system.select_device(5),
        Err(CameraError::DeviceNotFound(_))
    ));
    assert!(system.camera().is_none());
}

#[test]
fn second_select_requires_a_reset_first() {
    let mut system = CameraSystem::with_config(Box::new(SimulatedDriver::new(2)), fast_config());
    system.select_device(1).unwrap();

    assert!(matches!(
        system.select_device(2),
        Err(CameraError::SessionError(_))
    ));

    system.reset();
    assert!(system.camera().is_none());
    system.select_device(2).unwrap();
    assert_eq!(system.camera().unwrap().descriptor().id, "sim-1");
}

#[test]
fn reset_without_a_selection_is_a_no_op() {
    let mut system = CameraSystem::with_config(Box::new(SimulatedDriver::new(1)), fast_config());
    system.reset();
    assert!(system.camera().is_none());
}
