//! Dispatch behavior of the device worker, observed through the simulated
//! driver's shared state and call journal.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tethercam::driver::{
    DeviceCommand, StateEvent, StatusCommand, SHUTTER_BUTTON_COMPLETELY, SHUTTER_BUTTON_OFF,
};
use tethercam::properties::{PropertyId, PropertyValue};
use tethercam::testing::{DeviceState, DriverCall, SimulatedDriver, SimulatedEvent};
use tethercam::{CameraSystem, TetherConfig};

fn fast_config() -> TetherConfig {
    let mut config = TetherConfig::default();
    config.worker.tick_interval_ms = 5;
    config
}

fn selected_system() -> (CameraSystem, Arc<Mutex<DeviceState>>) {
    let driver = SimulatedDriver::new(1);
    let state = driver.device_state(0);
    let mut system = CameraSystem::with_config(Box::new(driver), fast_config());
    system.list_devices().unwrap();
    system.select_device(1).unwrap();
    (system, state)
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

fn journal(state: &Arc<Mutex<DeviceState>>) -> Vec<DriverCall> {
    state.lock().unwrap().journal.clone()
}

fn count(state: &Arc<Mutex<DeviceState>>, call: &DriverCall) -> usize {
    journal(state).iter().filter(|c| *c == call).count()
}

#[test]
fn accepted_set_property_updates_the_cache() {
    let (system, _state) = selected_system();
    let camera = system.camera().unwrap();
    assert_eq!(camera.get_iso(), "100");

    // ISO constraint entry 3 is raw 0x50 = ISO 200.
    camera.set_iso(3).unwrap();
    assert!(wait_until(|| camera.get_iso() == "200"));
}

#[test]
fn out_of_range_index_never_reaches_the_device() {
    let (system, state) = selected_system();
    let camera = system.camera().unwrap();

    camera.set_iso(99).unwrap();
    std::thread::sleep(Duration::from_millis(100));

    assert_eq!(camera.get_iso(), "100");
    assert!(journal(&state)
        .iter()
        .all(|c| !matches!(c, DriverCall::SetProperty(PropertyId::Iso, _))));
}

#[test]
fn rejected_set_property_is_dropped_without_cache_update() {
    let (system, state) = selected_system();
    state.lock().unwrap().fail_set_property = true;
    let camera = system.camera().unwrap();

    camera.set_iso(3).unwrap();
    assert!(wait_until(|| {
        count(&state, &DriverCall::SetProperty(PropertyId::Iso, 0x50)) == 1
    }));

    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(camera.get_iso(), "100");
    // One attempt only, no retry.
    assert_eq!(count(&state, &DriverCall::SetProperty(PropertyId::Iso, 0x50)), 1);
}

#[test]
fn take_photo_presses_then_releases() {
    let (system, state) = selected_system();
    let camera = system.camera().unwrap();

    camera.take_photo();
    assert!(wait_until(|| {
        count(
            &state,
            &DriverCall::SendCommand(DeviceCommand::PressShutterButton, SHUTTER_BUTTON_OFF),
        ) == 1
    }));

    let journal = journal(&state);
    let press = journal.iter().position(|c| {
        *c == DriverCall::SendCommand(DeviceCommand::PressShutterButton, SHUTTER_BUTTON_COMPLETELY)
    });
    let release = journal.iter().position(|c| {
        *c == DriverCall::SendCommand(DeviceCommand::PressShutterButton, SHUTTER_BUTTON_OFF)
    });
    assert!(press.unwrap() < release.unwrap());
}

#[test]
fn take_photo_skips_release_when_press_fails() {
    let (system, state) = selected_system();
    state.lock().unwrap().fail_shutter = true;
    let camera = system.camera().unwrap();

    camera.take_photo();
    assert!(wait_until(|| {
        count(
            &state,
            &DriverCall::SendCommand(DeviceCommand::PressShutterButton, SHUTTER_BUTTON_COMPLETELY),
        ) == 1
    }));

    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(
        count(
            &state,
            &DriverCall::SendCommand(DeviceCommand::PressShutterButton, SHUTTER_BUTTON_OFF),
        ),
        0
    );
}

#[test]
fn duplicate_session_open_is_ignored_without_a_device_call() {
    let (system, state) = selected_system();
    let camera = system.camera().unwrap();

    // One implicit open from worker startup.
    assert_eq!(count(&state, &DriverCall::OpenSession), 1);

    camera.open_session();
    assert!(wait_until(|| count(&state, &DriverCall::OpenSession) == 2));

    camera.open_session();
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(count(&state, &DriverCall::OpenSession), 2);
}

#[test]
fn session_close_without_open_is_ignored_without_a_device_call() {
    let (system, state) = selected_system();
    let camera = system.camera().unwrap();

    camera.close_session();
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(count(&state, &DriverCall::CloseSession), 0);
}

#[test]
fn failed_session_close_leaves_the_session_open() {
    let (system, state) = selected_system();
    let camera = system.camera().unwrap();

    camera.open_session();
    assert!(wait_until(|| count(&state, &DriverCall::OpenSession) == 2));

    state.lock().unwrap().fail_close_session = true;

    // First close is rejected, so the session stays open and a second close
    // must reach the device again.
    camera.close_session();
    assert!(wait_until(|| count(&state, &DriverCall::CloseSession) == 1));
    camera.close_session();
    assert!(wait_until(|| count(&state, &DriverCall::CloseSession) == 2));
}

#[test]
fn ui_lock_and_unlock_reach_the_device_as_status_commands() {
    let (system, state) = selected_system();
    let camera = system.camera().unwrap();

    camera.lock_ui();
    camera.unlock_ui();

    assert!(wait_until(|| {
        count(&state, &DriverCall::SendStatusCommand(StatusCommand::UiLock, 0)) == 1
            && count(&state, &DriverCall::SendStatusCommand(StatusCommand::UiUnlock, 0)) == 1
    }));

    // Exactly one of each, no retry.
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(
        count(&state, &DriverCall::SendStatusCommand(StatusCommand::UiLock, 0)),
        1
    );
    assert_eq!(
        count(&state, &DriverCall::SendStatusCommand(StatusCommand::UiUnlock, 0)),
        1
    );
}

#[test]
fn shutdown_warning_is_answered_with_a_timer_extension() {
    let (system, state) = selected_system();
    let _camera = system.camera().unwrap();

    state
        .lock()
        .unwrap()
        .push_event(SimulatedEvent::State(StateEvent::ShutdownWarning));

    assert!(wait_until(|| {
        count(
            &state,
            &DriverCall::SendCommand(DeviceCommand::ExtendShutdownTimer, 0),
        ) == 1
    }));
}

#[test]
fn capture_error_does_not_disturb_the_worker() {
    let (system, state) = selected_system();
    let camera = system.camera().unwrap();

    state
        .lock()
        .unwrap()
        .push_event(SimulatedEvent::State(StateEvent::CaptureError(0x8d01)));

    // The worker keeps dispatching commands afterwards.
    camera.set_iso(3).unwrap();
    assert!(wait_until(|| camera.get_iso() == "200"));
}

#[test]
fn property_event_applies_before_commands_in_its_tick() {
    let (system, state) = selected_system();
    let camera = system.camera().unwrap();

    // Event first, then a command targeting the same property. The command
    // may land in the same tick as the event delivery or the one before it,
    // depending on where the worker is in its loop when we enqueue.
    state.lock().unwrap().push_event(SimulatedEvent::PropertyChanged(
        PropertyId::WhiteBalance,
        PropertyValue::U32(8),
    ));
    camera.set_white_balance(2).unwrap(); // raw 1 = Daylight

    assert!(wait_until(|| {
        let journal = journal(&state);
        journal
            .iter()
            .position(|c| *c == DriverCall::PollEvents)
            .map_or(false, |p| {
                journal[p..]
                    .iter()
                    .any(|c| *c == DriverCall::GetProperty(PropertyId::WhiteBalance))
            })
            && journal
                .iter()
                .any(|c| *c == DriverCall::SetProperty(PropertyId::WhiteBalance, 1))
    }));

    let journal = journal(&state);
    let first_poll = journal
        .iter()
        .position(|c| *c == DriverCall::PollEvents)
        .unwrap();
    let reread = (first_poll..journal.len())
        .find(|&i| journal[i] == DriverCall::GetProperty(PropertyId::WhiteBalance))
        .unwrap();
    let set = journal
        .iter()
        .position(|c| *c == DriverCall::SetProperty(PropertyId::WhiteBalance, 1))
        .unwrap();

    // The tick that delivers the event re-reads the property before it
    // dispatches anything: no write may sit between the delivering poll
    // and the re-read.
    let delivering_poll = (0..reread)
        .rev()
        .find(|&i| journal[i] == DriverCall::PollEvents)
        .unwrap();
    assert!((delivering_poll..reread)
        .all(|i| !matches!(journal[i], DriverCall::SetProperty(PropertyId::WhiteBalance, _))));

    // The cache settles on whichever write the device saw last.
    let expected = if set > reread { "Daylight" } else { "Shade" };
    assert!(wait_until(|| camera.get_white_balance() == expected));
}

#[test]
fn constraints_event_refreshes_the_choice_list() {
    let (system, state) = selected_system();
    let camera = system.camera().unwrap();

    state.lock().unwrap().push_event(SimulatedEvent::ConstraintsChanged(
        PropertyId::Iso,
        vec![0x68, 0x70],
    ));

    assert!(wait_until(|| {
        camera.property_choices(PropertyId::Iso) == vec!["1600".to_string(), "3200".to_string()]
    }));
}

#[test]
fn rejected_explicit_close_skips_the_implicit_close_at_teardown() {
    let (mut system, state) = selected_system();
    {
        let camera = system.camera().unwrap();
        camera.open_session();
    }
    assert!(wait_until(|| count(&state, &DriverCall::OpenSession) == 2));

    state.lock().unwrap().fail_close_session = true;
    system.reset();

    // Only the explicit close was attempted; the worker does not follow a
    // rejected close with another one that would eat the caller's session.
    assert_eq!(count(&state, &DriverCall::CloseSession), 1);
    assert_eq!(state.lock().unwrap().open_sessions, 2);
}

#[test]
fn teardown_joins_the_worker_before_releasing_the_handle() {
    let (mut system, state) = selected_system();
    system.reset();

    // reset() joined the worker, so the handle is gone and no further
    // device call can happen.
    assert!(state.lock().unwrap().released);
    let calls_after_join = journal(&state).len();
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(journal(&state).len(), calls_after_join);
}
