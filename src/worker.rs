//! Background device worker.
//!
//! Exactly one worker thread owns the device handle for a camera's lifetime.
//! On startup it opens an implicit session, bulk-reads every property and
//! constraint list, and registers the driver callbacks; then it ticks on a
//! fixed interval, polling for device events and dispatching at most one
//! queued command per tick. Rejected commands are logged and dropped, never
//! retried, and no failure ever crosses back to the enqueuing thread.

use crate::cache::PropertyCache;
use crate::command::{
    Command, CommandQueue, SessionAction, ShutterAction, INVALID_PROPERTY_VALUE,
};
use crate::driver::{
    DeviceCommand, DeviceHandle, StateEvent, StatusCommand, SHUTTER_BUTTON_COMPLETELY,
    SHUTTER_BUTTON_HALFWAY, SHUTTER_BUTTON_OFF,
};
use crate::errors::CameraError;
use crate::properties::{PropertyId, PropertyValue};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub(crate) struct WorkerContext {
    pub cache: Arc<PropertyCache>,
    pub queue: Arc<CommandQueue>,
    pub stop: Arc<AtomicBool>,
    pub tick: Duration,
    /// Signaled once after the initial bulk read, or with the startup error.
    pub ready: Sender<Result<(), CameraError>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerState {
    Starting,
    Running,
    Stopping,
    Stopped,
}

/// Events forwarded out of the driver callbacks. The callbacks run inline
/// during `poll_events` and must not block, so they only send; the worker
/// drains the channel right after the poll returns, before any command is
/// popped in the same tick.
enum DeviceEvent {
    PropertyChanged(PropertyId),
    ConstraintsChanged(PropertyId),
    State(StateEvent),
}

/// Worker entry point. Returns the handle so the owner can release it after
/// joining; the worker itself never drops it.
pub(crate) fn run(mut handle: Box<dyn DeviceHandle>, ctx: WorkerContext) -> Box<dyn DeviceHandle> {
    let mut state = WorkerState::Starting;
    log::debug!("device worker: {:?}", state);

    if !handle.open_session() {
        let _ = ctx.ready.send(Err(CameraError::SessionError(
            "device refused the implicit session".to_string(),
        )));
        return handle;
    }

    if let Err(e) = bulk_read(handle.as_mut(), &ctx.cache) {
        let _ = handle.close_session();
        let _ = ctx.ready.send(Err(e));
        return handle;
    }

    let events = register_callbacks(handle.as_mut());
    let _ = ctx.ready.send(Ok(()));

    state = WorkerState::Running;
    log::debug!("device worker: {:?}", state);

    // Tracks the caller-visible explicit session, not the implicit one the
    // worker holds for its own reads.
    let mut session_open = false;

    while !ctx.stop.load(Ordering::Relaxed) {
        handle.poll_events();
        drain_events(handle.as_mut(), &ctx.cache, &events);

        if let Some(command) = ctx.queue.pop() {
            dispatch(handle.as_mut(), &ctx.cache, &mut session_open, command);
        }

        std::thread::sleep(ctx.tick);
    }

    state = WorkerState::Stopping;
    log::debug!("device worker: {:?}", state);

    let mut explicit_closed = true;
    if session_open {
        explicit_closed = handle.close_session();
        if !explicit_closed {
            log::warn!("device refused to close the explicit session during shutdown");
        }
    }
    if !explicit_closed {
        // On a session-counting device the caller's rejected session is
        // still first in line; closing again would close that one, not the
        // implicit session. Leave both to the handle release.
        log::warn!("skipping implicit session close: explicit close was rejected");
    } else if !handle.close_session() {
        log::warn!("device refused to close the implicit session during shutdown");
    }

    state = WorkerState::Stopped;
    log::debug!("device worker: {:?}", state);
    handle
}

/// Initial read of every property plus every settable property's constraint
/// list. Immutable properties are never read again after this.
fn bulk_read(handle: &mut dyn DeviceHandle, cache: &PropertyCache) -> Result<(), CameraError> {
    for prop in PropertyId::all() {
        let value = handle.get_property(prop)?;
        cache.write(prop, value);
    }
    for prop in PropertyId::settable() {
        let values = handle.get_property_constraints(prop)?;
        cache.set_constraints(prop, values);
    }
    Ok(())
}

fn register_callbacks(handle: &mut dyn DeviceHandle) -> Receiver<DeviceEvent> {
    let (tx, rx) = unbounded();

    let sender = tx.clone();
    handle.register_property_changed_callback(Box::new(move |prop| {
        let _ = sender.send(DeviceEvent::PropertyChanged(prop));
    }));

    let sender = tx.clone();
    handle.register_constraints_changed_callback(Box::new(move |prop| {
        let _ = sender.send(DeviceEvent::ConstraintsChanged(prop));
    }));

    handle.register_state_callback(Box::new(move |event| {
        let _ = tx.send(DeviceEvent::State(event));
    }));

    rx
}

/// Apply everything the last poll produced. Property and constraint changes
/// are re-read from the handle so the cache only ever holds device-confirmed
/// values.
fn drain_events(
    handle: &mut dyn DeviceHandle,
    cache: &PropertyCache,
    events: &Receiver<DeviceEvent>,
) {
    for event in events.try_iter() {
        match event {
            DeviceEvent::PropertyChanged(prop) => match handle.get_property(prop) {
                Ok(value) => cache.write(prop, value),
                Err(e) => log::warn!("re-read of changed property {} failed: {}", prop, e),
            },
            DeviceEvent::ConstraintsChanged(prop) => {
                match handle.get_property_constraints(prop) {
                    Ok(values) => cache.set_constraints(prop, values),
                    Err(e) => log::warn!("re-read of {} constraints failed: {}", prop, e),
                }
            }
            DeviceEvent::State(StateEvent::ShutdownWarning) => {
                // Keep the connection alive; the device drops it otherwise.
                if !handle.send_command(DeviceCommand::ExtendShutdownTimer, 0) {
                    log::warn!("device rejected shutdown timer extension");
                }
            }
            DeviceEvent::State(StateEvent::CaptureError(code)) => {
                log::warn!("device reported capture error {:#x}", code);
            }
        }
    }
}

fn dispatch(
    handle: &mut dyn DeviceHandle,
    cache: &PropertyCache,
    session_open: &mut bool,
    command: Command,
) {
    match command {
        Command::SetProperty { prop, value } => {
            if value == INVALID_PROPERTY_VALUE {
                // Sentinel from the facade: the caller's index was out of
                // range at enqueue time. Fail fast, no device call.
                log::warn!("dropping set {}: index was out of range", prop);
                return;
            }
            if handle.set_property(prop, value) {
                cache.write(prop, PropertyValue::U32(value));
            } else {
                log::warn!("device rejected set {} = {:#x}", prop, value);
            }
        }
        Command::Shutter(action) => dispatch_shutter(handle, action),
        Command::Session(action) => dispatch_session(handle, session_open, action),
        Command::SetUiLock(lock) => {
            let status = if lock {
                StatusCommand::UiLock
            } else {
                StatusCommand::UiUnlock
            };
            if !handle.send_status_command(status, 0) {
                log::warn!("device rejected {:?}", status);
            }
        }
    }
}

fn dispatch_shutter(handle: &mut dyn DeviceHandle, action: ShutterAction) {
    let ok = match action {
        ShutterAction::PressHalfway => {
            handle.send_command(DeviceCommand::PressShutterButton, SHUTTER_BUTTON_HALFWAY)
        }
        ShutterAction::PressFull => {
            handle.send_command(DeviceCommand::PressShutterButton, SHUTTER_BUTTON_COMPLETELY)
        }
        ShutterAction::Release => {
            handle.send_command(DeviceCommand::PressShutterButton, SHUTTER_BUTTON_OFF)
        }
        ShutterAction::PressAndRelease => {
            // Release is only issued when the press succeeded.
            handle.send_command(DeviceCommand::PressShutterButton, SHUTTER_BUTTON_COMPLETELY)
                && handle.send_command(DeviceCommand::PressShutterButton, SHUTTER_BUTTON_OFF)
        }
    };
    if !ok {
        log::warn!("device rejected shutter action {:?}", action);
    }
}

/// Session state flips only on a confirmed device result: open succeeds and
/// the flag becomes true; close succeeds and the flag becomes false. A
/// failed close leaves the session marked open.
fn dispatch_session(handle: &mut dyn DeviceHandle, session_open: &mut bool, action: SessionAction) {
    match action {
        SessionAction::Open => {
            if *session_open {
                log::warn!("ignoring session open: already open");
            } else if handle.open_session() {
                *session_open = true;
            } else {
                log::warn!("device rejected session open");
            }
        }
        SessionAction::Close => {
            if !*session_open {
                log::warn!("ignoring session close: no session open");
            } else if handle.close_session() {
                *session_open = false;
            } else {
                log::warn!("device rejected session close");
            }
        }
    }
}
