//! Deferred mutation commands and the queue that carries them.
//!
//! Callers enqueue from any thread; only the device worker pops. Commands are
//! immutable values consumed by a single dispatch attempt and never requeued.

use crate::properties::PropertyId;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Sentinel raw value meaning "do not apply". The facade substitutes it when
/// a caller-supplied index falls outside the current constraint list, so the
/// worker can fail fast without a device call.
pub const INVALID_PROPERTY_VALUE: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutterAction {
    PressHalfway,
    PressFull,
    Release,
    /// Full press followed immediately by release, short-circuiting on the
    /// first failure.
    PressAndRelease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Open,
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetProperty { prop: PropertyId, value: u32 },
    Shutter(ShutterAction),
    Session(SessionAction),
    SetUiLock(bool),
}

/// Unbounded multi-producer/single-consumer FIFO of pending commands.
///
/// `len` and `is_empty` are advisory only; they race with concurrent pushes
/// and are never used for correctness decisions.
pub struct CommandQueue {
    inner: Mutex<VecDeque<Command>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push(&self, command: Command) {
        self.inner.lock().expect("lock poisoned").push_back(command);
    }

    pub fn pop(&self) -> Option<Command> {
        self.inner.lock().expect("lock poisoned").pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().expect("lock poisoned").is_empty()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
