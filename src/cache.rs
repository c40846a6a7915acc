//! Last-known device state shared between the worker and caller threads.
//!
//! Two independent guarded groups: property values and constraint lists.
//! Writes come only from the worker thread (directly, or while it drains a
//! poll's events); reads come from any thread and never touch device I/O.
//! There is no ordering guarantee across different fields, only whole-group
//! consistency per access.

use crate::properties::{PropertyId, PropertyValue};
use std::collections::HashMap;
use std::sync::Mutex;

pub struct PropertyCache {
    values: Mutex<HashMap<PropertyId, PropertyValue>>,
    constraints: Mutex<HashMap<PropertyId, Vec<u32>>>,
}

impl PropertyCache {
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            constraints: Mutex::new(HashMap::new()),
        }
    }

    /// Last value the worker observed for `prop`, if any.
    pub fn read(&self, prop: PropertyId) -> Option<PropertyValue> {
        self.values.lock().expect("lock poisoned").get(&prop).cloned()
    }

    pub fn write(&self, prop: PropertyId, value: PropertyValue) {
        self.values.lock().expect("lock poisoned").insert(prop, value);
    }

    /// Snapshot of the current constraint list for `prop`. Empty if the
    /// device has not reported one.
    pub fn constraints(&self, prop: PropertyId) -> Vec<u32> {
        self.constraints
            .lock()
            .expect("lock poisoned")
            .get(&prop)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_constraints(&self, prop: PropertyId, values: Vec<u32>) {
        self.constraints
            .lock()
            .expect("lock poisoned")
            .insert(prop, values);
    }
}

impl Default for PropertyCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_before_write_is_none() {
        let cache = PropertyCache::new();
        assert!(cache.read(PropertyId::Iso).is_none());
        assert!(cache.constraints(PropertyId::Iso).is_empty());
    }

    #[test]
    fn write_then_read_returns_latest() {
        let cache = PropertyCache::new();
        cache.write(PropertyId::Iso, PropertyValue::U32(0x48));
        cache.write(PropertyId::Iso, PropertyValue::U32(0x50));
        assert_eq!(cache.read(PropertyId::Iso), Some(PropertyValue::U32(0x50)));
    }

    #[test]
    fn constraint_snapshot_is_independent_of_later_updates() {
        let cache = PropertyCache::new();
        cache.set_constraints(PropertyId::Iso, vec![0x48, 0x50]);
        let snapshot = cache.constraints(PropertyId::Iso);
        cache.set_constraints(PropertyId::Iso, vec![0x58]);
        assert_eq!(snapshot, vec![0x48, 0x50]);
        assert_eq!(cache.constraints(PropertyId::Iso), vec![0x58]);
    }

    #[test]
    fn values_and_constraints_are_separate_groups() {
        let cache = PropertyCache::new();
        cache.set_constraints(PropertyId::WhiteBalance, vec![0, 1, 2]);
        assert!(cache.read(PropertyId::WhiteBalance).is_none());
    }
}
