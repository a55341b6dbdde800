//! In-memory backend for exercising handles without the native library.

use std::collections::HashMap;
use std::ffi::CStr;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::handle::RawAlgorithm;
use crate::ops::AlgorithmOps;

/// Status code the mock reports for an address it does not know.
pub const MOCK_UNKNOWN_OBJECT: i32 = -1;

#[derive(Debug)]
struct MockObject {
    name: String,
    empty: bool,
    saved: Vec<PathBuf>,
    fail: Option<(i32, String)>,
}

#[derive(Debug, Default)]
struct MockTable {
    next_addr: usize,
    live: HashMap<usize, MockObject>,
    destroyed: Vec<usize>,
}

/// Substitute for the native library, backed by a table of fake addresses.
///
/// Tests register objects, drive them through an
/// [`Algorithm`](crate::Algorithm) handle bound to this backend, and then
/// inspect what the handle forwarded.
#[derive(Debug, Default)]
pub struct MockVision {
    objects: Mutex<MockTable>,
}

impl MockVision {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new object under `name` and return its fake address.
    ///
    /// Objects start empty, like a freshly constructed native algorithm.
    pub fn register(&self, name: &str) -> RawAlgorithm {
        let mut table = self.objects.lock().unwrap();
        table.next_addr += 1;
        let addr = table.next_addr;
        table.live.insert(
            addr,
            MockObject {
                name: name.to_owned(),
                empty: true,
                saved: Vec::new(),
                fail: None,
            },
        );
        RawAlgorithm::new(addr)
    }

    /// Flip the object's empty flag, as native training would.
    pub fn set_empty(&self, raw: RawAlgorithm, empty: bool) {
        let mut table = self.objects.lock().unwrap();
        table
            .live
            .get_mut(&raw.as_usize())
            .expect("unknown mock object")
            .empty = empty;
    }

    /// Make every following forwarded operation on the object fail with
    /// this code and message.
    pub fn fail_with(&self, raw: RawAlgorithm, code: i32, message: &str) {
        let mut table = self.objects.lock().unwrap();
        table
            .live
            .get_mut(&raw.as_usize())
            .expect("unknown mock object")
            .fail = Some((code, message.to_owned()));
    }

    /// Paths the object was saved to, in call order.
    pub fn saved_paths(&self, raw: RawAlgorithm) -> Vec<PathBuf> {
        let table = self.objects.lock().unwrap();
        table
            .live
            .get(&raw.as_usize())
            .map(|object| object.saved.clone())
            .unwrap_or_default()
    }

    /// How many times the object was destroyed. Anything above 1 is a
    /// double free.
    pub fn destroy_count(&self, raw: RawAlgorithm) -> usize {
        let table = self.objects.lock().unwrap();
        table
            .destroyed
            .iter()
            .filter(|addr| **addr == raw.as_usize())
            .count()
    }

    fn with_object<T>(
        &self,
        raw: RawAlgorithm,
        op: impl FnOnce(&mut MockObject) -> T,
    ) -> Result<T> {
        let mut table = self.objects.lock().unwrap();
        let object = table
            .live
            .get_mut(&raw.as_usize())
            .ok_or_else(|| Error::Native {
                code: MOCK_UNKNOWN_OBJECT,
                message: format!("no object at address {:#x}", raw.as_usize()),
            })?;
        if let Some((code, message)) = object.fail.clone() {
            return Err(Error::Native { code, message });
        }
        Ok(op(object))
    }
}

impl AlgorithmOps for MockVision {
    fn clear(&self, raw: RawAlgorithm) -> Result<()> {
        self.with_object(raw, |object| object.empty = true)
    }

    fn empty(&self, raw: RawAlgorithm) -> Result<bool> {
        self.with_object(raw, |object| object.empty)
    }

    fn save(&self, raw: RawAlgorithm, path: &CStr) -> Result<()> {
        let path = PathBuf::from(path.to_string_lossy().into_owned());
        self.with_object(raw, |object| object.saved.push(path))
    }

    fn default_name(&self, raw: RawAlgorithm) -> Result<String> {
        self.with_object(raw, |object| object.name.clone())
    }

    fn destroy(&self, raw: RawAlgorithm) {
        let mut table = self.objects.lock().unwrap();
        table.live.remove(&raw.as_usize());
        table.destroyed.push(raw.as_usize());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_allocates_distinct_addresses() {
        let backend = MockVision::new();
        let first = backend.register("detector");
        let second = backend.register("matcher");
        assert_ne!(first, second);
    }

    #[test]
    fn destroy_is_recorded_per_address() {
        let backend = MockVision::new();
        let raw = backend.register("detector");
        assert_eq!(backend.destroy_count(raw), 0);
        backend.destroy(raw);
        assert_eq!(backend.destroy_count(raw), 1);
    }

    #[test]
    fn operations_on_destroyed_object_report_unknown_address() {
        let backend = MockVision::new();
        let raw = backend.register("detector");
        backend.destroy(raw);
        let err = backend.empty(raw).unwrap_err();
        assert!(matches!(
            err,
            Error::Native {
                code: MOCK_UNKNOWN_OBJECT,
                ..
            }
        ));
    }
}
