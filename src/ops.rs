//! Backend seam between the [`Algorithm`](crate::Algorithm) handle and the
//! native entry points.

use std::ffi::CStr;

use crate::error::Result;
use crate::handle::RawAlgorithm;

/// One method per native entry point.
///
/// Every handle operation forwards through this trait, so tests (and
/// downstream crates, via the `mock` feature) can substitute an in-memory
/// backend for the linked library. Implementations receive the opaque
/// address of the object to operate on and must not retain it.
pub trait AlgorithmOps {
    /// Reset the object to its initial state.
    fn clear(&self, raw: RawAlgorithm) -> Result<()>;

    /// Whether the object is empty, as right after construction or an
    /// unsuccessful read.
    fn empty(&self, raw: RawAlgorithm) -> Result<bool>;

    /// Persist the object to `path`. The file format is owned by the
    /// native layer.
    fn save(&self, raw: RawAlgorithm, path: &CStr) -> Result<()>;

    /// The object's stable string identifier.
    fn default_name(&self, raw: RawAlgorithm) -> Result<String>;

    /// Destroy the native object. Called at most once per address.
    fn destroy(&self, raw: RawAlgorithm);
}
