//! Owning handle for native algorithm objects.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::ops::AlgorithmOps;
use crate::util::path_to_cstring;

/// Opaque address of a native algorithm object.
///
/// Never dereferenced on the Rust side; it only travels back across the
/// boundary it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawAlgorithm(usize);

impl RawAlgorithm {
    /// Wrap a raw address produced by the native library.
    pub fn new(addr: usize) -> Self {
        Self(addr)
    }

    /// The raw numeric address, for passing to other bindings or debugging.
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

/// Owning proxy for one native algorithm-family object.
///
/// The handle is the exclusive managed-side owner of the native object's
/// lifetime: the object is destroyed exactly once, either by an explicit
/// [`release`](Self::release) or when the handle is dropped, whichever
/// comes first. Every other operation is a plain forward to the native
/// entry point for the wrapped address.
///
/// # Thread Safety
///
/// `Algorithm` is NOT `Send` or `Sync`. The native library makes no
/// thread-safety promises, so all operations on a handle must occur on the
/// thread that created it, or external synchronization must be used.
pub struct Algorithm {
    raw: RawAlgorithm,
    ops: Arc<dyn AlgorithmOps>,
    released: bool,
}

impl Algorithm {
    /// Wrap a live native object address using the linked library.
    ///
    /// The address is produced elsewhere, typically by a native constructor
    /// or a down-cast helper for a concrete algorithm subtype.
    ///
    /// # Safety
    ///
    /// - `raw` must be a valid, live address produced by the native
    ///   library; validity is not checked here
    /// - No other handle may own `raw`
    #[cfg(feature = "link")]
    pub unsafe fn wrap(raw: RawAlgorithm) -> Self {
        unsafe { Self::wrap_with(raw, Arc::new(crate::ffi::NativeOps)) }
    }

    /// Wrap a native object address with an explicit backend.
    ///
    /// # Safety
    ///
    /// - `raw` must identify a live object that `ops` knows how to operate
    ///   on; validity is not checked here
    /// - No other handle may own `raw`
    pub unsafe fn wrap_with(raw: RawAlgorithm, ops: Arc<dyn AlgorithmOps>) -> Self {
        log::trace!("wrapping algorithm object at {:#x}", raw.as_usize());
        Self {
            raw,
            ops,
            released: false,
        }
    }

    /// Reset the native object to its initial state.
    pub fn clear(&mut self) -> Result<()> {
        let raw = self.live()?;
        self.ops.clear(raw)
    }

    /// Whether the native object is empty, e.g. right after construction or
    /// after an unsuccessful read.
    pub fn empty(&self) -> Result<bool> {
        let raw = self.live()?;
        self.ops.empty(raw)
    }

    /// Save the native object to a file.
    ///
    /// The file format, and the behavior on an unwritable path, belong to
    /// the native layer; failures come back as [`Error::Native`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let raw = self.live()?;
        let path = path_to_cstring(path.as_ref())?;
        self.ops.save(raw, &path)
    }

    /// The object's string identifier, used by the native layer as the top
    /// level node tag when the object is saved.
    pub fn default_name(&self) -> Result<String> {
        let raw = self.live()?;
        self.ops.default_name(raw)
    }

    /// The address of the underlying native object.
    ///
    /// Still returns the original address after release, when it no longer
    /// identifies a live object.
    pub fn as_raw(&self) -> RawAlgorithm {
        self.raw
    }

    /// Give up ownership without destroying the native object.
    ///
    /// The caller becomes responsible for the object's lifetime, typically
    /// by handing the address to another binding that takes ownership.
    pub fn into_raw(mut self) -> RawAlgorithm {
        log::trace!("leaking algorithm object at {:#x}", self.raw.as_usize());
        self.released = true;
        self.raw
    }

    /// Destroy the native object now instead of waiting for drop.
    ///
    /// Idempotent: releasing an already-released handle is a no-op. After
    /// release, every forwarding operation returns [`Error::Released`].
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        log::trace!("releasing algorithm object at {:#x}", self.raw.as_usize());
        self.ops.destroy(self.raw);
    }

    fn live(&self) -> Result<RawAlgorithm> {
        if self.released {
            Err(Error::Released)
        } else {
            Ok(self.raw)
        }
    }
}

impl Drop for Algorithm {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Algorithm")
            .field("raw", &self.raw)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}
