//! Safe Rust bindings for the VisionCore algorithm runtime.
//!
//! VisionCore exposes its C++ algorithm hierarchy through a small C shim of
//! per-object entry points. This crate owns one opaque object address per
//! [`Algorithm`] handle and forwards the base operation set (`clear`,
//! `empty`, `save`, `default_name`) across that boundary unchanged. Concrete
//! algorithm subtypes construct objects natively and hand their addresses to
//! [`Algorithm::wrap`].
//!
//! # Thread Safety
//!
//! [`Algorithm`] is NOT `Send` or `Sync`. The native library makes no
//! thread-safety promises, so all operations on a handle must occur on the
//! thread that created it, or external synchronization must be provided.
//!
//! # Memory Management
//!
//! - A handle owns its native object and destroys it exactly once, on
//!   [`Algorithm::release`] or on drop, whichever comes first
//! - Strings and status messages allocated by the shim are copied and freed
//!   inside the call that produced them; nothing native outlives it
//! - [`Algorithm::into_raw`] opts out: the caller takes the address and the
//!   lifetime that goes with it
//!
//! # Feature Flags
//!
//! - `link`: link against `libvisioncore` and provide [`Algorithm::wrap`]
//!   backed by the real library. Off by default so the crate builds without
//!   the shim installed; set `VISIONCORE_LIB_DIR` if the library lives
//!   outside the default search path.
//! - `mock`: export [`MockVision`] so downstream crates can test against a
//!   substitute backend.

mod error;
#[cfg(feature = "link")]
pub mod ffi;
mod handle;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod ops;
mod util;

pub use error::{Error, Result};
#[cfg(feature = "link")]
pub use ffi::NativeOps;
pub use handle::{Algorithm, RawAlgorithm};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockVision;
pub use ops::AlgorithmOps;

/// Library version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use crate::mock::MockVision;
    use crate::{Algorithm, AlgorithmOps, Error, version};

    fn wrapped(backend: &Arc<MockVision>, name: &str) -> Algorithm {
        let raw = backend.register(name);
        let ops: Arc<dyn AlgorithmOps> = backend.clone();
        unsafe { Algorithm::wrap_with(raw, ops) }
    }

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_empty_reflects_native_state() {
        let backend = Arc::new(MockVision::new());
        let alg = wrapped(&backend, "detector");

        // freshly constructed objects are empty
        assert!(alg.empty().unwrap());

        // native-side training fills the object; the proxy reports the new
        // state without interpretation
        backend.set_empty(alg.as_raw(), false);
        assert!(!alg.empty().unwrap());
    }

    #[test]
    fn test_clear_resets_to_empty() {
        let backend = Arc::new(MockVision::new());
        let mut alg = wrapped(&backend, "detector");

        backend.set_empty(alg.as_raw(), false);
        alg.clear().unwrap();
        assert!(alg.empty().unwrap());
    }

    #[test]
    fn test_save_forwards_exact_path() {
        let backend = Arc::new(MockVision::new());
        let alg = wrapped(&backend, "detector");

        alg.save("/tmp/detector.yml").unwrap();
        alg.save("/tmp/detector-2.yml").unwrap();
        assert_eq!(
            backend.saved_paths(alg.as_raw()),
            vec![
                PathBuf::from("/tmp/detector.yml"),
                PathBuf::from("/tmp/detector-2.yml"),
            ]
        );
    }

    #[test]
    fn test_save_rejects_interior_nul_path() {
        let backend = Arc::new(MockVision::new());
        let alg = wrapped(&backend, "detector");

        let err = alg.save("bad\0path.yml").unwrap_err();
        assert!(matches!(err, Error::InvalidPath { .. }));
        // nothing reached the backend
        assert!(backend.saved_paths(alg.as_raw()).is_empty());
    }

    #[test]
    fn test_default_name_stable_and_nonempty() {
        let backend = Arc::new(MockVision::new());
        let alg = wrapped(&backend, "Feature2D.ORB");

        let first = alg.default_name().unwrap();
        let second = alg.default_name().unwrap();
        assert_eq!(first, "Feature2D.ORB");
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_release_destroys_exactly_once() {
        let backend = Arc::new(MockVision::new());
        let mut alg = wrapped(&backend, "detector");
        let raw = alg.as_raw();

        alg.release();
        assert_eq!(backend.destroy_count(raw), 1);

        // releasing again is a no-op, not a double free
        alg.release();
        assert_eq!(backend.destroy_count(raw), 1);
    }

    #[test]
    fn test_operations_after_release_fail() {
        let backend = Arc::new(MockVision::new());
        let mut alg = wrapped(&backend, "detector");

        alg.release();
        assert!(matches!(alg.empty(), Err(Error::Released)));
        assert!(matches!(alg.clear(), Err(Error::Released)));
        assert!(matches!(alg.save("/tmp/x.yml"), Err(Error::Released)));
        assert!(matches!(alg.default_name(), Err(Error::Released)));
    }

    #[test]
    fn test_drop_releases() {
        let backend = Arc::new(MockVision::new());
        let raw = {
            let alg = wrapped(&backend, "detector");
            alg.as_raw()
        };
        assert_eq!(backend.destroy_count(raw), 1);
    }

    #[test]
    fn test_release_then_drop_destroys_once() {
        let backend = Arc::new(MockVision::new());
        let raw = {
            let mut alg = wrapped(&backend, "detector");
            alg.release();
            alg.as_raw()
        };
        assert_eq!(backend.destroy_count(raw), 1);
    }

    #[test]
    fn test_into_raw_leaks_ownership() {
        let backend = Arc::new(MockVision::new());
        let alg = wrapped(&backend, "detector");
        let raw = alg.into_raw();

        // the handle is gone but the native object is still alive
        assert_eq!(backend.destroy_count(raw), 0);

        // re-wrapping the address takes ownership back
        let ops: Arc<dyn AlgorithmOps> = backend.clone();
        drop(unsafe { Algorithm::wrap_with(raw, ops) });
        assert_eq!(backend.destroy_count(raw), 1);
    }

    #[test]
    fn test_native_error_passes_through_unmodified() {
        let backend = Arc::new(MockVision::new());
        let alg = wrapped(&backend, "detector");

        backend.fail_with(alg.as_raw(), 42, "disk full");
        match alg.save("/tmp/detector.yml") {
            Err(Error::Native { code, message }) => {
                assert_eq!(code, 42);
                assert_eq!(message, "disk full");
            }
            other => panic!("expected native error, got {other:?}"),
        }
    }

    #[test]
    fn test_as_raw_reports_wrapped_address() {
        let backend = Arc::new(MockVision::new());
        let raw = backend.register("detector");
        let ops: Arc<dyn AlgorithmOps> = backend.clone();
        let alg = unsafe { Algorithm::wrap_with(raw, ops) };
        assert_eq!(alg.as_raw(), raw);
    }
}
