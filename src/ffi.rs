//! Raw declarations for the VisionCore C shim, and the backend built on
//! them.
//!
//! These are unsafe C functions; use the safe [`Algorithm`](crate::Algorithm)
//! handle instead of calling them directly.

use std::ffi::CStr;

use libc::{c_char, c_void};

use crate::error::{Error, Result};
use crate::handle::RawAlgorithm;
use crate::ops::AlgorithmOps;

/// Status out-parameter filled by every fallible entry point.
///
/// # Memory Ownership
///
/// A non-null `message` is allocated by the shim and must be freed with
/// `vc_string_free` after copying.
#[repr(C)]
pub struct VcStatus {
    /// 0 on success, shim-defined otherwise.
    pub code: i32,
    /// Failure description (NULL when `code` is 0).
    pub message: *mut c_char,
}

impl VcStatus {
    fn ok() -> Self {
        Self {
            code: 0,
            message: std::ptr::null_mut(),
        }
    }

    /// Convert a filled status into a binding result, freeing the message.
    fn into_result(self) -> Result<()> {
        if self.code == 0 {
            return Ok(());
        }
        let message = if self.message.is_null() {
            String::new()
        } else {
            // copy, then hand the allocation back to the shim
            let copied = unsafe { CStr::from_ptr(self.message) }
                .to_string_lossy()
                .into_owned();
            unsafe { vc_string_free(self.message) };
            copied
        };
        log::debug!("native call failed with code {}: {message}", self.code);
        Err(Error::Native {
            code: self.code,
            message,
        })
    }
}

#[link(name = "visioncore", kind = "dylib")]
unsafe extern "C" {
    pub fn vc_algorithm_clear(handle: *mut c_void, status: *mut VcStatus);
    pub fn vc_algorithm_empty(handle: *mut c_void, status: *mut VcStatus) -> bool;
    pub fn vc_algorithm_save(handle: *mut c_void, path: *const c_char, status: *mut VcStatus);
    pub fn vc_algorithm_default_name(handle: *mut c_void, status: *mut VcStatus) -> *mut c_char;
    pub fn vc_algorithm_destroy(handle: *mut c_void);
    pub fn vc_string_free(s: *mut c_char);
}

/// Copy a shim-allocated string into a `String` and free the original.
///
/// A NULL pointer copies to the empty string.
///
/// # Safety
///
/// `ptr` must be NULL or a string allocated by the shim and not yet freed.
unsafe fn consume_native_string(ptr: *mut c_char) -> Result<String> {
    if ptr.is_null() {
        return Ok(String::new());
    }
    let copied = unsafe { CStr::from_ptr(ptr) }.to_str().map(str::to_owned);
    unsafe { vc_string_free(ptr) };
    copied.map_err(|_| Error::InvalidUtf8)
}

/// Backend that forwards every operation to the linked library.
pub struct NativeOps;

impl AlgorithmOps for NativeOps {
    fn clear(&self, raw: RawAlgorithm) -> Result<()> {
        let mut status = VcStatus::ok();
        unsafe { vc_algorithm_clear(raw.as_usize() as *mut c_void, &mut status) };
        status.into_result()
    }

    fn empty(&self, raw: RawAlgorithm) -> Result<bool> {
        let mut status = VcStatus::ok();
        let empty = unsafe { vc_algorithm_empty(raw.as_usize() as *mut c_void, &mut status) };
        status.into_result()?;
        Ok(empty)
    }

    fn save(&self, raw: RawAlgorithm, path: &CStr) -> Result<()> {
        let mut status = VcStatus::ok();
        unsafe { vc_algorithm_save(raw.as_usize() as *mut c_void, path.as_ptr(), &mut status) };
        status.into_result()
    }

    fn default_name(&self, raw: RawAlgorithm) -> Result<String> {
        let mut status = VcStatus::ok();
        let name =
            unsafe { vc_algorithm_default_name(raw.as_usize() as *mut c_void, &mut status) };
        status.into_result()?;
        unsafe { consume_native_string(name) }
    }

    fn destroy(&self, raw: RawAlgorithm) {
        unsafe { vc_algorithm_destroy(raw.as_usize() as *mut c_void) };
    }
}
