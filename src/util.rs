//! Marshalling helpers for crossing the C boundary.

use std::ffi::CString;
use std::path::Path;

use crate::error::{Error, Result};

/// Convert a path to a C string.
///
/// The shim expects UTF-8. A path that is not UTF-8, or that contains an
/// interior NUL byte, cannot cross the boundary.
pub(crate) fn path_to_cstring(path: &Path) -> Result<CString> {
    let utf8 = path.to_str().ok_or_else(|| Error::InvalidPath {
        path: path.to_path_buf(),
    })?;
    CString::new(utf8).map_err(|_| Error::InvalidPath {
        path: path.to_path_buf(),
    })
}
