//! Error handling for the binding layer.
//!
//! Native failures cross the boundary as a code and message pair and are
//! surfaced unchanged; the binding adds only the few conditions the
//! marshalling itself can hit.

use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by algorithm handle operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The native layer reported a failure. Code and message are whatever
    /// the shim produced; this crate assigns them no meaning of its own.
    #[error("native call failed (code {code}): {message}")]
    Native {
        /// Shim-defined status code, never 0.
        code: i32,
        /// Shim-provided description, possibly empty.
        message: String,
    },

    /// The path could not be represented as a C string.
    #[error("path {path:?} cannot cross the C boundary")]
    InvalidPath {
        /// The offending path.
        path: PathBuf,
    },

    /// The native layer returned a string that was not valid UTF-8.
    #[error("native string is not valid UTF-8")]
    InvalidUtf8,

    /// The handle was released and no longer reaches a native object.
    #[error("algorithm handle already released")]
    Released,
}
