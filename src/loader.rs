//! Loads a bytecode file into memory.
//!
//! This is deliberately thin: it opens a file, reads it fully, and checks
//! the length is a well-formed multiple of the instruction width. It does
//! no decoding — that's `bytecode::fetch`'s job, one instruction at a time,
//! once the bytes are handed to a [`crate::machine::Machine`].

use std::fs;
use std::path::Path;

use crate::bytecode;
use crate::error::ErrorKind;

/// Read `path` fully and validate it as a bytecode buffer.
///
/// Returns [`ErrorKind::InvalidBytecodeLength`] if the file's length isn't a
/// multiple of `INSTR_BYTES`. I/O failures are reported separately via the
/// returned `std::io::Error` so callers can distinguish "file not found"
/// from "malformed bytecode".
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<u8>, LoadError> {
    let bytes = fs::read(path.as_ref()).map_err(LoadError::Io)?;
    bytecode::validate_length(&bytes).map_err(LoadError::Format)?;
    Ok(bytes)
}

/// Failure loading a bytecode file: either the file couldn't be read, or it
/// was read fine but isn't a well-formed bytecode buffer.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read bytecode file: {0}")]
    Io(#[source] std::io::Error),
    #[error(transparent)]
    Format(ErrorKind),
}
