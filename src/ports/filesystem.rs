//! Filesystem port for the prompt and completion files.

use std::path::Path;

use crate::error::PortError;

/// Provides filesystem access for reading and writing files.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be opened, or is
    /// not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, PortError>;

    /// Writes the given contents to a file, creating or truncating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, missing parent
    /// directory, disk full, etc.).
    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError>;
}
