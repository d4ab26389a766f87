//! Error taxonomy for a generation run
//!
//! All of these are unrecoverable: a run either produces a fully consistent
//! set of files or produces none. Boundary failures (manifest parsing, file
//! I/O) are reported through `anyhow` with context instead.

use thiserror::Error;

/// Errors produced while aggregating exports and mapping output files.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenError {
    /// Two distinct symbol identities claim the same fully-qualified
    /// destination name.
    #[error("trying to export multiple symbols with same name: {name}")]
    SymbolExposedTwice {
        /// The contested fully-qualified destination name.
        name: String,
    },

    /// Text was generated for destination modules that have no registered
    /// output path. Carries the complete sorted list, not just the first.
    #[error("missing output files for generated API modules:\n{}", missing.join(",\n"))]
    MissingOutputs {
        /// Expected relative output paths, sorted.
        missing: Vec<String>,
    },

    /// An output path is not located under the designated API directory.
    #[error("output file must be under a /{api_dir}/ directory, found {path}")]
    OutputOutsideApiDir {
        /// Configured API directory name.
        api_dir: String,
        /// The offending path as given.
        path: String,
    },
}
