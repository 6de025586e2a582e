use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_bounds_error {
    () => {
        crate::Error::OutOfBounds
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Decoding Errors
/// - [`Error::Malformed`] - Truncated, incomplete or structurally invalid metadata
/// - [`Error::OutOfBounds`] - Attempted to read beyond the end of a byte stream
/// - [`Error::RecursionLimit`] - Nested messages exceeded the configured depth
///
/// ## Resolution Errors
/// - [`Error::UnresolvedIndex`] - A string or name index has no valid resolution
/// - [`Error::UnmappableType`] - A type cannot be reduced to a JVM descriptor fragment
///
/// Signature synthesis treats [`Error::UnmappableType`] as a soft failure: the public
/// signature functions return `Ok(None)` for it, while every other variant is propagated.
///
/// # Examples
///
/// ```rust
/// use kmsig::{Error, metadata::read_class_data};
///
/// let strings: [&str; 0] = [];
/// match read_class_data(&[], &strings) {
///     Ok(class) => println!("{} functions", class.class.function.len()),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed metadata: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The metadata is damaged and could not be decoded.
    ///
    /// Raised for truncated streams, missing string-table headers, missing required
    /// fields and references to types that the type table does not contain.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while reading a byte stream.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// A string or name index could not be resolved through the name table.
    ///
    /// The associated value is the offending index.
    #[error("Failed to resolve string index - {0}")]
    UnresolvedIndex(i32),

    /// A type could not be mapped to a JVM descriptor fragment.
    ///
    /// The associated value describes the type that could not be mapped.
    #[error("Type can not be mapped to a descriptor - {0}")]
    UnmappableType(String),

    /// Recursion limit reached.
    ///
    /// Nested metadata messages are decoded recursively; this error indicates the
    /// configured nesting limit was exceeded. The associated value is the limit.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),
}
