// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for cache operations.

use ohno::ErrorExt;

/// An error from a cache operation.
///
/// This is an opaque error type that can wrap any underlying error from a
/// cache implementation: connectivity failures, encoding failures, timeouts,
/// and so on. Callers that compose tiers must not assume a taxonomy beyond
/// "error present vs. absent"; use [`std::error::Error::source()`] or
/// [`ohno::ErrorExt::find_source`] to access the underlying cause for
/// diagnosis.
///
/// # Example
///
/// ```
/// use strata_tier::Error;
///
/// let error = Error::from_message("operation failed");
/// ```
#[ohno::error]
pub struct Error {}

impl Error {
    /// Creates a new error from any type that can be converted to an error.
    ///
    /// This is the public API for creating cache errors from external crates.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_tier::Error;
    ///
    /// let error = Error::from_message("operation failed");
    /// ```
    pub fn from_message(cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::caused_by(cause)
    }

    /// Creates an error indicating the tier does not support an operation.
    ///
    /// Some tiers cannot honor every contract operation (a store without
    /// enumeration may be unable to `clear`, for example). Such tiers report
    /// the operation as unsupported rather than silently succeeding.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_tier::Error;
    ///
    /// let error = Error::unsupported("clear");
    /// assert!(error.is_unsupported());
    /// ```
    pub fn unsupported(operation: &'static str) -> Self {
        Self::caused_by(Unsupported { operation })
    }

    /// Returns `true` if this error was created by [`Error::unsupported`].
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        self.find_source::<Unsupported>().is_some()
    }
}

/// A specialized [`Result`] type for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Marker cause carried by errors from [`Error::unsupported`].
#[derive(Debug)]
pub struct Unsupported {
    operation: &'static str,
}

impl Unsupported {
    /// The name of the unsupported operation.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

impl std::fmt::Display for Unsupported {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "operation '{}' is not supported by this cache tier", self.operation)
    }
}

impl std::error::Error for Unsupported {}
