//! # **Error Module** - *Kernel Error Taxonomy*
//!
//! Defines the unified error type for all *Minframe* kernels.
//!
//! ## Covers
//! - Malformed user inputs, type incompatibility, unsupported dispatch
//!   targets, range violations, oversized outputs, allocation refusal,
//!   multimap capacity, and violated internal invariants.
//! - Every error carries a short message plus the source location of the
//!   check that failed, captured via `#[track_caller]` constructors.
//! - Failures abort the current kernel without producing output and without
//!   mutating inputs; they are reported as values, never as panics.

use std::error::Error;
use std::fmt;
use std::panic::Location;

/// Crate-wide result alias.
pub type Result<T, E = KernelError> = std::result::Result<T, E>;

/// Source position of the failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: &'static str,
    pub line: u32,
}

impl SourceLocation {
    #[inline]
    fn caller(loc: &'static Location<'static>) -> Self {
        Self {
            file: loc.file(),
            line: loc.line(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Error type for all kernel operations.
///
/// Each variant includes a contextual message string and the source location
/// of the failed check, enabling precise debugging and error reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum KernelError {
    /// Malformed user input detected at the boundary (mismatched sizes,
    /// empty key set where one is required, negative indices).
    InvalidArgument { message: String, location: SourceLocation },

    /// Incompatible types between columns, or an aggregation against an
    /// unsupported type.
    TypeMismatch { message: String, location: SourceLocation },

    /// A dispatched functor rejects the runtime type.
    TypeNotSupported { message: String, location: SourceLocation },

    /// Slice/split/bitmap range outside `[0, n]`, or `begin > end`.
    OutOfRange { message: String, location: SourceLocation },

    /// Computed output size exceeds the index domain.
    OutputTooLarge { message: String, location: SourceLocation },

    /// Surfaced from the allocator.
    AllocationFailure { message: String, location: SourceLocation },

    /// Multimap full. Prevented by up-front sizing; seeing this indicates an
    /// internal invariant violation.
    CapacityExceeded { message: String, location: SourceLocation },

    /// Violated invariant not due to user input.
    InternalError { message: String, location: SourceLocation },
}

macro_rules! impl_error_ctor {
    ($(#[$doc:meta] $fn_name:ident => $variant:ident),+ $(,)?) => {
        impl KernelError {
            $(
                #[$doc]
                #[track_caller]
                pub fn $fn_name(message: impl Into<String>) -> Self {
                    KernelError::$variant {
                        message: message.into(),
                        location: SourceLocation::caller(Location::caller()),
                    }
                }
            )+
        }
    };
}

impl_error_ctor!(
    /// Constructs an `InvalidArgument` error at the caller's location.
    invalid_argument => InvalidArgument,
    /// Constructs a `TypeMismatch` error at the caller's location.
    type_mismatch => TypeMismatch,
    /// Constructs a `TypeNotSupported` error at the caller's location.
    type_not_supported => TypeNotSupported,
    /// Constructs an `OutOfRange` error at the caller's location.
    out_of_range => OutOfRange,
    /// Constructs an `OutputTooLarge` error at the caller's location.
    output_too_large => OutputTooLarge,
    /// Constructs an `AllocationFailure` error at the caller's location.
    allocation_failure => AllocationFailure,
    /// Constructs a `CapacityExceeded` error at the caller's location.
    capacity_exceeded => CapacityExceeded,
    /// Constructs an `InternalError` at the caller's location.
    internal => InternalError,
);

impl KernelError {
    /// Stable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            KernelError::InvalidArgument { .. } => "InvalidArgument",
            KernelError::TypeMismatch { .. } => "TypeMismatch",
            KernelError::TypeNotSupported { .. } => "TypeNotSupported",
            KernelError::OutOfRange { .. } => "OutOfRange",
            KernelError::OutputTooLarge { .. } => "OutputTooLarge",
            KernelError::AllocationFailure { .. } => "AllocationFailure",
            KernelError::CapacityExceeded { .. } => "CapacityExceeded",
            KernelError::InternalError { .. } => "InternalError",
        }
    }

    fn parts(&self) -> (&str, &SourceLocation) {
        match self {
            KernelError::InvalidArgument { message, location }
            | KernelError::TypeMismatch { message, location }
            | KernelError::TypeNotSupported { message, location }
            | KernelError::OutOfRange { message, location }
            | KernelError::OutputTooLarge { message, location }
            | KernelError::AllocationFailure { message, location }
            | KernelError::CapacityExceeded { message, location }
            | KernelError::InternalError { message, location } => (message, location),
        }
    }
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (message, location) = self.parts();
        write!(f, "{}: {} ({})", self.kind(), message, location)
    }
}

impl Error for KernelError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_carries_location_and_kind() {
        let err = KernelError::invalid_argument("sizes differ");
        assert_eq!(err.kind(), "InvalidArgument");
        let rendered = err.to_string();
        assert!(rendered.contains("sizes differ"));
        assert!(rendered.contains("error.rs"));
    }

    #[test]
    fn test_variants_compare_structurally() {
        let a = KernelError::type_mismatch("x");
        match &a {
            KernelError::TypeMismatch { message, .. } => assert_eq!(message, "x"),
            _ => panic!("wrong kind"),
        }
    }
}
