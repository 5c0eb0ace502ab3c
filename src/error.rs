//! Error types for layout validation

use thiserror::Error;

/// Errors that can occur while validating a mapped byte region against the
/// `RobotIoState` layout
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Byte region length does not match the record size
    #[error("region size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Required region length in bytes
        expected: usize,
        /// Actual region length in bytes
        actual: usize,
    },

    /// Mapped base address violates the record's alignment requirement
    #[error("base address {address:#x} not aligned to {alignment}")]
    Misaligned {
        /// Base address of the region
        address: usize,
        /// Required alignment in bytes
        alignment: usize,
    },

    /// A boolean field holds a raw byte other than 0 or 1
    #[error("invalid boolean byte {value:#04x} at offset {offset}")]
    InvalidBool {
        /// Byte offset of the offending field
        offset: usize,
        /// Raw byte value observed
        value: u8,
    },
}

/// Result type for layout validation operations
pub type LayoutResult<T> = Result<T, LayoutError>;
