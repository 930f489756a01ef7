//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors during display operations
//! - [`TransportError`](crate::interface::TransportError) - Errors raised by the I2C adapter
//!
//! Bus errors never reach [`Error`]: every transaction is attempted once and
//! failures are reported through the `log` facade.
//!
//! ## Example
//!
//! ```
//! use ssd1306_text::{Builder, BuilderError, Dimensions};
//!
//! // Missing dimensions
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingDimensions)));
//!
//! // Invalid dimensions
//! let result = Dimensions::new(256, 32); // Too wide
//! assert!(result.is_err());
//! ```

/// Maximum number of rows (COM outputs) driven by the SSD1306
pub const MAX_ROWS: u16 = 64;

/// Maximum number of columns (SEG outputs) driven by the SSD1306
pub const MAX_COLUMNS: u16 = 128;

/// Errors that can occur when operating the display
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// The frame buffer could not be allocated
    ///
    /// The driver stays unusable for drawing until a later
    /// [`begin`](crate::Display::begin) succeeds.
    OutOfMemory {
        /// Required buffer size in bytes
        required: usize,
    },
    /// The operation needs a frame buffer, but [`begin`](crate::Display::begin)
    /// has not completed successfully
    NotInitialized,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfMemory { required } => {
                write!(f, "Unable to allocate frame buffer of {required} bytes")
            }
            Self::NotInitialized => write!(f, "Display has not been initialized"),
        }
    }
}

impl core::error::Error for Error {}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the display is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuilderError {
    /// Dimensions were not specified
    ///
    /// [`Builder::dimensions()`](crate::config::Builder::dimensions) must be called before building.
    MissingDimensions,
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Width in pixels requested
        width: u16,
        /// Height in pixels requested
        height: u16,
    },
    /// The geometry has no known COM-pin and contrast values
    ///
    /// Supply both [`Builder::com_pins()`](crate::config::Builder::com_pins) and
    /// [`Builder::contrast()`](crate::config::Builder::contrast) for such panels.
    UnknownPanel {
        /// Width in pixels requested
        width: u16,
        /// Height in pixels requested
        height: u16,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingDimensions => write!(f, "Dimensions must be specified"),
            Self::InvalidDimensions { width, height } => write!(
                f,
                "Invalid dimensions {width}x{height} (max {MAX_COLUMNS}x{MAX_ROWS})"
            ),
            Self::UnknownPanel { width, height } => write!(
                f,
                "No panel settings known for {width}x{height}, set COM pins and contrast explicitly"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::OutOfMemory { required: 1024 }.to_string(),
            "Unable to allocate frame buffer of 1024 bytes"
        );
        assert_eq!(
            BuilderError::InvalidDimensions {
                width: 0,
                height: 32
            }
            .to_string(),
            "Invalid dimensions 0x32 (max 128x64)"
        );
    }
}
