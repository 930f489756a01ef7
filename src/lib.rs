//! SSD1306 OLED Text Driver
//!
//! A buffered driver for SSD1306 monochrome OLED controllers on I2C, supporting
//! panels up to 128x64 pixels.
//!
//! ## Features
//!
//! - `no_std` compatible (needs `alloc` for the frame buffer)
//! - `embedded-hal` v1.0 support
//! - Configurable display dimensions
//! - Built-in 5x8 font with scalable text and line wrapping
//! - `core::fmt::Write` support for formatted output
//! - Bus transfers split to fit small I2C buffers
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use core::fmt::Write;
//! use embedded_hal::i2c::{I2c, Operation};
//! use ssd1306_text::{Builder, Dimensions, Display, I2cTransport, VccSource};
//!
//! # struct MockI2c;
//! # impl embedded_hal::i2c::ErrorType for MockI2c { type Error = Infallible; }
//! # impl I2c for MockI2c {
//! #     fn transaction(
//! #         &mut self,
//! #         _address: u8,
//! #         _operations: &mut [Operation<'_>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # let i2c = MockI2c;
//! let bus: I2cTransport<_> = I2cTransport::new(i2c);
//! let dims = match Dimensions::new(128, 32) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let config = match Builder::new().dimensions(dims).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = Display::new(bus, config);
//! // 0 picks the panel's default address
//! if display.begin(VccSource::SwitchCap, 0).is_err() {
//!     return;
//! }
//! display.clear();
//! display.set_text_size(2, 2);
//! let _ = write!(display, "T={}", 21);
//! let _ = display.flush();
//! ```

#![no_std]

extern crate alloc;

/// Bit-packed frame buffer
pub mod buffer;
/// SSD1306 command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Built-in 5x8 font
pub mod font;
/// Hardware interface abstraction
pub mod interface;
/// Command and pixel-data framing
pub mod protocol;
/// Text cursor and glyph rasterizer
pub mod text;

pub use buffer::FrameBuffer;
pub use config::{
    ADDRESS_128X32, ADDRESS_DEFAULT, Builder, Config, DeviceConfig, Dimensions, MAX_COLUMNS,
    MAX_ROWS, PanelVariant, VccSource,
};
pub use display::Display;
pub use error::{BuilderError, Error};
pub use interface::{BusTransport, DEFAULT_MAX_TRANSFER_SIZE, I2cTransport, TransportError};
pub use text::TextCursor;
