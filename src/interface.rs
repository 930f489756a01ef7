//! Hardware interface abstraction
//!
//! This module provides the [`BusTransport`] trait and the [`I2cTransport`]
//! adapter for talking to the SSD1306 over a byte-oriented master bus.
//!
//! ## Transport Model
//!
//! The driver drives the bus through four blocking primitives:
//! - `begin()` once, before the first transaction
//! - `begin_transaction(address)` to open a transaction
//! - `write_byte(byte)` for every byte of the transaction
//! - `end_transaction()` to close it
//!
//! A transport also declares [`BusTransport::MAX_TRANSFER_SIZE`], the largest
//! number of bytes (control byte included) one transaction may carry. The
//! driver splits longer streams so no transaction exceeds it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::i2c::{I2c, Operation};
//! use ssd1306_text::{BusTransport, I2cTransport};
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
//! let mut bus: I2cTransport<_> = I2cTransport::new(MockI2c);
//!
//! bus.begin_transaction(0x3C);
//! bus.write_byte(0x00); // command stream
//! bus.write_byte(0xAF); // display on
//! let _ = bus.end_transaction();
//! ```

use core::fmt::Debug;
use embedded_hal::i2c::I2c;

type TransportResult<T, E> = core::result::Result<T, E>;

/// Default staging size of [`I2cTransport`], matching the common 32-byte
/// Wire buffer of small microcontrollers
pub const DEFAULT_MAX_TRANSFER_SIZE: usize = 32;

/// Trait for the bus carrying commands and pixel data to the controller
///
/// ## Implementing
///
/// For most cases, use the provided [`I2cTransport`]. Implement this trait on
/// your own type to reach the controller through another bus or to share one
/// physical bus between several senders.
pub trait BusTransport {
    /// Error type reported when a transaction fails
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Largest number of bytes one transaction may carry, control byte included
    ///
    /// Must be at least 2.
    const MAX_TRANSFER_SIZE: usize;

    /// Prepare the bus before the first transaction
    fn begin(&mut self) {}

    /// Open a transaction to the device at `address`
    fn begin_transaction(&mut self, address: u8);

    /// Append one byte to the open transaction
    fn write_byte(&mut self, byte: u8);

    /// Close the open transaction, sending it if the transport stages bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction could not be delivered.
    fn end_transaction(&mut self) -> TransportResult<(), Self::Error>;
}

/// Errors that can occur in [`I2cTransport`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportError<E> {
    /// The underlying I2C write failed (NACK, arbitration loss, ...)
    Bus(E),
    /// More bytes were written than the staging area holds
    Overflow,
}

impl<E: Debug> core::fmt::Display for TransportError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "I2C error: {e:?}"),
            Self::Overflow => write!(f, "Transaction exceeded the transfer size"),
        }
    }
}

impl<E: Debug> core::error::Error for TransportError<E> {}

/// [`BusTransport`] over an embedded-hal v1.0 I2C bus
///
/// Bytes of a transaction are staged in an `N`-byte array and sent with a
/// single [`I2c::write`] when the transaction ends.
///
/// ## Type Parameters
///
/// * `I2C` - I2C bus implementing [`I2c`]
/// * `N` - Staging size in bytes, reported as the maximum transfer size
pub struct I2cTransport<I2C, const N: usize = DEFAULT_MAX_TRANSFER_SIZE> {
    /// I2C bus
    i2c: I2C,
    /// Address of the open transaction
    address: u8,
    /// Staged bytes
    staged: [u8; N],
    /// Number of staged bytes
    len: usize,
    /// Set when a byte was dropped in the open transaction
    overflowed: bool,
}

impl<I2C, const N: usize> I2cTransport<I2C, N>
where
    I2C: I2c,
{
    /// Create a new transport owning `i2c`
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: 0,
            staged: [0; N],
            len: 0,
            overflowed: false,
        }
    }

    /// Release the underlying I2C bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, const N: usize> BusTransport for I2cTransport<I2C, N>
where
    I2C: I2c,
{
    type Error = TransportError<I2C::Error>;

    const MAX_TRANSFER_SIZE: usize = N;

    fn begin_transaction(&mut self, address: u8) {
        self.address = address;
        self.len = 0;
        self.overflowed = false;
    }

    fn write_byte(&mut self, byte: u8) {
        match self.staged.get_mut(self.len) {
            Some(slot) => {
                *slot = byte;
                self.len += 1;
            }
            None => self.overflowed = true,
        }
    }

    fn end_transaction(&mut self) -> TransportResult<(), Self::Error> {
        let len = core::mem::take(&mut self.len);
        if core::mem::take(&mut self.overflowed) {
            return Err(TransportError::Overflow);
        }
        self.i2c
            .write(self.address, &self.staged[..len])
            .map_err(TransportError::Bus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct MockError;

    impl embedded_hal::i2c::Error for MockError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        }
    }

    #[derive(Default)]
    struct MockI2c {
        writes: Vec<(u8, Vec<u8>)>,
        nack: bool,
    }

    impl ErrorType for MockI2c {
        type Error = MockError;
    }

    impl I2c for MockI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.nack {
                return Err(MockError);
            }
            for op in operations.iter() {
                if let Operation::Write(data) = op {
                    self.writes.push((address, data.to_vec()));
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_default_max_transfer_size() {
        assert_eq!(
            <I2cTransport<MockI2c> as BusTransport>::MAX_TRANSFER_SIZE,
            32
        );
        assert_eq!(<I2cTransport<MockI2c, 16> as BusTransport>::MAX_TRANSFER_SIZE, 16);
    }

    #[test]
    fn test_transaction_is_one_write() {
        let mut bus: I2cTransport<MockI2c> = I2cTransport::new(MockI2c::default());
        bus.begin();
        bus.begin_transaction(0x3C);
        bus.write_byte(0x00);
        bus.write_byte(0xAE);
        assert!(bus.end_transaction().is_ok());

        bus.begin_transaction(0x3D);
        bus.write_byte(0x40);
        assert!(bus.end_transaction().is_ok());

        let i2c = bus.release();
        assert_eq!(
            i2c.writes,
            alloc::vec![(0x3C, alloc::vec![0x00, 0xAE]), (0x3D, alloc::vec![0x40])]
        );
    }

    #[test]
    fn test_overflow_drops_transaction() {
        let mut bus: I2cTransport<MockI2c, 2> = I2cTransport::new(MockI2c::default());
        bus.begin_transaction(0x3C);
        bus.write_byte(0x00);
        bus.write_byte(0x01);
        bus.write_byte(0x02);
        assert_eq!(bus.end_transaction(), Err(TransportError::Overflow));

        // The next transaction starts clean
        bus.begin_transaction(0x3C);
        bus.write_byte(0x00);
        bus.write_byte(0x01);
        assert!(bus.end_transaction().is_ok());
        assert_eq!(bus.release().writes, alloc::vec![(0x3C, alloc::vec![0x00, 0x01])]);
    }

    #[test]
    fn test_bus_error_is_reported() {
        let mut bus: I2cTransport<MockI2c> = I2cTransport::new(MockI2c {
            nack: true,
            ..MockI2c::default()
        });
        bus.begin_transaction(0x3C);
        bus.write_byte(0x00);
        assert_eq!(bus.end_transaction(), Err(TransportError::Bus(MockError)));
    }
}
