//! Command and pixel-data framing
//!
//! Every transaction starts with a control byte telling the controller how to
//! read the bytes that follow: [`CONTROL_COMMAND`] or [`CONTROL_DATA`]. Streams
//! longer than the transport's [`BusTransport::MAX_TRANSFER_SIZE`] are split
//! into several transactions, each re-asserting the control byte, so the
//! controller sees one continuous stream.
//!
//! Transactions are attempted once. A failed transaction is logged and the
//! stream carries on with the next one.

use crate::command::{CONTROL_COMMAND, CONTROL_DATA};
use crate::interface::BusTransport;

/// Send a single command byte in its own transaction
pub fn send_command<T: BusTransport>(bus: &mut T, address: u8, command: u8) {
    bus.begin_transaction(address);
    bus.write_byte(CONTROL_COMMAND);
    bus.write_byte(command);
    finish(bus, address);
}

/// Send a list of command bytes, split across as many transactions as needed
pub fn send_command_list<T: BusTransport>(bus: &mut T, address: u8, commands: &[u8]) {
    send_chunked(bus, address, CONTROL_COMMAND, commands);
}

/// Send pixel bytes, split across as many transactions as needed
pub fn send_pixel_data<T: BusTransport>(bus: &mut T, address: u8, data: &[u8]) {
    send_chunked(bus, address, CONTROL_DATA, data);
}

/// Payload bytes carried by one transaction after its control byte
fn payload_size<T: BusTransport>() -> usize {
    const {
        assert!(
            T::MAX_TRANSFER_SIZE >= 2,
            "transport must carry a control byte and at least one payload byte"
        );
    }
    T::MAX_TRANSFER_SIZE - 1
}

fn send_chunked<T: BusTransport>(bus: &mut T, address: u8, control: u8, bytes: &[u8]) {
    for chunk in bytes.chunks(payload_size::<T>()) {
        bus.begin_transaction(address);
        bus.write_byte(control);
        for &byte in chunk {
            bus.write_byte(byte);
        }
        finish(bus, address);
    }
}

fn finish<T: BusTransport>(bus: &mut T, address: u8) {
    if let Err(err) = bus.end_transaction() {
        log::warn!("transaction to {:#04x} failed: {:?}", address, err);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Records every transaction as (address, bytes)
    #[derive(Debug)]
    pub(crate) struct RecordingBus<const N: usize> {
        pub(crate) transactions: Vec<(u8, Vec<u8>)>,
        pub(crate) begun: usize,
        pub(crate) fail: bool,
        open: Option<(u8, Vec<u8>)>,
    }

    impl<const N: usize> RecordingBus<N> {
        pub(crate) fn new() -> Self {
            Self {
                transactions: Vec::new(),
                begun: 0,
                fail: false,
                open: None,
            }
        }

        /// Transactions opened with `control`, control byte stripped
        pub(crate) fn payloads(&self, control: u8) -> Vec<Vec<u8>> {
            self.transactions
                .iter()
                .filter(|(_, bytes)| bytes.first() == Some(&control))
                .map(|(_, bytes)| bytes[1..].to_vec())
                .collect()
        }

        /// All bytes sent, control bytes stripped
        pub(crate) fn stream(&self) -> Vec<u8> {
            self.transactions
                .iter()
                .flat_map(|(_, bytes)| bytes[1..].iter().copied())
                .collect()
        }
    }

    impl<const N: usize> BusTransport for RecordingBus<N> {
        type Error = ();

        const MAX_TRANSFER_SIZE: usize = N;

        fn begin(&mut self) {
            self.begun += 1;
        }

        fn begin_transaction(&mut self, address: u8) {
            assert!(self.open.is_none(), "nested transaction");
            self.open = Some((address, Vec::new()));
        }

        fn write_byte(&mut self, byte: u8) {
            match self.open.as_mut() {
                Some((_, bytes)) => bytes.push(byte),
                None => panic!("write outside a transaction"),
            }
        }

        fn end_transaction(&mut self) -> Result<(), Self::Error> {
            let done = self.open.take();
            if let Some(done) = done {
                self.transactions.push(done);
            }
            if self.fail { Err(()) } else { Ok(()) }
        }
    }

    #[test]
    fn test_single_command() {
        let mut bus = RecordingBus::<32>::new();
        send_command(&mut bus, 0x3C, 0xAF);
        assert_eq!(bus.transactions, alloc::vec![(0x3C, alloc::vec![0x00, 0xAF])]);
    }

    #[test]
    fn test_command_list_fits_one_transaction() {
        let mut bus = RecordingBus::<8>::new();
        send_command_list(&mut bus, 0x3D, &[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(
            bus.transactions,
            alloc::vec![(0x3D, alloc::vec![0x00, 1, 2, 3, 4, 5, 6, 7])]
        );
    }

    #[test]
    fn test_command_list_splits_at_limit() {
        let mut bus = RecordingBus::<4>::new();
        send_command_list(&mut bus, 0x3C, &[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(
            bus.payloads(CONTROL_COMMAND),
            alloc::vec![alloc::vec![1, 2, 3], alloc::vec![4, 5, 6], alloc::vec![7]]
        );
    }

    #[test]
    fn test_chunking_preserves_stream_around_limit() {
        const MAX: usize = 16;
        for n in 0..=(3 * MAX + 1) {
            let list: Vec<u8> = (0..n).map(|i| i as u8).collect();
            let mut bus = RecordingBus::<MAX>::new();
            send_command_list(&mut bus, 0x3C, &list);

            assert_eq!(bus.stream(), list, "n = {n}");
            assert_eq!(bus.transactions.len(), n.div_ceil(MAX - 1));
            for (address, bytes) in &bus.transactions {
                assert_eq!(*address, 0x3C);
                assert!(bytes.len() <= MAX);
                assert_eq!(bytes[0], CONTROL_COMMAND);
            }
        }
    }

    #[test]
    fn test_pixel_data_uses_data_control_byte() {
        let mut bus = RecordingBus::<3>::new();
        send_pixel_data(&mut bus, 0x3C, &[0xAA, 0xBB, 0xCC]);
        assert_eq!(
            bus.transactions,
            alloc::vec![
                (0x3C, alloc::vec![0x40, 0xAA, 0xBB]),
                (0x3C, alloc::vec![0x40, 0xCC]),
            ]
        );
    }

    #[test]
    fn test_failed_transaction_does_not_abort_stream() {
        let mut bus = RecordingBus::<2>::new();
        bus.fail = true;
        send_pixel_data(&mut bus, 0x3C, &[1, 2, 3]);
        assert_eq!(bus.transactions.len(), 3);
        assert_eq!(bus.stream(), alloc::vec![1, 2, 3]);
    }
}
