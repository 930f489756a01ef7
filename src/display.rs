//! Core display operations

use crate::buffer::FrameBuffer;
use crate::command::{
    CHARGE_PUMP, CLOCK_DIV_DEFAULT, COLUMN_ADDR, COM_SCAN_DEC, DEACTIVATE_SCROLL,
    DISPLAY_ALL_ON_RESUME, DISPLAY_OFF, DISPLAY_ON, MEMORY_MODE, NORMAL_DISPLAY, PAGE_ADDR,
    SEG_REMAP, SET_COM_PINS, SET_CONTRAST, SET_DISPLAY_CLOCK_DIV, SET_DISPLAY_OFFSET,
    SET_MULTIPLEX, SET_PRECHARGE, SET_START_LINE, SET_VCOM_DETECT, VCOM_DETECT_DEFAULT,
};
use crate::config::{Config, DeviceConfig, Dimensions, VccSource};
use crate::error::Error;
use crate::interface::BusTransport;
use crate::protocol::{send_command, send_command_list, send_pixel_data};
use crate::text::{TextCursor, draw_char};

type DisplayResult = core::result::Result<(), Error>;

/// Horizontal addressing: the column pointer wraps into the next page
const HORIZONTAL_ADDRESSING: u8 = 0x00;

/// Buffered text driver for the SSD1306
///
/// Drawing only touches the off-chip [`FrameBuffer`]; [`flush`](Self::flush)
/// copies it to the controller.
///
/// ## Example
///
/// ```rust,no_run
/// use core::fmt::Write;
/// use core::convert::Infallible;
/// use embedded_hal::i2c::{I2c, Operation};
/// use ssd1306_text::{Builder, Dimensions, Display, I2cTransport, VccSource};
///
/// # struct MockI2c;
/// # impl embedded_hal::i2c::ErrorType for MockI2c { type Error = Infallible; }
/// # impl I2c for MockI2c {
/// #     fn transaction(
/// #         &mut self,
/// #         _address: u8,
/// #         _operations: &mut [Operation<'_>],
/// #     ) -> Result<(), Self::Error> {
/// #         Ok(())
/// #     }
/// # }
/// let dims = match Dimensions::new(128, 64) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new().dimensions(dims).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let bus: I2cTransport<_> = I2cTransport::new(MockI2c);
/// let mut display = Display::new(bus, config);
///
/// if display.begin(VccSource::SwitchCap, 0x3C).is_err() {
///     return;
/// }
/// display.clear();
/// let _ = write!(display, "Hello\nworld");
/// let _ = display.flush();
/// ```
pub struct Display<T>
where
    T: BusTransport,
{
    /// Bus transport
    transport: T,
    /// Display configuration
    config: Config,
    /// Settings of the last successful initialization
    device: Option<DeviceConfig>,
    /// Pixel buffer, allocated by the first successful initialization
    buffer: Option<FrameBuffer>,
    /// Text cursor
    cursor: TextCursor,
}

impl<T> Display<T>
where
    T: BusTransport,
{
    /// Create a new Display instance
    ///
    /// Nothing is sent and no memory is allocated until [`begin`](Self::begin).
    pub fn new(transport: T, config: Config) -> Self {
        Self {
            transport,
            config,
            device: None,
            buffer: None,
            cursor: TextCursor::new(),
        }
    }

    /// Allocate the frame buffer and initialize the controller
    ///
    /// An `address` of 0 selects the panel's default address (0x3C for
    /// 128x32, 0x3D otherwise). Calling `begin` again keeps the existing
    /// buffer and re-sends the initialization sequence.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfMemory` if the frame buffer cannot be allocated.
    /// Nothing is sent in that case. The controller's response to the
    /// initialization commands is not checked.
    pub fn begin(&mut self, vcc: VccSource, address: u8) -> DisplayResult {
        if self.buffer.is_none() {
            let buffer = FrameBuffer::try_new(self.config.dimensions).inspect_err(|err| {
                log::warn!("frame buffer allocation failed: {}", err);
            })?;
            log::debug!("allocated {} byte frame buffer", buffer.as_bytes().len());
            self.buffer = Some(buffer);
        }

        let device = self.config.device(vcc, address);
        log::debug!(
            "initializing {}x{} panel at {:#04x}: {:?}",
            self.config.dimensions.width,
            self.config.dimensions.height,
            device.address,
            device
        );
        self.device = Some(device);
        self.transport.begin();
        self.init(device);
        Ok(())
    }

    /// Send the power-on sequence
    fn init(&mut self, device: DeviceConfig) {
        let address = device.address;
        let mux = (self.config.dimensions.height - 1) as u8;

        self.command_list(
            address,
            &[
                DISPLAY_OFF,
                SET_DISPLAY_CLOCK_DIV,
                CLOCK_DIV_DEFAULT,
                SET_MULTIPLEX,
            ],
        );
        self.command(address, mux);

        // Start line 0 with no display offset
        self.command_list(address, &[SET_DISPLAY_OFFSET, 0x00, SET_START_LINE, CHARGE_PUMP]);
        self.command(address, device.vcc.charge_pump());

        self.command_list(
            address,
            &[MEMORY_MODE, HORIZONTAL_ADDRESSING, SEG_REMAP | 0x01, COM_SCAN_DEC],
        );

        self.command(address, SET_COM_PINS);
        self.command(address, device.com_pins);
        self.command(address, SET_CONTRAST);
        self.command(address, device.contrast);

        self.command(address, SET_PRECHARGE);
        self.command(address, device.vcc.precharge());

        self.command_list(
            address,
            &[
                SET_VCOM_DETECT,
                VCOM_DETECT_DEFAULT,
                DISPLAY_ALL_ON_RESUME,
                NORMAL_DISPLAY,
                DEACTIVATE_SCROLL,
                DISPLAY_ON,
            ],
        );
    }

    /// Turn every pixel of the buffer off
    ///
    /// The panel keeps showing the old content until the next [`flush`](Self::flush).
    pub fn clear(&mut self) {
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.clear();
        }
    }

    /// Turn the pixel at (x, y) on
    ///
    /// Coordinates outside the display are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32) {
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.set_pixel(x, y);
        }
    }

    /// Whether the buffered pixel at (x, y) is on
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        self.buffer.as_ref().is_some_and(|buffer| buffer.pixel(x, y))
    }

    /// Copy the whole frame buffer to the display
    ///
    /// # Errors
    ///
    /// Returns `Error::NotInitialized` if [`begin`](Self::begin) has not
    /// succeeded yet. Bus failures are logged, not returned.
    pub fn flush(&mut self) -> DisplayResult {
        let (Some(device), Some(buffer)) = (self.device, self.buffer.as_ref()) else {
            return Err(Error::NotInitialized);
        };
        let address = device.address;
        let last_column = (self.config.dimensions.width - 1) as u8;

        log::trace!("flushing {} bytes to {:#04x}", buffer.as_bytes().len(), address);

        // Full page range; the controller clamps the end page
        send_command_list(
            &mut self.transport,
            address,
            &[PAGE_ADDR, 0x00, 0xFF, COLUMN_ADDR, 0x00],
        );
        send_command(&mut self.transport, address, last_column);
        send_pixel_data(&mut self.transport, address, buffer.as_bytes());
        Ok(())
    }

    /// Print one byte of text at the cursor
    ///
    /// `\n` moves to the start of the next line and `\r` is ignored. Any other
    /// byte is drawn as a glyph, wrapping to the next line first if it would
    /// cross the right edge. Always returns 1, the number of bytes consumed.
    pub fn write_byte(&mut self, byte: u8) -> usize {
        let width = self.config.dimensions.width;
        if let Some((x, y)) = self.cursor.advance(byte, width) {
            if let Some(buffer) = self.buffer.as_mut() {
                let (size_x, size_y) = self.cursor.size();
                draw_char(buffer, x, y, byte, size_x, size_y);
            }
        }
        1
    }

    /// Print a run of bytes, returning how many were consumed
    pub fn write_bytes(&mut self, bytes: &[u8]) -> usize {
        bytes.iter().map(|byte| self.write_byte(*byte)).sum()
    }

    /// Move the text cursor to (x, y)
    pub fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor.set_position(x, y);
    }

    /// Current text cursor position
    pub fn cursor(&self) -> (i32, i32) {
        self.cursor.position()
    }

    /// Set the text magnification; 0 is treated as 1
    pub fn set_text_size(&mut self, size_x: u8, size_y: u8) {
        self.cursor.set_size(size_x, size_y);
    }

    /// Current text magnification
    pub fn text_size(&self) -> (u8, u8) {
        self.cursor.size()
    }

    /// Get display dimensions
    pub fn dimensions(&self) -> &Dimensions {
        &self.config.dimensions
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Settings resolved by the last successful [`begin`](Self::begin)
    pub fn device(&self) -> Option<&DeviceConfig> {
        self.device.as_ref()
    }

    /// Raw frame buffer bytes, once allocated
    pub fn buffer(&self) -> Option<&[u8]> {
        self.buffer.as_ref().map(FrameBuffer::as_bytes)
    }

    /// Release the transport
    pub fn release(self) -> T {
        self.transport
    }

    fn command(&mut self, address: u8, command: u8) {
        send_command(&mut self.transport, address, command);
    }

    fn command_list(&mut self, address: u8, commands: &[u8]) {
        send_command_list(&mut self.transport, address, commands);
    }
}

impl<T> core::fmt::Write for Display<T>
where
    T: BusTransport,
{
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.write_bytes(s.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CONTROL_COMMAND, CONTROL_DATA};
    use crate::config::Builder;
    use crate::protocol::tests::RecordingBus;
    use alloc::vec::Vec;
    use core::fmt::Write;

    fn test_display<const N: usize>(width: u16, height: u16) -> Display<RecordingBus<N>> {
        let config = Builder::new()
            .dimensions(Dimensions::new(width, height).unwrap())
            .build()
            .unwrap();
        Display::new(RecordingBus::new(), config)
    }

    fn commands(bytes: &[u8]) -> Vec<u8> {
        let mut out = alloc::vec![CONTROL_COMMAND];
        out.extend_from_slice(bytes);
        out
    }

    #[test]
    fn test_begin_sends_init_sequence_switchcap() {
        let mut display = test_display::<32>(128, 64);
        assert!(display.begin(VccSource::SwitchCap, 0).is_ok());

        let expected: Vec<(u8, Vec<u8>)> = [
            &[0xAE, 0xD5, 0x80, 0xA8][..],
            &[0x3F],
            &[0xD3, 0x00, 0x40, 0x8D],
            &[0x14],
            &[0x20, 0x00, 0xA1, 0xC8],
            &[0xDA],
            &[0x12],
            &[0x81],
            &[0xCF],
            &[0xD9],
            &[0xF1],
            &[0xDB, 0x40, 0xA4, 0xA6, 0x2E, 0xAF],
        ]
        .iter()
        .map(|bytes| (0x3D, commands(bytes)))
        .collect();

        assert_eq!(display.transport.transactions, expected);
        assert_eq!(display.transport.begun, 1);
    }

    #[test]
    fn test_begin_sends_init_sequence_external_vcc() {
        let mut display = test_display::<32>(96, 16);
        assert!(display.begin(VccSource::External, 0x3C).is_ok());

        let sent: Vec<Vec<u8>> = display
            .transport
            .transactions
            .iter()
            .map(|(address, bytes)| {
                assert_eq!(*address, 0x3C);
                bytes.clone()
            })
            .collect();

        assert_eq!(sent[1], commands(&[0x0F])); // multiplex = 16 - 1
        assert_eq!(sent[3], commands(&[0x10])); // charge pump off
        assert_eq!(sent[6], commands(&[0x02])); // COM pins
        assert_eq!(sent[8], commands(&[0x10])); // external contrast
        assert_eq!(sent[10], commands(&[0x22])); // pre-charge
        assert_eq!(sent.len(), 12);
    }

    #[test]
    fn test_init_sequence_survives_small_transfers() {
        let mut display = test_display::<3>(128, 32);
        assert!(display.begin(VccSource::SwitchCap, 0).is_ok());

        assert!(
            display
                .transport
                .transactions
                .iter()
                .all(|(address, bytes)| *address == 0x3C && bytes.len() <= 3)
        );
        assert_eq!(
            display.transport.stream(),
            alloc::vec![
                0xAE, 0xD5, 0x80, 0xA8, 0x1F, 0xD3, 0x00, 0x40, 0x8D, 0x14, 0x20, 0x00, 0xA1,
                0xC8, 0xDA, 0x02, 0x81, 0x8F, 0xD9, 0xF1, 0xDB, 0x40, 0xA4, 0xA6, 0x2E, 0xAF,
            ]
        );
    }

    #[test]
    fn test_begin_allocates_cleared_buffer() {
        let mut display = test_display::<32>(128, 32);
        assert!(display.buffer().is_none());
        assert!(display.begin(VccSource::SwitchCap, 0).is_ok());
        let buffer = display.buffer().unwrap();
        assert_eq!(buffer.len(), 512);
        assert!(buffer.iter().all(|b| *b == 0));
        assert_eq!(display.device().map(|d| d.address), Some(0x3C));
    }

    #[test]
    fn test_begin_twice_keeps_buffer() {
        let mut display = test_display::<32>(128, 64);
        assert!(display.begin(VccSource::SwitchCap, 0x3C).is_ok());
        display.set_pixel(5, 5);
        assert!(display.begin(VccSource::External, 0x3D).is_ok());
        assert!(display.pixel(5, 5));
        assert_eq!(display.device().map(|d| d.contrast), Some(0x9F));
        assert_eq!(display.transport.begun, 2);
    }

    #[test]
    fn test_flush_before_begin() {
        let mut display = test_display::<32>(128, 64);
        display.set_pixel(1, 1);
        display.clear();
        assert_eq!(display.write_byte(b'A'), 1);
        assert!(!display.pixel(1, 1));
        assert_eq!(display.flush(), Err(Error::NotInitialized));
        assert!(display.transport.transactions.is_empty());
    }

    #[test]
    fn test_flush_sends_window_and_buffer() {
        let mut display = test_display::<32>(128, 64);
        assert!(display.begin(VccSource::SwitchCap, 0x3C).is_ok());
        display.set_pixel(0, 0);
        display.set_pixel(127, 63);
        display.transport.transactions.clear();

        assert!(display.flush().is_ok());

        let sent = &display.transport.transactions;
        assert_eq!(sent[0], (0x3C, commands(&[0x22, 0x00, 0xFF, 0x21, 0x00])));
        assert_eq!(sent[1], (0x3C, commands(&[0x7F])));

        let data = display.transport.payloads(CONTROL_DATA);
        assert_eq!(data.len(), 1024usize.div_ceil(31));
        let pixels = data.concat();
        assert_eq!(pixels.len(), 1024);
        assert_eq!(pixels[0], 0x01);
        assert_eq!(pixels[1023], 0x80);
        assert!(sent.iter().all(|(_, bytes)| bytes.len() <= 32));
    }

    #[test]
    fn test_clear_sends_nothing() {
        let mut display = test_display::<32>(128, 64);
        assert!(display.begin(VccSource::SwitchCap, 0x3C).is_ok());
        display.set_pixel(4, 4);
        let sent = display.transport.transactions.len();
        display.clear();
        assert_eq!(display.transport.transactions.len(), sent);
        assert!(display.buffer().unwrap().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_hi_end_to_end() {
        let mut display = test_display::<32>(128, 64);
        assert!(display.begin(VccSource::SwitchCap, 0).is_ok());
        display.clear();
        assert_eq!(display.write_bytes(b"Hi"), 2);
        display.transport.transactions.clear();
        assert!(display.flush().is_ok());

        let mut expected = FrameBuffer::try_new(Dimensions::new(128, 64).unwrap()).unwrap();
        draw_char(&mut expected, 0, 0, b'H', 1, 1);
        draw_char(&mut expected, 6, 0, b'i', 1, 1);

        let data = display.transport.payloads(CONTROL_DATA);
        assert!(data.iter().all(|chunk| chunk.len() <= 31));
        assert_eq!(data.concat(), expected.as_bytes());
        assert_eq!(
            &data[0][..12],
            &[0x7F, 0x08, 0x08, 0x08, 0x7F, 0x00, 0x00, 0x44, 0x7D, 0x40, 0x00, 0x00]
        );
    }

    #[test]
    fn test_write_wraps_at_right_edge() {
        let mut display = test_display::<32>(128, 64);
        assert!(display.begin(VccSource::SwitchCap, 0).is_ok());
        display.set_cursor(126, 0);
        display.write_byte(b'H');
        assert_eq!(display.cursor(), (6, 8));
        // drawn on the second line, nothing at x = 126
        assert!(display.pixel(0, 8));
        assert!(!display.pixel(126, 0));
    }

    #[test]
    fn test_newline_and_carriage_return() {
        let mut display = test_display::<32>(128, 64);
        display.set_text_size(2, 3);
        display.set_cursor(40, 2);
        assert_eq!(display.write_byte(b'\r'), 1);
        assert_eq!(display.cursor(), (40, 2));
        assert_eq!(display.write_byte(b'\n'), 1);
        assert_eq!(display.cursor(), (0, 26));
    }

    #[test]
    fn test_fmt_write() {
        let mut display = test_display::<32>(128, 32);
        assert!(display.begin(VccSource::SwitchCap, 0).is_ok());
        assert!(write!(display, "{}\n{}", 1, 2).is_ok());
        assert_eq!(display.cursor(), (6, 8));
        // column 2 is 0x7F for '1' and 0x49 for '2'
        assert!(display.pixel(2, 1));
        assert!(display.pixel(2, 8));
        assert!(!display.pixel(2, 9));
    }

    #[test]
    fn test_text_size_scales_advance() {
        let mut display = test_display::<32>(128, 64);
        assert!(display.begin(VccSource::SwitchCap, 0).is_ok());
        display.set_text_size(2, 2);
        assert_eq!(display.text_size(), (2, 2));
        display.write_byte(b'H');
        assert_eq!(display.cursor(), (12, 0));
        assert!(display.pixel(0, 13));
        assert!(!display.pixel(0, 14));
    }

    #[test]
    fn test_glyph_past_bottom_is_skipped() {
        let mut display = test_display::<32>(128, 32);
        assert!(display.begin(VccSource::SwitchCap, 0).is_ok());
        display.set_cursor(0, 32);
        display.write_bytes(b"HHHH");
        assert!(display.buffer().unwrap().iter().all(|b| *b == 0));
        assert_eq!(display.cursor(), (24, 32));
    }
}
